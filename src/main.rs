use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::{debug, info, LevelFilter};

use jobxml::conf::{JobTemplate, JobType, JobXmlConfig};
use jobxml::nav::StashNavBuilder;
use jobxml::store::InMemoryStore;
use jobxml::template::TemplateRenderer;
use jobxml::JenkinsJobXmlFormatter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    let repo_arg = Arg::with_name("repo")
        .short("r")
        .long("repo")
        .value_name("PROJECT/slug")
        .help("Repository to generate the job for")
        .takes_value(true)
        .required(true);
    let template_arg = Arg::with_name("template")
        .short("t")
        .long("template")
        .value_name("NAME")
        .help("Job template to use")
        .takes_value(true)
        .default_value("verification");
    let type_arg = Arg::with_name("type")
        .long("type")
        .value_name("TYPE")
        .help("Overrides the job type of the template: verify_build, release_build or noop_build")
        .takes_value(true);
    let output_arg = Arg::with_name("output")
        .short("o")
        .long("output")
        .value_name("FILE")
        .help("Writes to FILE instead of stdout")
        .takes_value(true);
    let matches = App::new("jenkins-jobxml")
        .version(VERSION)
        .about("Generates jenkins job configurations for repositories")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Sets a config file")
                .takes_value(true)
                .default_value("jobxml.yml"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Renders the config.xml of a job")
                .arg(repo_arg.clone())
                .arg(template_arg.clone())
                .arg(type_arg.clone())
                .arg(output_arg.clone()),
        )
        .subcommand(
            SubCommand::with_name("context")
                .about("Prints the values a job template is rendered with, as json")
                .arg(repo_arg)
                .arg(template_arg)
                .arg(type_arg)
                .arg(output_arg),
        )
        .subcommand(
            SubCommand::with_name("templates").about("Lists job templates and template files"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();

    let config_file = matches.value_of("config").unwrap_or("jobxml.yml");
    let config_path = Path::new(config_file);
    let config = JobXmlConfig::from_file(config_path)?;
    debug!("config: {:#?}", config);

    let mut renderer = TemplateRenderer::new()?;
    if let Some(dir) = config.resolve_template_dir(config_path) {
        let count = renderer.load_directory(&dir)?;
        info!("loaded {} templates from {}", count, dir.display());
    }

    match matches.subcommand() {
        ("render", Some(sub)) => generate(&config, &renderer, sub, false),
        ("context", Some(sub)) => generate(&config, &renderer, sub, true),
        ("templates", Some(_)) => {
            list_templates(&config, &renderer);
            Ok(())
        }
        _ => Err(anyhow!("no subcommand given, see --help")),
    }
}

fn job_template(config: &JobXmlConfig, matches: &ArgMatches) -> Result<JobTemplate> {
    let name = matches.value_of("template").unwrap_or("verification");
    let mut template = config
        .find_job_template(name)
        .ok_or_else(|| anyhow!("no job template named \"{}\"", name))?;
    if let Some(t) = matches.value_of("type") {
        template.job_type = t.parse::<JobType>()?;
    }
    Ok(template)
}

/// Renders the job xml for the repository given on the command line, or its context as json
fn generate(
    config: &JobXmlConfig,
    renderer: &TemplateRenderer,
    matches: &ArgMatches,
    context_only: bool,
) -> Result<()> {
    let template = job_template(config, matches)?;
    let path = matches.value_of("repo").unwrap_or_default();
    let repo = config
        .find_repository(path)
        .ok_or_else(|| anyhow!("repository {} is not configured", path))?;

    let store = InMemoryStore::from(config);
    let nav = StashNavBuilder::new(&config.stash_url);
    let formatter =
        JenkinsJobXmlFormatter::new(renderer, &store, &nav).with_plugin_path(&config.plugin_path);
    let out = if context_only {
        serde_json::to_string_pretty(&formatter.build_context(&template, repo)?)?
    } else {
        formatter.generate_job_xml(&template, repo)?
    };

    match matches.value_of("output") {
        Some(file) => {
            let mut f = File::create(file)?;
            f.write_all(out.as_bytes())?;
            info!("wrote {} to {}", template.build_name_for(repo), file);
        }
        None => println!("{}", out),
    }
    Ok(())
}

fn list_templates(config: &JobXmlConfig, renderer: &TemplateRenderer) {
    println!("job templates:");
    for t in config.job_templates() {
        let status = if renderer.has_template(&t.template_file) {
            ""
        } else {
            " (missing)"
        };
        println!("  {} [{}] -> {}{}", t.name, t.job_type, t.template_file, status);
    }
    println!("template files:");
    for name in renderer.template_names() {
        println!("  {}", name);
    }
}
