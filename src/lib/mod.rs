use log::{debug, info};

use crate::callback::{callback_url, curl_command, BuildStatus};
use crate::conf::{JobTemplate, JobType, Repository};
use crate::error::FormatterError;
use crate::nav::NavBuilder;
use crate::store::ConfigurationStore;
use crate::template::{JobContext, JobParameter, TemplateRenderer};
use crate::utils::embed_credentials;

pub mod callback;
pub mod conf;
pub mod error;
pub mod nav;
pub mod store;
pub mod template;
pub mod utils;


/// Tacking this onto the end of the build command makes it print "BUILD SUCCESS0" on success
/// and "BUILD FAILURE1" on failure, which is what the post build tasks look for.
pub const BUILD_COMMAND_POSTFIX: &str =
    "&& echo \"BUILD SUCCESS$?\" || /bin/false || (echo \"BUILD FAILURE$?\" && /bin/false)";

/// What noop jobs run
pub const NOOP_COMMAND: &str = "/bin/true";

/// Appends [BUILD_COMMAND_POSTFIX] to `command`
pub fn build_command(command: &str) -> String {
    format!("{} {}", command, BUILD_COMMAND_POSTFIX)
}

fn job_parameters(job_type: JobType) -> Vec<JobParameter> {
    match job_type {
        JobType::VerifyBuild | JobType::ReleaseBuild => vec![
            JobParameter::string("repoId", "stash repository Id", "unknown"),
            JobParameter::string("buildHead", "the change to build", "head"),
        ],
        JobType::NoopBuild => vec![],
    }
}

/// Turns a [JobTemplate] and a [Repository] into the config.xml of a jenkins job
pub struct JenkinsJobXmlFormatter<'a, S: ConfigurationStore, N: NavBuilder> {
    renderer: &'a TemplateRenderer,
    store: &'a S,
    nav: &'a N,
    plugin_path: String,
}

impl<'a, S: ConfigurationStore, N: NavBuilder> JenkinsJobXmlFormatter<'a, S, N> {
    pub fn new(renderer: &'a TemplateRenderer, store: &'a S, nav: &'a N) -> Self {
        JenkinsJobXmlFormatter {
            renderer,
            store,
            nav,
            plugin_path: conf::DEFAULT_PLUGIN_PATH.to_string(),
        }
    }

    /// Changes where status callbacks are sent, relative to `/plugins/servlet/`
    pub fn with_plugin_path(mut self, plugin_path: &str) -> Self {
        self.plugin_path = plugin_path.to_string();
        self
    }

    /// Gathers every value the template of `job_template` can use
    pub fn build_context(
        &self,
        job_template: &JobTemplate,
        repo: &Repository,
    ) -> Result<JobContext, FormatterError> {
        let rc = self.store.repository_configuration(repo)?;
        let jsc = self
            .store
            .jenkins_server_configuration(&rc.jenkins_server_name)?;
        debug!(
            "building {} context for {} on server {}",
            job_template.job_type,
            repo.path(),
            jsc.name
        );

        // jenkins clones and reports back with the account we are configured to use
        let with_credentials =
            |url: &str| embed_credentials(url, &jsc.stash_username, &jsc.stash_password);
        let repository_url = with_credentials(&self.nav.repo_clone(repo));

        let command = match job_template.job_type {
            JobType::VerifyBuild => rc.verify_build_command.as_str(),
            JobType::ReleaseBuild => rc.publish_build_command.as_str(),
            JobType::NoopBuild => NOOP_COMMAND,
        };

        let base = self.nav.build_absolute();
        let callback = |status: BuildStatus| {
            curl_command(&with_credentials(&callback_url(
                &base,
                &self.plugin_path,
                status,
            )))
        };

        Ok(JobContext {
            repository_url,
            prebuild_command: rc.prebuild_command.clone(),
            build_command: build_command(command),
            started_command: callback(BuildStatus::InProgress),
            success_command: callback(BuildStatus::Successful),
            failed_command: callback(BuildStatus::Failed),
            repository_link: self.nav.repo_browse(repo),
            repository_name: format!("{} {}", repo.project.name, repo.name),
            parameter_list: job_parameters(job_template.job_type),
        })
    }

    /// Renders the template file of `job_template` for `repo`
    pub fn generate_job_xml(
        &self,
        job_template: &JobTemplate,
        repo: &Repository,
    ) -> Result<String, FormatterError> {
        let ctx = self.build_context(job_template, repo)?;
        let xml = self.renderer.render(&job_template.template_file, &ctx)?;
        info!(
            "generated {} for {}",
            job_template.build_name_for(repo),
            repo.path()
        );
        Ok(xml)
    }
}
