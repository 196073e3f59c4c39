/// Defines what makes for a valid configuration
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FormatterError};


lazy_static! {
    static ref JOB_NAME_INVALID_CHARS: Regex =
        Regex::new(r"[^A-Za-z0-9_.\-]").expect("could not compile pattern");
}

pub const DEFAULT_PLUGIN_PATH: &str = "stashbot/build-reporting";
pub const DEFAULT_SERVER_NAME: &str = "default";
pub const DEFAULT_COMMAND: &str = "/bin/true";

fn default_plugin_path() -> String {
    DEFAULT_PLUGIN_PATH.to_string()
}

fn default_server_name() -> String {
    DEFAULT_SERVER_NAME.to_string()
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

fn default_scm_id() -> String {
    "git".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
/// The project a [Repository] belongs to
pub struct Project {
    /// Short key, Ex: PROJ
    pub key: String,
    /// Human readable name
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
/// A repository hosted on the code review server
pub struct Repository {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub project: Project,
    #[serde(default = "default_scm_id")]
    /// Which scm hosts the repository. Used to build the clone url
    pub scm_id: String,
}

impl Repository {
    /// `PROJECT/slug`, the form used on the command line
    pub fn path(&self) -> String {
        format!("{}/{}", self.project.key, self.slug)
    }

    pub fn matches_path(&self, path: &str) -> bool {
        match path.split_once('/') {
            Some((key, slug)) => self.project.key.eq_ignore_ascii_case(key) && self.slug == slug,
            None => false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
/// Per-repository build settings
pub struct RepositoryConfiguration {
    #[serde(default = "default_server_name")]
    /// Name of the [JenkinsServerConfiguration] building this repository
    pub jenkins_server_name: String,
    #[serde(default = "default_command")]
    /// Ran before any build command
    pub prebuild_command: String,
    #[serde(default = "default_command")]
    /// Ran by verification jobs
    pub verify_build_command: String,
    #[serde(default = "default_command")]
    /// Ran by release jobs
    pub publish_build_command: String,
}

impl Default for RepositoryConfiguration {
    fn default() -> Self {
        RepositoryConfiguration {
            jenkins_server_name: default_server_name(),
            prebuild_command: default_command(),
            verify_build_command: default_command(),
            publish_build_command: default_command(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq)]
/// Per-server settings
pub struct JenkinsServerConfiguration {
    pub name: String,
    /// Base url of the jenkins server
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Account jenkins uses to talk back to the code review server.
    /// This is what ends up in the generated urls.
    pub stash_username: String,
    pub stash_password: String,
}

impl std::fmt::Debug for JenkinsServerConfiguration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JenkinsServerConfiguration")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"********")
            .field("stash_username", &self.stash_username)
            .field("stash_password", &"********")
            .finish()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case", try_from = "String")]
/// What a generated job does. Deserializes through [FromStr], so config files
/// accept the same spellings as the command line.
pub enum JobType {
    /// Builds a change and reports its status
    VerifyBuild,
    /// Builds and publishes a release
    ReleaseBuild,
    /// Does nothing, successfully
    NoopBuild,
}

impl JobType {
    pub const ALL: [JobType; 3] = [JobType::VerifyBuild, JobType::ReleaseBuild, JobType::NoopBuild];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::VerifyBuild => "verify_build",
            JobType::ReleaseBuild => "release_build",
            JobType::NoopBuild => "noop_build",
        }
    }
}

impl Display for JobType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = FormatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        JobType::ALL
            .iter()
            .find(|t| t.as_str() == normalized)
            .copied()
            .ok_or_else(|| FormatterError::InvalidJobType(s.to_string()))
    }
}

impl TryFrom<String> for JobType {
    type Error = FormatterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
/// A named job blueprint and the template file rendering it. Serializes to:
/// ```yaml
/// name: verification
/// template_file: jenkins-verify-job.xml
/// job_type: verify_build
/// ```
pub struct JobTemplate {
    pub name: String,
    pub template_file: String,
    pub job_type: JobType,
}

impl JobTemplate {
    pub fn new(name: &str, template_file: &str, job_type: JobType) -> Self {
        JobTemplate {
            name: name.to_string(),
            template_file: template_file.to_string(),
            job_type,
        }
    }

    /// The built-in template for a job type
    pub fn default_for(job_type: JobType) -> Self {
        match job_type {
            JobType::VerifyBuild => {
                JobTemplate::new("verification", "jenkins-verify-job.xml", job_type)
            }
            JobType::ReleaseBuild => {
                JobTemplate::new("publish", "jenkins-publish-job.xml", job_type)
            }
            JobType::NoopBuild => JobTemplate::new("noop", "jenkins-noop-job.xml", job_type),
        }
    }

    pub fn defaults() -> Vec<JobTemplate> {
        JobType::ALL.iter().map(|t| JobTemplate::default_for(*t)).collect()
    }

    /// Name of the jenkins job generated from this template for `repo`
    /// ```rust
    /// use jobxml::conf::{JobTemplate, JobType, Project, Repository};
    /// let repo = Repository {
    ///     id: 1,
    ///     slug: "core".to_string(),
    ///     name: "Core".to_string(),
    ///     project: Project { key: "ACME".to_string(), name: "Acme".to_string() },
    ///     scm_id: "git".to_string(),
    /// };
    /// let t = JobTemplate::default_for(JobType::NoopBuild);
    /// assert_eq!(t.build_name_for(&repo), "ACME_core_noop");
    /// ```
    pub fn build_name_for(&self, repo: &Repository) -> String {
        let raw = format!("{}_{}_{}", repo.project.key, repo.slug, self.name);
        JOB_NAME_INVALID_CHARS.replace_all(&raw, "-").to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
/// A repository along with its build settings
pub struct RepositoryEntry {
    pub repository: Repository,
    #[serde(default)]
    pub configuration: RepositoryConfiguration,
}

#[derive(Serialize, Deserialize, Debug)]
/// Represents the configuration file given to the binary
pub struct JobXmlConfig {
    /// Base url of the code review server, used for clone, browse & callback urls
    pub stash_url: String,
    #[serde(default = "default_plugin_path")]
    /// Servlet path receiving build status callbacks
    pub plugin_path: String,
    /// Optional directory of extra templates, overriding built-in ones by name.
    /// A relative path is taken from the directory holding the config file,
    /// see [JobXmlConfig::resolve_template_dir]
    pub template_dir: Option<String>,
    #[serde(default)]
    pub jenkins_servers: Vec<JenkinsServerConfiguration>,
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
    #[serde(default)]
    job_templates: Vec<JobTemplate>,
}

impl JobXmlConfig {
    /// Configured job templates, or the built-in ones when none are configured
    pub fn job_templates(&self) -> Vec<JobTemplate> {
        if self.job_templates.is_empty() {
            JobTemplate::defaults()
        } else {
            self.job_templates.clone()
        }
    }

    pub fn find_job_template(&self, name: &str) -> Option<JobTemplate> {
        self.job_templates().into_iter().find(|t| t.name == name)
    }

    pub fn find_repository(&self, path: &str) -> Option<&Repository> {
        self.repositories
            .iter()
            .map(|e| &e.repository)
            .find(|r| r.matches_path(path))
    }

    /// Where to load extra templates from, given the path the config was read from
    pub fn resolve_template_dir(&self, config_path: &Path) -> Option<PathBuf> {
        let dir = Path::new(self.template_dir.as_ref()?);
        if dir.is_absolute() {
            return Some(dir.to_path_buf());
        }
        match config_path.parent() {
            Some(parent) => Some(parent.join(dir)),
            None => Some(dir.to_path_buf()),
        }
    }

    /// Reads a yaml config file, or a toml one if the extension says so
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("reading config from {}", path.display());
        let mut s = String::new();
        let mut f = File::open(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            inner: e,
        })?;
        f.read_to_string(&mut s).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            inner: e,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&s)?),
            _ => Ok(serde_yaml::from_str(&s)?),
        }
    }
}
