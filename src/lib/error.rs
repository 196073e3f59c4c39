use thiserror::Error;

/// Configuration could not be found for a repository or a server
#[derive(Debug, Error, Eq, PartialEq)]
pub enum LookupError {
    #[error("no configuration for repository {path} (id {id})")]
    RepositoryNotConfigured { id: u64, path: String },

    #[error("no jenkins server named \"{name}\"")]
    ServerNotConfigured { name: String },
}

/// Everything that can go wrong while generating a job
#[derive(Debug, Error)]
pub enum FormatterError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Caller asked for a job type we do not know how to build
    #[error("invalid job type \"{0}\": must be one of verify_build, release_build, noop_build")]
    InvalidJobType(String),

    #[error("no template registered as \"{0}\"")]
    TemplateNotFound(String),

    #[error("could not load template: {0}")]
    TemplateLoad(#[from] handlebars::TemplateError),

    #[error("could not render template: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The configuration file could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read ({path}): {inner}")]
    File { path: String, inner: std::io::Error },

    #[error("could not parse yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("could not parse toml: {0}")]
    Toml(#[from] toml::de::Error),
}
