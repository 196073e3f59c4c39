use std::collections::HashMap;

use log::trace;

use crate::conf::{JenkinsServerConfiguration, JobXmlConfig, Repository, RepositoryConfiguration};
use crate::error::LookupError;


/// Where repository and jenkins server settings come from
pub trait ConfigurationStore {
    fn repository_configuration(
        &self,
        repo: &Repository,
    ) -> Result<RepositoryConfiguration, LookupError>;

    fn jenkins_server_configuration(
        &self,
        name: &str,
    ) -> Result<JenkinsServerConfiguration, LookupError>;
}

/// A [ConfigurationStore] holding everything in memory. Repositories are keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    repositories: HashMap<u64, (Repository, RepositoryConfiguration)>,
    servers: HashMap<String, JenkinsServerConfiguration>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&mut self, repo: Repository, config: RepositoryConfiguration) {
        self.repositories.insert(repo.id, (repo, config));
    }

    pub fn add_server(&mut self, server: JenkinsServerConfiguration) {
        self.servers.insert(server.name.clone(), server);
    }

    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.values().map(|(r, _)| r)
    }
}

impl From<&JobXmlConfig> for InMemoryStore {
    fn from(config: &JobXmlConfig) -> Self {
        let mut store = InMemoryStore::new();
        for server in &config.jenkins_servers {
            store.add_server(server.clone());
        }
        for entry in &config.repositories {
            store.add_repository(entry.repository.clone(), entry.configuration.clone());
        }
        store
    }
}

impl ConfigurationStore for InMemoryStore {
    fn repository_configuration(
        &self,
        repo: &Repository,
    ) -> Result<RepositoryConfiguration, LookupError> {
        trace!("looking up configuration for {}", repo.path());
        self.repositories
            .get(&repo.id)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| LookupError::RepositoryNotConfigured {
                id: repo.id,
                path: repo.path(),
            })
    }

    fn jenkins_server_configuration(
        &self,
        name: &str,
    ) -> Result<JenkinsServerConfiguration, LookupError> {
        trace!("looking up jenkins server {}", name);
        self.servers
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::ServerNotConfigured {
                name: name.to_string(),
            })
    }
}
