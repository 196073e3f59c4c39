use crate::conf::Repository;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::conf::{Project, Repository};
    use crate::nav::{NavBuilder, StashNavBuilder};

    fn repo() -> Repository {
        Repository {
            id: 3,
            slug: "widgets".to_string(),
            name: "Widgets".to_string(),
            project: Project {
                key: "ACME".to_string(),
                name: "Acme".to_string(),
            },
            scm_id: "git".to_string(),
        }
    }

    #[test]
    fn strips_trailing_slash() {
        let nav = StashNavBuilder::new("https://stash.example.com/");
        assert_eq!(nav.build_absolute(), "https://stash.example.com");
    }

    #[test]
    fn clone_url() {
        let nav = StashNavBuilder::new("https://stash.example.com/stash");
        assert_eq!(
            nav.repo_clone(&repo()),
            "https://stash.example.com/stash/scm/acme/widgets.git"
        );
    }

    #[test]
    fn browse_url() {
        let nav = StashNavBuilder::new("https://stash.example.com");
        assert_eq!(
            nav.repo_browse(&repo()),
            "https://stash.example.com/projects/ACME/repos/widgets/browse"
        );
    }
}

/// Builds absolute urls pointing at the code review server
pub trait NavBuilder {
    /// Base url of the server, without trailing slash
    fn build_absolute(&self) -> String;
    /// Url to clone `repo` from, without any credentials
    fn repo_clone(&self, repo: &Repository) -> String;
    /// Url of the web page showing `repo`
    fn repo_browse(&self, repo: &Repository) -> String;
}

/// [NavBuilder] following the url layout of a Stash server
#[derive(Debug, Clone)]
pub struct StashNavBuilder {
    base_url: String,
}

impl StashNavBuilder {
    pub fn new(base_url: &str) -> Self {
        StashNavBuilder {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl NavBuilder for StashNavBuilder {
    fn build_absolute(&self) -> String {
        self.base_url.clone()
    }

    fn repo_clone(&self, repo: &Repository) -> String {
        format!(
            "{}/scm/{}/{}.{}",
            self.base_url,
            repo.project.key.to_lowercase(),
            repo.slug,
            repo.scm_id
        )
    }

    fn repo_browse(&self, repo: &Repository) -> String {
        format!(
            "{}/projects/{}/repos/{}/browse",
            self.base_url, repo.project.key, repo.slug
        )
    }
}
