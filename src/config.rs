/// Environment variable overriding the git binary used for every command.
pub const GIT_PROGRAM_ENV: &str = "PULLPLATE_GIT";

/// Runtime settings threaded explicitly through the commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub git_program: String,
    /// Branch that receives template updates on `pull`.
    pub sync_branch: String,
    /// Remote probed and pruned for a stale sync branch.
    pub remote: String,
    pub default_project_name: String,
    pub default_template_branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            sync_branch: "template".to_string(),
            remote: "origin".to_string(),
            default_project_name: "vue-project".to_string(),
            default_template_branch: "main".to_string(),
        }
    }
}

impl Config {
    /// Defaults, with the git binary taken from `PULLPLATE_GIT` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(program) = lookup(GIT_PROGRAM_ENV).filter(|p| !p.trim().is_empty()) {
            config.git_program = program;
        }
        config
    }
}
