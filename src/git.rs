use anyhow::{Context, Result};
use async_trait::async_trait;
use git2::Repository;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Find the git repository root from the current directory.
pub fn repo_root() -> Result<PathBuf> {
    repo_root_from(Path::new("."))
}

/// Find the git repository root containing `start`.
pub fn repo_root_from(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start)
        .context("Not inside a git repository")?;
    let workdir = repo.workdir()
        .context("Bare repositories are not supported")?;
    Ok(workdir.to_path_buf())
}

/// Return the name of the currently checked-out branch.
pub fn current_branch(root: &Path) -> Result<String> {
    let repo = Repository::open(root)?;
    let head = repo.head().context("No HEAD — is this a fresh repo?")?;
    head.shorthand()
        .map(|s| s.to_string())
        .context("HEAD is detached or has no name")
}

/// True when `path` is the working directory of an existing git repository.
pub fn is_repository(path: &Path) -> bool {
    Repository::open(path).is_ok()
}

/// One git invocation: the argument vector handed to the `git` binary.
///
/// Arguments are passed to the process verbatim, so branch names and URLs are
/// never re-parsed by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    args: Vec<String>,
}

impl GitCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fetch() -> Self {
        Self::new(["fetch"])
    }

    pub fn checkout(branch: &str) -> Self {
        Self::new(["checkout", branch])
    }

    /// `git checkout -b <branch>`
    pub fn checkout_new(branch: &str) -> Self {
        Self::new(["checkout", "-b", branch])
    }

    pub fn list_local(branch: &str) -> Self {
        Self::new(["branch", "--list", branch])
    }

    /// `pattern` is matched against remote-tracking short names (`origin/x`).
    pub fn list_remote(pattern: &str) -> Self {
        Self::new(["branch", "-r", "--list", pattern])
    }

    pub fn delete_local(branch: &str) -> Self {
        Self::new(["branch", "-D", branch])
    }

    pub fn delete_remote(remote: &str, branch: &str) -> Self {
        Self::new(["push", remote, "--delete", branch])
    }

    pub fn pull(url: &str, branch: &str) -> Self {
        Self::new(["pull", url, branch])
    }

    pub fn merge(reference: &str) -> Self {
        Self::new(["merge", reference])
    }

    pub fn clone_repo(url: &str, dest: &Path) -> Self {
        Self::new(["clone".to_string(), url.to_string(), dest.display().to_string()])
    }

    /// `git -C <dir> pull` — update an existing checkout from its upstream.
    pub fn pull_in(dir: &Path) -> Self {
        Self::new(["-C".to_string(), dir.display().to_string(), "pull".to_string()])
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.args.join(" "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}: {stderr}", exit_label(*.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Runs a single git command and yields its trimmed standard output.
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, command: &GitCommand) -> Result<String, GitError>;
}

/// [`GitRunner`] backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct ShellGit {
    program: String,
    dir: Option<PathBuf>,
}

impl ShellGit {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            dir: None,
        }
    }

    /// Run every command in `dir` instead of the process working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

impl Default for ShellGit {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl GitRunner for ShellGit {
    async fn run(&self, command: &GitCommand) -> Result<String, GitError> {
        debug!(command = %command, dir = ?self.dir, "spawning git");

        let mut cmd = Command::new(&self.program);
        cmd.args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| GitError::Spawn {
            command: command.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
