use std::path::Path;
use tracing::info;

use crate::git::{self, GitCommand, GitError, GitRunner};

/// Bring `dest` in line with the repository at `url`: pull when `dest` is
/// already a checkout, clone into it otherwise.
pub async fn pull_or_clone<G: GitRunner>(git: &G, url: &str, dest: &Path) -> Result<(), GitError> {
    if git::is_repository(dest) {
        info!(dest = %dest.display(), "destination is a repository, pulling");
        git.run(&GitCommand::pull_in(dest)).await?;
    } else {
        info!(url, dest = %dest.display(), "cloning template");
        git.run(&GitCommand::clone_repo(url, dest)).await?;
    }
    Ok(())
}
