//! Template-branch synchronization behind `pullplate pull`.
//!
//! The workflow is a fixed sequence of awaited git steps:
//!
//! 1. `fetch`, then `checkout <current branch>` — either failure ends the run.
//! 2. Reconcile: drop a stale sync branch locally and on the remote.
//! 3. Create the sync branch, pull the template branch into it and merge.
//!
//! Steps 2 and 3 are best effort: every failure is reported and the chain
//! carries on, so step 3 always runs exactly once after a successful checkout.

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::Config,
    git::{GitCommand, GitError, GitRunner},
    progress::Reporter,
};

/// Inputs of one `pull` run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncParams {
    sync_branch: String,
    remote: String,
    template_url: String,
    template_branch: String,
}

impl SyncParams {
    pub fn new(
        config: &Config,
        template_url: impl Into<String>,
        template_branch: impl Into<String>,
    ) -> Result<Self> {
        let template_url = template_url.into();
        let template_branch = template_branch.into();
        validate_branch_name(&config.sync_branch)?;
        if template_url.trim().is_empty() {
            bail!("Template URL must not be empty");
        }
        if template_branch.trim().is_empty() {
            bail!("Template branch must not be empty");
        }
        reject_option_like("Template URL", &template_url)?;
        reject_option_like("Template branch", &template_branch)?;
        Ok(Self {
            sync_branch: config.sync_branch.clone(),
            remote: config.remote.clone(),
            template_url,
            template_branch,
        })
    }

    pub fn sync_branch(&self) -> &str {
        &self.sync_branch
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn template_url(&self) -> &str {
        &self.template_url
    }

    pub fn template_branch(&self) -> &str {
        &self.template_branch
    }

    /// Remote-tracking name of the sync branch, e.g. `origin/template`.
    pub fn remote_sync_branch(&self) -> String {
        format!("{}/{}", self.remote, self.sync_branch)
    }

    /// Reference merged after the pull: `<template url>/<template branch>`.
    pub fn merge_ref(&self) -> String {
        format!("{}/{}", self.template_url, self.template_branch)
    }
}

/// `git branch --list` matches whole names with fnmatch, so a name free of glob
/// metacharacters can only match itself.
fn validate_branch_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Sync branch name must not be empty");
    }
    if let Some(c) = name.chars().find(|&c| matches!(c, '*' | '?' | '[' | ']' | '\\') || c.is_whitespace()) {
        bail!("Sync branch name '{}' contains unsupported character {:?}", name, c);
    }
    reject_option_like("Sync branch name", name)
}

/// Values handed to git as positional arguments must not start with `-`,
/// otherwise git parses them as options (`checkout -f`).
pub fn reject_option_like(what: &str, value: &str) -> Result<()> {
    if value.starts_with('-') {
        bail!("{} '{}' must not start with '-'", what, value);
    }
    Ok(())
}

/// Result of a single git step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
    /// Never attempted because an earlier step ended the chain.
    Skipped,
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

/// What happened to a stale sync branch in one scope (local or remote).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum Cleanup {
    NotChecked,
    Absent,
    Deleted,
    DeleteFailed(String),
    ProbeFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Start,
    Fetched,
    OnTargetBranch,
    Reconciled,
    Done,
    Failed,
}

/// Stage-by-stage record of one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub state: SyncState,
    pub fetch: StepOutcome,
    pub checkout: StepOutcome,
    pub local_cleanup: Cleanup,
    pub remote_cleanup: Cleanup,
    pub create: StepOutcome,
    pub pull: StepOutcome,
    pub merge: StepOutcome,
}

impl Default for SyncReport {
    fn default() -> Self {
        Self {
            state: SyncState::Start,
            fetch: StepOutcome::Skipped,
            checkout: StepOutcome::Skipped,
            local_cleanup: Cleanup::NotChecked,
            remote_cleanup: Cleanup::NotChecked,
            create: StepOutcome::Skipped,
            pull: StepOutcome::Skipped,
            merge: StepOutcome::Skipped,
        }
    }
}

/// Answers "does branch X exist" for the local and remote scopes.
pub struct BranchProber<'a, G> {
    git: &'a G,
}

impl<'a, G: GitRunner> BranchProber<'a, G> {
    pub fn new(git: &'a G) -> Self {
        Self { git }
    }

    pub async fn exists_locally(&self, branch: &str) -> Result<bool, GitError> {
        let out = self.git.run(&GitCommand::list_local(branch)).await?;
        Ok(!out.is_empty())
    }

    /// `tracking_name` is the remote-tracking short name, e.g. `origin/template`.
    pub async fn exists_remotely(&self, tracking_name: &str) -> Result<bool, GitError> {
        let out = self.git.run(&GitCommand::list_remote(tracking_name)).await?;
        Ok(!out.is_empty())
    }
}

/// Drives the `pull` workflow against a [`GitRunner`], reporting every step.
pub struct Synchronizer<'a, G, R> {
    git: &'a G,
    reporter: &'a R,
}

impl<'a, G: GitRunner, R: Reporter> Synchronizer<'a, G, R> {
    pub fn new(git: &'a G, reporter: &'a R) -> Self {
        Self { git, reporter }
    }

    /// Run the whole workflow. Never returns an error: failures end up in the
    /// report and on the reporter.
    pub async fn run(&self, current_branch: &str, params: &SyncParams) -> SyncReport {
        let mut report = SyncReport::default();

        self.reporter.start("Fetching remote template...");
        match self.git.run(&GitCommand::fetch()).await {
            Ok(_) => {
                self.reporter.succeed("Fetch template success");
                report.fetch = StepOutcome::Succeeded;
                report.state = SyncState::Fetched;
                info!(state = ?report.state, "template fetched");
            }
            Err(e) => {
                self.failed("Fetch template failed", &e);
                report.fetch = StepOutcome::Failed(e.to_string());
                report.state = SyncState::Failed;
                return report;
            }
        }

        self.reporter.start(&format!("Switching to branch {}...", current_branch));
        match self.git.run(&GitCommand::checkout(current_branch)).await {
            Ok(_) => {
                self.reporter
                    .succeed(&format!("Switched to branch: {}", current_branch));
                report.checkout = StepOutcome::Succeeded;
                report.state = SyncState::OnTargetBranch;
                info!(state = ?report.state, branch = current_branch, "switched to target branch");
            }
            Err(e) => {
                self.failed(&format!("Failed to switch to branch: {}", current_branch), &e);
                report.checkout = StepOutcome::Failed(e.to_string());
                report.state = SyncState::Failed;
                return report;
            }
        }

        let (local, remote) = self.reconcile(params).await;
        report.local_cleanup = local;
        report.remote_cleanup = remote;
        report.state = SyncState::Reconciled;
        info!(
            state = ?report.state,
            local = ?report.local_cleanup,
            remote = ?report.remote_cleanup,
            "stale sync branch reconciled"
        );

        let (create, pull, merge) = self.create_and_pull(params).await;
        report.create = create;
        report.pull = pull;
        report.merge = merge;
        report.state = SyncState::Done;

        self.reporter.stop();
        info!(state = ?report.state, "synchronization finished");
        report
    }

    /// Remove a stale sync branch so it can be recreated from scratch.
    ///
    /// The remote is only probed when a local branch was found. Deletion
    /// failures are reported and do not stop the caller.
    pub async fn reconcile(&self, params: &SyncParams) -> (Cleanup, Cleanup) {
        let branch = params.sync_branch();
        let prober = BranchProber::new(self.git);

        match prober.exists_locally(branch).await {
            Ok(true) => {}
            Ok(false) => {
                self.reporter
                    .warn(&format!("local branch {} does not exist", branch));
                return (Cleanup::Absent, Cleanup::NotChecked);
            }
            Err(e) => {
                self.failed(&format!("Failed to look up local branch: {}", branch), &e);
                return (Cleanup::ProbeFailed(e.to_string()), Cleanup::NotChecked);
            }
        }

        self.reporter
            .warn(&format!("local branch {} already exists", branch));
        let local = match self.git.run(&GitCommand::delete_local(branch)).await {
            Ok(_) => {
                self.reporter
                    .succeed(&format!("Deleted local branch: {}", branch));
                Cleanup::Deleted
            }
            Err(e) => {
                self.failed(&format!("Failed to delete local branch: {}", branch), &e);
                Cleanup::DeleteFailed(e.to_string())
            }
        };

        let tracking = params.remote_sync_branch();
        let remote = match prober.exists_remotely(&tracking).await {
            Ok(true) => {
                match self
                    .git
                    .run(&GitCommand::delete_remote(params.remote(), branch))
                    .await
                {
                    Ok(_) => {
                        self.reporter
                            .succeed(&format!("Deleted remote branch: {}", tracking));
                        Cleanup::Deleted
                    }
                    Err(e) => {
                        self.failed(&format!("Failed to delete remote branch: {}", tracking), &e);
                        Cleanup::DeleteFailed(e.to_string())
                    }
                }
            }
            Ok(false) => {
                self.reporter
                    .warn(&format!("remote branch {} does not exist", tracking));
                Cleanup::Absent
            }
            Err(e) => {
                self.failed(&format!("Failed to look up remote branch: {}", tracking), &e);
                Cleanup::ProbeFailed(e.to_string())
            }
        };

        (local, remote)
    }

    /// Create the sync branch, pull the template branch into it, then merge.
    ///
    /// Branch creation is awaited before the pull starts but its failure does
    /// not cancel the pull. A failed pull skips the merge.
    pub async fn create_and_pull(&self, params: &SyncParams) -> (StepOutcome, StepOutcome, StepOutcome) {
        let branch = params.sync_branch();
        let url = params.template_url();
        let template_branch = params.template_branch();

        let create = match self.git.run(&GitCommand::checkout_new(branch)).await {
            Ok(_) => {
                self.reporter.succeed(&format!("Created branch: {}", branch));
                StepOutcome::Succeeded
            }
            Err(e) => {
                self.failed(&format!("Failed to create branch: {}", branch), &e);
                StepOutcome::Failed(e.to_string())
            }
        };

        self.reporter.start(&format!("Pulling {} {}...", url, template_branch));
        let pull = match self.git.run(&GitCommand::pull(url, template_branch)).await {
            Ok(_) => {
                self.reporter.succeed(&format!(
                    "Pulled remote template: {} branch: {}",
                    url, template_branch
                ));
                StepOutcome::Succeeded
            }
            Err(e) => {
                self.failed(
                    &format!("Failed to pull remote template: {} branch: {}", url, template_branch),
                    &e,
                );
                return (create, StepOutcome::Failed(e.to_string()), StepOutcome::Skipped);
            }
        };

        let merge_cmd = GitCommand::merge(&params.merge_ref());
        let merge = match self.git.run(&merge_cmd).await {
            Ok(_) => {
                self.reporter
                    .succeed(&format!("Merged remote template into branch: {}", branch));
                StepOutcome::Succeeded
            }
            Err(e) => {
                warn!(error = %e, "merge failed");
                self.reporter
                    .fail(&format!("Failed to merge remote template into branch: {}", branch));
                self.reporter.detail(&merge_cmd.to_string());
                self.reporter.detail(&format!(
                    "There might be conflicts. Please resolve them manually and commit to the {} branch.",
                    branch
                ));
                StepOutcome::Failed(e.to_string())
            }
        };

        (create, pull, merge)
    }

    fn failed(&self, message: &str, error: &GitError) {
        warn!(error = %error, "{}", message);
        self.reporter.fail(message);
        self.reporter.detail(&error.to_string());
    }
}
