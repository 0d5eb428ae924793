use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::project_dir;
use crate::{
    clone,
    config::Config,
    git::GitRunner,
    progress::Reporter,
    prompt::Prompter,
    templates::{self, Template},
};

#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    pub project_name: Option<String>,
    /// Registry name passed with `-t`.
    pub template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created { dest: PathBuf },
    /// The clone failed; already reported.
    DownloadFailed(String),
    /// The user refused to overwrite an existing directory.
    Declined,
}

/// Entry point for `pullplate create`.
///
/// Missing inputs are asked for interactively. An existing destination is only
/// removed after confirmation.
pub async fn run<G, P, R>(
    cwd: &Path,
    config: &Config,
    git: &G,
    prompter: &P,
    reporter: &R,
    args: CreateArgs,
) -> Result<CreateOutcome>
where
    G: GitRunner,
    P: Prompter,
    R: Reporter,
{
    let template = args.template.as_deref().and_then(templates::find);
    if let (Some(name), None) = (&args.template, template) {
        println!("{} Unknown template '{}'", "!".yellow().bold(), name.yellow());
    }

    let project_name = match args.project_name {
        Some(name) => name,
        None => prompter.input("Project name", Some(config.default_project_name.as_str()))?,
    };

    let template: &Template = match template {
        Some(t) => t,
        None => {
            let index = prompter.select("Template name", &templates::names())?;
            &templates::all()[index]
        }
    };

    let dest = project_dir(cwd, &project_name)?;
    if dest.exists() {
        let force = prompter.confirm(&format!(
            "Target directory \"{}\" is not empty. Remove existing files and continue?",
            project_name
        ))?;
        if !force {
            return Ok(CreateOutcome::Declined);
        }
        remove_path(&dest)?;
    }

    reporter.start(&format!("Downloading template: {}...", template.url));
    match clone::pull_or_clone(git, template.url, &dest).await {
        Ok(()) => {
            reporter.succeed("Download template success");
            println!("\nDone. Now run:\n");
            for line in next_steps(&project_name) {
                println!("   {}", line.green().bold());
            }
            println!();
            println!("{} {}", "⏰".dimmed(), format_timestamp(Local::now().naive_local()));
            Ok(CreateOutcome::Created { dest })
        }
        Err(e) => {
            reporter.fail("Download template failed");
            reporter.detail(&e.to_string());
            Ok(CreateOutcome::DownloadFailed(e.to_string()))
        }
    }
}

fn remove_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
    .with_context(|| format!("Failed to remove {}", path.display()))
}

/// Commands suggested after a successful scaffold.
pub fn next_steps(project_name: &str) -> Vec<String> {
    vec![
        format!("cd {}", project_name),
        "pnpm i".to_string(),
        "pnpm dev".to_string(),
    ]
}

/// `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
