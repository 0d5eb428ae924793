use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::project_dir;
use crate::prompt::Prompter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(PathBuf),
    /// Nothing to delete; reported informationally.
    Missing(PathBuf),
    Declined,
}

/// Entry point for `pullplate delete`.
pub fn run<P: Prompter>(cwd: &Path, prompter: &P, dir_name: Option<String>) -> Result<DeleteOutcome> {
    let name = match dir_name {
        Some(name) => name,
        None => prompter.input("Project directory to delete", None)?,
    };
    let dest = project_dir(cwd, &name)?;

    if !dest.exists() {
        println!("The \"{}\" directory does not exist", name.green().bold());
        return Ok(DeleteOutcome::Missing(dest));
    }

    let confirmed = prompter.confirm(&format!(
        "Are you sure you want to delete the \"{}\" directory?",
        name
    ))?;
    if !confirmed {
        return Ok(DeleteOutcome::Declined);
    }

    std::fs::remove_dir_all(&dest)
        .with_context(|| format!("Failed to delete {}", dest.display()))?;
    println!(
        "{} The \"{}\" directory has been deleted",
        "✓".green().bold(),
        name.green().bold()
    );
    Ok(DeleteOutcome::Deleted(dest))
}
