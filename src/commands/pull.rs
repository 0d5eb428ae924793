use anyhow::Result;
use colored::Colorize;

use crate::{
    config::Config,
    git::GitRunner,
    progress::Reporter,
    prompt::Prompter,
    sync::{self, SyncParams, SyncReport, Synchronizer},
    templates,
};

#[derive(Debug, Clone, Default)]
pub struct PullArgs {
    pub current_branch: Option<String>,
    pub template_branch: Option<String>,
    /// Print the stage report as JSON once the run settles.
    pub json: bool,
}

/// Entry point for `pullplate pull`.
///
/// Asks for the template (always) and for any branch not given on the command
/// line, then runs the synchronization in the directory `git` is bound to.
/// Git failures end up in the returned report, not in the `Err` path.
pub async fn run<G, P, R>(
    config: &Config,
    git: &G,
    prompter: &P,
    reporter: &R,
    args: PullArgs,
) -> Result<SyncReport>
where
    G: GitRunner,
    P: Prompter,
    R: Reporter,
{
    let index = prompter.select("Template name", &templates::names())?;
    let template = &templates::all()[index];

    let current_branch = match args.current_branch {
        Some(b) => b,
        None => prompter.input("Current project's branch", Some(config.sync_branch.as_str()))?,
    };
    let template_branch = match args.template_branch {
        Some(b) => b,
        None => prompter.input(
            "Template project's branch",
            Some(config.default_template_branch.as_str()),
        )?,
    };

    println!("{} Current project's branch: {}", "❄".magenta().bold(), current_branch.green().bold());
    println!("{} Template project's branch: {}", "❄".magenta().bold(), template_branch.green().bold());

    sync::reject_option_like("Current branch", &current_branch)?;
    let params = SyncParams::new(config, template.url, template_branch)?;
    let report = Synchronizer::new(git, reporter).run(&current_branch, &params).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(report)
}
