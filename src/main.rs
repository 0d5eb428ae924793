use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use pullplate::{
    commands::{
        self,
        create::{CreateArgs, CreateOutcome},
        delete::DeleteOutcome,
        pull::PullArgs,
    },
    config::Config,
    git::{self, ShellGit},
    progress::Spinner,
    prompt::Terminal,
};

#[derive(Parser)]
#[command(
    name = "pullplate",
    version,
    disable_version_flag = true,
    about = "Scaffold projects from templates and pull template updates",
    long_about = "pullplate creates new projects by cloning one of its built-in templates, and\n\
                  keeps existing projects up to date by pulling a template branch into a\n\
                  dedicated `template` branch that you merge at your own pace."
)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create & init a project from a template
    Create {
        /// Directory to create (prompted when omitted)
        project_name: Option<String>,

        /// Template name (see `pullplate templates`)
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Delete a project directory after confirmation
    Delete {
        /// Directory to delete (prompted when omitted)
        project_name_dir: Option<String>,
    },

    /// Pull a template branch (e.g. main) into this project's `template` branch
    Pull {
        /// Branch of this project to start from (default: template)
        #[arg(short, long, alias = "currentBranch")]
        current_branch: Option<String>,

        /// Branch of the template repository to pull (default: main)
        #[arg(short, long, alias = "templateBranch")]
        template_branch: Option<String>,

        /// Print the stage report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in templates
    Templates {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Create { project_name, template } => {
            let cwd = std::env::current_dir().context("Cannot read the current directory")?;
            let git = ShellGit::new(&config.git_program);
            let args = CreateArgs { project_name, template };
            let outcome =
                commands::create::run(&cwd, &config, &git, &Terminal::new(), &Spinner::new(), args).await?;
            if outcome == CreateOutcome::Declined {
                std::process::exit(1);
            }
        }
        Commands::Delete { project_name_dir } => {
            let cwd = std::env::current_dir().context("Cannot read the current directory")?;
            if commands::delete::run(&cwd, &Terminal::new(), project_name_dir)? == DeleteOutcome::Declined {
                std::process::exit(1);
            }
        }
        Commands::Pull { current_branch, template_branch, json } => {
            let root = git::repo_root()?;
            let git = ShellGit::new(&config.git_program).in_dir(root.clone());
            let args = PullArgs { current_branch, template_branch, json };
            commands::pull::run(&config, &git, &Terminal::new(), &Spinner::new(), args).await?;
            if let Ok(branch) = git::current_branch(&root) {
                eprintln!("{} Now on branch: {}", "❄".magenta().bold(), branch.green().bold());
            }
        }
        Commands::Templates { json } => commands::templates::run(json)?,
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "pullplate", &mut std::io::stdout());
        }
    }

    Ok(())
}
