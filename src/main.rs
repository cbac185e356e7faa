use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use qase_bulk::api::{QaseClient, TestCaseService};
use qase_bulk::bulk::{self, BulkManager, BulkOptions, BulkOutcome, SuiteChoice};
use qase_bulk::config::Config;
use qase_bulk::logging;
use qase_bulk::steps::{self, categorize};
use qase_bulk::ui::StdioPrompter;

#[derive(Parser)]
#[command(name = "qase-bulk")]
#[command(about = "Create Qase test cases in bulk from plain-text steps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify step lines and print the expected results
    Steps {
        /// File with one step per line (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Print the steps as JSON
        #[arg(long)]
        json: bool,

        /// Show which category each step matched
        #[arg(long, conflicts_with = "json")]
        explain: bool,
    },

    /// Create every test case in a definition file
    Create {
        /// Definition file (YAML, or TOML/JSON by extension)
        file: PathBuf,

        /// Destination suite id (skips the suite prompt)
        #[arg(short, long)]
        suite: Option<i64>,

        /// Create cases at the project root (skips the suite prompt)
        #[arg(long, conflicts_with = "suite")]
        root: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Print the payloads instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// List suites in the configured project
    Suites,

    /// Write a starter config file
    Init {
        /// Where to write it (default: ./qase-bulk.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;
    let logging_handle = logging::init_logging(&config, cli.debug)?;

    let result = match cli.command {
        Commands::Steps {
            file,
            json,
            explain,
        } => cmd_steps(file.as_deref(), json, explain),
        Commands::Create {
            file,
            suite,
            root,
            yes,
            dry_run,
        } => cmd_create(&config, &file, suite, root, yes, dry_run).await,
        Commands::Suites => cmd_suites(&config).await,
        Commands::Init { path, force } => cmd_init(path, force),
    };

    if let Some(log_path) = logging_handle.log_file_path {
        if log_path.metadata().map(|m| m.len() > 0).unwrap_or(false) {
            eprintln!("Session log: {}", log_path.display());
        }
    }

    result
}

fn cmd_steps(file: Option<&Path>, json: bool, explain: bool) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read steps from stdin")?;
            input
        }
    };

    let sequence = steps::classify(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&sequence)?);
        return Ok(());
    }

    if sequence.is_empty() {
        println!("No steps found");
        return Ok(());
    }

    for (i, step) in sequence.iter().enumerate() {
        if explain {
            println!("{}. [{}] {}", i + 1, categorize(&step.action), step.action);
        } else {
            println!("{}. {}", i + 1, step.action);
        }
        println!("   → {}", step.expected_result);
    }

    Ok(())
}

async fn cmd_create(
    config: &Config,
    file: &Path,
    suite: Option<i64>,
    root: bool,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    let cases = bulk::load_definitions(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let suite_choice = match (suite, root) {
        (Some(id), _) => SuiteChoice::Existing(id),
        (None, true) => SuiteChoice::Root,
        (None, false) => SuiteChoice::Prompt,
    };

    if dry_run {
        // Only an explicit suite can be applied without asking the API
        let suite_id = match suite_choice {
            SuiteChoice::Existing(id) => Some(id),
            _ => None,
        };
        let cases = bulk::assign_suite(cases, suite_id);
        println!("{}", bulk::render_dry_run(&cases)?);
        return Ok(());
    }

    let client = QaseClient::from_config(&config.api)?;
    println!(
        "Creating test cases in project {} from {}",
        client.project_code(),
        file.display()
    );

    let options = BulkOptions {
        suite: suite_choice,
        assume_yes: yes,
        request_delay: config.api.request_delay(),
    };
    let manager = BulkManager::new(&client, options);
    let mut prompter = StdioPrompter::new();

    match manager.execute(cases, &mut prompter).await? {
        BulkOutcome::Cancelled => Ok(()),
        BulkOutcome::Completed(summary) if !summary.failed.is_empty() => {
            bail!(
                "{} of {} test cases failed",
                summary.failed.len(),
                summary.total
            )
        }
        BulkOutcome::Completed(_) => Ok(()),
    }
}

async fn cmd_suites(config: &Config) -> Result<()> {
    let client = QaseClient::from_config(&config.api)?;
    let suites = client.list_suites().await?;

    if suites.is_empty() {
        println!("No suites in project {}", client.project_code());
        return Ok(());
    }

    println!(
        "Suites in {} ({} suites)",
        client.project_code(),
        suites.len()
    );
    println!("{}", "─".repeat(60));

    for suite in &suites {
        println!(
            "{:>6}  {} ({} test cases)",
            suite.id, suite.title, suite.cases_count
        );
    }

    Ok(())
}

fn cmd_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(Config::local_config_path);

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(&path)?;
    println!("Wrote {}", path.display());
    println!("Set QASE_API_TOKEN and QASE_PROJECT_CODE, or add them under [api].");

    Ok(())
}
