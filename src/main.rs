//! jira2clubhouse - Jira to Clubhouse migration
//!
//! Main entry point for the jira2clubhouse CLI.

use clap::{Parser, Subcommand};
use jira2clubhouse::clubhouse::{ClubhouseClient, ClubhouseSink, DryRunSink};
use jira2clubhouse::config::{validate_config_result, MigrationConfig, UserMap};
use jira2clubhouse::jira::JiraExport;
use jira2clubhouse::migrate::{self, CleanupReport};
use jira2clubhouse::translate::{self, Migration, Translator};
use jira2clubhouse::MigrationError;
use std::path::{Path, PathBuf};
use std::process;

/// Migrate a Jira XML export to Clubhouse
#[derive(Parser, Debug)]
#[command(name = "jira2clubhouse")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/jira2clubhouse/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a Jira export and write the result to a JSON file
    #[command(visible_alias = "e")]
    Export {
        /// Jira XML export file
        #[arg(short, long = "in")]
        input: PathBuf,

        /// User map (YAML or JSON)
        #[arg(short, long)]
        users: Option<PathBuf>,

        /// Destination JSON file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Convert a Jira export and upload it to Clubhouse
    #[command(visible_aliases = ["i", "upload"])]
    Import {
        /// Jira XML export file
        #[arg(short, long = "in")]
        input: PathBuf,

        /// User map (YAML or JSON)
        #[arg(short, long)]
        users: PathBuf,

        /// Clubhouse API token
        #[arg(short, long, env = "CLUBHOUSE_API_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Convert and log what would be created without calling the API
        #[arg(long)]
        test: bool,
    },

    /// Delete epics that have no stories
    PruneEpics {
        /// Clubhouse API token
        #[arg(short, long, env = "CLUBHOUSE_API_TOKEN", hide_env_values = true)]
        token: String,

        /// Only report what would be deleted
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete archived stories
    PurgeArchived {
        /// Clubhouse API token
        #[arg(short, long, env = "CLUBHOUSE_API_TOKEN", hide_env_values = true)]
        token: String,

        /// Only report what would be deleted
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    // Initialize logging
    if let Err(e) = jira2clubhouse::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> jira2clubhouse::Result<()> {
    let config = MigrationConfig::load_or_default(cli.config.as_deref())?;
    validate_config_result(&config)?;

    match cli.command {
        Commands::Export { input, users, out } => {
            let users = match users {
                Some(path) => UserMap::load(path)?,
                None => UserMap::default(),
            };
            let (migration, unmapped) = convert(&config, &input, users)?;

            let document = migrate::export_document(&migration);
            migrate::write_export(&out, &document)?;

            println!(
                "Exported {} epics and {} stories ({} tasks) to {}",
                document.epics.len(),
                document.stories.len(),
                migration.task_count(),
                out.display()
            );
            print_unmapped(&unmapped);
        }

        Commands::Import {
            input,
            users,
            token,
            test,
        } => {
            let users = UserMap::load(users)?;
            let sink: Box<dyn ClubhouseSink> = if test {
                Box::new(DryRunSink::new())
            } else {
                let token = token.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
                    MigrationError::Config(
                        "Clubhouse API token required (--token or CLUBHOUSE_API_TOKEN)"
                            .to_string(),
                    )
                })?;
                Box::new(ClubhouseClient::new(&config.clubhouse, token)?)
            };

            let (migration, unmapped) = convert(&config, &input, users)?;

            let rt = tokio::runtime::Runtime::new()?;
            let report = rt.block_on(migrate::upload(sink.as_ref(), &migration));

            let prefix = if test { "[test mode] " } else { "" };
            println!(
                "{}Epics: {} created, {} failed",
                prefix, report.epics_created, report.epics_failed
            );
            println!(
                "{}Stories: {} created, {} failed",
                prefix, report.stories_created, report.stories_failed
            );
            if report.unresolved_epic_links > 0 {
                println!(
                    "{}Stories uploaded without their epic: {}",
                    prefix, report.unresolved_epic_links
                );
            }
            print_unmapped(&unmapped);
        }

        Commands::PruneEpics { token, dry_run } => {
            let client = ClubhouseClient::new(&config.clubhouse, token)?;
            let rt = tokio::runtime::Runtime::new()?;
            let report = rt.block_on(migrate::prune_empty_epics(&client, dry_run))?;
            print_cleanup("empty epics", &report, dry_run);
        }

        Commands::PurgeArchived { token, dry_run } => {
            let client = ClubhouseClient::new(&config.clubhouse, token)?;
            let rt = tokio::runtime::Runtime::new()?;
            let report = rt.block_on(migrate::purge_archived_stories(&client, dry_run))?;
            print_cleanup("archived stories", &report, dry_run);
        }
    }

    Ok(())
}

/// Parse, translate and link an export; also returns the unmapped usernames
fn convert(
    config: &MigrationConfig,
    input: &Path,
    users: UserMap,
) -> jira2clubhouse::Result<(Migration, Vec<String>)> {
    let export = JiraExport::from_file(input)?;
    let translator = Translator::new(config, users);
    let migration = translate::convert(&export, &translator)?;
    Ok((migration, translator.resolver().unmapped_users()))
}

fn print_unmapped(unmapped: &[String]) {
    if unmapped.is_empty() {
        return;
    }
    println!(
        "Users without a Clubhouse mapping ({}): {}",
        unmapped.len(),
        unmapped.join(", ")
    );
}

fn print_cleanup(what: &str, report: &CleanupReport, dry_run: bool) {
    if dry_run {
        println!("[dry run] {} {} would be deleted", report.matched, what);
    } else {
        println!(
            "Deleted {} of {} {} ({} failed)",
            report.deleted, report.matched, what, report.failed
        );
    }
}
