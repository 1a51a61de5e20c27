//! SnooNotes importer - Main Entry Point
//!
//! This is the command line front end. The actual implementation is in the
//! `modnote_importer` library.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use modnote_importer::config::Config;
use modnote_importer::convert::import;
use modnote_importer::formatting::format_report;
use modnote_importer::logging::{self, LogFormat};
use modnote_importer::platform::{DryRunClient, RedditClient};
use modnote_importer::snoonotes::{SnooNoteParser, TimestampPolicy};
use std::path::PathBuf;
use tracing::info;

/// Import a SnooNotes export into Reddit Mod Notes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SnooNotes export (JSON)
    file: PathBuf,

    /// Path to the config file
    #[arg(long, short = 'c', default_value = "modnote-importer.toml")]
    config: PathBuf,

    /// Reddit app id of the script app used for the import
    #[arg(long, alias = "app-id", env = "REDDIT_CLIENT_ID")]
    client_id: Option<String>,

    /// Reddit app secret of the script app used for the import
    #[arg(long, alias = "app-secret", env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Moderator account the notes are created with
    #[arg(long, env = "REDDIT_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "REDDIT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log the notes that would be created without contacting Reddit
    #[arg(long)]
    dry_run: bool,

    /// Only import notes of this subreddit
    #[arg(long)]
    subreddit: Option<String>,

    /// Skip notes up to and including this note id
    #[arg(long, value_name = "NOTE_ID")]
    resume_after: Option<u64>,

    /// What to do with notes whose timestamp cannot be read (overrides the config file)
    #[arg(long, value_enum)]
    on_bad_timestamp: Option<TimestampPolicy>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t)]
    log_format: LogFormat,

    /// List every dropped note in the summary
    #[arg(long)]
    list_failures: bool,
}

impl Args {
    /// Command line values take precedence over the config file
    fn apply_to(&self, config: &mut Config) {
        let overrides = [
            (&self.client_id, &mut config.reddit.client_id),
            (&self.client_secret, &mut config.reddit.client_secret),
            (&self.username, &mut config.reddit.username),
            (&self.password, &mut config.reddit.password),
        ];
        for (arg, setting) in overrides {
            if arg.is_some() {
                setting.clone_from(arg);
            }
        }
        if let Some(policy) = self.on_bad_timestamp {
            config.import.on_bad_timestamp = policy;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    let args = Args::parse();
    logging::init(args.verbose, args.log_format).context("Failed to initialize logging")?;

    let mut config = Config::load(&args.config)?;
    args.apply_to(&mut config);
    config.validate(!args.dry_run)?;

    let labels = config.label_map()?;
    let export = SnooNoteParser::new(&args.file)
        .with_labels(labels.clone())
        .with_timestamp_policy(config.import.on_bad_timestamp)
        .with_tombstone(config.import.tombstone.clone())
        .parse()
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    let mut options = config.convert_options();
    options.subreddit = args.subreddit.clone();
    options.resume_after = args.resume_after;

    let report = if args.dry_run {
        info!("dry run: no notes will be created");
        let mut client = DryRunClient::new();
        import(&mut client, &export, &labels, options).await?
    } else {
        let mut client = RedditClient::new(config.reddit_client_config()?)
            .context("Failed to create Reddit client")?;
        import(&mut client, &export, &labels, options).await?
    };

    println!("{}", format_report(&report, args.list_failures));
    Ok(())
}
