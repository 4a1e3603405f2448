use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::info;

use teamsheet::config::{DailyDirs, SheetsConfig};
use teamsheet::daily;
use teamsheet::metrics::merge::{merge_team, InputFileSet};
use teamsheet::prompt::Prompter;
use teamsheet::record::{export_review, import_review};
use teamsheet::sheets::format::row_values;
use teamsheet::sheets::SheetsClient;
use teamsheet::upload::{self, UploadEvent};

#[derive(Parser)]
#[command(name = "teamsheet")]
#[command(about = "Merge call-center exports into per-agent spreadsheet tabs", long_about = None)]
struct Cli {
    /// Service account JSON key
    #[arg(long, env = "GOOGLE_SHEETS_SERVICE_ACCOUNT_PATH")]
    service_account: Option<PathBuf>,

    /// Spreadsheet id
    #[arg(long, env = "GOOGLE_SHEETS_TEMPLATE_ID")]
    spreadsheet_id: Option<String>,

    /// Pause between uploads, in milliseconds
    #[arg(long, env = "UPLOAD_DELAY_MS", default_value_t = 500)]
    upload_delay_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process today's exports from the input folders and upload them
    Daily {
        #[arg(long, env = "LEADS_DIR")]
        leads_dir: Option<PathBuf>,
        #[arg(long, env = "TALK_TIME_DIR")]
        talk_time_dir: Option<PathBuf>,
        #[arg(long, env = "DIALS_DIR")]
        dials_dir: Option<PathBuf>,
        #[arg(long, env = "TEAM_DIR")]
        team_dir: Option<PathBuf>,
        #[arg(long, env = "ARCHIVE_DIR")]
        archive_dir: Option<PathBuf>,
        /// Print the rows instead of uploading them
        #[arg(long)]
        dry_run: bool,
    },
    /// Merge explicit export files into a review sheet
    Load {
        #[arg(long)]
        talk_time: PathBuf,
        #[arg(long)]
        dials: PathBuf,
        #[arg(long)]
        leads: Option<PathBuf>,
        #[arg(long, default_value = "raw-data/team/team_members.csv")]
        roster: PathBuf,
        /// Review sheet to write, stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Upload an edited review sheet
    Upload {
        review: PathBuf,
        /// Keep the dates written in the review sheet instead of today's
        #[arg(long)]
        keep_dates: bool,
    },
}

impl Cli {
    fn sheets_config(&self) -> Result<SheetsConfig> {
        let Some(service_account_path) = self.service_account.clone() else {
            bail!("GOOGLE_SHEETS_SERVICE_ACCOUNT_PATH is not set");
        };
        let Some(spreadsheet_id) = self.spreadsheet_id.clone() else {
            bail!("GOOGLE_SHEETS_TEMPLATE_ID is not set");
        };

        Ok(SheetsConfig {
            service_account_path,
            spreadsheet_id,
            upload_delay: Duration::from_millis(self.upload_delay_ms),
        })
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Daily {
            leads_dir,
            talk_time_dir,
            dials_dir,
            team_dir,
            archive_dir,
            dry_run,
        } => {
            let defaults = DailyDirs::default();
            let dirs = DailyDirs {
                leads: leads_dir.clone().unwrap_or(defaults.leads),
                talk_time: talk_time_dir.clone().unwrap_or(defaults.talk_time),
                dials: dials_dir.clone().unwrap_or(defaults.dials),
                team: team_dir.clone().unwrap_or(defaults.team),
                archive: archive_dir.clone().unwrap_or(defaults.archive),
            };
            run_daily(&cli, &dirs, *dry_run)
        },
        Commands::Load {
            talk_time,
            dials,
            leads,
            roster,
            out,
        } => {
            let files = InputFileSet::new(talk_time.clone(), dials.clone(), leads.clone(), roster.clone());
            run_load(&files, out.as_deref())
        },
        Commands::Upload { review, keep_dates } => run_upload(&cli, review, *keep_dates),
    }
}

fn run_daily(cli: &Cli, dirs: &DailyDirs, dry_run: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let delay = Duration::from_millis(cli.upload_delay_ms);

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout(), today);
    let report = daily::run_daily(dirs, today, &mut prompter, delay, || {
        if dry_run {
            return Ok(None);
        }
        let config = cli.sheets_config()?;
        Ok(Some(SheetsClient::from_config(&config)?))
    })?;
    println!("\nall agents are processed");

    if dry_run {
        for entry in &report.entries {
            println!("{}: {}", entry.agent_name, serde_json::to_string(&row_values(entry))?);
        }
    }

    Ok(())
}

fn run_load(files: &InputFileSet, out: Option<&Path>) -> Result<()> {
    let mut records = merge_team(files)?;
    let today = Local::now().date_naive();
    for record in &mut records {
        record.stamp_date(today);
    }

    match out {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            export_review(&records, file)?;
            info!("wrote {} agents to {}", records.len(), path.display());
        },
        None => export_review(&records, io::stdout())?,
    }

    Ok(())
}

fn run_upload(cli: &Cli, review: &Path, keep_dates: bool) -> Result<()> {
    let file = File::open(review).with_context(|| format!("failed to open {}", review.display()))?;
    let mut entries = import_review(file)?;
    if entries.is_empty() {
        bail!("no data to upload");
    }
    if !keep_dates {
        let today = Local::now().date_naive();
        for entry in &mut entries {
            entry.stamp_date(today);
        }
    }

    let config = cli.sheets_config()?;
    let client = SheetsClient::from_config(&config)?;
    let (events, handle) = upload::spawn_upload(client, entries, config.upload_delay);

    let mut summary = None;
    for event in events {
        match event {
            UploadEvent::Uploading(agent) => info!("uploading {}...", agent),
            UploadEvent::Progress(percent) => info!("progress {}%", percent),
            UploadEvent::Finished(done) => summary = Some(done),
        }
    }
    if handle.join().is_err() {
        bail!("upload worker panicked");
    }

    let Some(summary) = summary else {
        bail!("upload worker stopped without a result");
    };
    if !summary.is_success() {
        let failures: Vec<String> = summary
            .failures
            .iter()
            .map(|(agent, err)| format!("{}: {}", agent, err))
            .collect();
        bail!("upload failed for {} agents:\n{}", failures.len(), failures.join("\n"));
    }

    info!("all data uploaded successfully, {} agents", summary.uploaded);

    Ok(())
}
