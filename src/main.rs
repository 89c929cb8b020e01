use std::{path::PathBuf, process::exit};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use compact_str::{format_compact, CompactString};
use serde::Serialize;

use gitlab_tools::{
    client::{MergeRequestScope, MilestoneService, MovePlan},
    config::{default_config_path, load_config, Overrides, Settings, BASE_URL_ENV, TOKEN_ENV},
    logging::{init_logging, LoggingConfig},
    result::ToolsError,
};

/// Inspect GitLab group milestones and the merge requests attached to them
#[derive(Parser, Debug)]
#[command(name = "gitlab-milestone", version, about, long_about = None)]
pub struct Args {
    /// Private GitLab access token.
    #[arg(long, env = TOKEN_ENV, hide_env_values = true, global = true)]
    token: Option<String>,
    /// Base URL of the GitLab API, e.g. https://gitlab.com/api/v4
    #[arg(long = "base-url", visible_alias = "baseURL", env = BASE_URL_ENV, global = true)]
    base_url: Option<String>,
    /// GitLab group name, full path or id.
    #[arg(long, global = true)]
    group: Option<String>,
    /// Endpoint used to look up merge requests: "group" or "global".
    #[arg(long, value_name = "SCOPE", global = true)]
    mr_scope: Option<MergeRequestScope>,
    /// Alternate path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the path to the configuration file and exit.
    #[arg(short, long)]
    print_config_path: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the active milestones of the group with their merge requests (default).
    List,
    /// List the merge requests of one active milestone.
    MergeRequests {
        /// Milestone title.
        #[arg(long)]
        milestone: String,
    },
    /// Make sure the target milestone exists, then show what is left in the source.
    Move {
        /// Milestone to move merge requests from.
        #[arg(long)]
        from: String,
        /// Milestone to move merge requests to; created when missing.
        #[arg(long)]
        to: String,
        /// Due date for the new milestone (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        due: NaiveDate,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("'{value}' is not a YYYY-MM-DD date: {e}"))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    if args.print_config_path {
        println!("{}", config_path.display());
        exit(0);
    }

    let file_config = load_config(&config_path)?;

    let logging_config = LoggingConfig::from_env().with_level_override(file_config.log_level.as_deref());
    let _log_guard = init_logging(logging_config).map_err(|e| {
        ToolsError::GeneralError(format_compact!("Failed to initialize logging: {e}"))
    })?;

    let overrides = Overrides {
        token: args.token,
        base_url: args.base_url,
        group: args.group,
        merge_request_scope: args.mr_scope,
    };
    let settings = Settings::resolve(overrides, &file_config)?;

    let debug = std::env::var("GITLAB_TOOLS_DEBUG").is_ok();
    let service = MilestoneService::new(
        settings.client_config().with_debug_logging(debug),
        settings.merge_request_scope,
    )?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to create runtime")?;

    rt.block_on(run(&service, &settings.group, args.command.unwrap_or(Command::List)))
}

async fn run(service: &MilestoneService, group: &str, command: Command) -> color_eyre::Result<()> {
    match command {
        Command::List => {
            for report in service.milestone_report(group).await? {
                print_json(None, &report.milestone)?;
                match report.merge_requests {
                    Ok(merge_requests) => print_json(None, &merge_requests)?,
                    Err(e) => eprintln!("error: {e}"),
                }
            }
        },

        Command::MergeRequests { milestone } => {
            let merge_requests = service.milestone_merge_requests(group, &milestone).await?;
            print_json(None, &merge_requests)?;
        },

        Command::Move { from, to, due } => {
            let plan = MovePlan {
                from: from.into(),
                to: to.into(),
                due_date: CompactString::from(due.format("%Y-%m-%d").to_string()),
            };

            let outcome = service.move_milestone(group, &plan).await?;
            if outcome.created {
                eprintln!("milestone '{}' not found, created it", outcome.to.title);
            }

            print_json(Some("to"), &outcome.to)?;
            print_json(Some("from"), &outcome.from)?;
            match outcome.merge_requests {
                Ok(merge_requests) => print_json(None, &merge_requests)?,
                Err(e) => eprintln!("error: {e}"),
            }
        },
    }

    Ok(())
}

fn print_json<T: Serialize>(label: Option<&str>, value: &T) -> serde_json::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match label {
        Some(label) => println!("{label}:\n{text}"),
        None => println!("{text}"),
    }

    Ok(())
}
