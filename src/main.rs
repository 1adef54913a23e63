mod commands;
mod config;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use invite_core::{Attendance, CalendarTarget};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "invite")]
#[command(about = "Render an event invitation, export it to calendars and send RSVPs")]
struct Cli {
    /// Path to invitation.toml (defaults to ./invitation.toml, then ~/.config/invite/)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every resolved date and time string
    Details,
    /// Write the static invitation page
    Render {
        /// Output HTML file (prints to stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print calendar links or write the .ics file
    Calendar {
        /// Apple, Google, iCal, Microsoft365, Outlook.com or Yahoo (all links if omitted)
        #[arg(short, long)]
        target: Option<CalendarTarget>,

        /// Where to write the .ics file for Apple/iCal
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Search the dietary options
    Dietary {
        /// Free-text query (lists everything if omitted)
        query: Option<String>,
    },
    /// Validate and send an RSVP
    Rsvp {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// yes or no
        #[arg(long)]
        attending: Attendance,

        /// Party size including yourself
        #[arg(short, long)]
        guests: Option<u32>,

        /// Dietary option identifier (repeatable), e.g. --dietary nut-allergy
        #[arg(short, long)]
        dietary: Vec<String>,

        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    let invitation = config::load_invitation(cli.config.as_deref())?;

    match cli.command {
        Commands::Details => commands::details::run(&invitation),
        Commands::Render { out } => commands::render::run(&invitation, out.as_deref()),
        Commands::Calendar { target, out } => {
            commands::calendar::run(&invitation, target, out.as_deref())
        }
        Commands::Dietary { query } => commands::dietary::run(&invitation, query.as_deref()),
        Commands::Rsvp {
            name,
            email,
            attending,
            guests,
            dietary,
            message,
        } => {
            let args = commands::rsvp::RsvpArgs {
                name,
                email,
                attending,
                guests,
                dietary,
                message,
            };
            commands::rsvp::run(&invitation, args).await
        }
    }
}

fn init_logger(verbose: bool) -> Result<()> {
    let log_level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}
