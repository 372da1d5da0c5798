//! # Timetable Scout CLI (`tts`)
//!
//! Search a school timetable from the command line: look up who is teaching
//! what in one (day, period) slot, by staff member or by department, and
//! list the staff roster and department catalog.
//!
//! ## Usage
//!
//! ```bash
//! tts [--config ./config/tts.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tts staff <name> --day <d> --period <n>` | One staff member's assignment in a slot |
//! | `tts department <id> --day <d> --period <n>` | One department's slot |
//! | `tts staff-list` | All known staff |
//! | `tts departments` | The department catalog |
//! | `tts serve` | Start the JSON HTTP API |
//!
//! ## Examples
//!
//! ```bash
//! tts staff "Mr. C. Santhosh Kumar" --day mon --period 1
//! tts department bca --day Monday --period 7
//! tts department bsc-ai-ds --day mon --period 2
//! ```
//!
//! With `TIMETABLE_REMOTE_URL` and `TIMETABLE_REMOTE_KEY` set, queries go to
//! the hosted backend (falling back to the embedded dataset on failure);
//! without them, the embedded dataset answers directly.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use timetable_scout::config;
use timetable_scout::models::SearchResult;
use timetable_scout::search::SearchService;
use timetable_scout::server;

/// Timetable Scout — staff and department schedule search.
#[derive(Parser)]
#[command(
    name = "tts",
    about = "Timetable Scout — staff and department schedule search",
    version,
    long_about = "Search a school timetable by staff member or department for one \
    (day, period) slot. Queries a hosted backend when credentials are configured and \
    falls back to an embedded dataset otherwise, so results always come back in the \
    same shape."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// A missing file is fine: built-in defaults cover the department
    /// catalog, policies, and server bind address.
    #[arg(long, global = true, default_value = "./config/tts.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search a staff member's schedule for one slot.
    ///
    /// Scans every department table; a staff member teaching in several
    /// departments gets one row per match. No match prints a single
    /// free-period row.
    Staff {
        /// Staff display name, exactly as recorded (e.g. "Dr. Evangeline").
        name: String,

        /// Day, as short code ("mon") or display name ("Monday").
        #[arg(long)]
        day: String,

        /// Period number (1-8).
        #[arg(long)]
        period: i64,
    },

    /// Search a department's schedule for one slot.
    ///
    /// No timetable entry for the slot prints a single unassigned row
    /// carrying the department name.
    Department {
        /// Department id (e.g. "bca", "bsc_ai_ds", "cs").
        id: String,

        /// Day, as short code ("mon") or display name ("Monday").
        #[arg(long)]
        day: String,

        /// Period number (1-8).
        #[arg(long)]
        period: i64,
    },

    /// List all known staff with their derived ids.
    StaffList,

    /// List the department catalog.
    Departments,

    /// Start the JSON HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// search endpoints for browser clients.
    Serve,
}

fn cell(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn print_results(results: &[SearchResult]) {
    println!(
        "{:<20} {:<22} {:<26} {}",
        "DEPARTMENT", "SUBJECT", "STAFF", "STATUS"
    );
    for r in results {
        println!(
            "{:<20} {:<22} {:<26} {}",
            cell(&r.department),
            cell(&r.subject),
            cell(&r.staff_name),
            r.status
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    let service = SearchService::from_config(&cfg)?;

    match cli.command {
        Commands::Staff { name, day, period } => {
            let results = service.search_by_staff(&name, &day, period).await?;
            print_results(&results);
        }
        Commands::Department { id, day, period } => {
            let results = service.search_by_department(&id, &day, period).await?;
            print_results(&results);
        }
        Commands::StaffList => {
            let staff = service.all_staff().await?;
            for member in &staff {
                println!("{:<28} {}", member.name, member.id);
            }
        }
        Commands::Departments => {
            let departments = service.departments().await?;
            for dept in &departments {
                println!("{:<12} {}", dept.id, dept.name);
            }
        }
        Commands::Serve => {
            if !service.remote_enabled() {
                eprintln!("Note: remote backend not configured, serving the embedded dataset");
            }
            server::run_server(&cfg, service).await?;
        }
    }

    Ok(())
}
