//! arxrel - arXiv metadata snapshot to relational CSV tables
//!
//! Filters the snapshot to one subject area and writes submissions,
//! categories, authors and their join tables as CSV.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "arxrel")]
#[command(about = "Normalize the arXiv metadata snapshot into relational tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./arxrel.toml or ~/.config/arxrel/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a snapshot into CSV tables
    Run(cmd::run::RunArgs),
    /// List the category taxonomy of an area
    Categories {
        /// Subject area (math, cs, stat)
        #[arg(default_value = "math")]
        area: String,
    },
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = arxrel_core::ProgressContext::new();

    // TTY: warn unless --debug, the progress bars show activity.
    // non-TTY: info, logs are the only progress indicator.
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    arxrel_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Categories { area } => cmd::categories::run(&area),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Output directory",
                &config.output.default_dir.display().to_string(),
            ]);
            table.add_row(vec!["Area", &config.filter.area]);
            table.add_row(vec![
                "Bare tokens",
                if config.filter.bare_tokens { "on" } else { "off" },
            ]);
            table.add_row(vec![
                "Names file",
                &config
                    .gender
                    .names_file
                    .as_ref()
                    .map_or_else(|| "not set".to_string(), |p| p.display().to_string()),
            ]);
            table.add_row(vec![
                "Record warnings",
                &config.log.max_record_warnings.to_string(),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
