//! Run subcommand - normalize one snapshot into the five tables

use std::path::PathBuf;

use anyhow::Result;
use arxrel_core::ProgressContext;
use clap::Args;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// arXiv metadata snapshot (JSON lines, optionally .gz)
    pub input: PathBuf,

    /// Output directory for the CSV tables
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Subject area to keep (math, cs, stat)
    #[arg(short, long)]
    pub area: Option<String>,

    /// Treat bare `subarea` tokens as belonging to the area
    #[arg(long)]
    pub bare_tokens: bool,

    /// `name,gender` CSV used to classify first names
    #[arg(short = 'g', long)]
    pub gender_names: Option<PathBuf>,

    /// Skip writing manifest.json
    #[arg(long)]
    pub no_manifest: bool,
}

impl RunArgs {
    /// Merge flags over config file values.
    fn into_config(self, config: &Config) -> arxrel_normalize::Config {
        arxrel_normalize::Config {
            input: self.input,
            output_dir: self
                .output
                .unwrap_or_else(|| config.output.default_dir.clone()),
            area: self.area.unwrap_or_else(|| config.filter.area.clone()),
            bare_tokens: self.bare_tokens || config.filter.bare_tokens,
            names_file: self
                .gender_names
                .or_else(|| config.gender.names_file.clone()),
            max_record_warnings: config.log.max_record_warnings,
            write_manifest: !self.no_manifest,
        }
    }
}

pub fn run(args: RunArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let run_config = args.into_config(config);
    log::info!(
        "Normalizing {} (area {}) into {}",
        run_config.input.display(),
        run_config.area,
        run_config.output_dir.display()
    );

    let summary = arxrel_normalize::run(&run_config, progress)?;

    if progress.is_tty() {
        progress.println(summary.render());
    } else {
        summary.log();
    }
    Ok(())
}
