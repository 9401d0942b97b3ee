//! One-shot run: stream the snapshot, assemble, write, summarize.

use std::io::BufRead;
use std::sync::atomic::Ordering;
use std::time::Instant;

use anyhow::Context;
use arxrel_core::{ProgressContext, RunManifest, fmt_num, open_input};

use crate::assemble::{AssembleOptions, assemble};
use crate::config::Config;
use crate::error::PipelineError;
use crate::filter::AreaFilter;
use crate::gender::{GenderClassifier, NameTable, NoClassifier};
use crate::output::write_tables;
use crate::record::{Record, parse_line};
use crate::stats::{IssueLog, ScanStats, Summary};
use crate::taxonomy;

/// Lines between progress bar refreshes
const PROGRESS_EVERY: usize = 10_000;

/// Run the transform described by `config`.
pub fn run(config: &Config, progress: &ProgressContext) -> anyhow::Result<Summary> {
    let start = Instant::now();

    let taxonomy = taxonomy::for_area(&config.area)
        .ok_or_else(|| PipelineError::UnsupportedArea(config.area.clone()))?;
    let filter = AreaFilter::new(&config.area, config.bare_tokens);

    let classifier: Box<dyn GenderClassifier> = match &config.names_file {
        Some(path) => Box::new(
            NameTable::from_path(path)
                .with_context(|| format!("failed to load names file {}", path.display()))?,
        ),
        None => {
            log::info!("No names file configured, every gender is unknown");
            Box::new(NoClassifier)
        }
    };

    let mut issues = IssueLog::new(config.max_record_warnings);
    let (records, mut scan) = scan_input(config, &filter, &mut issues, progress)?;
    log::info!(
        "Scanned {} lines, kept {} {} records",
        fmt_num(scan.lines_scanned),
        fmt_num(records.len()),
        config.area
    );

    let stage = progress.stage_line("assemble");
    let opts = AssembleOptions {
        filter: &filter,
        taxonomy,
        classifier: classifier.as_ref(),
    };
    let assembly =
        assemble(records, &opts, &mut issues).context("aborting run; no tables written")?;
    scan.area_excluded += assembly.area_excluded;
    stage.finish_and_clear();

    let stage = progress.stage_line("write");
    let committed = write_tables(&assembly.tables, &config.output_dir)
        .with_context(|| format!("failed to write tables to {}", config.output_dir.display()))?;
    stage.finish_and_clear();
    for table in &committed {
        log::info!("Wrote {} ({} rows)", table.path.display(), fmt_num(table.rows));
    }

    let dropped = issues.to_map();
    if config.write_manifest {
        // Tables are already committed; a missing manifest doesn't undo them.
        let written = RunManifest::build(&config.input, &config.area, &committed, dropped.clone())
            .and_then(|manifest| manifest.write_to(&config.output_dir));
        if let Err(e) = written {
            log::warn!(
                "Tables are in place in {} but the manifest was not written: {e:#}",
                config.output_dir.display()
            );
        }
    }

    Ok(Summary {
        area: config.area.clone(),
        scan,
        dropped,
        tables: committed.into_iter().map(|t| (t.name, t.rows)).collect(),
        classifier_calls: assembly.classifier_calls,
        elapsed: start.elapsed(),
    })
}

/// Stream the input, keeping only parsed records of the target area.
fn scan_input(
    config: &Config,
    filter: &AreaFilter,
    issues: &mut IssueLog,
    progress: &ProgressContext,
) -> anyhow::Result<(Vec<Record>, ScanStats)> {
    let (reader, bytes_read, total_bytes) = open_input(&config.input)
        .with_context(|| format!("failed to open {}", config.input.display()))?;
    let pb = progress.scan_bar("scan", total_bytes);

    let mut stats = ScanStats::default();
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!("failed to read line {} of {}", idx + 1, config.input.display())
        })?;
        stats.lines_scanned += 1;

        if stats.lines_scanned.is_multiple_of(PROGRESS_EVERY) {
            pb.set_position(bytes_read.load(Ordering::Relaxed));
            pb.set_message(format!(
                "{} lines, {} kept",
                fmt_num(stats.lines_scanned),
                fmt_num(records.len())
            ));
        }

        if line.trim().is_empty() {
            stats.blank_lines += 1;
            continue;
        }
        if !filter.pre_filter(&line) {
            stats.pre_filtered += 1;
            continue;
        }
        let record = match parse_line(&line) {
            Ok(record) => record,
            Err(e) => {
                issues.record(&format!("line {}", idx + 1), &e);
                continue;
            }
        };
        if !filter.matches(&record.categories) {
            stats.area_excluded += 1;
            continue;
        }
        records.push(record);
    }

    pb.finish_and_clear();
    stats.records_kept = records.len();
    Ok((records, stats))
}
