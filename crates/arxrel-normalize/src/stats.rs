//! Run statistics: dropped-record accounting and the final summary table.

use std::collections::BTreeMap;
use std::time::Duration;

use arxrel_core::{fmt_num, pct};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::error::RecordError;

/// Counts dropped records per reason.
///
/// The first `max_warnings` drops are logged at warn level with their
/// identifier; the rest go to debug so a bad snapshot can't flood the log.
#[derive(Debug)]
pub struct IssueLog {
    counts: BTreeMap<&'static str, usize>,
    warned: usize,
    max_warnings: usize,
}

impl IssueLog {
    pub fn new(max_warnings: usize) -> Self {
        Self {
            counts: BTreeMap::new(),
            warned: 0,
            max_warnings,
        }
    }

    /// Count and log one dropped record. `context` is the arxiv id, or the
    /// line number when the line never parsed.
    pub fn record(&mut self, context: &str, err: &RecordError) {
        *self.counts.entry(err.reason()).or_default() += 1;
        if self.warned < self.max_warnings {
            self.warned += 1;
            log::warn!("Dropping {context}: {err}");
            if self.warned == self.max_warnings {
                log::warn!("Further dropped records are logged at debug level only");
            }
        } else {
            log::debug!("Dropping {context}: {err}");
        }
    }

    pub fn count(&self, reason: &str) -> usize {
        self.counts.get(reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Reason → count, owned, for the run manifest.
    pub fn to_map(&self) -> BTreeMap<String, usize> {
        self.counts
            .iter()
            .map(|(reason, n)| (reason.to_string(), *n))
            .collect()
    }
}

/// Counters from streaming the input file
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub lines_scanned: usize,
    pub blank_lines: usize,
    /// Lines skipped by the substring pre-filter (never parsed)
    pub pre_filtered: usize,
    /// Parsed records outside the target area
    pub area_excluded: usize,
    /// Records handed to the assembler
    pub records_kept: usize,
}

/// End-of-run summary
#[derive(Debug, Clone)]
pub struct Summary {
    pub area: String,
    pub scan: ScanStats,
    pub dropped: BTreeMap<String, usize>,
    /// Table name → rows written (header excluded)
    pub tables: Vec<(String, usize)>,
    pub classifier_calls: usize,
    pub elapsed: Duration,
}

impl Summary {
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn rows(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, rows)| *rows)
    }

    /// Render summary table for terminal display.
    pub fn render(&self) -> String {
        let mut input = Table::new();
        input
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new(format!("Input ({})", self.area))
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Records").fg(Color::Cyan),
                Cell::new("Share").fg(Color::Cyan),
            ]);

        let s = &self.scan;
        let scanned = s.lines_scanned;
        input.add_row(vec![
            Cell::new("lines scanned"),
            Cell::new(fmt_num(scanned)),
            Cell::new("-"),
        ]);
        input.add_row(vec![
            Cell::new("pre-filtered"),
            Cell::new(fmt_num(s.pre_filtered)),
            Cell::new(format!("{:.1}%", pct(s.pre_filtered, scanned))),
        ]);
        input.add_row(vec![
            Cell::new("other areas"),
            Cell::new(fmt_num(s.area_excluded)),
            Cell::new(format!("{:.1}%", pct(s.area_excluded, scanned))),
        ]);
        for (reason, n) in &self.dropped {
            input.add_row(vec![
                Cell::new(format!("dropped: {reason}")).fg(Color::Yellow),
                Cell::new(fmt_num(*n)).fg(Color::Yellow),
                Cell::new(format!("{:.1}%", pct(*n, scanned))),
            ]);
        }

        let mut output = Table::new();
        output
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Table")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Rows").fg(Color::Cyan),
            ]);
        for (name, rows) in &self.tables {
            output.add_row(vec![
                Cell::new(name).fg(Color::Green),
                Cell::new(fmt_num(*rows)),
            ]);
        }

        format!(
            "\n{input}\n{output}\n  Classifier lookups: {}  |  Elapsed: {:.1}s",
            fmt_num(self.classifier_calls),
            self.elapsed.as_secs_f64()
        )
    }

    /// Log summary lines (non-TTY mode).
    pub fn log(&self) {
        log::info!("=== arxrel summary ({}) ===", self.area);
        log::info!(
            "Lines: {} scanned, {} pre-filtered, {} other areas, {} dropped",
            fmt_num(self.scan.lines_scanned),
            fmt_num(self.scan.pre_filtered),
            fmt_num(self.scan.area_excluded),
            fmt_num(self.total_dropped())
        );
        for (reason, n) in &self.dropped {
            log::info!("  dropped {reason}: {}", fmt_num(*n));
        }
        for (name, rows) in &self.tables {
            log::info!("  {name}: {} rows", fmt_num(*rows));
        }
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}
