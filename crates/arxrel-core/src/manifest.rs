//! Run manifest: records which input produced a table set and how.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hash;
use crate::sink::CommittedTable;

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Per-table entry: row count (excluding header) and content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub rows: usize,
    pub blake3: String,
}

/// Manifest stored alongside the committed tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Input file as given on the command line.
    pub input: String,
    /// Blake3 hash of the raw input bytes.
    pub input_hash: String,
    /// Subject area the run was filtered to (e.g. "math").
    pub area: String,
    /// Table file name → entry.
    pub tables: BTreeMap<String, TableEntry>,
    /// Drop reason → number of records excluded for it.
    pub dropped: BTreeMap<String, usize>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RunManifest {
    /// Build a manifest, hashing the input and every committed table.
    pub fn build(
        input: &Path,
        area: &str,
        tables: &[CommittedTable],
        dropped: BTreeMap<String, usize>,
    ) -> Result<Self> {
        let input_hash = hash::hash_file(input)
            .with_context(|| format!("failed to hash {}", input.display()))?;

        let mut entries = BTreeMap::new();
        for table in tables {
            let h = hash::hash_file(&table.path)
                .with_context(|| format!("failed to hash {}", table.path.display()))?;
            let file_name = table
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| table.name.clone());
            entries.insert(
                file_name,
                TableEntry {
                    rows: table.rows,
                    blake3: h.to_hex().to_string(),
                },
            );
        }

        Ok(Self {
            input: input.display().to_string(),
            input_hash: input_hash.to_hex().to_string(),
            area: area.to_string(),
            tables: entries,
            dropped,
            created_at: chrono::Utc::now(),
        })
    }

    /// Whether two runs produced byte-identical tables.
    pub fn same_tables(&self, other: &Self) -> bool {
        self.tables == other.tables
    }

    /// Write manifest to dir/manifest.json
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).context("failed to serialize manifest")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Read manifest from dir/manifest.json
    pub fn read_from(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
    }
}
