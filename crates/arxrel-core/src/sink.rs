//! CSV table sinks with all-or-nothing commit
//!
//! Every table is written to `<name>.csv.tmp` first. A [`TableSet`] renames
//! all of its tables to their final names in one `commit`; dropping an
//! uncommitted set removes the temporaries, so a failed run never leaves a
//! partial table set behind.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// One output cell.
///
/// Text is always double-quoted (embedded quotes doubled) so identifiers
/// like `704.0002` are not mistaken for numbers; integers are bare; `Null`
/// is an empty unquoted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvField<'a> {
    Text(&'a str),
    Int(u64),
    Null,
}

impl<'a> From<&'a str> for CsvField<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for CsvField<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Self::Null, Self::Text)
    }
}

impl From<u64> for CsvField<'_> {
    fn from(n: u64) -> Self {
        Self::Int(n)
    }
}

impl CsvField<'_> {
    fn render(&self) -> String {
        match self {
            Self::Text(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                out.push_str(&s.replace('"', "\"\""));
                out.push('"');
                out
            }
            Self::Int(n) => n.to_string(),
            Self::Null => String::new(),
        }
    }
}

/// Buffered CSV writer targeting a temporary file
pub struct CsvSink {
    // Quoting is decided per field by `CsvField`, so the writer never quotes.
    writer: csv::Writer<BufWriter<File>>,
    name: String,
    tmp_path: PathBuf,
    final_path: PathBuf,
    row_count: usize,
    width: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Create `<output_dir>/<name>.csv.tmp` and write the quoted header row.
    pub fn new(name: &str, output_dir: &Path, header: &[&str]) -> io::Result<Self> {
        let final_path = output_dir.join(format!("{name}.csv"));
        let tmp_path = output_dir.join(format!("{name}.csv.tmp"));

        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(BufWriter::new(File::create(&tmp_path)?));

        let mut sink = Self {
            writer,
            name: name.to_string(),
            tmp_path,
            final_path,
            row_count: 0,
            width: header.len(),
        };
        let header: Vec<CsvField<'_>> = header.iter().map(|h| CsvField::Text(h)).collect();
        sink.write_cells(&header)?;
        Ok(sink)
    }

    fn write_cells(&mut self, fields: &[CsvField<'_>]) -> io::Result<()> {
        if fields.len() != self.width {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{}: row has {} fields, header has {}",
                    self.name,
                    fields.len(),
                    self.width
                ),
            ));
        }
        self.writer
            .write_record(fields.iter().map(CsvField::render))
            .map_err(io::Error::other)
    }

    /// Write one data row. The field count must match the header.
    pub fn write_row(&mut self, fields: &[CsvField<'_>]) -> io::Result<()> {
        self.write_cells(fields)?;
        self.row_count += 1;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Flush everything to the temporary file without renaming it.
    fn finish(mut self) -> io::Result<PendingTable> {
        self.writer.flush()?;
        Ok(PendingTable {
            name: self.name,
            tmp_path: self.tmp_path,
            final_path: self.final_path,
            rows: self.row_count,
        })
    }
}

/// Fully written table awaiting commit
#[derive(Debug)]
struct PendingTable {
    name: String,
    tmp_path: PathBuf,
    final_path: PathBuf,
    rows: usize,
}

/// Table that has been renamed into place
#[derive(Debug, Clone)]
pub struct CommittedTable {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Group of tables committed together or not at all
#[derive(Debug)]
pub struct TableSet {
    output_dir: PathBuf,
    pending: Vec<PendingTable>,
}

impl TableSet {
    /// Prepare `output_dir`, removing stale temporaries from earlier runs.
    pub fn new(output_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(output_dir)?;
        cleanup_tmp_files(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            pending: Vec::new(),
        })
    }

    /// Open a sink for a table in this set.
    pub fn create(&self, name: &str, header: &[&str]) -> io::Result<CsvSink> {
        CsvSink::new(name, &self.output_dir, header)
    }

    /// Flush a sink and enlist it for the commit.
    pub fn add(&mut self, sink: CsvSink) -> io::Result<()> {
        let table = sink.finish()?;
        self.pending.push(table);
        Ok(())
    }

    /// Rename every pending table into place.
    ///
    /// Existing tables are moved aside to `<name>.csv.bak` first. If any
    /// rename fails, the tables already renamed are removed and the backups
    /// restored, so the directory keeps the previous set.
    pub fn commit(mut self) -> io::Result<Vec<CommittedTable>> {
        let pending = std::mem::take(&mut self.pending);
        let mut backups: Vec<(PathBuf, PathBuf)> = Vec::new();
        let mut renamed: Vec<PathBuf> = Vec::new();

        let result = Self::swap_in(&pending, &mut backups, &mut renamed);
        match result {
            Ok(()) => {
                for (backup, _) in &backups {
                    if let Err(e) = fs::remove_file(backup) {
                        log::warn!("Failed to remove {}: {e}", backup.display());
                    }
                }
                Ok(pending
                    .into_iter()
                    .map(|table| CommittedTable {
                        name: table.name,
                        path: table.final_path,
                        rows: table.rows,
                    })
                    .collect())
            }
            Err(e) => {
                for path in &renamed {
                    if let Err(e) = fs::remove_file(path) {
                        log::warn!("Failed to remove {}: {e}", path.display());
                    }
                }
                for (backup, original) in &backups {
                    if let Err(e) = fs::rename(backup, original) {
                        log::warn!("Failed to restore {}: {e}", original.display());
                    }
                }
                // Temporaries not yet renamed are removed by Drop.
                self.pending = pending
                    .into_iter()
                    .filter(|t| t.tmp_path.exists())
                    .collect();
                Err(e)
            }
        }
    }

    fn swap_in(
        pending: &[PendingTable],
        backups: &mut Vec<(PathBuf, PathBuf)>,
        renamed: &mut Vec<PathBuf>,
    ) -> io::Result<()> {
        for table in pending {
            if table.final_path.is_file() {
                let mut backup = table.final_path.clone().into_os_string();
                backup.push(".bak");
                let backup = PathBuf::from(backup);
                fs::rename(&table.final_path, &backup)?;
                backups.push((backup, table.final_path.clone()));
            }
        }
        for table in pending {
            fs::rename(&table.tmp_path, &table.final_path)?;
            renamed.push(table.final_path.clone());
        }
        Ok(())
    }
}

impl Drop for TableSet {
    fn drop(&mut self) {
        for table in &self.pending {
            if let Err(e) = fs::remove_file(&table.tmp_path) {
                log::warn!("Failed to remove {}: {e}", table.tmp_path.display());
            }
        }
    }
}

/// Remove stale .tmp files in the output directory
pub fn cleanup_tmp_files(output_dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "tmp") {
            log::warn!("Removing stale tmp file: {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn text_is_quoted_and_escaped() {
        assert_eq!(CsvField::Text("704.0002").render(), "\"704.0002\"");
        assert_eq!(CsvField::Text("say \"hi\"").render(), "\"say \"\"hi\"\"\"");
        assert_eq!(CsvField::Int(42).render(), "42");
        assert_eq!(CsvField::Null.render(), "");
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(CsvField::from(None::<&str>), CsvField::Null);
        assert_eq!(CsvField::from(Some("x")), CsvField::Text("x"));
    }

    #[test]
    fn commit_renames_all_tables() {
        let dir = TempDir::new().unwrap();
        let mut set = TableSet::new(dir.path()).unwrap();

        let mut a = set.create("a", &["id", "n"]).unwrap();
        a.write_row(&["x, y".into(), 1u64.into()]).unwrap();
        set.add(a).unwrap();
        let b = set.create("b", &["id"]).unwrap();
        set.add(b).unwrap();

        let committed = set.commit().unwrap();
        assert_eq!(committed.len(), 2);
        assert_eq!(committed[0].rows, 1);
        assert_eq!(committed[1].rows, 0);

        let a = std::fs::read_to_string(dir.path().join("a.csv")).unwrap();
        assert_eq!(a, "\"id\",\"n\"\n\"x, y\",1\n");
        assert!(dir.path().join("b.csv").exists());
        assert!(!dir.path().join("a.csv.tmp").exists());
    }

    #[test]
    fn failed_commit_keeps_previous_tables() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv"), b"old").unwrap();
        // A directory in the way makes the second rename fail.
        std::fs::create_dir(dir.path().join("b.csv")).unwrap();

        let mut set = TableSet::new(dir.path()).unwrap();
        let mut a = set.create("a", &["id"]).unwrap();
        a.write_row(&["new".into()]).unwrap();
        set.add(a).unwrap();
        let b = set.create("b", &["id"]).unwrap();
        set.add(b).unwrap();

        assert!(set.commit().is_err());
        assert_eq!(std::fs::read_to_string(dir.path().join("a.csv")).unwrap(), "old");
        assert!(dir.path().join("b.csv").is_dir());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp") || n.ends_with(".bak"))
            .collect();
        assert!(leftovers.is_empty(), "leftovers: {leftovers:?}");
    }

    #[test]
    fn commit_replaces_previous_tables() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv"), b"old").unwrap();

        let mut set = TableSet::new(dir.path()).unwrap();
        let a = set.create("a", &["id"]).unwrap();
        set.add(a).unwrap();
        set.commit().unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("a.csv")).unwrap(), "\"id\"\n");
        assert!(!dir.path().join("a.csv.bak").exists());
    }

    #[test]
    fn dropped_set_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        {
            let mut set = TableSet::new(dir.path()).unwrap();
            let mut a = set.create("a", &["id"]).unwrap();
            a.write_row(&["1".into()]).unwrap();
            set.add(a).unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn row_width_is_checked() {
        let dir = TempDir::new().unwrap();
        let set = TableSet::new(dir.path()).unwrap();
        let mut a = set.create("a", &["id", "n"]).unwrap();
        let err = a.write_row(&["only".into()]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(a.row_count(), 0);
    }

    #[test]
    fn multiline_text_stays_in_one_field() {
        let dir = TempDir::new().unwrap();
        let mut set = TableSet::new(dir.path()).unwrap();
        let mut a = set.create("a", &["abstract"]).unwrap();
        a.write_row(&["line one\nline two".into()]).unwrap();
        set.add(a).unwrap();
        set.commit().unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("a.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "line one\nline two");
    }

    #[test]
    fn cleanup_tmp_files_removes_only_tmp() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv.tmp"), b"stale").unwrap();
        std::fs::write(dir.path().join("b.csv"), b"keep").unwrap();

        cleanup_tmp_files(dir.path()).unwrap();

        assert!(!dir.path().join("a.csv.tmp").exists());
        assert!(dir.path().join("b.csv").exists());
    }
}
