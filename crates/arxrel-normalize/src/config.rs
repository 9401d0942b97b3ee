//! Runtime configuration for a normalization run

use std::path::PathBuf;

/// Settings for one run, resolved from CLI flags and the config file
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-lines snapshot (`.gz` is decompressed on the fly)
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Top-level subject area to keep, e.g. `math`
    pub area: String,
    /// Accept bare `subarea` tokens as belonging to `area`
    pub bare_tokens: bool,
    /// `name,gender` CSV for the gender classifier; `None` means all unknown
    pub names_file: Option<PathBuf>,
    /// Dropped records logged individually before switching to debug level
    pub max_record_warnings: usize,
    pub write_manifest: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("arxiv-metadata-oai-snapshot.json"),
            output_dir: PathBuf::from("./data"),
            area: "math".to_string(),
            bare_tokens: false,
            names_file: None,
            max_record_warnings: 20,
            write_manifest: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.area, "math");
        assert!(!c.bare_tokens);
        assert!(c.names_file.is_none());
        assert!(c.write_manifest);
    }
}
