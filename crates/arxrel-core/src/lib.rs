//! arxrel core - shared plumbing for the arXiv normalization pipeline
//!
//! Input streaming, CSV table sinks with atomic commit, run manifests,
//! progress reporting and logging. Nothing here knows about submissions
//! or authors.

pub mod hash;
pub mod input;
pub mod logging;
pub mod manifest;
pub mod progress;
pub mod sink;

// Re-exports for convenience
pub use input::{ByteCounter, InputReader, open_input};
pub use logging::{IndicatifLogger, init_logging};
pub use manifest::{RunManifest, TableEntry};
pub use progress::{ProgressContext, fmt_num, pct};
pub use sink::{CommittedTable, CsvField, CsvSink, TableSet, cleanup_tmp_files};
