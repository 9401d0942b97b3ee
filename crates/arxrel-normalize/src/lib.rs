//! arxrel normalize - arXiv snapshot to relational tables
//!
//! Turns the flat arXiv metadata snapshot (one JSON record per submission,
//! with embedded author lists, categories and revision history) into five
//! linked CSV tables: submissions, categories, authors and the two join
//! tables between them.
//!
//! # Example
//!
//! ```no_run
//! use arxrel_core::ProgressContext;
//! use arxrel_normalize::{Config, run};
//!
//! let config = Config {
//!     input: "arxiv-metadata-oai-snapshot.json".into(),
//!     area: "math".into(),
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &ProgressContext::new()).expect("run failed");
//! println!("{} submissions", summary.rows("submissions").unwrap_or(0));
//! ```

pub mod assemble;
pub mod category;
pub mod config;
pub mod date;
pub mod error;
pub mod expand;
pub mod filter;
pub mod gender;
pub mod output;
pub mod record;
pub mod registry;
pub mod runner;
pub mod stats;
pub mod taxonomy;

// Re-exports for convenience
pub use assemble::{AssembleOptions, Assembly, Tables, assemble};
pub use config::Config;
pub use error::{DateError, PipelineError, RecordError};
pub use gender::{Gender, GenderClassifier, NameTable, NoClassifier};
pub use runner::run;
pub use stats::Summary;
