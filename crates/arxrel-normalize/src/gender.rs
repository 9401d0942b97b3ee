//! Gender enrichment for the Author table.
//!
//! The classifier is an external collaborator: any `&str → label` function.
//! Labels other than "male"/"female" collapse to [`Gender::Unknown`]. Lookups
//! go through a [`GenderCache`] that lives for one run only.

use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Normalize a classifier label.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("male") {
            Self::Male
        } else if label.eq_ignore_ascii_case("female") {
            Self::Female
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name → gender label.
pub trait GenderClassifier {
    fn classify(&self, first_name: &str) -> Cow<'_, str>;
}

impl<F: Fn(&str) -> String> GenderClassifier for F {
    fn classify(&self, first_name: &str) -> Cow<'_, str> {
        Cow::Owned(self(first_name))
    }
}

/// Classifier used when no names file is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassifier;

impl GenderClassifier for NoClassifier {
    fn classify(&self, _first_name: &str) -> Cow<'_, str> {
        Cow::Borrowed("unknown")
    }
}

#[derive(Debug, Deserialize)]
struct NameEntry {
    name: String,
    gender: String,
}

/// Case-insensitive first-name table loaded from a `name,gender` CSV.
///
/// Labels are kept verbatim (`mostly_male`, `andy`, ...); normalization to
/// male/female/unknown happens in [`Gender::from_label`].
#[derive(Debug, Default)]
pub struct NameTable {
    labels: FxHashMap<String, String>,
}

impl NameTable {
    /// Read a CSV with a `name,gender` header. Later rows override earlier ones.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut labels = FxHashMap::default();
        for entry in rdr.deserialize() {
            let entry: NameEntry = entry?;
            if entry.name.is_empty() {
                continue;
            }
            labels.insert(entry.name.to_lowercase(), entry.gender);
        }
        Ok(Self { labels })
    }

    pub fn from_path(path: &Path) -> Result<Self, csv::Error> {
        let table = Self::from_reader(std::fs::File::open(path)?)?;
        log::info!("Loaded {} first names from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl GenderClassifier for NameTable {
    fn classify(&self, first_name: &str) -> Cow<'_, str> {
        match self.labels.get(&first_name.to_lowercase()) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Borrowed("unknown"),
        }
    }
}

/// First whitespace-delimited token of a given-name string.
pub fn first_token(given: &str) -> Option<&str> {
    given.split_whitespace().next()
}

/// Per-run memo: the classifier sees each distinct first token once.
pub struct GenderCache<'c> {
    classifier: &'c dyn GenderClassifier,
    memo: FxHashMap<String, Gender>,
    invocations: usize,
}

impl<'c> GenderCache<'c> {
    pub fn new(classifier: &'c dyn GenderClassifier) -> Self {
        Self {
            classifier,
            memo: FxHashMap::default(),
            invocations: 0,
        }
    }

    /// Gender for a full given-name string, keyed by its first token.
    /// Blank given names are unknown without consulting the classifier.
    pub fn gender_of(&mut self, given: &str) -> Gender {
        let Some(token) = first_token(given) else {
            return Gender::Unknown;
        };
        if let Some(&gender) = self.memo.get(token) {
            return gender;
        }
        let gender = Gender::from_label(&self.classifier.classify(token));
        self.invocations += 1;
        self.memo.insert(token.to_string(), gender);
        gender
    }

    /// Number of classifier calls made so far.
    pub fn invocations(&self) -> usize {
        self.invocations
    }
}
