//! Input records: the arXiv metadata snapshot, one JSON object per line.
//!
//! [`RawRecord`] mirrors the JSON with every field optional; [`Record`] is
//! the validated form the rest of the pipeline works on.

use serde::Deserialize;

use crate::error::RecordError;

/// One entry of the revision history (`versions`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub version: String,
    /// RFC 2822-like timestamp, e.g. "Mon, 2 Apr 2007 19:18:42 GMT"
    pub created: String,
    #[serde(default)]
    pub size: Option<String>,
}

/// One `authors_parsed` entry: `[surname, given names, suffix]`.
///
/// Missing trailing elements default to empty strings; an empty array is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct AuthorName {
    pub surname: String,
    pub given: String,
    pub suffix: String,
}

impl TryFrom<Vec<String>> for AuthorName {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();
        let surname = parts
            .next()
            .ok_or_else(|| "author entry has no surname".to_string())?;
        Ok(Self {
            surname,
            given: parts.next().unwrap_or_default(),
            suffix: parts.next().unwrap_or_default(),
        })
    }
}

impl AuthorName {
    pub fn new(surname: &str, given: &str) -> Self {
        Self {
            surname: surname.to_string(),
            given: given.to_string(),
            suffix: String::new(),
        }
    }
}

/// arXiv snapshot JSON structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub submitter: Option<String>,
    /// Free-text author line; `authors_parsed` is what gets normalized.
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(rename = "journal-ref", default)]
    pub journal_ref: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(rename = "report-no", default)]
    pub report_no: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub versions: Vec<Version>,
    #[serde(default)]
    pub update_date: Option<String>,
    #[serde(default)]
    pub authors_parsed: Vec<AuthorName>,
}

/// Validated record: required fields present, identifier non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    pub comments: Option<String>,
    pub journal_ref: Option<String>,
    pub doi: Option<String>,
    pub categories: String,
    pub versions: Vec<Version>,
    pub authors: Vec<AuthorName>,
}

/// Present and not blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawRecord {
    /// Check required fields and convert into a [`Record`].
    ///
    /// The revision history may be empty here; the date normalizer reports that.
    pub fn validate(self) -> Result<Record, RecordError> {
        let id = non_blank(self.id).ok_or(RecordError::MissingField("id"))?;
        let title = self.title.ok_or(RecordError::MissingField("title"))?;
        let abstract_text = self
            .abstract_text
            .ok_or(RecordError::MissingField("abstract"))?;
        let categories =
            non_blank(self.categories).ok_or(RecordError::MissingField("categories"))?;

        Ok(Record {
            id: id.trim().to_string(),
            title,
            abstract_text,
            comments: self.comments,
            journal_ref: self.journal_ref,
            doi: self.doi,
            categories,
            versions: self.versions,
            authors: self.authors_parsed,
        })
    }
}

impl Record {
    /// True iff the source journal reference is present and non-blank.
    pub fn has_journal_ref(&self) -> bool {
        self.journal_ref
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

/// Parse and validate a single JSON line.
pub fn parse_line(line: &str) -> Result<Record, RecordError> {
    let raw: RawRecord = serde_json::from_str(line)?;
    raw.validate()
}
