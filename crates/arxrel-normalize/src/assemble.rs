//! Table assembly: runs filter → dates → registry → expanders → category
//! filter in dependency order and returns the five tables as one unit.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::category::CategoryFilter;
use crate::date::first_submission_date;
use crate::error::{PipelineError, RecordError};
use crate::expand::{explode, explode_with};
use crate::filter::AreaFilter;
use crate::gender::{GenderCache, GenderClassifier};
use crate::record::Record;
use crate::registry::AuthorRegistry;
use crate::stats::IssueLog;
use crate::taxonomy::{Category, Taxonomy};

/// One row of the Submission table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRow {
    pub arxiv_id: String,
    pub submission_date: NaiveDate,
    pub title: String,
    pub abstract_text: String,
    pub has_journal_ref: bool,
    pub comments: Option<String>,
}

/// Submission-Author join row (one per author position)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAuthor {
    pub arxiv_id: String,
    pub author_id: u64,
}

/// Submission-Category join row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCategory {
    pub arxiv_id: String,
    pub category_id: &'static str,
}

/// The five output tables of a run
#[derive(Debug)]
pub struct Tables {
    pub submissions: Vec<SubmissionRow>,
    pub taxonomy: &'static Taxonomy,
    pub authors: AuthorRegistry,
    pub submission_authors: Vec<SubmissionAuthor>,
    pub submission_categories: Vec<SubmissionCategory>,
}

impl Tables {
    /// Category table rows (the full static taxonomy).
    pub fn categories(&self) -> &'static [Category] {
        self.taxonomy.categories
    }

    /// Check every foreign key in the join tables resolves.
    pub fn check_integrity(&self) -> Result<(), PipelineError> {
        let ids: FxHashSet<&str> = self
            .submissions
            .iter()
            .map(|s| s.arxiv_id.as_str())
            .collect();

        for row in &self.submission_authors {
            if !ids.contains(row.arxiv_id.as_str()) {
                return Err(PipelineError::DanglingKey {
                    table: "submission_authors",
                    key: row.arxiv_id.clone(),
                });
            }
            if self.authors.get(row.author_id).is_none() {
                return Err(PipelineError::DanglingKey {
                    table: "submission_authors",
                    key: row.author_id.to_string(),
                });
            }
        }
        for row in &self.submission_categories {
            if !ids.contains(row.arxiv_id.as_str()) {
                return Err(PipelineError::DanglingKey {
                    table: "submission_categories",
                    key: row.arxiv_id.clone(),
                });
            }
            if !self.taxonomy.contains(row.category_id) {
                return Err(PipelineError::DanglingKey {
                    table: "submission_categories",
                    key: row.category_id.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Result of [`assemble`]: the tables plus bookkeeping for the summary
#[derive(Debug)]
pub struct Assembly {
    pub tables: Tables,
    /// Records outside the target area (not errors)
    pub area_excluded: usize,
    /// Distinct first-name tokens sent to the classifier
    pub classifier_calls: usize,
}

/// Collaborators and settings for one assembly
pub struct AssembleOptions<'a> {
    pub filter: &'a AreaFilter,
    pub taxonomy: &'static Taxonomy,
    pub classifier: &'a dyn GenderClassifier,
}

/// Build the five tables from validated records.
///
/// Per-record problems (bad or empty history, duplicate id) drop the record
/// from every table and go to `issues`. Unknown authors or categories abort.
pub fn assemble(
    records: Vec<Record>,
    opts: &AssembleOptions<'_>,
    issues: &mut IssueLog,
) -> Result<Assembly, PipelineError> {
    let mut area_excluded = 0usize;
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut accepted: Vec<(Record, NaiveDate)> = Vec::with_capacity(records.len());

    for record in records {
        if !opts.filter.matches(&record.categories) {
            area_excluded += 1;
            continue;
        }
        let date = match first_submission_date(&record.versions) {
            Ok(date) => date,
            Err(e) => {
                issues.record(&record.id, &RecordError::from(e));
                continue;
            }
        };
        if !seen.insert(record.id.clone()) {
            issues.record(&record.id, &RecordError::DuplicateId);
            continue;
        }
        accepted.push((record, date));
    }
    drop(seen);
    log::info!("{} submissions accepted", accepted.len());

    // Registry must be complete before any author reference is resolved.
    let mut genders = GenderCache::new(opts.classifier);
    let authors = AuthorRegistry::build(
        accepted.iter().map(|(r, _)| r.authors.as_slice()),
        &mut genders,
    );
    log::info!(
        "{} distinct authors ({} first-name lookups)",
        authors.len(),
        genders.invocations()
    );

    let submission_authors = explode_with(
        accepted
            .iter()
            .map(|(r, _)| (r.id.as_str(), r.authors.iter())),
        |arxiv_id, name| {
            authors
                .id_of(name)
                .map(|author_id| SubmissionAuthor {
                    arxiv_id: arxiv_id.to_string(),
                    author_id,
                })
                .ok_or_else(|| PipelineError::UnknownAuthor {
                    arxiv_id: arxiv_id.to_string(),
                    surname: name.surname.clone(),
                    first_name: name.given.clone(),
                })
        },
    )?
    .into_iter()
    .map(|(_, row)| row)
    .collect();

    let raw_categories = explode(
        accepted
            .iter()
            .map(|(r, _)| (r.id.as_str(), r.categories.split_whitespace())),
    );
    let submission_categories = CategoryFilter::new(opts.filter, opts.taxonomy)
        .apply(raw_categories)?
        .into_iter()
        .map(|(arxiv_id, category_id)| SubmissionCategory {
            arxiv_id: arxiv_id.to_string(),
            category_id,
        })
        .collect();

    let submissions = accepted
        .into_iter()
        .map(|(record, submission_date)| SubmissionRow {
            has_journal_ref: record.has_journal_ref(),
            arxiv_id: record.id,
            submission_date,
            title: record.title,
            abstract_text: record.abstract_text,
            comments: record.comments,
        })
        .collect();

    let tables = Tables {
        submissions,
        taxonomy: opts.taxonomy,
        authors,
        submission_authors,
        submission_categories,
    };
    tables.check_integrity()?;

    Ok(Assembly {
        tables,
        area_excluded,
        classifier_calls: genders.invocations(),
    })
}
