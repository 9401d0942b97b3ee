//! CSV rendering of the assembled tables.

use std::io;
use std::path::Path;

use arxrel_core::{CommittedTable, CsvField, TableSet};

use crate::assemble::Tables;

pub const SUBMISSIONS: &str = "submissions";
pub const CATEGORIES: &str = "categories";
pub const AUTHORS: &str = "authors";
pub const SUBMISSION_AUTHORS: &str = "submission_authors";
pub const SUBMISSION_CATEGORIES: &str = "submission_categories";

const SUBMISSIONS_HEADER: &[&str] = &[
    "arxiv_id",
    "submission_date",
    "title",
    "abstract",
    "journal-ref",
    "comments",
];
const CATEGORIES_HEADER: &[&str] = &["category_id", "category_name"];
const AUTHORS_HEADER: &[&str] = &["author_id", "surname", "first_name", "gender"];
const SUBMISSION_AUTHORS_HEADER: &[&str] = &["arxiv_id", "author_id"];
const SUBMISSION_CATEGORIES_HEADER: &[&str] = &["arxiv_id", "category_id"];

/// Write all five tables into `output_dir`.
///
/// Nothing is renamed into place unless every table was written; on error
/// the temporaries are removed when the set is dropped.
pub fn write_tables(tables: &Tables, output_dir: &Path) -> io::Result<Vec<CommittedTable>> {
    let mut set = TableSet::new(output_dir)?;

    let mut sink = set.create(SUBMISSIONS, SUBMISSIONS_HEADER)?;
    for row in &tables.submissions {
        let date = row.submission_date.format("%Y-%m-%d").to_string();
        sink.write_row(&[
            CsvField::Text(&row.arxiv_id),
            CsvField::Text(&date),
            CsvField::Text(&row.title),
            CsvField::Text(&row.abstract_text),
            CsvField::Int(u64::from(row.has_journal_ref)),
            row.comments.as_deref().into(),
        ])?;
    }
    set.add(sink)?;

    let mut sink = set.create(CATEGORIES, CATEGORIES_HEADER)?;
    for category in tables.categories() {
        sink.write_row(&[CsvField::Text(category.code), CsvField::Text(category.name)])?;
    }
    set.add(sink)?;

    let mut sink = set.create(AUTHORS, AUTHORS_HEADER)?;
    for author in tables.authors.rows() {
        sink.write_row(&[
            CsvField::Int(author.author_id),
            CsvField::Text(&author.surname),
            CsvField::Text(&author.first_name),
            CsvField::Text(author.gender.as_str()),
        ])?;
    }
    set.add(sink)?;

    let mut sink = set.create(SUBMISSION_AUTHORS, SUBMISSION_AUTHORS_HEADER)?;
    for row in &tables.submission_authors {
        sink.write_row(&[CsvField::Text(&row.arxiv_id), CsvField::Int(row.author_id)])?;
    }
    set.add(sink)?;

    let mut sink = set.create(SUBMISSION_CATEGORIES, SUBMISSION_CATEGORIES_HEADER)?;
    for row in &tables.submission_categories {
        sink.write_row(&[CsvField::Text(&row.arxiv_id), CsvField::Text(row.category_id)])?;
    }
    set.add(sink)?;

    set.commit()
}
