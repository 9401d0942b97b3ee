//! Author registry: one surrogate key per distinct (surname, first name).
//!
//! The suffix is dropped before deduplication, so "Smith, J., Jr" and
//! "Smith, J." are one author. Namesakes are conflated; there is no
//! disambiguation beyond the two name fields.
//!
//! Keys are assigned after sorting the distinct pairs, so the same set of
//! names always yields the same ids regardless of record order.

use rustc_hash::FxHashSet;

use crate::gender::{Gender, GenderCache};
use crate::record::AuthorName;

/// One row of the Author table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRow {
    pub author_id: u64,
    pub surname: String,
    pub first_name: String,
    pub gender: Gender,
}

/// Deduplicated authors indexed by surrogate key (`rows[id].author_id == id`)
#[derive(Debug, Default)]
pub struct AuthorRegistry {
    rows: Vec<AuthorRow>,
}

impl AuthorRegistry {
    /// Build from every author list of the run.
    ///
    /// Gender is resolved through `genders`, one classifier call per
    /// distinct first-name token.
    pub fn build<'a>(
        author_lists: impl IntoIterator<Item = &'a [AuthorName]>,
        genders: &mut GenderCache<'_>,
    ) -> Self {
        let mut distinct: FxHashSet<(&'a str, &'a str)> = FxHashSet::default();
        for list in author_lists {
            for name in list {
                distinct.insert((name.surname.as_str(), name.given.as_str()));
            }
        }

        let mut keys: Vec<(&str, &str)> = distinct.into_iter().collect();
        keys.sort_unstable();

        let rows = keys
            .into_iter()
            .enumerate()
            .map(|(idx, (surname, first_name))| AuthorRow {
                author_id: idx as u64,
                surname: surname.to_string(),
                first_name: first_name.to_string(),
                gender: genders.gender_of(first_name),
            })
            .collect();

        Self { rows }
    }

    /// Surrogate key for a name, suffix ignored.
    pub fn id_of(&self, name: &AuthorName) -> Option<u64> {
        self.lookup(&name.surname, &name.given)
    }

    pub fn lookup(&self, surname: &str, first_name: &str) -> Option<u64> {
        self.rows
            .binary_search_by(|row| {
                (row.surname.as_str(), row.first_name.as_str()).cmp(&(surname, first_name))
            })
            .ok()
            .map(|idx| self.rows[idx].author_id)
    }

    pub fn get(&self, author_id: u64) -> Option<&AuthorRow> {
        usize::try_from(author_id)
            .ok()
            .and_then(|idx| self.rows.get(idx))
    }

    pub fn rows(&self) -> &[AuthorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
