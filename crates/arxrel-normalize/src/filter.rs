//! Subject-area selection over the space-separated `categories` field.
//!
//! Tokens look like `area.subarea` (`math.CO`). Reloads of an already
//! filtered subset may carry bare subareas (`CO`); those count as the target
//! area only when `bare_tokens` is enabled. Dotless archive names such as
//! `math-ph` or `hep-th` are never bare subareas.

use crate::record::Record;

/// One token of a categories string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryToken<'a> {
    pub area: Option<&'a str>,
    pub subarea: &'a str,
}

impl<'a> CategoryToken<'a> {
    /// Whether a dotless token has the shape of a subarea code (`CO`, `ME`).
    pub fn is_bare_subarea(&self) -> bool {
        self.area.is_none()
            && !self.subarea.is_empty()
            && self.subarea.bytes().all(|b| b.is_ascii_uppercase())
    }

    pub fn parse(token: &'a str) -> Self {
        match token.split_once('.') {
            Some((area, subarea)) => Self {
                area: Some(area),
                subarea,
            },
            None => Self {
                area: None,
                subarea: token,
            },
        }
    }
}

/// Iterate the tokens of a categories string.
pub fn tokens(categories: &str) -> impl Iterator<Item = CategoryToken<'_>> {
    categories.split_whitespace().map(CategoryToken::parse)
}

/// Keeps records with at least one token in the target area.
#[derive(Debug, Clone)]
pub struct AreaFilter {
    area: String,
    bare_tokens: bool,
    /// Substring every matching raw line must contain (`"math."`).
    needle: String,
}

impl AreaFilter {
    pub fn new(area: &str, bare_tokens: bool) -> Self {
        Self {
            area: area.to_string(),
            bare_tokens,
            needle: format!("{area}."),
        }
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn bare_tokens(&self) -> bool {
        self.bare_tokens
    }

    /// Fast substring check on a raw JSON line.
    /// Returns true if the line *might* match (false positives allowed).
    pub fn pre_filter(&self, line: &str) -> bool {
        self.bare_tokens || line.contains(self.needle.as_str())
    }

    /// Whether a single token belongs to the target area.
    pub fn token_in_area(&self, token: &CategoryToken<'_>) -> bool {
        match token.area {
            Some(area) => area == self.area,
            None => self.bare_tokens && token.is_bare_subarea(),
        }
    }

    /// Full match on a categories string.
    pub fn matches(&self, categories: &str) -> bool {
        tokens(categories).any(|t| self.token_in_area(&t))
    }

    /// The subsequence of `records` in the target area, input order kept.
    pub fn select<'r>(&'r self, records: &'r [Record]) -> impl Iterator<Item = &'r Record> + 'r {
        records.iter().filter(|r| self.matches(&r.categories))
    }
}
