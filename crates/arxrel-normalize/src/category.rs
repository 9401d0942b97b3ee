//! Category filter: keep target-area tokens, strip the prefix, check the taxonomy.

use crate::error::PipelineError;
use crate::filter::{AreaFilter, CategoryToken};
use crate::taxonomy::Taxonomy;

/// Restricts exploded (arxiv_id, token) rows to one area's taxonomy.
#[derive(Debug)]
pub struct CategoryFilter<'a> {
    area: &'a AreaFilter,
    taxonomy: &'static Taxonomy,
}

impl<'a> CategoryFilter<'a> {
    pub fn new(area: &'a AreaFilter, taxonomy: &'static Taxonomy) -> Self {
        Self { area, taxonomy }
    }

    /// Map one raw token to its taxonomy code.
    ///
    /// `Ok(None)` for tokens outside the area; `UnknownCategory` for a
    /// subarea the taxonomy doesn't know.
    pub fn code_for(
        &self,
        arxiv_id: &str,
        token: &str,
    ) -> Result<Option<&'static str>, PipelineError> {
        let token = CategoryToken::parse(token);
        if !self.area.token_in_area(&token) {
            return Ok(None);
        }
        match self.taxonomy.get(token.subarea) {
            Some(category) => Ok(Some(category.code)),
            None => Err(PipelineError::UnknownCategory {
                arxiv_id: arxiv_id.to_string(),
                area: self.area.area().to_string(),
                code: token.subarea.to_string(),
            }),
        }
    }

    /// Filter and rewrite exploded rows, order kept.
    pub fn apply<K: AsRef<str>>(
        &self,
        rows: impl IntoIterator<Item = (K, impl AsRef<str>)>,
    ) -> Result<Vec<(K, &'static str)>, PipelineError> {
        let mut out = Vec::new();
        for (arxiv_id, token) in rows {
            if let Some(code) = self.code_for(arxiv_id.as_ref(), token.as_ref())? {
                out.push((arxiv_id, code));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::MATH;

    #[test]
    fn keeps_area_and_strips_prefix() {
        let area = AreaFilter::new("math", false);
        let filter = CategoryFilter::new(&area, &MATH);
        let rows = filter
            .apply(vec![("704.0002", "math.CO"), ("704.0002", "cs.DM")])
            .unwrap();
        assert_eq!(rows, vec![("704.0002", "CO")]);
    }

    #[test]
    fn unknown_subarea_aborts() {
        let area = AreaFilter::new("math", false);
        let filter = CategoryFilter::new(&area, &MATH);
        let err = filter
            .apply(vec![("1", "math.CO"), ("2", "math.ZZ")])
            .unwrap_err();
        match err {
            PipelineError::UnknownCategory { arxiv_id, code, .. } => {
                assert_eq!(arxiv_id, "2");
                assert_eq!(code, "ZZ");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn other_area_with_unknown_code_is_ignored() {
        let area = AreaFilter::new("math", false);
        let filter = CategoryFilter::new(&area, &MATH);
        assert_eq!(filter.code_for("1", "physics.ZZ").unwrap(), None);
        assert_eq!(filter.code_for("1", "math-ph").unwrap(), None);
    }

    #[test]
    fn bare_tokens_when_enabled() {
        let area = AreaFilter::new("math", true);
        let filter = CategoryFilter::new(&area, &MATH);
        let rows = filter
            .apply(vec![("1".to_string(), "AG"), ("1".to_string(), "math.NT")])
            .unwrap();
        assert_eq!(rows, vec![("1".to_string(), "AG"), ("1".to_string(), "NT")]);
    }

    #[test]
    fn bare_mode_ignores_archive_names() {
        let area = AreaFilter::new("math", true);
        let filter = CategoryFilter::new(&area, &MATH);
        let rows = filter
            .apply(vec![("704.0007", "MP"), ("704.0007", "math-ph"), ("704.0008", "hep-th")])
            .unwrap();
        assert_eq!(rows, vec![("704.0007", "MP")]);
    }
}
