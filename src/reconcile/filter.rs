//! Scope filter: the scan predicate shared by every value-table query

use crate::{Error, Result};

/// Narrows a value-table scan to the overrides under consideration.
///
/// Every query built from this filter sees the same predicate:
/// `scope_id != 0 [AND scope_id = ?] [AND attribute_id = ?]`.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    scope_id: Option<i64>,
    attribute_id: Option<i64>,
}

impl ScopeFilter {
    /// Build a filter, rejecting the global scope as a target.
    pub fn new(scope_id: Option<i64>, attribute_id: Option<i64>) -> Result<Self> {
        if scope_id == Some(0) {
            return Err(Error::Config(
                "scope id 0 is the global scope and cannot be a cleanup target".to_string(),
            ));
        }
        Ok(Self {
            scope_id,
            attribute_id,
        })
    }

    /// SQL predicate with `?` placeholders in the order [`Self::binds`] yields
    pub fn predicate(&self) -> String {
        let mut predicate = String::from("scope_id != 0");
        if self.scope_id.is_some() {
            predicate.push_str(" AND scope_id = ?");
        }
        if self.attribute_id.is_some() {
            predicate.push_str(" AND attribute_id = ?");
        }
        predicate
    }

    /// Bind values matching the placeholders in [`Self::predicate`]
    pub fn binds(&self) -> impl Iterator<Item = i64> + '_ {
        self.scope_id.into_iter().chain(self.attribute_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_scan_only_excludes_global_scope() {
        let filter = ScopeFilter::new(None, None).unwrap();
        assert_eq!(filter.predicate(), "scope_id != 0");
        assert_eq!(filter.binds().count(), 0);
    }

    #[test]
    fn scope_narrowing_adds_placeholder_and_bind() {
        let filter = ScopeFilter::new(Some(2), None).unwrap();
        assert_eq!(filter.predicate(), "scope_id != 0 AND scope_id = ?");
        assert_eq!(filter.binds().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn attribute_narrowing_adds_placeholder_and_bind() {
        let filter = ScopeFilter::new(None, Some(71)).unwrap();
        assert_eq!(filter.predicate(), "scope_id != 0 AND attribute_id = ?");
        assert_eq!(filter.binds().collect::<Vec<_>>(), vec![71]);
    }

    #[test]
    fn binds_follow_placeholder_order() {
        let filter = ScopeFilter::new(Some(2), Some(71)).unwrap();
        assert_eq!(
            filter.predicate(),
            "scope_id != 0 AND scope_id = ? AND attribute_id = ?"
        );
        assert_eq!(filter.binds().collect::<Vec<_>>(), vec![2, 71]);
    }

    #[test]
    fn global_scope_is_rejected() {
        assert!(matches!(
            ScopeFilter::new(Some(0), None),
            Err(Error::Config(_))
        ));
    }
}
