use std::fmt;

use serde::Serialize;

/// How an endpoint gets from tables to its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    /// Load roots, then load each association of each root separately.
    PerRowTraversal,
    /// Join to-one associations into the root query; load collections with
    /// `IN` queries of bounded size.
    ToOneJoinBatched,
    /// Join every association, collections included, in one query.
    CollectionJoin,
    /// Select only the response columns into purpose-built records.
    Projection,
}

impl FetchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStrategy::PerRowTraversal => "per-row-traversal",
            FetchStrategy::ToOneJoinBatched => "to-one-join-batched",
            FetchStrategy::CollectionJoin => "collection-join",
            FetchStrategy::Projection => "projection",
        }
    }

    /// Whether the root query can take an offset/limit window.
    ///
    /// A collection join repeats each root once per child row, so a row
    /// window does not correspond to a root window.
    pub fn is_paginable(&self) -> bool {
        !matches!(self, FetchStrategy::CollectionJoin)
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_collection_join_is_not_paginable() {
        assert!(FetchStrategy::PerRowTraversal.is_paginable());
        assert!(FetchStrategy::ToOneJoinBatched.is_paginable());
        assert!(FetchStrategy::Projection.is_paginable());
        assert!(!FetchStrategy::CollectionJoin.is_paginable());
    }

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&FetchStrategy::ToOneJoinBatched).unwrap();
        assert_eq!(json, format!("\"{}\"", FetchStrategy::ToOneJoinBatched));
    }
}
