/// Keys per follow-up query when loading collections in batches.
pub const DEFAULT_BATCH_FETCH_SIZE: usize = 100;

/// Most keys a single `IN` list may carry. Bundled SQLite rejects statements
/// with more than 32766 bound parameters.
pub const MAX_IN_LIST_LEN: usize = 32766;

/// Clamps a configured batch size into `1..=MAX_IN_LIST_LEN`.
pub fn effective_batch_size(batch_size: usize) -> usize {
    batch_size.clamp(1, MAX_IN_LIST_LEN)
}

/// Number of follow-up queries needed for `keys` keys, with the batch size
/// clamped by [`effective_batch_size`].
pub fn batch_count(keys: usize, batch_size: usize) -> usize {
    keys.div_ceil(effective_batch_size(batch_size))
}

/// Upper bound on queries for a batched load of `roots` roots: the root
/// query plus one per batch.
pub fn max_batched_queries(roots: usize, batch_size: usize) -> usize {
    1 + batch_count(roots, batch_size)
}

/// Splits keys into batches of at most `effective_batch_size(batch_size)`.
pub fn batches<T>(keys: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
    keys.chunks(effective_batch_size(batch_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 100), 0);
        assert_eq!(batch_count(1, 100), 1);
        assert_eq!(batch_count(100, 100), 1);
        assert_eq!(batch_count(101, 100), 2);
        assert_eq!(batch_count(5, 2), 3);
    }

    #[test]
    fn test_zero_batch_size_means_one_per_key() {
        assert_eq!(batch_count(3, 0), 3);
        assert_eq!(batches(&[1, 2, 3], 0).count(), 3);
    }

    #[test]
    fn test_oversized_batch_is_capped_at_in_list_limit() {
        assert_eq!(effective_batch_size(40_000), MAX_IN_LIST_LEN);
        assert_eq!(batch_count(MAX_IN_LIST_LEN + 1, 40_000), 2);

        let keys: Vec<i64> = (0..(MAX_IN_LIST_LEN as i64 + 5)).collect();
        let sizes: Vec<usize> = batches(&keys, usize::MAX).map(<[i64]>::len).collect();
        assert_eq!(sizes, vec![MAX_IN_LIST_LEN, 5]);
    }

    #[test]
    fn test_max_batched_queries() {
        assert_eq!(max_batched_queries(0, 100), 1);
        assert_eq!(max_batched_queries(250, 100), 4);
    }

    #[test]
    fn test_batches_cover_every_key_once() {
        let keys: Vec<i64> = (1..=7).collect();

        let chunks: Vec<&[i64]> = batches(&keys, 3).collect();

        assert_eq!(chunks, vec![&[1, 2, 3][..], &[4, 5, 6][..], &[7][..]]);
    }
}
