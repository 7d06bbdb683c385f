use super::PageError;

/// A window over root rows: skip `offset`, return at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    /// `None` means no upper bound.
    pub limit: Option<usize>,
}

impl Page {
    /// Creates a bounded page, validating that `limit` is at least 1.
    pub fn new(offset: usize, limit: usize) -> Result<Self, PageError> {
        if limit == 0 {
            return Err(PageError::ZeroLimit);
        }
        Ok(Self {
            offset,
            limit: Some(limit),
        })
    }

    /// Every row.
    pub fn all() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// Applies the window to an already ordered sequence.
    pub fn apply<T>(&self, rows: impl IntoIterator<Item = T>) -> Vec<T> {
        let skipped = rows.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }

    /// SQL `LIMIT` value; SQLite treats a negative limit as unbounded.
    pub fn sql_limit(&self) -> i64 {
        self.limit.map_or(-1, |limit| limit as i64)
    }

    pub fn sql_offset(&self) -> i64 {
        self.offset as i64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::all()
    }
}
