//! Indexing of unordered team pairs.

/// Maps unordered pairs `(i, j)`, `i < j`, of `n` teams to dense indices.
///
/// Pairs are numbered in row-major upper-triangle order:
/// `(0,1), (0,2), …, (0,n-1), (1,2), …, (n-2,n-1)`.
///
/// # Examples
///
/// ```
/// use u_divisions::formulation::PairIndex;
///
/// let idx = PairIndex::new(4);
/// assert_eq!(idx.len(), 6);
/// assert_eq!(idx.index(0, 1), 0);
/// assert_eq!(idx.index(1, 2), 3);
/// assert_eq!(idx.index(3, 2), 5);
/// assert_eq!(idx.pair(4), (1, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIndex {
    n: usize,
}

impl PairIndex {
    /// Creates the index for `n` teams.
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Number of teams.
    pub fn num_teams(&self) -> usize {
        self.n
    }

    /// Number of unordered pairs, `n(n-1)/2`.
    pub fn len(&self) -> usize {
        self.n * self.n.saturating_sub(1) / 2
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense index of the pair `{a, b}`; argument order does not matter.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `a == b` or either index is out of range.
    pub fn index(&self, a: usize, b: usize) -> usize {
        debug_assert!(a != b && a < self.n && b < self.n);
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        i * (2 * self.n - i - 1) / 2 + (j - i - 1)
    }

    /// Inverse of [`index`](Self::index), returning `(i, j)` with `i < j`.
    pub fn pair(&self, index: usize) -> (usize, usize) {
        let mut i = 0;
        let mut start = 0;
        loop {
            let row = self.n - i - 1;
            if index < start + row {
                return (i, i + 1 + index - start);
            }
            start += row;
            i += 1;
        }
    }

    /// Iterates all pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.n;
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_iteration_order() {
        let idx = PairIndex::new(7);
        for (k, (i, j)) in idx.iter().enumerate() {
            assert_eq!(idx.index(i, j), k);
            assert_eq!(idx.index(j, i), k);
            assert_eq!(idx.pair(k), (i, j));
        }
        assert_eq!(idx.iter().count(), idx.len());
    }

    #[test]
    fn test_empty() {
        assert!(PairIndex::new(1).is_empty());
        assert!(PairIndex::new(0).is_empty());
        assert_eq!(PairIndex::new(2).len(), 1);
    }
}
