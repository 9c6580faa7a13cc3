//! Lazy Cartesian product.
//!
//! Rule expansion multiplies the completion sets of every entangled pair, and
//! instantiating a complex multiplies the instantiations of every agent. Both
//! can blow up, so combinations are produced one at a time from an odometer
//! over the pools instead of being materialized up front.

/// Iterator over every combination picking one element from each pool.
///
/// Zero pools yield exactly one empty combination; any empty pool yields
/// nothing.
#[derive(Debug, Clone)]
pub struct Product<'a, T> {
    pools: &'a [Vec<T>],
    indices: Vec<usize>,
    exhausted: bool,
}

pub fn product<T>(pools: &[Vec<T>]) -> Product<'_, T> {
    Product { pools, indices: vec![0; pools.len()], exhausted: pools.iter().any(Vec::is_empty) }
}

impl<T> Product<'_, T> {
    /// Total number of combinations, saturating on overflow.
    pub fn cardinality(&self) -> usize {
        self.pools.iter().fold(1usize, |acc, pool| acc.saturating_mul(pool.len()))
    }

    fn advance(&mut self) {
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.pools[pos].len() {
                return;
            }
            self.indices[pos] = 0;
        }
        self.exhausted = true;
    }
}

impl<'a, T> Iterator for Product<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let combination = self.indices.iter().zip(self.pools).map(|(&idx, pool)| &pool[idx]).collect();
        self.advance();
        Some(combination)
    }
}
