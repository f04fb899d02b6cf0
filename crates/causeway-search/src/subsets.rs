//! Fixed-size subset enumeration.
//!
//! Subsets are produced in lexicographic order over item positions, so
//! the order is fully determined by the order of the input slice.

/// Iterator over all `k`-element subsets of a slice.
///
/// Yields `C(n, k)` subsets; `k = 0` yields one empty subset and `k > n`
/// yields nothing.
#[derive(Clone, Debug)]
pub struct Subsets<'a, T> {
    items: &'a [T],
    positions: Vec<usize>,
    done: bool,
}

impl<'a, T: Clone> Subsets<'a, T> {
    /// Enumerate the `k`-element subsets of `items`.
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            positions: (0..k).collect(),
            done: k > items.len(),
        }
    }

    fn advance(&mut self) {
        let n = self.items.len();
        let k = self.positions.len();
        // rightmost position that can still move
        let Some(i) = (0..k).rev().find(|&i| self.positions[i] < n - k + i) else {
            self.done = true;
            return;
        };
        self.positions[i] += 1;
        for j in i + 1..k {
            self.positions[j] = self.positions[j - 1] + 1;
        }
    }
}

impl<T: Clone> Iterator for Subsets<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let subset = self
            .positions
            .iter()
            .map(|&p| self.items[p].clone())
            .collect();
        self.advance();
        Some(subset)
    }
}

/// Shorthand for [`Subsets::new`].
pub fn subsets_of_size<T: Clone>(items: &[T], k: usize) -> Subsets<'_, T> {
    Subsets::new(items, k)
}
