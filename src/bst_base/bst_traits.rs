use std::cmp::Ordering;
use std::fmt::Debug;

// Traits bound
pub trait KeyComparator<K>: Clone + Debug {
    fn new() -> Self;
    /// Three-way comparison defining the total order the tree is built under.
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}
