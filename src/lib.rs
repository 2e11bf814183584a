//! An ordered key-value index backed by an unbalanced binary search tree,
//! instrumented to report the key comparisons and wall-clock duration of
//! every operation. The per-call readouts make the tree double as a
//! microbenchmark harness for comparing search-structure efficiency.

pub mod bst_base;
pub mod bst_map;
