use std::cmp::Ordering;
use std::fmt::{self, Debug, Write as _};
use std::mem;

use super::{
    bst_traits::KeyComparator,
    deletion::{Removal, RemovalFlags},
    iter::InOrderIter,
    node::Node,
    op_stats::OpStats,
};

/// Error returned by [`Bst::search`] and [`Bst::remove`] when no node in the
/// tree matches the requested key. Carries no partial mutation: a failed
/// removal leaves the tree exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key not found in tree")
    }
}

impl std::error::Error for NotFound {}

/// An unbalanced binary search tree ordered by an injected comparator,
/// instrumented to report the key comparisons and wall-clock duration of the
/// most recently completed operation.
///
/// The tree performs no rebalancing: its height, and therefore the recursion
/// depth of every operation, is O(N) under adversarial insertion order (e.g.
/// strictly ascending keys degrade it into a linked list). That bound is a
/// documented property of the structure, not a handled condition.
///
/// Not safe for concurrent use; callers sharing a tree across threads must
/// serialize all access externally.
pub struct Bst<K, V, C> {
    root: Option<Box<Node<K, V>>>,
    size: usize,
    stats: OpStats,
    comparator: C,
}

impl<K, V, C> Bst<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// An empty tree under the comparator type's default construction.
    pub fn new() -> Self {
        Self::with_comparator(C::new())
    }

    /// An empty tree ordered by an explicitly supplied comparator.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            size: 0,
            stats: OpStats::new(),
            comparator,
        }
    }
}

/// Access functions to the element count and the per-call readouts
impl<K, V, C> Bst<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// The running element count. Note that [`Bst::insert`] advances this
    /// count on every call, including overwrites of an existing key.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn key_comp(&self) -> &C {
        &self.comparator
    }

    /// Key comparisons performed by the most recently completed call.
    /// Replaced, not accumulated, on every operation.
    pub fn last_comparisons(&self) -> u64 {
        self.stats.comparisons()
    }

    /// Wall-clock duration of the most recently completed call, in
    /// milliseconds.
    pub fn last_elapsed_millis(&self) -> f64 {
        self.stats.elapsed_millis()
    }
}

/// Query by recursive descent from the root
impl<K, V, C> Bst<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Locate the value stored under `key`.
    ///
    /// Each probe along the descent counts as one comparison, including the
    /// terminating probe of an absent subtree on a miss.
    pub fn search(&self, key: &K) -> Result<&V, NotFound> {
        self.stats.begin();
        let result = Self::search_node(self.root.as_deref(), key, &self.comparator, &self.stats);
        self.stats.end();
        result
    }

    fn search_node<'a>(
        node: Option<&'a Node<K, V>>,
        key: &K,
        comparator: &C,
        stats: &OpStats,
    ) -> Result<&'a V, NotFound> {
        stats.bump();
        let Some(n) = node else {
            return Err(NotFound);
        };

        match comparator.compare(key, &n.key) {
            Ordering::Equal => Ok(&n.value),
            Ordering::Less => Self::search_node(n.left.as_deref(), key, comparator, stats),
            Ordering::Greater => Self::search_node(n.right.as_deref(), key, comparator, stats),
        }
    }
}

/// Insertion
impl<K, V, C> Bst<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Insert `value` under `key` and return the updated element count.
    ///
    /// An equal key overwrites the stored value in place instead of creating
    /// a second node. The returned count nevertheless grows once per call,
    /// overwrite or not; see DESIGN.md for the status of that policy. One
    /// comparison is counted per existing node visited on the descent.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        self.stats.begin();
        let root = self.root.take();
        self.root = Some(Self::insert_node(
            root,
            key,
            value,
            &self.comparator,
            &self.stats,
        ));
        self.size += 1;
        self.stats.end();
        self.size
    }

    /// Descend to the slot for `key`, returning the possibly-new subtree
    /// root so the caller can re-link it into the parent.
    fn insert_node(
        node: Option<Box<Node<K, V>>>,
        key: K,
        value: V,
        comparator: &C,
        stats: &OpStats,
    ) -> Box<Node<K, V>> {
        let Some(mut n) = node else {
            return Node::new(key, value);
        };

        stats.bump();
        match comparator.compare(&key, &n.key) {
            Ordering::Less => {
                n.left = Some(Self::insert_node(n.left.take(), key, value, comparator, stats));
            }
            Ordering::Greater => {
                n.right = Some(Self::insert_node(
                    n.right.take(),
                    key,
                    value,
                    comparator,
                    stats,
                ));
            }
            Ordering::Equal => {
                log::debug!("Bst::insert_node overwriting value under key {:?}", n.key);
                n.value = value;
            }
        }

        n
    }
}

/// Removal
impl<K, V, C> Bst<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Remove the node stored under `key` and return its value.
    ///
    /// One comparison is counted per node visited on the descent, plus one
    /// per left step taken while locating the in-order successor in the
    /// two-child case.
    pub fn remove(&mut self, key: &K) -> Result<V, NotFound> {
        log::debug!("Bst::remove({:?}) on tree of size {}", key, self.size);
        self.stats.begin();
        let root = self.root.take();
        let (root, removal) = Self::remove_node(root, key, &self.comparator, &self.stats);
        self.root = root;
        self.stats.end();

        if removal.has(RemovalFlags::NotFound) {
            return Err(NotFound);
        }
        let value = removal.value.ok_or(NotFound)?;
        self.size -= 1;
        Ok(value)
    }

    fn remove_node(
        node: Option<Box<Node<K, V>>>,
        key: &K,
        comparator: &C,
        stats: &OpStats,
    ) -> (Option<Box<Node<K, V>>>, Removal<V>) {
        let Some(mut n) = node else {
            log::debug!("Could not find key {:?} to remove.", key);
            return (None, Removal::new(RemovalFlags::NotFound));
        };

        stats.bump();
        match comparator.compare(key, &n.key) {
            Ordering::Less => {
                let (left, removal) = Self::remove_node(n.left.take(), key, comparator, stats);
                n.left = left;
                (Some(n), removal)
            }
            Ordering::Greater => {
                let (right, removal) = Self::remove_node(n.right.take(), key, comparator, stats);
                n.right = right;
                (Some(n), removal)
            }
            Ordering::Equal => Self::remove_found(n, comparator, stats),
        }
    }

    /// Unlink the located node. Zero or one child splices the remaining
    /// subtree into the parent slot. Two children promote the in-order
    /// successor's entry into this node, then remove the successor from the
    /// right subtree in a nested pass that cannot miss.
    fn remove_found(
        mut n: Box<Node<K, V>>,
        comparator: &C,
        stats: &OpStats,
    ) -> (Option<Box<Node<K, V>>>, Removal<V>) {
        if n.left.is_none() {
            let node = *n;
            return (node.right, Removal::with_value(RemovalFlags::Ok, node.value));
        }
        let Some(right) = n.right.as_deref() else {
            let node = *n;
            return (node.left, Removal::with_value(RemovalFlags::Ok, node.value));
        };

        let (succ_key, succ_value) = {
            let (k, v) = Self::min_entry(right, stats);
            (k.clone(), v.clone())
        };
        log::debug!(
            "Bst::remove_found promoting successor {:?} into removed slot",
            succ_key
        );

        n.key = succ_key.clone();
        let removed = mem::replace(&mut n.value, succ_value);
        let (new_right, _successor) = Self::remove_node(n.right.take(), &succ_key, comparator, stats);
        n.right = new_right;

        (
            Some(n),
            Removal::with_value(RemovalFlags::Ok | RemovalFlags::PromotedSuccessor, removed),
        )
    }

    /// Leftmost entry of the subtree rooted at `node`. Counts one comparison
    /// per left step taken; zero steps when `node` has no left child.
    fn min_entry<'a>(mut node: &'a Node<K, V>, stats: &OpStats) -> (&'a K, &'a V) {
        while let Some(left) = node.left.as_deref() {
            stats.bump();
            node = left;
        }
        (&node.key, &node.value)
    }
}

/// Rebuild under a derived key
impl<K, V, C> Bst<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Build a new tree holding every value of `source`, re-indexed under the
    /// key `key_of` derives from each value and ordered by this tree's own
    /// comparator.
    ///
    /// The source is consumed and its values moved, visited in order so each
    /// one is taken exactly once. Insertion order only shapes the new tree's
    /// depth, never its contents.
    pub fn rekey_from<K2, C2, F>(source: Bst<K2, V, C2>, key_of: F) -> Self
    where
        F: Fn(&V) -> K,
    {
        let mut tree = Self::new();
        Self::rekey_subtree(source.root, &key_of, &mut tree);
        log::debug!("Bst::rekey_from re-indexed {} entries", tree.size);
        tree
    }

    fn rekey_subtree<K2, F>(node: Option<Box<Node<K2, V>>>, key_of: &F, dest: &mut Self)
    where
        F: Fn(&V) -> K,
    {
        if let Some(n) = node {
            let n = *n;
            Self::rekey_subtree(n.left, key_of, dest);
            let key = key_of(&n.value);
            dest.insert(key, n.value);
            Self::rekey_subtree(n.right, key_of, dest);
        }
    }
}

/// In-order traversal
impl<K, V, C> Bst<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Lazy ascending iteration over every `(key, value)` entry.
    pub fn iter(&self) -> InOrderIter<'_, K, V> {
        InOrderIter::new(self.root.as_deref())
    }

    /// Newline-joined rendering of every entry in ascending key order. A
    /// display and debugging aid, not a persistence format.
    pub fn traverse_in_order(&self) -> String {
        let mut out = String::new();
        Self::render_subtree(self.root.as_deref(), &mut out);
        out
    }

    fn render_subtree(node: Option<&Node<K, V>>, out: &mut String) {
        if let Some(n) = node {
            Self::render_subtree(n.left.as_deref(), out);
            let _ = writeln!(out, "{:?} => {:?}", n.key, n.value);
            Self::render_subtree(n.right.as_deref(), out);
        }
    }
}

/// Debug
impl<K: Debug, V: Debug, C> Bst<K, V, C> {
    fn print_node(f: &mut fmt::Formatter<'_>, node: &Node<K, V>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        writeln!(f, "node {:?} => {:?}", node.key, node.value)?;

        if let Some(left) = node.left.as_deref() {
            Self::print_node(f, left, depth + 1)?;
        }
        if let Some(right) = node.right.as_deref() {
            Self::print_node(f, right, depth + 1)?;
        }

        Ok(())
    }
}

impl<K: Debug, V: Debug, C> fmt::Debug for Bst<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = self.root.as_deref() {
            Self::print_node(f, root, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{Bst, NotFound};
    use crate::bst_base::{bst_traits::KeyComparator, DefaultBst};

    fn sample_tree() -> DefaultBst<i32, &'static str> {
        let mut tree = DefaultBst::new();
        tree.insert(5, "e");
        tree.insert(3, "c");
        tree.insert(8, "h");
        tree.insert(1, "a");
        tree
    }

    #[test]
    fn in_order_iteration_is_ascending() {
        let tree = sample_tree();
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 3, 5, 8]);
        let values: Vec<&str> = tree.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["a", "c", "e", "h"]);
    }

    #[test]
    fn traverse_renders_one_line_per_entry() {
        let tree = sample_tree();
        assert_eq!(
            tree.traverse_in_order(),
            "1 => \"a\"\n3 => \"c\"\n5 => \"e\"\n8 => \"h\"\n"
        );
    }

    #[test]
    fn search_round_trip() {
        let tree = sample_tree();
        assert_eq!(tree.search(&5), Ok(&"e"));
        assert_eq!(tree.search(&1), Ok(&"a"));
        assert_eq!(tree.search(&4), Err(NotFound));
    }

    #[test]
    fn overwrite_keeps_one_node_and_second_value() {
        let mut tree = sample_tree();
        tree.insert(3, "C2");
        assert_eq!(tree.iter().count(), 4);
        assert_eq!(tree.search(&3), Ok(&"C2"));
    }

    #[test]
    fn insert_reports_growth_even_on_overwrite() {
        // The published count advances once per insert call, overwrite
        // included. Structural node count stays at four.
        let mut tree = sample_tree();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.insert(3, "C2"), 5);
        assert_eq!(tree.iter().count(), 4);
    }

    #[test]
    fn remove_leaf() {
        let mut tree = sample_tree();
        assert_eq!(tree.remove(&1), Ok("a"));
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.search(&1), Err(NotFound));
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 5, 8]);
    }

    #[test]
    fn remove_single_child_splices_subtree() {
        let mut tree = sample_tree();
        // 3's only child is 1
        assert_eq!(tree.remove(&3), Ok("c"));
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 5, 8]);
        assert_eq!(tree.search(&1), Ok(&"a"));
    }

    #[test]
    fn remove_two_children_promotes_successor() {
        let mut tree = sample_tree();
        // 5 has children 3 and 8; its successor is 8, which is the right
        // child itself, so the minimum search takes zero left steps.
        assert_eq!(tree.remove(&5), Ok("e"));
        assert_eq!(tree.size(), 3);
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 3, 8]);
        assert_eq!(tree.search(&8), Ok(&"h"));
        // one probe to find 5, zero left steps, one probe in the nested
        // removal of 8
        assert_eq!(tree.last_comparisons(), 2);
    }

    #[test]
    fn remove_two_children_with_deep_successor() {
        let mut tree = DefaultBst::new();
        for (k, v) in [(10, "j"), (4, "d"), (20, "t"), (15, "o"), (12, "l"), (25, "y")] {
            tree.insert(k, v);
        }
        // successor of 10 is 12, two left steps below 20
        assert_eq!(tree.remove(&10), Ok("j"));
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![4, 12, 15, 20, 25]);
        assert_eq!(tree.search(&12), Ok(&"l"));
    }

    #[test]
    fn remove_missing_leaves_tree_untouched() {
        let mut tree = sample_tree();
        assert_eq!(tree.remove(&99), Err(NotFound));
        assert_eq!(tree.size(), 4);
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 3, 5, 8]);
    }

    #[test]
    fn not_found_on_empty() {
        let mut tree = DefaultBst::<i32, &str>::new();
        assert_eq!(tree.search(&7), Err(NotFound));
        assert_eq!(tree.remove(&7), Err(NotFound));
        assert_eq!(tree.size(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn search_counts_every_probe_including_the_miss() {
        let mut tree = DefaultBst::new();
        tree.insert(1, "a");
        tree.insert(2, "b");
        tree.insert(3, "c");

        assert!(tree.search(&3).is_ok());
        assert_eq!(tree.last_comparisons(), 3);

        // the descent 1 -> 2 -> 3 ends in a probe of 3's absent right child
        assert!(tree.search(&4).is_err());
        assert_eq!(tree.last_comparisons(), 4);

        // a miss on the empty tree is a single probe
        let empty = DefaultBst::<i32, &str>::new();
        assert!(empty.search(&1).is_err());
        assert_eq!(empty.last_comparisons(), 1);
    }

    #[test]
    fn insert_counts_visited_nodes_only() {
        let mut tree = DefaultBst::new();
        tree.insert(5, "e");
        assert_eq!(tree.last_comparisons(), 0);
        tree.insert(3, "c");
        assert_eq!(tree.last_comparisons(), 1);
        tree.insert(1, "a");
        assert_eq!(tree.last_comparisons(), 2);
    }

    #[test]
    fn stats_replace_rather_than_accumulate() {
        let mut tree = sample_tree();
        assert!(tree.search(&1).is_ok());
        let first = tree.last_comparisons();
        assert!(tree.search(&5).is_ok());
        assert_eq!(tree.last_comparisons(), 1);
        assert!(first > tree.last_comparisons());
        assert!(tree.last_elapsed_millis() >= 0.0);
    }

    #[test]
    fn order_invariant_survives_interleaved_mutation() {
        let mut tree = DefaultBst::new();
        // deterministic scattered order: multiples of 7 mod 30 hit each
        // residue exactly once
        for i in 0..30 {
            let k = (i * 7) % 30;
            tree.insert(k, k * 10);
        }
        for k in [14, 0, 29, 7, 21] {
            assert_eq!(tree.remove(&k), Ok(k * 10));
        }

        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), 25);

        for k in keys {
            assert_eq!(tree.search(&k), Ok(&(k * 10)));
        }
    }

    #[test]
    fn rekey_preserves_every_value() {
        let mut by_id = DefaultBst::new();
        by_id.insert(3u32, (3u32, "almond"));
        by_id.insert(1, (1, "walnut"));
        by_id.insert(2, (2, "pecan"));

        let by_name: Bst<String, (u32, &str), _> =
            DefaultBst::rekey_from(by_id, |v| v.1.to_string());

        assert_eq!(by_name.size(), 3);
        assert_eq!(by_name.search(&"walnut".to_string()), Ok(&(1, "walnut")));
        assert_eq!(by_name.search(&"pecan".to_string()), Ok(&(2, "pecan")));
        assert_eq!(by_name.search(&"almond".to_string()), Ok(&(3, "almond")));

        let names: Vec<String> = by_name.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(names, vec!["almond", "pecan", "walnut"]);
    }

    #[derive(Clone, Debug)]
    struct ReverseComparator;

    impl KeyComparator<i32> for ReverseComparator {
        fn new() -> Self {
            ReverseComparator
        }

        fn compare(&self, lhs: &i32, rhs: &i32) -> Ordering {
            rhs.cmp(lhs)
        }
    }

    #[test]
    fn injected_comparator_defines_the_order() {
        let mut tree: Bst<i32, &str, ReverseComparator> =
            Bst::with_comparator(ReverseComparator);
        tree.insert(5, "e");
        tree.insert(3, "c");
        tree.insert(8, "h");

        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![8, 5, 3]);
        assert_eq!(tree.search(&3), Ok(&"c"));
        assert_eq!(tree.remove(&8), Ok("h"));
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![5, 3]);
    }
}
