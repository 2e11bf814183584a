/// A single tree node owning its key, its value and both child subtrees.
///
/// There is no parent pointer: every node is reachable from exactly one
/// `left`/`right` slot (or from the tree root), so ownership forms a strict
/// hierarchy and no cycles can be built.
#[derive(Clone, Debug)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub left: Option<Box<Node<K, V>>>,
    pub right: Option<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}
