pub mod bst;
pub mod bst_traits;
mod deletion;
pub mod iter;
mod node;
mod op_stats;

use self::{bst::Bst, bst_traits::KeyComparator};
use std::{cmp::Ordering, fmt::Debug, marker::PhantomData};

#[derive(Clone, Debug)]
pub struct DefaultKeyComparator<T> {
    _t: PhantomData<T>,
}

impl<T> KeyComparator<T> for DefaultKeyComparator<T>
where
    T: Ord + Clone + Debug,
{
    fn new() -> Self {
        Self { _t: PhantomData }
    }

    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

pub type DefaultBst<K, V> = Bst<K, V, DefaultKeyComparator<K>>;

#[cfg(test)]
#[test]
fn test_default_comparator_is_natural_order() {
    let cmp = DefaultKeyComparator::<i32>::new();
    assert_eq!(cmp.compare(&1, &2), Ordering::Less);
    assert_eq!(cmp.compare(&2, &2), Ordering::Equal);
    assert_eq!(cmp.compare(&3, &2), Ordering::Greater);
}
