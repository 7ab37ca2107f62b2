use crate::core::node::{search, verify_fill, Insertion, Node};
use crate::core::order::Order;
use crate::error::Error;
use core::borrow::Borrow;
use std::fmt;
use tracing::trace;

/// A sorted run of unique keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode<T> {
    keys: Vec<T>,
}

impl<T> LeafNode<T> {
    /// Makes an empty leaf with room to overflow by one key before splitting.
    pub(crate) fn new(order: Order) -> Self {
        Self {
            keys: Vec::with_capacity(order.get() + 1),
        }
    }
    /// Wraps `keys`, which must already be sorted and unique.
    pub(crate) fn from_keys(order: Order, keys: Vec<T>) -> Self {
        let mut leaf = Self::new(order);
        leaf.keys.extend(keys);

        leaf
    }
    pub fn keys(&self) -> &[T] {
        &self.keys
    }
    pub fn len(&self) -> usize {
        self.keys.len()
    }
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
    pub fn occupancy(&self) -> usize {
        self.keys.len()
    }
    pub fn min(&self) -> Option<&T> {
        self.keys.first()
    }
    pub fn max(&self) -> Option<&T> {
        self.keys.last()
    }
    pub(crate) fn append(&mut self, mut other: LeafNode<T>) {
        self.keys.append(&mut other.keys);
    }
    pub(crate) fn prepend(&mut self, mut other: LeafNode<T>) {
        other.keys.append(&mut self.keys);
        self.keys.append(&mut other.keys);
    }
    pub(crate) fn tear_off_leftmost(&mut self) -> Option<T> {
        if self.keys.is_empty() {
            return None;
        }

        Some(self.keys.remove(0))
    }
    pub(crate) fn tear_off_rightmost(&mut self) -> Option<T> {
        self.keys.pop()
    }
    /// `key` must be smaller than every key held here.
    pub(crate) fn graft_front(&mut self, key: T) {
        self.keys.insert(0, key);
    }
    /// `key` must be greater than every key held here.
    pub(crate) fn graft_back(&mut self, key: T) {
        self.keys.push(key);
    }
}

impl<T: Ord> LeafNode<T> {
    pub(crate) fn add(&mut self, item: T, order: Order) -> Insertion<T> {
        match search(&self.keys, &item) {
            Ok(_) => return Insertion::Duplicate,
            Err(idx) => self.keys.insert(idx, item),
        }

        if self.keys.len() < order.get() {
            return Insertion::Fitted;
        }

        let mut right = LeafNode::new(order);
        right.keys.extend(self.keys.drain(order.split_point()..));
        trace!(kept = self.keys.len(), moved = right.keys.len(), "leaf split");

        Insertion::Split(Node::Leaf(right))
    }
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        search(&self.keys, item).is_ok()
    }
    pub(crate) fn remove<Q>(&mut self, item: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match search(&self.keys, item) {
            Ok(idx) => Some(self.keys.remove(idx)),
            Err(_) => None,
        }
    }
    pub fn verify(&self, is_root: bool, order: Order) -> Result<(), Error> {
        verify_fill("leaf", self.occupancy(), is_root, order)?;
        if let Some(slot) = self.keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(Error::Corrupted(format!(
                "leaf keys not strictly ascending at slot {slot}"
            )));
        }

        Ok(())
    }
}

impl<T: fmt::Display> fmt::Display for LeafNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("L(")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::LeafNode;
    use crate::core::node::{Insertion, Node};
    use crate::core::order::Order;

    fn split_off(insertion: Insertion<i32>) -> LeafNode<i32> {
        match insertion {
            Insertion::Split(Node::Leaf(leaf)) => leaf,
            other => panic!("expected a leaf split, got {other:?}"),
        }
    }

    #[test]
    fn test_from_keys() {
        let order = Order::new(5).unwrap();
        let leaf = LeafNode::from_keys(order, vec![1, 2]);

        assert_eq!(leaf.keys(), &[1, 2]);
        assert_eq!(leaf.occupancy(), 2);
        assert!(leaf.keys.capacity() > order.get());
    }

    #[test]
    fn test_add_to_leaf_of_odd_order() {
        let order = Order::new(3).unwrap();
        let mut left = LeafNode::new(order);

        assert!(matches!(left.add(3, order), Insertion::Fitted));
        assert_eq!(left.keys(), &[3]);
        assert!(matches!(left.add(1, order), Insertion::Fitted));
        assert_eq!(left.keys(), &[1, 3]);

        let right = split_off(left.add(4, order));
        assert_eq!(left.keys(), &[1]);
        assert_eq!(right.keys(), &[3, 4]);

        assert!(matches!(left.add(2, order), Insertion::Fitted));
        assert_eq!(left.keys(), &[1, 2]);
        assert_eq!(right.keys(), &[3, 4]);
    }

    #[test]
    fn test_add_to_leaf_of_even_order() {
        let order = Order::new(4).unwrap();
        let mut first = LeafNode::new(order);

        assert!(matches!(first.add(6, order), Insertion::Fitted));
        assert!(matches!(first.add(1, order), Insertion::Fitted));
        assert!(matches!(first.add(5, order), Insertion::Fitted));
        assert_eq!(first.keys(), &[1, 5, 6]);

        let third = split_off(first.add(2, order));
        assert_eq!(first.keys(), &[1, 2]);
        assert_eq!(third.keys(), &[5, 6]);

        assert!(matches!(first.add(3, order), Insertion::Fitted));
        assert_eq!(first.keys(), &[1, 2, 3]);

        let second = split_off(first.add(4, order));
        assert_eq!(first.keys(), &[1, 2]);
        assert_eq!(second.keys(), &[3, 4]);
        assert_eq!(third.keys(), &[5, 6]);
    }

    #[test]
    fn test_add_duplicate_is_a_noop() {
        let order = Order::new(3).unwrap();
        let mut leaf = LeafNode::from_keys(order, vec![1, 2]);

        assert!(matches!(leaf.add(2, order), Insertion::Duplicate));
        assert_eq!(leaf.keys(), &[1, 2]);
    }

    #[test]
    fn test_remove_from_leaf() {
        let order = Order::new(3).unwrap();
        let mut leaf = LeafNode::from_keys(order, vec![1, 2, 3]);

        assert_eq!(leaf.remove(&0), None);
        assert_eq!(leaf.keys(), &[1, 2, 3]);

        assert_eq!(leaf.remove(&2), Some(2));
        assert_eq!(leaf.keys(), &[1, 3]);

        assert_eq!(leaf.remove(&1), Some(1));
        assert_eq!(leaf.keys(), &[3]);

        assert_eq!(leaf.remove(&3), Some(3));
        assert!(leaf.is_empty());
    }

    #[test]
    fn test_append_and_prepend() {
        let order = Order::new(8).unwrap();
        let mut middle = LeafNode::from_keys(order, vec![4, 5]);

        middle.append(LeafNode::from_keys(order, vec![6, 7]));
        middle.prepend(LeafNode::from_keys(order, vec![1, 2, 3]));

        assert_eq!(middle.keys(), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_tear_off() {
        let order = Order::new(4).unwrap();
        let mut leaf = LeafNode::from_keys(order, vec![1, 2, 3]);

        assert_eq!(leaf.tear_off_leftmost(), Some(1));
        assert_eq!(leaf.tear_off_rightmost(), Some(3));
        assert_eq!(leaf.tear_off_rightmost(), Some(2));
        assert_eq!(leaf.tear_off_leftmost(), None);
        assert_eq!(leaf.tear_off_rightmost(), None);
    }

    #[test]
    fn test_verify() {
        let order = Order::new(5).unwrap();

        assert!(LeafNode::from_keys(order, vec![1, 2]).verify(false, order).is_ok());
        assert!(LeafNode::from_keys(order, vec![1]).verify(false, order).is_err());
        assert!(LeafNode::from_keys(order, vec![1]).verify(true, order).is_ok());
        assert!(LeafNode::<i32>::new(order).verify(true, order).is_ok());
        assert!(LeafNode::from_keys(order, vec![1, 2, 3, 4, 5])
            .verify(true, order)
            .is_err());
        assert!(LeafNode::from_keys(order, vec![2, 1]).verify(true, order).is_err());
        assert!(LeafNode::from_keys(order, vec![1, 1]).verify(true, order).is_err());
    }

    #[test]
    fn test_display() {
        let order = Order::new(4).unwrap();
        assert_eq!(LeafNode::from_keys(order, vec![1, 2, 3]).to_string(), "L(1 2 3)");
        assert_eq!(LeafNode::<i32>::new(order).to_string(), "L()");
    }
}
