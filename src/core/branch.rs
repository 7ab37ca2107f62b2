use crate::core::node::{verify_fill, Insertion, Node};
use crate::core::order::Order;
use crate::error::Error;
use core::borrow::Borrow;
use std::fmt;
use tracing::trace;

/// A run of child subtrees ordered by their minimum.
///
/// Separator keys are never stored: the separator in front of child `i` (for
/// `i > 0`) is read from that child's current minimum, so borrowing and merging
/// below cannot leave a stale copy behind. `count` caches the number of items
/// under this node and is recomputed after every local mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNode<T> {
    children: Vec<Node<T>>,
    count: usize,
}

impl<T> BranchNode<T> {
    /// `children` must be non-empty, share a height and be ordered.
    pub(crate) fn from_children(order: Order, children: Vec<Node<T>>) -> Self {
        debug_assert!(!children.is_empty());
        let mut inner = Vec::with_capacity(order.get() + 2);
        inner.extend(children);

        let mut branch = Self {
            children: inner,
            count: 0,
        };
        branch.recount();

        branch
    }
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }
    /// Minimums of every child but the first.
    pub fn separators(&self) -> Vec<&T> {
        self.children[1..].iter().filter_map(Node::min).collect()
    }
    pub fn len(&self) -> usize {
        self.count
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    pub fn occupancy(&self) -> usize {
        self.children.len() - 1
    }
    pub fn min(&self) -> Option<&T> {
        self.children.first().and_then(Node::min)
    }
    pub fn max(&self) -> Option<&T> {
        self.children.last().and_then(Node::max)
    }
    fn recount(&mut self) {
        self.count = self.children.iter().map(Node::len).sum();
    }
    pub(crate) fn append(&mut self, mut other: BranchNode<T>) {
        self.children.append(&mut other.children);
        self.recount();
    }
    pub(crate) fn prepend(&mut self, mut other: BranchNode<T>) {
        other.children.append(&mut self.children);
        self.children.append(&mut other.children);
        self.recount();
    }
    pub(crate) fn tear_off_leftmost(&mut self) -> Option<Node<T>> {
        if self.occupancy() == 0 {
            return None;
        }

        let child = self.children.remove(0);
        self.recount();

        Some(child)
    }
    pub(crate) fn tear_off_rightmost(&mut self) -> Option<Node<T>> {
        if self.occupancy() == 0 {
            return None;
        }

        let child = self.children.pop();
        self.recount();

        child
    }
    pub(crate) fn graft_front(&mut self, child: Node<T>) {
        self.children.insert(0, child);
        self.recount();
    }
    pub(crate) fn graft_back(&mut self, child: Node<T>) {
        self.children.push(child);
        self.recount();
    }
    /// Detaches the child of a branch that has no separators left.
    pub(crate) fn pop_only_child(&mut self) -> Option<Node<T>> {
        if self.occupancy() != 0 {
            return None;
        }

        self.count = 0;
        self.children.pop()
    }
    /// Moves the upper `minc` children into a new right sibling.
    fn split(&mut self, order: Order) -> BranchNode<T> {
        let keep = self.children.len() - order.min_children();
        let moved: Vec<Node<T>> = self.children.drain(keep..).collect();
        self.recount();
        trace!(kept = keep, moved = moved.len(), "branch split");

        BranchNode::from_children(order, moved)
    }
}

impl<T: Ord> BranchNode<T> {
    /// Index of the child whose key range holds `item`.
    fn locate<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.children[1..].partition_point(|child| match child.min() {
            Some(min) => min.borrow() <= item,
            None => false,
        })
    }
    pub(crate) fn add(&mut self, item: T, order: Order) -> Insertion<T> {
        let index = self.locate(&item);
        match self.children[index].add(item, order) {
            Insertion::Duplicate => return Insertion::Duplicate,
            Insertion::Fitted => {
                self.count += 1;
                return Insertion::Fitted;
            }
            Insertion::Split(sibling) => self.children.insert(index + 1, sibling),
        }

        if self.occupancy() < order.get() {
            self.recount();
            return Insertion::Fitted;
        }

        Insertion::Split(Node::Branch(self.split(order)))
    }
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.children[self.locate(item)].contains(item)
    }
    pub(crate) fn remove<Q>(&mut self, item: &Q, order: Order) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.locate(item);
        let removed = self.children[index].remove(item, order)?;
        self.rebalance(index, order);
        self.recount();

        Some(removed)
    }
    /// Restores the fill of `children[index]` after a removal below it.
    ///
    /// Tries, in order: borrowing from the left sibling, borrowing from the right
    /// sibling, merging into the left sibling, merging into the right sibling.
    fn rebalance(&mut self, index: usize, order: Order) {
        let floor = order.min_occupancy();
        if self.children[index].occupancy() >= floor {
            // Only reachable with a zero floor (order 2): a child that ran dry
            // would leave a gap without a separator.
            if self.children[index].is_empty() && self.children.len() > 1 {
                self.children.remove(index);
                trace!(index, "dropped empty child");
            }
            return;
        }

        let last = self.children.len() - 1;
        if index > 0 && self.children[index - 1].occupancy() > floor {
            let (left, rest) = self.children.split_at_mut(index);
            if let Some(torn) = left[index - 1].tear_off_rightmost() {
                rest[0].graft_front(torn);
            }
            trace!(index, "borrowed from left sibling");
        } else if index < last && self.children[index + 1].occupancy() > floor {
            let (rest, right) = self.children.split_at_mut(index + 1);
            if let Some(torn) = right[0].tear_off_leftmost() {
                rest[index].graft_back(torn);
            }
            trace!(index, "borrowed from right sibling");
        } else if index > 0 {
            let child = self.children.remove(index);
            self.children[index - 1].append(child);
            trace!(index, "merged into left sibling");
        } else if index < last {
            let child = self.children.remove(index);
            self.children[index].prepend(child);
            trace!(index, "merged into right sibling");
        }
    }
    pub fn verify(&self, is_root: bool, order: Order) -> Result<(), Error> {
        verify_fill("branch", self.occupancy(), is_root, order)?;

        let is_leaf = self.children[0].is_leaf();
        if self.children.iter().any(|child| child.is_leaf() != is_leaf) {
            return Err(Error::Corrupted(
                "branch mixes leaf and branch children".to_string(),
            ));
        }

        for (i, pair) in self.children.windows(2).enumerate() {
            let (Some(max), Some(min)) = (pair[0].max(), pair[1].min()) else {
                return Err(Error::Corrupted(format!(
                    "empty child next to separator {i}"
                )));
            };
            if max >= min {
                return Err(Error::Corrupted(format!(
                    "children around separator {i} overlap"
                )));
            }
        }

        let sum: usize = self.children.iter().map(Node::len).sum();
        if sum != self.count {
            return Err(Error::Corrupted(format!(
                "branch caches count {} but holds {sum}",
                self.count
            )));
        }

        self.children
            .iter()
            .try_for_each(|child| child.verify(false, order))
    }
}

impl<T: fmt::Display> fmt::Display for BranchNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}
