use crate::core::branch::BranchNode;
use crate::core::leaf::LeafNode;
use crate::core::order::Order;
use crate::error::Error;
use core::borrow::Borrow;
use std::fmt;

/// What happened when an item was added to a node.
#[derive(Debug)]
pub enum Insertion<T> {
    /// An equal item is already stored. The node is untouched.
    Duplicate,
    /// The item was stored and the node still fits its order.
    Fitted,
    /// The item was stored and the node split. Carries the new right sibling,
    /// which the caller must link in right after the node that split.
    Split(Node<T>),
}

/// The piece a node gives up when its sibling borrows from it: a single key
/// between leaves, a whole child subtree between branches.
#[derive(Debug)]
pub enum Torn<T> {
    Key(T),
    Child(Node<T>),
}

/// A node of the tree. Only two variants ever exist, so every operation is a
/// plain match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<T> {
    Leaf(LeafNode<T>),
    Branch(BranchNode<T>),
}

#[inline]
pub(crate) fn search<Q, T>(haystack: &[T], needle: &Q) -> Result<usize, usize>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    haystack.binary_search_by(|probe| probe.borrow().cmp(needle))
}

impl<T> Node<T> {
    /// Smallest item stored under this node, `None` for an empty leaf.
    pub fn min(&self) -> Option<&T> {
        match self {
            Node::Leaf(leaf) => leaf.min(),
            Node::Branch(branch) => branch.min(),
        }
    }
    pub fn max(&self) -> Option<&T> {
        match self {
            Node::Leaf(leaf) => leaf.max(),
            Node::Branch(branch) => branch.max(),
        }
    }
    /// Number of items stored under this node.
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.len(),
            Node::Branch(branch) => branch.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Occupied slots: keys for a leaf, separators (children minus one) for a branch.
    pub fn occupancy(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.occupancy(),
            Node::Branch(branch) => branch.occupancy(),
        }
    }
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
    /// Absorbs the whole of `other`, which must be the right-hand sibling.
    pub(crate) fn append(&mut self, other: Node<T>) {
        match (self, other) {
            (Node::Leaf(this), Node::Leaf(other)) => this.append(other),
            (Node::Branch(this), Node::Branch(other)) => this.append(other),
            _ => unreachable!("siblings always share a height"),
        }
    }
    /// Absorbs the whole of `other`, which must be the left-hand sibling.
    pub(crate) fn prepend(&mut self, other: Node<T>) {
        match (self, other) {
            (Node::Leaf(this), Node::Leaf(other)) => this.prepend(other),
            (Node::Branch(this), Node::Branch(other)) => this.prepend(other),
            _ => unreachable!("siblings always share a height"),
        }
    }
    pub(crate) fn tear_off_leftmost(&mut self) -> Option<Torn<T>> {
        match self {
            Node::Leaf(leaf) => leaf.tear_off_leftmost().map(Torn::Key),
            Node::Branch(branch) => branch.tear_off_leftmost().map(Torn::Child),
        }
    }
    pub(crate) fn tear_off_rightmost(&mut self) -> Option<Torn<T>> {
        match self {
            Node::Leaf(leaf) => leaf.tear_off_rightmost().map(Torn::Key),
            Node::Branch(branch) => branch.tear_off_rightmost().map(Torn::Child),
        }
    }
    /// Puts a piece torn off the left sibling in front of everything here.
    pub(crate) fn graft_front(&mut self, torn: Torn<T>) {
        match (self, torn) {
            (Node::Leaf(leaf), Torn::Key(key)) => leaf.graft_front(key),
            (Node::Branch(branch), Torn::Child(child)) => branch.graft_front(child),
            _ => unreachable!("siblings always share a height"),
        }
    }
    /// Puts a piece torn off the right sibling after everything here.
    pub(crate) fn graft_back(&mut self, torn: Torn<T>) {
        match (self, torn) {
            (Node::Leaf(leaf), Torn::Key(key)) => leaf.graft_back(key),
            (Node::Branch(branch), Torn::Child(child)) => branch.graft_back(child),
            _ => unreachable!("siblings always share a height"),
        }
    }
}

impl<T: Ord> Node<T> {
    pub(crate) fn add(&mut self, item: T, order: Order) -> Insertion<T> {
        match self {
            Node::Leaf(leaf) => leaf.add(item, order),
            Node::Branch(branch) => branch.add(item, order),
        }
    }
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self {
            Node::Leaf(leaf) => leaf.contains(item),
            Node::Branch(branch) => branch.contains(item),
        }
    }
    /// Removes `item` and hands it back. Underflow of this node is left for the
    /// parent to repair.
    pub(crate) fn remove<Q>(&mut self, item: &Q, order: Order) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self {
            Node::Leaf(leaf) => leaf.remove(item),
            Node::Branch(branch) => branch.remove(item, order),
        }
    }
    /// Checks the structural invariants of the subtree rooted here.
    pub fn verify(&self, is_root: bool, order: Order) -> Result<(), Error> {
        match self {
            Node::Leaf(leaf) => leaf.verify(is_root, order),
            Node::Branch(branch) => branch.verify(is_root, order),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => write!(f, "{leaf}"),
            Node::Branch(branch) => write!(f, "{branch}"),
        }
    }
}

/// Fill checks shared by both node kinds.
pub(crate) fn verify_fill(
    kind: &str,
    occupancy: usize,
    is_root: bool,
    order: Order,
) -> Result<(), Error> {
    if !is_root && occupancy < order.min_occupancy() {
        return Err(Error::Corrupted(format!(
            "{kind} occupancy {occupancy} is below the minimum of {}",
            order.min_occupancy()
        )));
    }
    if occupancy >= order.get() {
        return Err(Error::Corrupted(format!(
            "{kind} occupancy {occupancy} reaches order {}",
            order.get()
        )));
    }

    Ok(())
}
