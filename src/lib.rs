pub mod core;
pub mod error;

use crate::core::{BranchNode, Insertion, LeafNode};
pub use crate::core::{Cursor, Node, Order};
pub use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::fmt;
use std::mem::replace;
use tracing::debug;

/// An ordered set based on a B+ tree.
///
/// Every item lives in a leaf; leaves hold sorted runs of at most `order - 1`
/// items, and branches hold at most `order` children, ordered by each child's
/// minimum. Insertion splits full nodes bottom-up and grows the tree at the root;
/// removal repairs underfull nodes by borrowing from or merging with a sibling and
/// shrinks the tree at the root.
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set.
///
/// The tree has no internal locking. Mutating methods take `&mut self`, so sharing a
/// tree across threads requires wrapping it in a lock.
///
/// # Examples
///
/// ```
/// use bplusset::BPlusTree;
///
/// let mut teams = BPlusTree::new(3).unwrap();
///
/// teams.add("Boston Celtics");
/// teams.add("Brooklyn Nets");
/// teams.add("New York Knicks");
/// teams.add("Philadelphia 76ers");
///
/// assert!(teams.contains("Brooklyn Nets"));
/// assert!(!teams.contains("Houston Rockets"));
///
/// teams.remove("New York Knicks");
///
/// for team in &teams {
///     println!("{team}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<T> {
    root: Node<T>,
    order: Order,
}

impl<T: Ord> BPlusTree<T> {
    /// Makes a new, empty tree whose nodes split once they reach `order` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `order` is smaller than 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::{BPlusTree, Error};
    ///
    /// assert!(BPlusTree::<i32>::new(2).is_ok());
    /// assert_eq!(BPlusTree::<i32>::new(1).unwrap_err(), Error::InvalidOrder { order: 1 });
    /// ```
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::with_order(Order::new(order)?))
    }
    /// Makes a new, empty tree from an already validated order.
    pub fn with_order(order: Order) -> Self {
        Self {
            root: Node::Leaf(LeafNode::new(order)),
            order,
        }
    }
    pub fn order(&self) -> usize {
        self.order.get()
    }
    /// Returns the number of elements in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// assert_eq!(tree.len(), 0);
    /// tree.add(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.root.len()
    }
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
    /// Adds a value to the tree.
    ///
    /// Returns whether the value was newly inserted. If an equal value is already
    /// present, `false` is returned and the tree is left as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    ///
    /// assert_eq!(tree.add(2), true);
    /// assert_eq!(tree.add(2), false);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn add(&mut self, item: T) -> bool {
        match self.root.add(item, self.order) {
            Insertion::Duplicate => false,
            Insertion::Fitted => true,
            Insertion::Split(sibling) => {
                let previous = replace(&mut self.root, Node::Leaf(LeafNode::new(self.order)));
                self.root = Node::Branch(BranchNode::from_children(
                    self.order,
                    vec![previous, sibling],
                ));
                debug!(height = self.height(), len = self.len(), "root split");

                true
            }
        }
    }
    /// Returns `true` if the tree contains an element equal to the value.
    ///
    /// The value may be any borrowed form of the tree's element type,
    /// but the ordering on the borrowed form *must* match the
    /// ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([1, 2, 3]);
    /// assert_eq!(tree.contains(&1), true);
    /// assert_eq!(tree.contains(&4), false);
    /// ```
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.contains(item)
    }
    /// If the tree contains an element equal to the value, removes it and returns
    /// `true`. Otherwise returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::from([1, 2, 3]);
    /// assert_eq!(tree.remove(&2), true);
    /// assert_eq!(tree.remove(&2), false);
    /// ```
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(item).is_some()
    }
    /// Removes and returns the element in the tree, if any, that is equal to
    /// the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::from([String::from("a"), String::from("b")]);
    /// assert_eq!(tree.take("a"), Some(String::from("a")));
    /// assert_eq!(tree.take("a"), None);
    /// ```
    pub fn take<Q>(&mut self, item: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.root.remove(item, self.order);
        self.collapse_root();

        removed
    }
    /// Replaces the root while it is a branch left with a single child.
    fn collapse_root(&mut self) {
        loop {
            let child = match &mut self.root {
                Node::Branch(branch) => branch.pop_only_child(),
                Node::Leaf(_) => None,
            };
            let Some(child) = child else {
                return;
            };
            self.root = child;
            debug!(height = self.height(), len = self.len(), "root collapsed");
        }
    }
    /// Clears the tree, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let mut tree = BPlusTree::from([1, 2, 3]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        debug!(len = self.len(), "clearing tree");
        self.root = Node::Leaf(LeafNode::new(self.order));
    }
    /// Returns a reference to the first element in the tree, if any.
    /// This element is always the minimum of all elements in the tree.
    pub fn first(&self) -> Option<&T> {
        self.root.min()
    }
    /// Returns a reference to the last element in the tree, if any.
    /// This element is always the maximum of all elements in the tree.
    pub fn last(&self) -> Option<&T> {
        self.root.max()
    }
    /// Copies elements in ascending order into `destination`, skipping the first
    /// `offset` elements of the tree. Stops when `destination` is full and returns
    /// how many elements were written.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([1, 2, 3, 4, 5]);
    /// let mut buffer = [0; 4];
    /// assert_eq!(tree.copy_to(&mut buffer, 2), 3);
    /// assert_eq!(buffer, [3, 4, 5, 0]);
    /// ```
    pub fn copy_to(&self, destination: &mut [T], mut offset: usize) -> usize
    where
        T: Clone,
    {
        let mut written = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if written == destination.len() {
                break;
            }
            // Whole subtrees inside the offset are skipped by their cached count.
            if node.len() <= offset {
                offset -= node.len();
                continue;
            }
            match node {
                Node::Branch(branch) => stack.extend(branch.children().iter().rev()),
                Node::Leaf(leaf) => {
                    let run = &leaf.keys()[offset..];
                    let n = run.len().min(destination.len() - written);
                    destination[written..written + n].clone_from_slice(&run[..n]);
                    written += n;
                    offset = 0;
                }
            }
        }

        written
    }
    /// Gets an iterator that visits the elements in the tree in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::BPlusTree;
    ///
    /// let tree = BPlusTree::from([3, 1, 2]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Cursor<'_, T> {
        Cursor::new(&self.root)
    }
    /// Checks every structural invariant of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] describing the first violation found.
    pub fn verify(&self) -> Result<()> {
        self.root.verify(true, self.order)
    }
    pub fn root(&self) -> &Node<T> {
        &self.root
    }
    /// Number of levels, counting the leaves.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Node::Branch(branch) = node {
            height += 1;
            node = &branch.children()[0];
        }

        height
    }
    #[cfg(test)]
    pub(crate) fn with_root(order: Order, root: Node<T>) -> Self {
        Self { root, order }
    }
}

impl<T: Ord> Default for BPlusTree<T> {
    /// Makes an empty tree with the default order.
    fn default() -> Self {
        Self::with_order(Order::default())
    }
}

impl<T: Ord> FromIterator<T> for BPlusTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);

        tree
    }
}

impl<T: Ord> Extend<T> for BPlusTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| {
            self.add(item);
        });
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for BPlusTree<T> {
    /// Converts a `[T; N]` into a `BPlusTree<T>` with the default order.
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<'a, T: Ord> IntoIterator for &'a BPlusTree<T> {
    type Item = &'a T;

    type IntoIter = Cursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Display> fmt::Display for BPlusTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
