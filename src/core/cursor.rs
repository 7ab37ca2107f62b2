use crate::core::node::Node;
use std::iter::FusedIterator;

/// A depth-first, left-to-right walk over the items under a node.
///
/// Pending nodes live on an explicit stack: a branch is replaced by its children
/// (pushed in reverse so the leftmost pops first) and a leaf is drained one key
/// at a time. [`Cursor::reset`] rewinds to before the first item.
///
/// # Examples
///
/// ```
/// use bplusset::BPlusTree;
///
/// let tree = BPlusTree::from([3, 1, 2]);
/// let mut cursor = tree.iter();
/// assert_eq!(cursor.next(), Some(&1));
/// cursor.reset();
/// assert_eq!(cursor.collect::<Vec<_>>(), vec![&1, &2, &3]);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a, T> {
    root: &'a Node<T>,
    stack: Vec<&'a Node<T>>,
    position: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub fn new(root: &'a Node<T>) -> Self {
        let mut cursor = Self {
            root,
            stack: Vec::new(),
            position: 0,
        };
        cursor.reset();

        cursor
    }
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(self.root);
        self.position = 0;
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node: &'a Node<T> = self.stack.last().copied()?;
            match node {
                Node::Leaf(leaf) => {
                    if let Some(key) = leaf.keys().get(self.position) {
                        self.position += 1;
                        return Some(key);
                    }
                    self.stack.pop();
                    self.position = 0;
                }
                Node::Branch(branch) => {
                    self.stack.pop();
                    self.stack.extend(branch.children().iter().rev());
                }
            }
        }
    }
}

impl<'a, T> FusedIterator for Cursor<'a, T> {}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::core::branch::BranchNode;
    use crate::core::leaf::LeafNode;
    use crate::core::node::Node;
    use crate::core::order::Order;

    fn leaf(order: Order, keys: &[i32]) -> Node<i32> {
        Node::Leaf(LeafNode::from_keys(order, keys.to_vec()))
    }

    fn branch(order: Order, children: Vec<Node<i32>>) -> Node<i32> {
        Node::Branch(BranchNode::from_children(order, children))
    }

    #[test]
    fn test_walks_in_order() {
        let order = Order::new(3).unwrap();
        let root = branch(
            order,
            vec![
                branch(order, vec![leaf(order, &[1, 2]), leaf(order, &[3])]),
                branch(order, vec![leaf(order, &[11]), leaf(order, &[12, 13])]),
                branch(order, vec![leaf(order, &[21, 22]), leaf(order, &[23, 24])]),
            ],
        );

        let actual: Vec<i32> = Cursor::new(&root).cloned().collect();
        assert_eq!(actual, vec![1, 2, 3, 11, 12, 13, 21, 22, 23, 24]);
    }

    #[test]
    fn test_empty_leaf() {
        let order = Order::new(3).unwrap();
        let root: Node<i32> = Node::Leaf(LeafNode::new(order));

        let mut cursor = Cursor::new(&root);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_reset_restarts_mid_walk() {
        let order = Order::new(3).unwrap();
        let root = branch(order, vec![leaf(order, &[1, 2]), leaf(order, &[3, 4])]);

        let mut cursor = Cursor::new(&root);
        assert_eq!(cursor.next(), Some(&1));
        assert_eq!(cursor.next(), Some(&2));
        assert_eq!(cursor.next(), Some(&3));

        cursor.reset();
        assert_eq!(cursor.by_ref().count(), 4);
        assert_eq!(cursor.next(), None);

        cursor.reset();
        assert_eq!(cursor.next(), Some(&1));
    }

    #[test]
    fn test_independent_cursors() {
        let order = Order::new(3).unwrap();
        let root = branch(order, vec![leaf(order, &[1, 2]), leaf(order, &[3])]);

        let mut first = Cursor::new(&root);
        let mut second = Cursor::new(&root);
        assert_eq!(first.next(), Some(&1));
        assert_eq!(first.next(), Some(&2));
        assert_eq!(second.next(), Some(&1));
        assert_eq!(first.next(), Some(&3));
        assert_eq!(second.next(), Some(&2));
    }
}
