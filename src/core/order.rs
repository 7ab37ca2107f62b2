use crate::core::constants::{DEFAULT_ORDER, MIN_ORDER};
use crate::error::{Error, Result};

/// The fan-out of a tree.
///
/// `get()` is the number of keys a leaf (or children a branch) may reach before it
/// must split. `min_children()` is `ceil(order / 2)`: the least number of children a
/// non-root branch keeps, and one more than the least number of keys a non-root leaf
/// keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order {
    order: usize,
    minc: usize,
}

impl Order {
    /// Validates `order` and derives the minimum fill.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplusset::core::Order;
    ///
    /// let order = Order::new(5).unwrap();
    /// assert_eq!(order.min_children(), 3);
    /// assert!(Order::new(1).is_err());
    /// ```
    pub fn new(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder { order });
        }

        Ok(Self {
            order,
            minc: order.div_ceil(2),
        })
    }
    pub fn get(&self) -> usize {
        self.order
    }
    pub fn min_children(&self) -> usize {
        self.minc
    }
    /// Least number of occupied slots a non-root node must carry.
    pub fn min_occupancy(&self) -> usize {
        self.minc - 1
    }
    /// Number of keys (or children) a node keeps for itself when it splits.
    pub(crate) fn split_point(&self) -> usize {
        self.order - self.minc
    }
}

impl Default for Order {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            minc: DEFAULT_ORDER.div_ceil(2),
        }
    }
}
