pub mod branch;
pub mod constants;
pub mod cursor;
pub mod leaf;
pub mod node;
pub mod order;

pub use branch::BranchNode;
pub use cursor::Cursor;
pub use leaf::LeafNode;
pub use node::{Insertion, Node, Torn};
pub use order::Order;
