mod hierarchy;
mod record;

pub use hierarchy::{Hierarchy, HierarchyNode, Link, NodeId};
pub use record::{Dataset, DatasetError, Record, scalar_key};
