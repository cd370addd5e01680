//! Domain layer: entities and hierarchy logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod index;
pub mod mapping;
pub mod normalize;

pub use arena::{ArenaNode, NodeData, TreeArena};
pub use builder::{build_work_paths, HierarchyBuilder, TreeResult};
pub use entities::*;
pub use error::DomainError;
pub use index::{resolve_roots, root_items, ChildIndex};
pub use mapping::{TrackerMapping, TrackerRecord};
pub use normalize::{max_depth, normalize, pad_tree, placeholder_id};
