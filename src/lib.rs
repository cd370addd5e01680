//! workpaths: rebuild work item hierarchies and normalize their depth
//!
//! A flat set of tracker items, each listing its children, becomes one tree per
//! root. Every tree is then padded with placeholder nodes so all of its leaves
//! sit at the same level.
//!
//! ```
//! use workpaths::domain::{build_work_paths, WorkItem};
//!
//! let items = vec![
//!     WorkItem::new("A", &["B", "C"]),
//!     WorkItem::new("B", &["D"]),
//!     WorkItem::new("C", &[]),
//!     WorkItem::new("D", &[]),
//! ];
//! let paths = build_work_paths(&items);
//! assert_eq!(paths[0].children[1].children[0].external_id, "PC-L2");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_work_paths, TreeNode, WorkItem};
