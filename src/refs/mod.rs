//! refs
//!
//! Reference catalog and default-branch resolution.
//!
//! # Modules
//!
//! - [`catalog`] - Branch and tag enumeration
//! - [`default_branch`] - The canonical branch derived from branches + HEAD
//!
//! Tag filtering is a plain prefix check against `refs/tags/`.

pub mod catalog;
pub mod default_branch;

pub use catalog::{list_branches, list_tags, tag_names, HEADS_PREFIX, TAGS_PREFIX};
pub use default_branch::{
    branch_from_head, default_branch, pick_default_branch, root_ref, FALLBACK_BRANCH,
};
