//! refs::catalog
//!
//! Branch and tag enumeration.

use crate::core::types::BranchScope;
use crate::git::{GitError, Repository};

/// Namespace holding tags.
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Namespace holding local branches.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// List tag names with the `refs/tags/` prefix removed.
///
/// Order follows the store's reference iteration.
///
/// # Errors
///
/// - [`GitError::IterationFailed`] if references cannot be enumerated
pub fn list_tags(repo: &Repository) -> Result<Vec<String>, GitError> {
    Ok(tag_names(repo.reference_names()?))
}

/// List branch names for `scope`, in store order.
///
/// # Errors
///
/// - [`GitError::IterationFailed`] if branches cannot be enumerated
pub fn list_branches(repo: &Repository, scope: BranchScope) -> Result<Vec<String>, GitError> {
    repo.branch_names(scope)
}

/// Keep only tag references from `refs`, stripped of their namespace.
///
/// # Example
///
/// ```
/// use repolens::refs::tag_names;
///
/// let refs = vec![
///     "refs/heads/master".to_string(),
///     "refs/tags/v1.0".to_string(),
///     "refs/tags/release/2024".to_string(),
/// ];
/// assert_eq!(tag_names(refs), vec!["v1.0", "release/2024"]);
/// ```
pub fn tag_names<I>(refs: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    refs.into_iter()
        .filter_map(|name| {
            name.strip_prefix(TAGS_PREFIX)
                .filter(|tag| !tag.is_empty())
                .map(String::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_tag_namespace() {
        let refs = names(&["refs/tags/v1", "refs/tags/v2"]);
        assert_eq!(tag_names(refs), vec!["v1", "v2"]);
    }

    #[test]
    fn excludes_non_tag_refs() {
        let refs = names(&[
            "refs/heads/master",
            "refs/remotes/origin/master",
            "refs/notes/commits",
            "HEAD",
            "refs/tags/v1",
        ]);
        assert_eq!(tag_names(refs), vec!["v1"]);
    }

    #[test]
    fn prefix_must_match_at_start() {
        let refs = names(&["refs/heads/refs/tags/x", "refs/tagsx/y", "refs/tags"]);
        assert!(tag_names(refs).is_empty());
    }

    #[test]
    fn nested_tag_names_keep_slashes() {
        let refs = names(&["refs/tags/release/1.0/rc1"]);
        assert_eq!(tag_names(refs), vec!["release/1.0/rc1"]);
    }

    #[test]
    fn preserves_input_order() {
        let refs = names(&["refs/tags/b", "refs/tags/a", "refs/tags/c"]);
        assert_eq!(tag_names(refs), vec!["b", "a", "c"]);
    }
}
