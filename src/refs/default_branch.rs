//! refs::default_branch
//!
//! Picking the one branch a UI should show first.
//!
//! # Algorithm
//!
//! 1. No branches: the empty string (not an error).
//! 2. One branch: that branch. HEAD is not read.
//! 3. HEAD names a branch: that branch.
//! 4. A branch called `master` exists: `master`.
//! 5. Otherwise the first branch the store yielded.
//!
//! The result is recomputed on every call and never cached.

use super::catalog::HEADS_PREFIX;
use crate::core::types::BranchScope;
use crate::git::{GitError, Repository};

/// Branch preferred when HEAD gives no answer.
pub const FALLBACK_BRANCH: &str = "master";

/// Compute the default branch of `repo`.
///
/// # Errors
///
/// Errors from branch enumeration or HEAD lookup are returned unchanged.
/// An unborn or missing HEAD is not an error.
pub fn default_branch(repo: &Repository, scope: BranchScope) -> Result<String, GitError> {
    let branches = repo.branch_names(scope)?;
    let chosen = pick_default_branch(&branches, || repo.head_ref_name())?;
    tracing::debug!(candidates = branches.len(), chosen = %chosen, "resolved default branch");
    Ok(chosen)
}

/// Alias of [`default_branch`]: the ref history pages are rooted at.
pub fn root_ref(repo: &Repository, scope: BranchScope) -> Result<String, GitError> {
    default_branch(repo, scope)
}

/// Apply the default-branch rules to `branches`.
///
/// `head` is only called when two or more branches exist. It returns the
/// full name of the reference HEAD points at, or `None` if HEAD is absent.
///
/// # Example
///
/// ```
/// use repolens::refs::pick_default_branch;
///
/// let branches = vec!["a".to_string(), "b".to_string()];
/// let picked = pick_default_branch(&branches, || {
///     Ok::<_, std::convert::Infallible>(Some("refs/heads/b".to_string()))
/// });
/// assert_eq!(picked.unwrap(), "b");
/// ```
pub fn pick_default_branch<F, E>(branches: &[String], head: F) -> Result<String, E>
where
    F: FnOnce() -> Result<Option<String>, E>,
{
    match branches {
        [] => return Ok(String::new()),
        [only] => return Ok(only.clone()),
        _ => {}
    }

    if let Some(name) = head()?.as_deref().map(branch_from_head) {
        if !name.is_empty() {
            return Ok(name);
        }
    }

    if branches.iter().any(|b| b == FALLBACK_BRANCH) {
        return Ok(FALLBACK_BRANCH.to_string());
    }

    Ok(branches[0].clone())
}

/// Extract a branch name from the reference HEAD points at.
///
/// - `refs/heads/main` (three segments) gives `main`
/// - longer names give everything after the second segment, so
///   `refs/heads/feature/x` gives `feature/x`
/// - shorter names give their first segment, so a detached `HEAD`
///   gives `HEAD`
///
/// # Example
///
/// ```
/// use repolens::refs::branch_from_head;
///
/// assert_eq!(branch_from_head("refs/heads/main"), "main");
/// assert_eq!(branch_from_head("refs/heads/feature/x"), "feature/x");
/// assert_eq!(branch_from_head("HEAD"), "HEAD");
/// ```
pub fn branch_from_head(head: &str) -> String {
    if let Some(branch) = head.strip_prefix(HEADS_PREFIX) {
        return branch.to_string();
    }

    let segments: Vec<&str> = head.split('/').collect();
    if segments.len() >= 3 {
        segments[2..].join("/")
    } else {
        segments[0].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::convert::Infallible;

    fn branches(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn head_at(name: &str) -> impl FnOnce() -> Result<Option<String>, Infallible> + '_ {
        move || Ok(Some(name.to_string()))
    }

    fn no_head() -> Result<Option<String>, Infallible> {
        Ok(None)
    }

    #[test]
    fn zero_branches_is_empty_string() {
        assert_eq!(pick_default_branch(&[], no_head).unwrap(), "");
    }

    #[test]
    fn single_branch_ignores_head() {
        let called = Cell::new(false);
        let picked = pick_default_branch(&branches(&["x"]), || {
            called.set(true);
            Ok::<_, Infallible>(Some("refs/heads/y".into()))
        })
        .unwrap();
        assert_eq!(picked, "x");
        assert!(!called.get());
    }

    #[test]
    fn head_wins_over_master() {
        let picked =
            pick_default_branch(&branches(&["master", "b"]), head_at("refs/heads/b")).unwrap();
        assert_eq!(picked, "b");
    }

    #[test]
    fn master_when_head_absent() {
        let picked = pick_default_branch(&branches(&["a", "master"]), no_head).unwrap();
        assert_eq!(picked, "master");
    }

    #[test]
    fn first_branch_when_no_head_and_no_master() {
        let picked = pick_default_branch(&branches(&["zeta", "alpha"]), no_head).unwrap();
        assert_eq!(picked, "zeta");
    }

    #[test]
    fn empty_head_name_falls_through() {
        let picked =
            pick_default_branch(&branches(&["a", "master"]), head_at("refs/heads/")).unwrap();
        assert_eq!(picked, "master");
    }

    #[test]
    fn head_errors_propagate() {
        let result = pick_default_branch(&branches(&["a", "b"]), || Err::<Option<String>, _>("boom"));
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn head_shapes() {
        assert_eq!(branch_from_head("refs/heads/main"), "main");
        assert_eq!(branch_from_head("refs/heads/feature/x"), "feature/x");
        assert_eq!(branch_from_head("refs/remotes/origin/main"), "origin/main");
        assert_eq!(branch_from_head("HEAD"), "HEAD");
        assert_eq!(branch_from_head("refs/heads"), "refs");
    }
}
