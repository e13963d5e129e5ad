//! Library dependencies and the flattening algorithm
//!
//! Library modules form a dependency DAG. Resource-overlay and classpath
//! precedence downstream is driven by one deduplicated, priority-ordered
//! flat sequence: earlier entries override resources of later ones.
//!
//! Flattening algorithm:
//! 1. Process the direct list in reverse declaration order.
//! 2. For each node, fold in its own dependencies first (same procedure,
//!    shared output).
//! 3. Insert the node at the front of the output if it is not already
//!    present by identity; an already-present node keeps its position.
//!
//! Processing last-declared nodes first and inserting at the front leaves
//! the first-declared direct dependency at the very front, so top-level
//! declaration order stays the dominant priority order while each node's
//! transitive dependencies interleave immediately behind it. A diamond
//! dependency keeps the rank of its first insertion during this traversal,
//! not necessarily its shallowest occurrence; downstream overlay resolution
//! depends on that exact behavior.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A node in the library dependency DAG.
///
/// Nodes are immutable after construction and shared read-only via
/// [`DepHandle`]. Two dependencies are the same only if they are the same
/// node, never by name or path.
pub trait LibraryDependency: Send + Sync {
    /// The library's own manifest file
    fn manifest_path(&self) -> &Path;

    /// The library's resource directory, if it ships resources
    fn resource_dir(&self) -> Option<&Path>;

    /// The library's compiled artifact
    fn artifact_file(&self) -> &Path;

    /// Direct dependencies, in declaration order
    fn direct_dependencies(&self) -> &[DepHandle];
}

/// Shared handle to a dependency node; identity is the node itself
pub type DepHandle = Arc<dyn LibraryDependency>;

/// Whether two handles refer to the same dependency node
pub fn same_dependency(a: &DepHandle, b: &DepHandle) -> bool {
    Arc::ptr_eq(a, b)
}

/// Identity key for the seen-set (thin pointer of the shared node)
fn identity_key(dep: &DepHandle) -> usize {
    Arc::as_ptr(dep) as *const () as usize
}

/// Stack frame: one reverse sweep over a dependency list, plus the node to
/// front-insert once the sweep completes
struct Frame {
    nodes: Vec<DepHandle>,
    cursor: usize,
    pending: Option<DepHandle>,
}

/// Flatten a direct dependency list into the full priority-ordered sequence.
///
/// The result is deduplicated by identity. Earlier entries have strictly
/// higher resource-overlay priority than later ones. The traversal uses an
/// explicit frame stack so deep graphs cannot exhaust the call stack.
pub fn flatten(direct: &[DepHandle]) -> Vec<DepHandle> {
    let mut flat: Vec<DepHandle> = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();

    let mut stack = vec![Frame {
        nodes: direct.to_vec(),
        cursor: direct.len(),
        pending: None,
    }];

    loop {
        let Some(frame) = stack.last_mut() else { break };

        if frame.cursor == 0 {
            // Sweep complete: front-insert the pending node unless an
            // earlier path already placed it.
            let done = stack.pop();
            if let Some(Frame {
                pending: Some(node),
                ..
            }) = done
            {
                if seen.insert(identity_key(&node)) {
                    flat.insert(0, node);
                }
            }
            continue;
        }

        // Reverse order: last-declared dependency first.
        frame.cursor -= 1;
        let node = frame.nodes[frame.cursor].clone();
        let children = node.direct_dependencies().to_vec();
        stack.push(Frame {
            cursor: children.len(),
            nodes: children,
            pending: Some(node),
        });
    }

    tracing::debug!(
        direct = direct.len(),
        flattened = flat.len(),
        "flattened library dependencies"
    );

    flat
}

/// Resource directories of a flattened list, in flattened order, skipping
/// libraries without resources
pub fn resource_dirs(flat: &[DepHandle]) -> Vec<PathBuf> {
    flat.iter()
        .filter_map(|dep| dep.resource_dir().map(Path::to_path_buf))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FakeDependency;

    fn names(flat: &[DepHandle], fixtures: &[(&str, &DepHandle)]) -> Vec<String> {
        flat.iter()
            .map(|dep| {
                fixtures
                    .iter()
                    .find(|(_, handle)| same_dependency(dep, handle))
                    .map(|(name, _)| (*name).to_string())
                    .unwrap_or_else(|| "?".to_string())
            })
            .collect()
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_flatten_chain() {
        let c = FakeDependency::new("c");
        let b = FakeDependency::with_deps("b", vec![c.clone()]);
        let a = FakeDependency::with_deps("a", vec![b.clone()]);

        let flat = flatten(&[a.clone()]);

        let order = names(&flat, &[("a", &a), ("b", &b), ("c", &c)]);
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flatten_top_level_order_preserved() {
        let a = FakeDependency::new("a");
        let b = FakeDependency::new("b");

        let flat = flatten(&[a.clone(), b.clone()]);

        let order = names(&flat, &[("a", &a), ("b", &b)]);
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_flatten_diamond_exact_sequence() {
        let d = FakeDependency::new("d");
        let b = FakeDependency::with_deps("b", vec![d.clone()]);
        let c = FakeDependency::with_deps("c", vec![d.clone()]);
        let a = FakeDependency::with_deps("a", vec![b.clone(), c.clone()]);

        let flat = flatten(&[a.clone()]);

        // d is folded in while processing c (last-declared child first) and
        // keeps that first-inserted rank when b reaches it again.
        let order = names(&flat, &[("a", &a), ("b", &b), ("c", &c), ("d", &d)]);
        assert_eq!(order, vec!["a", "b", "c", "d"]);

        let d_count = flat.iter().filter(|dep| same_dependency(dep, &d)).count();
        assert_eq!(d_count, 1);
    }

    #[test]
    fn test_flatten_shared_subtree_duplicate_free() {
        let shared = FakeDependency::new("shared");
        let a = FakeDependency::with_deps("a", vec![shared.clone()]);
        let b = FakeDependency::with_deps("b", vec![shared.clone()]);

        let flat = flatten(&[a.clone(), b.clone()]);

        assert_eq!(flat.len(), 3);
        let shared_count = flat
            .iter()
            .filter(|dep| same_dependency(dep, &shared))
            .count();
        assert_eq!(shared_count, 1);
    }

    #[test]
    fn test_flatten_idempotent() {
        let c = FakeDependency::new("c");
        let b = FakeDependency::with_deps("b", vec![c.clone()]);
        let a = FakeDependency::with_deps("a", vec![b.clone(), c.clone()]);

        let flat = flatten(&[a]);
        let again = flatten(&flat);

        assert_eq!(flat.len(), again.len());
        for (x, y) in flat.iter().zip(again.iter()) {
            assert!(same_dependency(x, y));
        }
    }

    #[test]
    fn test_flatten_deep_chain_does_not_recurse() {
        // Deep chain; a call-stack-recursive implementation would overflow
        // here long before the frame stack notices.
        let mut head = FakeDependency::new("leaf");
        for i in 0..4_000 {
            head = FakeDependency::with_deps(&format!("n{}", i), vec![head]);
        }

        let flat = flatten(&[head.clone()]);

        assert_eq!(flat.len(), 4_001);
        assert!(same_dependency(&flat[0], &head));
    }

    #[test]
    fn test_resource_dirs_skip_absent() {
        let with_res = FakeDependency::new("with-res");
        let without_res = FakeDependency::without_resources("bare");

        let dirs = resource_dirs(&flatten(&[with_res, without_res]));

        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].ends_with("res"));
    }
}
