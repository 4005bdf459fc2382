//! Prim lookup by name.
//!
//! Prims are located by a pre-order, depth-first walk in authored child
//! order. The first prim whose name matches exactly wins, so duplicate
//! names deeper in the tree or in later siblings are never reached.

use crate::usd::{Prim, SdfPath};

/// Find the path of the first prim named `target` at or below `root`.
///
/// Returns the empty path when no prim matches. An empty `target` never
/// matches, so the unnamed pseudo-root is never returned.
pub fn find_prim_path(root: &Prim, target: &str) -> SdfPath {
    if target.is_empty() {
        log::warn!("Cannot search for a prim with an empty name");
        return SdfPath::empty();
    }

    let mut found = SdfPath::empty();
    search(root, target, &mut found);
    found
}

fn search(prim: &Prim, target: &str, found: &mut SdfPath) {
    log::trace!("Searching in prim: {}", prim.path);

    if prim.name == target {
        *found = prim.path.clone();
        log::debug!("Found prim {} with name {}", prim.path, target);
        return;
    }

    for child in &prim.children {
        if child.path.is_empty() {
            log::warn!("Encountered invalid child prim under {}", prim.path);
            continue;
        }

        search(child, target, found);

        if !found.is_empty() {
            return;
        }
    }

    log::trace!("Finished searching children of prim: {}", prim.path);
}
