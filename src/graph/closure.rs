use std::collections::BTreeSet;

use crate::error::Result;

/// Direct edge lookups over the tag hierarchy.
///
/// Implementors answer only one hop; the transitive closures are derived
/// here so every backend shares the same traversal.
pub trait TagGraph {
    fn children(&self, tag: &str) -> Result<Vec<String>>;
    fn parents(&self, tag: &str) -> Result<Vec<String>>;
}

/// Returns `tag` together with every tag reachable through child edges.
pub fn descendants<G: TagGraph + ?Sized>(graph: &G, tag: &str) -> Result<BTreeSet<String>> {
    let mut found = walk(tag, |t| graph.children(t))?;
    found.insert(tag.to_string());
    Ok(found)
}

/// Returns every tag reachable through parent edges, excluding `tag` itself.
pub fn ancestors<G: TagGraph + ?Sized>(graph: &G, tag: &str) -> Result<BTreeSet<String>> {
    let mut found = walk(tag, |t| graph.parents(t))?;
    found.remove(tag);
    Ok(found)
}

/// Whether `candidate` is `of` or one of its descendants.
pub fn is_descendant<G: TagGraph + ?Sized>(graph: &G, candidate: &str, of: &str) -> Result<bool> {
    if candidate == of {
        return Ok(true);
    }
    Ok(walk(of, |t| graph.children(t))?.contains(candidate))
}

/// Depth-first traversal from `start` along `next`. The visited set keeps the
/// walk finite even if the stored graph somehow contains a cycle.
fn walk<F>(start: &str, mut next: F) -> Result<BTreeSet<String>>
where
    F: FnMut(&str) -> Result<Vec<String>>,
{
    let mut visited = BTreeSet::new();
    let mut stack = next(start)?;

    while let Some(tag) = stack.pop() {
        if !visited.insert(tag.clone()) {
            continue;
        }
        for neighbour in next(&tag)? {
            if !visited.contains(&neighbour) {
                stack.push(neighbour);
            }
        }
    }

    Ok(visited)
}
