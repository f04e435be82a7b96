//! Read-side algorithms over the tag hierarchy.

mod closure;
mod retrieval;

pub use closure::{TagGraph, ancestors, descendants, is_descendant};
pub use retrieval::matches;
