//! Rewrites over the typed declaration tree and the C printer they share.

pub(crate) mod callback;
pub(crate) mod flatten;
pub(crate) mod render;
