pub mod callback;
pub mod flatten;
pub mod opaque;
