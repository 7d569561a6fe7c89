pub mod collect;
pub mod index;
pub mod map;
pub mod model;
pub mod record;
pub mod resolve;
pub mod rules;
pub mod source;
pub mod template;
pub mod unit;
