//! [Filters](Filter) are live caches of the entities matching a mask of
//! included and excluded component types, maintained incrementally on every
//! attach and detach.

mod mask;
mod filter;

pub use mask::*;
pub use filter::*;
