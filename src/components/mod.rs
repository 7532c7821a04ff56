//! [Components](Component) carry the data attached to entities.
//!
//! Each component type is stored in its own [pool](ErasedPool) within a
//! world; an entity holds at most one component per type.

pub mod component_id;
mod component;
mod pool;

pub use component::*;
pub use pool::*;
pub use component_id::ComponentTypeId;
pub use flint_ecs_derive::Component;
