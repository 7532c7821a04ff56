pub mod components;
pub mod entities;
pub mod filters;
pub mod systems;
mod world;

pub use world::{Config, World};

#[doc(hidden)]
pub use lazy_static::lazy_static;

macro_rules! ecs_assert {
	($cond: expr, $($arg: tt)+) => {
		#[cfg(not(feature = "debug_only_assertions"))]
		assert!($cond, $($arg)+);

		#[cfg(feature = "debug_only_assertions")]
		debug_assert!($cond, $($arg)+);
	};
}

pub(crate) use ecs_assert;

pub mod prelude {
	pub use crate::components::{AutoReset, Component, Pool};
	pub use crate::entities::{EntityId, PackedEntity, PackedEntityWithWorld};
	pub use crate::filters::{Filter, MaskBuilder};
	pub use crate::systems::{AutoRemove, System, Systems};
	pub use crate::world::{Config, World};
}

#[cfg(test)]
mod tests;
