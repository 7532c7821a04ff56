use crate::systems::{System, Systems};
use crate::components::Component;
use std::marker::PhantomData;
use crate::filters::Filter;
use crate::World;

/// Removes every `T` on each tick.
///
/// A convenience system for one-frame components: events attached during a
/// tick are cleared once every interested system has run. Place it after
/// the consumers in registration order.
pub struct AutoRemove<T: Component> {
	filter: Option<Filter>,
	world: Option<String>,
	marker: PhantomData<T>,
}

impl<T: Component> AutoRemove<T> {
	/// Operates on the container's default world.
	pub fn new() -> Self {
		Self {
			filter: None,
			world: None,
			marker: PhantomData,
		}
	}

	/// Operates on the named world instead.
	pub fn for_world(name: impl Into<String>) -> Self {
		Self {
			filter: None,
			world: Some(name.into()),
			marker: PhantomData,
		}
	}

	fn target<'l, S: 'static>(&self, systems: &'l mut Systems<S>) -> &'l mut World {
		match &self.world {
			Some(name) => systems
				.named_world_mut(name)
				.expect("AutoRemove targets an unregistered world"),
			None => systems.world_mut(),
		}
	}
}

impl<T: Component> Default for AutoRemove<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: 'static, T: Component> System<S> for AutoRemove<T> {
	fn init(&mut self, systems: &mut Systems<S>) {
		self.filter = Some(self.target(systems).filter::<T>().end());
	}

	fn run(&mut self, systems: &mut Systems<S>) {
		let filter = self.filter.expect("AutoRemove was not initialized");
		self.target(systems).for_each(filter, |world, entity| {
			world.pool::<T>().del(entity);
		});
	}
}
