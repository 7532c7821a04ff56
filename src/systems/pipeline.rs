use std::collections::{HashMap, HashSet};
use crate::systems::System;
use std::any::TypeId;
use crate::World;

/// Drives a set of [systems](System) over a default [World], any number of
/// named worlds and a shared value.
///
/// Phases run in registration order; the destroy family runs in reverse
/// registration order. Lifecycle misuse (adding after init, running before
/// init, double destroy) is fatal.
pub struct Systems<S: 'static = ()> {
	state: State,
	world: World,
	worlds: HashMap<String, World>,
	shared: S,
	set: HashSet<TypeId>,
	systems: Vec<Entry<S>>,
}

struct Entry<S: 'static> {
	name: &'static str,
	system: Box<dyn System<S>>,
}

#[derive(Default)]
enum State {
	#[default]
	Registering,
	Initializing,
	Ready,
	Running,
	Destroying,
	Destroyed,
}

impl<S: 'static> Systems<S> {
	pub fn new(world: World, shared: S) -> Self {
		Self {
			state: State::default(),
			world,
			worlds: HashMap::new(),
			shared,
			set: HashSet::default(),
			systems: Vec::new(),
		}
	}

	/// Registers a system. Only allowed before [init](Systems::init), and
	/// each system type at most once.
	pub fn add<T: 'static + System<S>>(&mut self, system: T) -> &mut Self {
		match self.state {
			State::Registering => {
				let inserted = self.set.insert(TypeId::of::<T>());
				assert!(inserted, "System was already added to this container");
				self.systems.push(Entry {
					name: std::any::type_name::<T>(),
					system: Box::new(system),
				});
				self
			},
			_ => panic!("Systems can only be added before initialization"),
		}
	}

	/// Registers an additional world under `name`.
	pub fn add_world(&mut self, name: impl Into<String>, world: World) -> &mut Self {
		self.worlds.insert(name.into(), world);
		self
	}

	pub fn world(&self) -> &World {
		&self.world
	}

	pub fn world_mut(&mut self) -> &mut World {
		&mut self.world
	}

	pub fn named_world(&self, name: &str) -> Option<&World> {
		self.worlds.get(name)
	}

	pub fn named_world_mut(&mut self, name: &str) -> Option<&mut World> {
		self.worlds.get_mut(name)
	}

	pub fn shared(&self) -> &S {
		&self.shared
	}

	pub fn shared_mut(&mut self) -> &mut S {
		&mut self.shared
	}

	/// Runs the init family: every `pre_init`, then every `init`, both in
	/// registration order.
	pub fn init(&mut self) {
		match self.state {
			State::Registering => {},
			State::Initializing => panic!("Recursive call to init"),
			_ => panic!("Systems have already been initialized"),
		}
		self.state = State::Initializing;

		let mut systems = std::mem::take(&mut self.systems);
		for entry in systems.iter_mut() {
			entry.system.pre_init(self);
			self.check_for_leaks(entry.name);
		}
		for entry in systems.iter_mut() {
			entry.system.init(self);
			self.check_for_leaks(entry.name);
		}
		self.systems = systems;

		self.state = State::Ready;
	}

	/// Runs every system's `run`, in registration order.
	pub fn run(&mut self) {
		match self.state {
			State::Ready => {},
			State::Running => panic!("Recursive call to run"),
			State::Destroying | State::Destroyed => panic!("Systems have been destroyed"),
			_ => panic!("Systems must be initialized before they can run"),
		}
		self.state = State::Running;

		let mut systems = std::mem::take(&mut self.systems);
		for entry in systems.iter_mut() {
			entry.system.run(self);
			self.check_for_leaks(entry.name);
		}
		self.systems = systems;

		self.state = State::Ready;
	}

	/// Runs the destroy family in reverse registration order, then marks
	/// the container unusable.
	pub fn destroy(&mut self) {
		match self.state {
			State::Ready => {},
			State::Destroying => panic!("Recursive call to destroy"),
			State::Destroyed => panic!("Systems have already been destroyed"),
			_ => panic!("Systems must be initialized and idle before destruction"),
		}
		self.state = State::Destroying;

		let mut systems = std::mem::take(&mut self.systems);
		for entry in systems.iter_mut().rev() {
			entry.system.destroy(self);
		}
		for entry in systems.iter_mut().rev() {
			entry.system.post_destroy(self);
		}
		self.systems = systems;

		self.state = State::Destroyed;
	}

	/// An entity left alive with no components after a callback has been
	/// leaked by the system that just ran.
	#[cfg(debug_assertions)]
	fn check_for_leaks(&self, system: &str) {
		if let Some(entity) = self.world.first_leaked_entity() {
			panic!(
				"Empty entity {} in world \"default\" after system {}",
				entity, system
			);
		}
		for (name, world) in self.worlds.iter() {
			if let Some(entity) = world.first_leaked_entity() {
				panic!("Empty entity {} in world \"{}\" after system {}", entity, name, system);
			}
		}
	}

	#[cfg(not(debug_assertions))]
	fn check_for_leaks(&self, _system: &str) {}
}
