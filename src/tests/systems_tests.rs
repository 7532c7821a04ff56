use crate::components::{Component, ComponentTypeId};
use crate::systems::{AutoRemove, System, Systems};
use crate::World;

#[derive(Default, Clone)]
struct Damage(u32);

impl Component for Damage {
	fn component_type_id() -> ComponentTypeId {
		ComponentTypeId::of::<Self>()
	}
}

type Journal = Vec<&'static str>;

struct Alpha;

impl System<Journal> for Alpha {
	fn pre_init(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("alpha:pre_init");
	}

	fn init(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("alpha:init");
	}

	fn run(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("alpha:run");
	}

	fn destroy(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("alpha:destroy");
	}

	fn post_destroy(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("alpha:post_destroy");
	}
}

struct Beta;

impl System<Journal> for Beta {
	fn pre_init(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("beta:pre_init");
	}

	fn init(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("beta:init");
	}

	fn run(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("beta:run");
	}

	fn destroy(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("beta:destroy");
	}

	fn post_destroy(&mut self, systems: &mut Systems<Journal>) {
		systems.shared_mut().push("beta:post_destroy");
	}
}

#[test]
pub fn phases_run_in_registration_order_and_unwind_in_reverse() {
	let mut systems = Systems::new(World::default(), Journal::new());
	systems.add(Alpha).add(Beta);

	systems.init();
	systems.run();
	systems.destroy();

	assert_eq!(
		vec![
			"alpha:pre_init",
			"beta:pre_init",
			"alpha:init",
			"beta:init",
			"alpha:run",
			"beta:run",
			"beta:destroy",
			"alpha:destroy",
			"beta:post_destroy",
			"alpha:post_destroy",
		],
		*systems.shared(),
	);
}

#[test]
#[should_panic(expected = "before initialization")]
pub fn adding_after_init_is_fatal() {
	let mut systems = Systems::new(World::default(), Journal::new());
	systems.init();
	systems.add(Alpha);
}

#[test]
#[should_panic(expected = "already added")]
pub fn adding_a_system_twice_is_fatal() {
	let mut systems = Systems::new(World::default(), Journal::new());
	systems.add(Alpha).add(Alpha);
}

#[test]
#[should_panic(expected = "must be initialized")]
pub fn running_before_init_is_fatal() {
	let mut systems: Systems = Systems::new(World::default(), ());
	systems.run();
}

#[test]
#[should_panic(expected = "already been destroyed")]
pub fn destroying_twice_is_fatal() {
	let mut systems: Systems = Systems::new(World::default(), ());
	systems.init();
	systems.destroy();
	systems.destroy();
}

struct SpawnDamage;

impl<S: 'static> System<S> for SpawnDamage {
	fn run(&mut self, systems: &mut Systems<S>) {
		let world = systems.world_mut();
		for amount in 0..3 {
			let entity = world.new_entity();
			world.pool::<Damage>().add(entity).0 = amount;
		}
	}
}

struct CountDamage;

impl System<u32> for CountDamage {
	fn run(&mut self, systems: &mut Systems<u32>) {
		let world = systems.world_mut();
		let filter = world.filter::<Damage>().end();
		let count = world.filter_count(filter) as u32;
		*systems.shared_mut() += count;
	}
}

#[test]
pub fn auto_remove_clears_one_frame_components() {
	let mut systems = Systems::new(World::default(), ());
	systems.add(SpawnDamage);
	systems.add(AutoRemove::<Damage>::new());
	systems.init();

	for _ in 0..2 {
		systems.run();

		let world = systems.world_mut();
		let filter = world.filter::<Damage>().end();
		assert_eq!(0, world.filter_count(filter), "Every Damage must be gone after the tick");

		let mut buffer = Vec::new();
		assert_eq!(
			0,
			world.get_all_entities(&mut buffer),
			"Damage-only entities must die with their component"
		);
	}
}

#[test]
pub fn consumers_observe_events_before_auto_removal() {
	let mut systems = Systems::new(World::default(), 0u32);
	systems.add(SpawnDamage);
	systems.add(CountDamage);
	systems.add(AutoRemove::<Damage>::new());
	systems.init();

	systems.run();
	systems.run();

	assert_eq!(
		6,
		*systems.shared(),
		"The consumer must see all three events of each tick before removal"
	);
}

struct SpawnIntoEvents;

impl System for SpawnIntoEvents {
	fn run(&mut self, systems: &mut Systems) {
		let world = systems.named_world_mut("events").unwrap();
		let entity = world.new_entity();
		world.pool::<Damage>().add(entity);
	}
}

#[test]
pub fn auto_remove_can_target_a_named_world() {
	let mut systems = Systems::new(World::default(), ());
	systems.add_world("events", World::default());
	systems.add(SpawnIntoEvents);
	systems.add(AutoRemove::<Damage>::for_world("events"));
	systems.init();

	systems.run();

	let events = systems.named_world_mut("events").unwrap();
	let filter = events.filter::<Damage>().end();
	assert_eq!(0, events.filter_count(filter));
}

struct Leaky;

impl System for Leaky {
	fn run(&mut self, systems: &mut Systems) {
		systems.world_mut().new_entity();
	}
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "Empty entity")]
pub fn a_leaked_entity_is_reported_after_the_offending_system() {
	let mut systems = Systems::new(World::default(), ());
	systems.add(Leaky);
	systems.init();
	systems.run();
}
