use crate::components::{Component, ComponentTypeId};
use crate::{Config, World};
use std::any::Any;

#[derive(Default, Clone, Debug, PartialEq)]
struct Name(String);

impl Component for Name {
	fn component_type_id() -> ComponentTypeId {
		ComponentTypeId::of::<Self>()
	}
}

#[derive(Default, Clone, Debug, PartialEq)]
struct Score(i32);

impl Component for Score {
	fn component_type_id() -> ComponentTypeId {
		ComponentTypeId::of::<Self>()
	}
}

#[test]
pub fn worlds_carry_unique_ids() {
	let first = World::default();
	let second = World::default();

	assert!(first.is_alive());
	assert_ne!(first.id(), second.id());
}

#[test]
#[should_panic(expected = "capacities must be positive")]
pub fn zero_capacities_are_rejected() {
	World::new(Config {
		entities: 0,
		recycled_entities: 512,
		pools: 512,
		filters: 512,
	});
}

#[test]
pub fn destroy_kills_every_entity() {
	let mut world = World::default();

	let entities: Vec<_> = (0..4)
		.map(|i| {
			let entity = world.new_entity();
			world.pool::<Score>().add(entity).0 = i;
			entity
		})
		.collect();

	world.destroy();

	assert!(!world.is_alive());
	for entity in entities {
		assert!(!world.is_entity_alive(entity), "Entity {} survived world destruction", entity);
	}
}

#[test]
#[should_panic(expected = "while a filter is locked")]
pub fn destroy_during_iteration_is_fatal() {
	let mut world = World::default();

	let entity = world.new_entity();
	world.pool::<Score>().add(entity);

	let scored = world.filter::<Score>().end();
	world.for_each(scored, |world, _entity| {
		world.destroy();
	});
}

#[test]
pub fn component_snapshots_cover_every_pool() {
	let mut world = World::default();

	let entity = world.new_entity();
	world.pool::<Name>().add(entity).0 = "crate".into();
	world.pool::<Score>().add(entity).0 = 3;

	let mut buffer: Vec<Box<dyn Any>> = Vec::new();
	let count = world.get_components(entity, &mut buffer);

	assert_eq!(2, count);
	assert!(buffer
		.iter()
		.any(|snapshot| snapshot.downcast_ref::<Name>() == Some(&Name("crate".into()))));
	assert!(buffer
		.iter()
		.any(|snapshot| snapshot.downcast_ref::<Score>() == Some(&Score(3))));
}

#[test]
pub fn snapshots_are_copies_not_views() {
	let mut world = World::default();

	let entity = world.new_entity();
	world.pool::<Score>().add(entity).0 = 3;

	let mut buffer: Vec<Box<dyn Any>> = Vec::new();
	world.get_components(entity, &mut buffer);
	world.pool::<Score>().get(entity).0 = 9;

	assert_eq!(Some(&Score(3)), buffer[0].downcast_ref::<Score>());
}

#[cfg(debug_assertions)]
#[test]
pub fn an_empty_live_entity_is_reported_as_leaked() {
	let mut world = World::default();

	let empty = world.new_entity();
	assert_eq!(Some(empty), world.first_leaked_entity());

	world.pool::<Score>().add(empty);
	assert_eq!(None, world.first_leaked_entity());
}

#[test]
pub fn transiently_empty_entities_show_up_in_the_dump() {
	let mut world = World::default();

	let empty = world.new_entity();
	let full = world.new_entity();
	world.pool::<Score>().add(full);

	let mut buffer = Vec::new();
	let count = world.get_all_entities(&mut buffer);

	assert_eq!(2, count, "A live entity without components is still reported");
	assert!(buffer.contains(&empty));
	assert!(buffer.contains(&full));
}
