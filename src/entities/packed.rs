use crate::entities::EntityId;
use crate::World;

/// A stable reference to one life of an entity.
///
/// Packing captures the generation; unpacking refuses to resolve once that
/// life has ended, even if the id has been recycled since. The default
/// value acts as a null handle that never resolves.
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PackedEntity {
	pub(crate) id: EntityId,
	pub(crate) generation: i16,
}

impl PackedEntity {
	/// Resolves the handle against `world` if this exact life is still alive.
	pub fn unpack(&self, world: &World) -> Option<EntityId> {
		if !world.is_alive() || !world.is_entity_alive(self.id) {
			return None;
		}
		if world.entity_generation(self.id) != self.generation {
			return None;
		}
		Some(self.id)
	}
}

/// A [PackedEntity] additionally bound to the identity of its world.
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PackedEntityWithWorld {
	pub(crate) world: u32,
	pub(crate) id: EntityId,
	pub(crate) generation: i16,
}

impl PackedEntityWithWorld {
	/// Resolves the handle, refusing any world other than the one it was
	/// packed from.
	pub fn unpack(&self, world: &World) -> Option<EntityId> {
		if world.id() != self.world {
			return None;
		}

		let packed = PackedEntity {
			id: self.id,
			generation: self.generation,
		};
		packed.unpack(world)
	}
}
