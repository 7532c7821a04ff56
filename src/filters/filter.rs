use crate::entities::EntityId;
use crate::filters::Mask;
use crate::ecs_assert;

/// A handle to a live entity set maintained by a [World](crate::World).
///
/// Handles are canonical: resolving the same mask twice yields equal
/// handles for the lifetime of the world.
#[derive(Debug, Hash, Copy, Clone, Eq, PartialEq)]
pub struct Filter {
	pub(crate) index: usize,
}

#[derive(Copy, Clone)]
pub(crate) struct DelayedOp {
	pub added: bool,
	pub entity: EntityId,
}

/// Storage behind a [Filter] handle: the dense member array, the 1-based
/// entity-to-position map, the iteration lock and the operations recorded
/// while the lock is held.
pub(crate) struct FilterData {
	pub mask: Mask,
	pub dense: Vec<EntityId>,
	pub sparse: Vec<u32>,
	pub lock: u32,
	pub pending: Vec<DelayedOp>,
}

impl FilterData {
	pub fn new(mask: Mask, dense_capacity: usize, entity_capacity: usize) -> Self {
		Self {
			mask,
			dense: Vec::with_capacity(dense_capacity),
			sparse: vec![0; entity_capacity],
			lock: 0,
			pending: Vec::new(),
		}
	}

	/// Adds `entity` to the member set, or records the op for replay when
	/// the filter is locked.
	pub fn add_entity(&mut self, entity: EntityId) {
		if self.lock > 0 {
			self.pending.push(DelayedOp { added: true, entity });
			return;
		}

		ecs_assert!(
			self.sparse[entity as usize] == 0,
			"Entity {} is already in the filter",
			entity
		);
		self.dense.push(entity);
		self.sparse[entity as usize] = self.dense.len() as u32;
	}

	/// Removes `entity` from the member set, or records the op for replay
	/// when the filter is locked. The hole is filled by the last member, so
	/// positions are unstable across removals.
	pub fn remove_entity(&mut self, entity: EntityId) {
		if self.lock > 0 {
			self.pending.push(DelayedOp { added: false, entity });
			return;
		}

		let position = self.sparse[entity as usize];
		ecs_assert!(position > 0, "Entity {} is not in the filter", entity);
		self.sparse[entity as usize] = 0;

		let index = (position - 1) as usize;
		let last = self.dense.pop().unwrap();
		if index < self.dense.len() {
			self.dense[index] = last;
			self.sparse[last as usize] = position;
		}
	}

	pub fn resize(&mut self, capacity: usize) {
		self.sparse.resize(capacity, 0);
	}
}
