use crate::components::{Component, ComponentTypeId};
use crate::entities::EntityId;
use std::marker::PhantomData;
use crate::ecs_assert;
use std::any::Any;
use crate::World;

/// The erased face of a component pool, letting pools of different types
/// live side by side in one world.
///
/// The typed surface is reached through [World::pool], which downcasts the
/// registered pool back to its concrete storage.
pub trait ErasedPool: Any {
	/// World-unique id assigned at pool creation, in registration order.
	fn pool_id(&self) -> usize;

	/// Process-wide fingerprint of the stored component type.
	fn component_type_id(&self) -> ComponentTypeId;

	fn has(&self, entity: EntityId) -> bool;

	/// Clears the slot without touching the entity record or the filters;
	/// the world performs that choreography around this call.
	fn del_raw(&mut self, entity: EntityId);

	/// Widens the entity-indexed storage; fresh entries hold no component.
	fn resize(&mut self, capacity: usize);

	/// Boxed snapshot of the component, for reflection-style enumeration.
	fn get_raw(&self, entity: EntityId) -> Box<dyn Any>;

	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse/dense storage for all components of type `T` within one world.
///
/// `sparse` maps an entity id to a 1-based index into `dense`, zero meaning
/// absent; slot 0 of `dense` backs that sentinel and is never handed out.
/// Detached slots go onto a free list and keep their reset value, so a
/// recycled slot skips the reset hook.
pub(crate) struct ComponentPool<T: Component> {
	id: usize,
	sparse: Vec<u32>,
	dense: Vec<T>,
	recycled: Vec<u32>,
	reset: Option<fn(&mut T)>,
}

impl<T: Component> ComponentPool<T> {
	pub fn new(id: usize, entity_capacity: usize) -> Self {
		let mut dense = Vec::with_capacity(entity_capacity + 1);
		dense.push(T::default());

		Self {
			id,
			dense,
			sparse: vec![0; entity_capacity],
			recycled: Vec::new(),
			reset: T::reset_hook(),
		}
	}

	/// Marks presence and readies the slot. Fresh slots run the reset hook
	/// exactly once; recycled slots already hold a reset value.
	pub fn alloc(&mut self, entity: EntityId) {
		let index = match self.recycled.pop() {
			Some(index) => index,
			None => {
				self.dense.push(T::default());
				let index = (self.dense.len() - 1) as u32;
				if let Some(reset) = self.reset {
					reset(&mut self.dense[index as usize]);
				}
				index
			},
		};

		self.sparse[entity as usize] = index;
	}

	pub fn value(&self, entity: EntityId) -> &T {
		&self.dense[self.sparse[entity as usize] as usize]
	}

	pub fn value_mut(&mut self, entity: EntityId) -> &mut T {
		&mut self.dense[self.sparse[entity as usize] as usize]
	}
}

impl<T: Component> ErasedPool for ComponentPool<T> {
	fn pool_id(&self) -> usize {
		self.id
	}

	fn component_type_id(&self) -> ComponentTypeId {
		T::component_type_id()
	}

	#[inline(always)]
	fn has(&self, entity: EntityId) -> bool {
		self.sparse[entity as usize] > 0
	}

	fn del_raw(&mut self, entity: EntityId) {
		let index = std::mem::replace(&mut self.sparse[entity as usize], 0);
		let slot = &mut self.dense[index as usize];
		match self.reset {
			Some(reset) => reset(slot),
			None => *slot = T::default(),
		}
		self.recycled.push(index);
	}

	fn resize(&mut self, capacity: usize) {
		self.sparse.resize(capacity, 0);
	}

	fn get_raw(&self, entity: EntityId) -> Box<dyn Any> {
		Box::new(self.value(entity).clone())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// Typed access to the components of `T` within a world.
///
/// The handle borrows the world: structural calls route their attach or
/// detach event to every interested filter before returning.
pub struct Pool<'w, T: Component> {
	pub(crate) world: &'w mut World,
	pub(crate) index: usize,
	pub(crate) marker: PhantomData<T>,
}

impl<'w, T: Component> Pool<'w, T> {
	/// Attaches `T` to `entity` and returns the fresh slot.
	///
	/// Attaching to a dead entity or attaching a duplicate component is a
	/// contract violation.
	pub fn add(&mut self, entity: EntityId) -> &mut T {
		ecs_assert!(
			self.world.is_entity_alive(entity),
			"Cannot add {} to dead entity {}",
			std::any::type_name::<T>(),
			entity
		);
		ecs_assert!(
			!self.storage().has(entity),
			"{} is already attached to entity {}",
			std::any::type_name::<T>(),
			entity
		);

		self.storage_mut().alloc(entity);
		self.world.entities.record_mut(entity).components += 1;
		self.world.on_entity_change(entity, self.index, true);
		self.storage_mut().value_mut(entity)
	}

	/// Accesses the component attached to `entity`. Pure accessor: no
	/// filter is notified.
	///
	/// Reading an absent component is a contract violation.
	pub fn get(&mut self, entity: EntityId) -> &mut T {
		ecs_assert!(
			self.world.is_entity_alive(entity),
			"Cannot get {} of dead entity {}",
			std::any::type_name::<T>(),
			entity
		);
		ecs_assert!(
			self.storage().has(entity),
			"Entity {} has no {}",
			entity,
			std::any::type_name::<T>()
		);

		self.storage_mut().value_mut(entity)
	}

	pub fn has(&self, entity: EntityId) -> bool {
		ecs_assert!(
			self.world.is_entity_alive(entity),
			"Cannot query {} of dead entity {}",
			std::any::type_name::<T>(),
			entity
		);

		self.storage().has(entity)
	}

	/// Detaches `T` from `entity`; a no-op when absent. Detaching the last
	/// component destroys the entity.
	pub fn del(&mut self, entity: EntityId) {
		ecs_assert!(
			self.world.is_entity_alive(entity),
			"Cannot del {} of dead entity {}",
			std::any::type_name::<T>(),
			entity
		);

		self.world.del_component(entity, self.index);
	}

	fn storage(&self) -> &ComponentPool<T> {
		self.world.pool_storage(self.index)
	}

	fn storage_mut(&mut self) -> &mut ComponentPool<T> {
		self.world.pool_storage_mut(self.index)
	}
}
