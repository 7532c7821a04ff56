use crate::components::{Component, ComponentPool, ErasedPool, Pool};
use crate::entities::{EntityId, EntityTable, PackedEntity, PackedEntityWithWorld};
use crate::filters::{Filter, FilterData, Mask, MaskBuilder, MaskListsPool};
use std::sync::atomic::{AtomicU32, Ordering};
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use std::marker::PhantomData;
use crate::ecs_assert;
use std::any::Any;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(1);

/// Initial capacities for a [World]. All values must be positive.
///
/// Capacities only size the first allocations; every storage grows by
/// doubling and never shrinks.
#[derive(Copy, Clone, Debug)]
pub struct Config {
	pub entities: usize,
	pub recycled_entities: usize,
	pub pools: usize,
	pub filters: usize,
}

impl Config {
	pub const DEFAULT_ENTITIES: usize = 512;
	pub const DEFAULT_RECYCLED_ENTITIES: usize = 512;
	pub const DEFAULT_POOLS: usize = 512;
	pub const DEFAULT_FILTERS: usize = 512;
}

impl Default for Config {
	fn default() -> Self {
		Self {
			entities: Self::DEFAULT_ENTITIES,
			recycled_entities: Self::DEFAULT_RECYCLED_ENTITIES,
			pools: Self::DEFAULT_POOLS,
			filters: Self::DEFAULT_FILTERS,
		}
	}
}

/// A container for entities, their typed component pools and the filters
/// kept in sync with every attach and detach.
///
/// A world is strictly single-threaded: nothing in it is safe for
/// concurrent mutation and no synchronization is attempted.
pub struct World {
	id: u32,
	alive: bool,
	pub(crate) entities: EntityTable,
	pub(crate) pools: Vec<Box<dyn ErasedPool>>,
	by_type: Vec<Option<usize>>,
	pub(crate) filters: Vec<FilterData>,
	by_hash: HashMap<u64, usize, Hasher>,
	included_in: Vec<Vec<usize>>,
	excluded_in: Vec<Vec<usize>>,
	pub(crate) mask_scratch: MaskListsPool,
}

impl World {
	pub fn new(config: Config) -> Self {
		ecs_assert!(
			config.entities > 0
				&& config.recycled_entities > 0
				&& config.pools > 0
				&& config.filters > 0,
			"World capacities must be positive"
		);

		Self {
			id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
			alive: true,
			entities: EntityTable::with_capacity(config.entities, config.recycled_entities),
			pools: Vec::with_capacity(config.pools),
			by_type: Vec::new(),
			filters: Vec::with_capacity(config.filters),
			by_hash: HashMap::default(),
			included_in: Vec::with_capacity(config.pools),
			excluded_in: Vec::with_capacity(config.pools),
			mask_scratch: MaskListsPool::default(),
		}
	}

	/// Process-unique identity of this world, captured by
	/// [packed handles](PackedEntityWithWorld).
	pub fn id(&self) -> u32 {
		self.id
	}

	pub fn is_alive(&self) -> bool {
		self.alive
	}

	/// Destroys every live entity, drops all pools and filters and marks
	/// the world dead. Any further use is a contract violation.
	pub fn destroy(&mut self) {
		ecs_assert!(self.alive, "World has already been destroyed");
		ecs_assert!(
			self.filters.iter().all(|filter| filter.lock == 0),
			"World cannot be destroyed while a filter is locked"
		);

		for entity in 0..self.entities.len() as EntityId {
			if self.entities.is_alive(entity) {
				self.del_entity(entity);
			}
		}

		self.pools.clear();
		self.by_type.clear();
		self.filters.clear();
		self.by_hash.clear();
		self.included_in.clear();
		self.excluded_in.clear();
		self.alive = false;
	}

	/// Creates an entity with no components attached.
	///
	/// The id is recycled from a previous life when one is available. The
	/// caller must attach at least one component before handing control
	/// back to the outside, or destroy the entity again.
	pub fn new_entity(&mut self) -> EntityId {
		ecs_assert!(self.alive, "World has been destroyed");

		let (entity, grown) = self.entities.allocate();
		if let Some(capacity) = grown {
			for pool in self.pools.iter_mut() {
				pool.resize(capacity);
			}
			for filter in self.filters.iter_mut() {
				filter.resize(capacity);
			}
		}

		entity
	}

	/// Destroys `entity`: detaches every component, killing the entity from
	/// inside the final detach, or kills it directly when it has none.
	/// Destroying an already-dead entity is a silent no-op.
	pub fn del_entity(&mut self, entity: EntityId) {
		ecs_assert!(self.alive, "World has been destroyed");
		ecs_assert!(
			(entity as usize) < self.entities.len(),
			"Entity {} was never created",
			entity
		);

		if !self.entities.is_alive(entity) {
			return;
		}

		if self.entities.record(entity).components > 0 {
			let mut index = 0;
			while self.entities.record(entity).components > 0 && index < self.pools.len() {
				if self.pools[index].has(entity) {
					self.del_component(entity, index);
				}
				index += 1;
			}

			ecs_assert!(
				!self.entities.is_alive(entity),
				"Entity {} could not be fully destroyed",
				entity
			);
			return;
		}

		self.entities.kill(entity);
	}

	pub fn is_entity_alive(&self, entity: EntityId) -> bool {
		self.entities.is_alive(entity)
	}

	/// Positive while the entity lives; negative magnitude is the next
	/// generation the id will receive.
	pub fn entity_generation(&self, entity: EntityId) -> i16 {
		ecs_assert!(
			(entity as usize) < self.entities.len(),
			"Entity {} was never created",
			entity
		);

		self.entities.generation(entity)
	}

	pub fn component_count(&self, entity: EntityId) -> usize {
		ecs_assert!(
			(entity as usize) < self.entities.len(),
			"Entity {} was never created",
			entity
		);

		self.entities.record(entity).components as usize
	}

	/// Collects every live entity id into `buffer`, returning the count.
	/// Entities that are transiently empty are reported too.
	pub fn get_all_entities(&self, buffer: &mut Vec<EntityId>) -> usize {
		buffer.clear();
		for entity in 0..self.entities.len() as EntityId {
			if self.entities.is_alive(entity) {
				buffer.push(entity);
			}
		}

		buffer.len()
	}

	/// Collects boxed snapshots of every component attached to `entity`
	/// into `buffer`, returning the count.
	pub fn get_components(&self, entity: EntityId, buffer: &mut Vec<Box<dyn Any>>) -> usize {
		ecs_assert!(self.entities.is_alive(entity), "Entity {} is not alive", entity);

		buffer.clear();
		for pool in self.pools.iter() {
			if pool.has(entity) {
				buffer.push(pool.get_raw(entity));
			}
		}

		buffer.len()
	}

	/// First live entity with no components, if any. That state may only
	/// exist transiently inside a structural operation; an entity still in
	/// it after a system callback has been leaked.
	#[cfg(debug_assertions)]
	pub fn first_leaked_entity(&self) -> Option<EntityId> {
		(0..self.entities.len() as EntityId).find(|&entity| {
			let record = self.entities.record(entity);
			record.generation > 0 && record.components == 0
		})
	}

	/// Returns the typed pool for `T`, creating it on first request.
	pub fn pool<T: Component>(&mut self) -> Pool<'_, T> {
		let index = self.ensure_pool::<T>();
		Pool {
			world: self,
			index,
			marker: PhantomData,
		}
	}

	/// Starts a filter mask seeded with `T` in the include list.
	pub fn filter<T: Component>(&mut self) -> MaskBuilder<'_> {
		let pool = self.ensure_pool::<T>();
		let lists = self.mask_scratch.take_seeded(pool);

		MaskBuilder { world: self, lists }
	}

	pub fn filter_count(&self, filter: Filter) -> usize {
		self.filters[filter.index].dense.len()
	}

	/// The current members of `filter`. The shared borrow freezes the
	/// world, so no lock is taken.
	pub fn filter_entities(&self, filter: Filter) -> &[EntityId] {
		&self.filters[filter.index].dense
	}

	/// Iterates `filter`, locking it for the duration of the pass.
	///
	/// The closure receives the world back and may mutate it freely,
	/// including attaching and detaching components on the entity at hand:
	/// changes to this filter's membership are deferred and replayed in
	/// order once the outermost pass over it ends, so every pass observes
	/// the snapshot taken when it started.
	pub fn for_each(&mut self, filter: Filter, mut func: impl FnMut(&mut World, EntityId)) {
		self.filters[filter.index].lock += 1;

		// Every structural change to this filter while the lock is held is
		// deferred, so the member list is frozen and positions stay valid
		// for the whole pass.
		let count = self.filters[filter.index].dense.len();
		for position in 0..count {
			let entity = self.filters[filter.index].dense[position];
			func(self, entity);
		}

		self.unlock_filter(filter.index);
	}

	/// Captures a cross-frame reference to `entity`.
	pub fn pack(&self, entity: EntityId) -> PackedEntity {
		ecs_assert!(self.entities.is_alive(entity), "Entity {} is not alive", entity);

		PackedEntity {
			id: entity,
			generation: self.entities.generation(entity),
		}
	}

	/// Like [pack](World::pack), additionally binding this world's
	/// identity.
	pub fn pack_with_world(&self, entity: EntityId) -> PackedEntityWithWorld {
		ecs_assert!(self.entities.is_alive(entity), "Entity {} is not alive", entity);

		PackedEntityWithWorld {
			world: self.id,
			id: entity,
			generation: self.entities.generation(entity),
		}
	}

	pub(crate) fn ensure_pool<T: Component>(&mut self) -> usize {
		ecs_assert!(self.alive, "World has been destroyed");

		let type_id = T::component_type_id().value();
		if type_id >= self.by_type.len() {
			self.by_type.resize(type_id + 1, None);
		}
		if let Some(index) = self.by_type[type_id] {
			return index;
		}

		let index = self.pools.len();
		self.pools.push(Box::new(ComponentPool::<T>::new(index, self.entities.capacity())));
		self.by_type[type_id] = Some(index);
		self.included_in.push(Vec::new());
		self.excluded_in.push(Vec::new());
		index
	}

	pub(crate) fn pool_storage<T: Component>(&self, index: usize) -> &ComponentPool<T> {
		self.pools[index].as_any().downcast_ref().unwrap()
	}

	pub(crate) fn pool_storage_mut<T: Component>(&mut self, index: usize) -> &mut ComponentPool<T> {
		self.pools[index].as_any_mut().downcast_mut().unwrap()
	}

	/// Detach choreography shared by [Pool::del] and [del_entity]: the
	/// dispatch happens before the slot is cleared, so filters observe the
	/// pre-detach state.
	///
	/// [del_entity]: World::del_entity
	pub(crate) fn del_component(&mut self, entity: EntityId, pool: usize) {
		if !self.pools[pool].has(entity) {
			return;
		}

		self.on_entity_change(entity, pool, false);
		self.pools[pool].del_raw(entity);

		let record = self.entities.record_mut(entity);
		record.components -= 1;
		if record.components == 0 {
			self.del_entity(entity);
		}
	}

	/// Routes one attach/detach event to every filter whose mask references
	/// the pool.
	///
	/// Invoked after presence and component count have been updated for an
	/// attach and before they are cleared for a detach;
	/// [mask_compatible_without] supplies the counterfactual view of the
	/// in-flux pool where the other side of the event is needed.
	pub(crate) fn on_entity_change(&mut self, entity: EntityId, pool: usize, added: bool) {
		let World {
			filters,
			pools,
			included_in,
			excluded_in,
			..
		} = self;

		if added {
			for &index in &included_in[pool] {
				if mask_compatible(&filters[index].mask, pools.as_slice(), entity) {
					filters[index].add_entity(entity);
				}
			}
			for &index in &excluded_in[pool] {
				if mask_compatible_without(&filters[index].mask, pools.as_slice(), entity, pool) {
					filters[index].remove_entity(entity);
				}
			}
		} else {
			for &index in &included_in[pool] {
				if mask_compatible(&filters[index].mask, pools.as_slice(), entity) {
					filters[index].remove_entity(entity);
				}
			}
			for &index in &excluded_in[pool] {
				if mask_compatible_without(&filters[index].mask, pools.as_slice(), entity, pool) {
					filters[index].add_entity(entity);
				}
			}
		}
	}

	pub(crate) fn resolve_filter(&mut self, mask: Mask, capacity: usize) -> Filter {
		ecs_assert!(self.alive, "World has been destroyed");

		if let Some(&index) = self.by_hash.get(&mask.hash) {
			ecs_assert!(
				self.filters[index].mask == mask,
				"Mask hash collision against filter {}",
				index
			);
			return Filter { index };
		}

		let index = self.filters.len();
		let mut data = FilterData::new(mask, capacity, self.entities.capacity());

		for &pool in &data.mask.include {
			self.included_in[pool].push(index);
		}
		for &pool in &data.mask.exclude {
			self.excluded_in[pool].push(index);
		}

		for entity in 0..self.entities.len() as EntityId {
			let record = self.entities.record(entity);
			if record.generation > 0
				&& record.components > 0
				&& mask_compatible(&data.mask, self.pools.as_slice(), entity)
			{
				data.add_entity(entity);
			}
		}

		self.by_hash.insert(data.mask.hash, index);
		self.filters.push(data);
		Filter { index }
	}

	fn unlock_filter(&mut self, index: usize) {
		let filter = &mut self.filters[index];
		ecs_assert!(filter.lock > 0, "Filter {} is not locked", index);

		filter.lock -= 1;
		if filter.lock == 0 && !filter.pending.is_empty() {
			let mut pending = std::mem::take(&mut filter.pending);
			for op in pending.drain(..) {
				if op.added {
					self.filters[index].add_entity(op.entity);
				} else {
					self.filters[index].remove_entity(op.entity);
				}
			}
			self.filters[index].pending = pending;
		}
	}
}

impl Default for World {
	fn default() -> Self {
		Self::new(Config::default())
	}
}

/// True when every include pool reports presence for `entity` and no
/// exclude pool does.
fn mask_compatible(mask: &Mask, pools: &[Box<dyn ErasedPool>], entity: EntityId) -> bool {
	for &include in &mask.include {
		if !pools[include].has(entity) {
			return false;
		}
	}
	for &exclude in &mask.exclude {
		if pools[exclude].has(entity) {
			return false;
		}
	}

	true
}

/// Like [mask_compatible], with pool `without` treated as absent on
/// `entity`, so membership can be evaluated as of just before an attach or
/// just after a detach of that pool.
fn mask_compatible_without(
	mask: &Mask, pools: &[Box<dyn ErasedPool>], entity: EntityId, without: usize,
) -> bool {
	for &include in &mask.include {
		if include == without || !pools[include].has(entity) {
			return false;
		}
	}
	for &exclude in &mask.exclude {
		if exclude != without && pools[exclude].has(entity) {
			return false;
		}
	}

	true
}
