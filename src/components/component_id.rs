use std::sync::atomic::{AtomicUsize, Ordering};
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::any::TypeId;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;
type IdMap = HashMap<TypeId, ComponentTypeId, Hasher>;

lazy_static! {
	static ref COMPONENT_TYPE_IDS: RwLock<IdMap> = RwLock::new(HashMap::default());
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A `ComponentTypeId` is the process-wide fingerprint of a type usable as a
/// [`Component`](crate::components::Component).
///
/// Ids are dense small integers, so a world can map them to its own pools
/// with a flat array. They say nothing about which worlds actually store the
/// type.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct ComponentTypeId {
	value: usize,
}

impl ComponentTypeId {
	/// Get the [ComponentTypeId] of the type `T`.
	pub fn of<T: 'static>() -> ComponentTypeId {
		let ids = COMPONENT_TYPE_IDS.read();
		match ids.get(&TypeId::of::<T>()) {
			Some(id) => *id,
			None => {
				drop(ids);
				intern::<T>()
			},
		}
	}

	pub(crate) const fn value(&self) -> usize {
		self.value
	}
}

/// Mints a fresh id without interning it.
/// Intended for #\[derive([Component](crate::components::Component))],
/// which caches the result once per type.
pub fn next_component_type_id() -> ComponentTypeId {
	ComponentTypeId {
		value: NEXT_ID.fetch_add(1, Ordering::Relaxed),
	}
}

#[inline(never)]
fn intern<T: 'static>() -> ComponentTypeId {
	let mut ids = COMPONENT_TYPE_IDS.write();
	*ids.entry(TypeId::of::<T>()).or_insert_with(|| ComponentTypeId {
		value: NEXT_ID.fetch_add(1, Ordering::Relaxed),
	})
}
