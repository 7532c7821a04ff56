use std::ops::{Deref, DerefMut};
use crate::components::Component;
use crate::filters::Filter;
use std::cell::RefCell;
use crate::ecs_assert;
use std::rc::Rc;
use crate::World;

const HASH_PRIME: u64 = 314159;
const DEFAULT_CAPACITY: usize = 512;

/// Sorted, deduplicated include/exclude pool-id lists plus their canonical
/// hash.
///
/// Equal masks always hash equally, so the world can dedup filters by hash
/// alone; include and exclude contribute to the mix with opposite signs to
/// keep `inc A` and `exc A` apart.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Mask {
	pub include: Vec<usize>,
	pub exclude: Vec<usize>,
	pub hash: u64,
}

impl Mask {
	pub fn new(include: &[usize], exclude: &[usize]) -> Self {
		let mut include = include.to_vec();
		let mut exclude = exclude.to_vec();
		include.sort_unstable();
		exclude.sort_unstable();

		let mut hash = (include.len() + exclude.len()) as u64;
		for id in &include {
			hash = hash.wrapping_mul(HASH_PRIME).wrapping_add(*id as u64);
		}
		for id in &exclude {
			hash = hash.wrapping_mul(HASH_PRIME).wrapping_sub(*id as u64);
		}

		Self { include, exclude, hash }
	}
}

/// Scratch state of a [MaskBuilder].
#[derive(Default)]
pub(crate) struct MaskLists {
	pub include: Vec<usize>,
	pub exclude: Vec<usize>,
}

/// Retired builder lists, kept so their allocations survive across builds.
///
/// Taking a set clears whatever the previous build left behind, so a
/// builder always starts from nothing but its seed.
#[derive(Default)]
pub(crate) struct MaskListsPool {
	retired: Rc<RefCell<Vec<MaskLists>>>,
}

impl MaskListsPool {
	/// Takes a reset set of lists carrying `include` as the only entry.
	pub fn take_seeded(&mut self, include: usize) -> MaskListsBorrow {
		let mut lists = self.retired.borrow_mut().pop().unwrap_or_default();
		lists.include.clear();
		lists.exclude.clear();
		lists.include.push(include);

		MaskListsBorrow {
			lists: Some(lists),
			retired: self.retired.clone(),
		}
	}
}

/// Owning guard over a taken [MaskLists]; hands the lists back to the pool
/// when dropped, whether or not the build finished.
pub(crate) struct MaskListsBorrow {
	lists: Option<MaskLists>,
	retired: Rc<RefCell<Vec<MaskLists>>>,
}

impl Deref for MaskListsBorrow {
	type Target = MaskLists;
	fn deref(&self) -> &Self::Target {
		self.lists.as_ref().unwrap()
	}
}

impl DerefMut for MaskListsBorrow {
	fn deref_mut(&mut self) -> &mut Self::Target {
		self.lists.as_mut().unwrap()
	}
}

impl Drop for MaskListsBorrow {
	fn drop(&mut self) {
		if let Some(lists) = self.lists.take() {
			self.retired.borrow_mut().push(lists);
		}
	}
}

/// Accumulates include/exclude component types and resolves to a [Filter].
///
/// Obtained from [World::filter], which seeds the include list. Listing the
/// same component type twice, in either list, is a contract violation.
pub struct MaskBuilder<'w> {
	pub(crate) world: &'w mut World,
	pub(crate) lists: MaskListsBorrow,
}

impl<'w> MaskBuilder<'w> {
	/// Requires `T` on every matching entity.
	pub fn inc<T: Component>(mut self) -> Self {
		let pool = self.world.ensure_pool::<T>();
		ecs_assert!(
			!self.lists.include.contains(&pool) && !self.lists.exclude.contains(&pool),
			"{} is already part of the mask",
			std::any::type_name::<T>()
		);

		self.lists.include.push(pool);
		self
	}

	/// Rejects every entity carrying `T`.
	pub fn exc<T: Component>(mut self) -> Self {
		let pool = self.world.ensure_pool::<T>();
		ecs_assert!(
			!self.lists.include.contains(&pool) && !self.lists.exclude.contains(&pool),
			"{} is already part of the mask",
			std::any::type_name::<T>()
		);

		self.lists.exclude.push(pool);
		self
	}

	/// Resolves to the canonical filter for this mask, creating it on first
	/// use and returning the existing one otherwise.
	pub fn end(self) -> Filter {
		self.end_with_capacity(DEFAULT_CAPACITY)
	}

	/// Like [end](MaskBuilder::end), sizing a newly created filter for
	/// `capacity` expected members.
	pub fn end_with_capacity(self, capacity: usize) -> Filter {
		let MaskBuilder { world, lists } = self;
		let mask = Mask::new(&lists.include, &lists.exclude);
		drop(lists);
		world.resolve_filter(mask, capacity)
	}
}
