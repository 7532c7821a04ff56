use crate::components::ComponentTypeId;

/// A piece of data attached to at most one entity per type.
///
/// `Default` supplies the value of a freshly attached slot, `Clone` backs
/// the boxed snapshots handed out by
/// [`ErasedPool::get_raw`](crate::components::ErasedPool::get_raw).
pub trait Component
where
	Self: 'static + Default + Clone,
{
	/// Retrieves the component type's process-wide identifier.
	fn component_type_id() -> ComponentTypeId;

	/// The slot-reset hook, for types declaring the [AutoReset] capability.
	///
	/// The pool captures this once at construction. The hook runs when a
	/// fresh slot is allocated and on every detach; without it, detached
	/// slots are reset by assigning the default value.
	fn reset_hook() -> Option<fn(&mut Self)> {
		None
	}
}

/// Opt-in capability for components that (re)initialize their slot
/// themselves, e.g. to keep a heap allocation alive across lives of the
/// slot.
///
/// Wired up by `#[component(auto_reset)]` on a derived [Component]. The
/// hook runs with the world mid-operation and must not touch entity
/// structure.
pub trait AutoReset {
	fn auto_reset(&mut self);
}
