use crate::systems::Systems;

/// Logic driven by a [Systems] container.
///
/// Every phase is optional; a system participates in the ones it overrides.
/// `S` is the shared value carried by the container.
pub trait System<S: 'static = ()> {
	/// Runs once, before any [init](System::init).
	fn pre_init(&mut self, _systems: &mut Systems<S>) {}

	/// Runs once, after every [pre_init](System::pre_init) has finished.
	fn init(&mut self, _systems: &mut Systems<S>) {}

	/// Runs on every tick, in registration order.
	fn run(&mut self, _systems: &mut Systems<S>) {}

	/// Runs once at teardown, in reverse registration order.
	fn destroy(&mut self, _systems: &mut Systems<S>) {}

	/// Runs once after every [destroy](System::destroy) has finished, in
	/// reverse registration order.
	fn post_destroy(&mut self, _systems: &mut Systems<S>) {}
}
