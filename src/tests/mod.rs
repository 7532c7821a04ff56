mod world_tests;
mod systems_tests;
