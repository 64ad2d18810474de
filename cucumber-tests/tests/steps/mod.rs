pub mod population_steps;
pub mod resolver_steps;
pub mod world;
