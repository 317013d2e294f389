pub mod reports;
pub mod rosters;
pub mod seeds;
pub mod simulation;

pub use rosters::RosterProfile;
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use simulation::{RunSettings, ScenarioResult, run_scenario};
