//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the world and executes every command against it.

mod simulation;

pub use simulation::{Command, SimulationWorker, WorkerSettings};
