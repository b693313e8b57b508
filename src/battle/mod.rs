pub mod ai;
pub mod engine;
pub mod interfaces;
pub mod phase;
mod phases;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod turn_orchestrator;

#[cfg(test)]
mod tests;
