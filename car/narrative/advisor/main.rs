/// The advisor trait.
pub mod contract;
/// Advisors backed by pre-authored analyses or closures.
pub mod fixed;
/// Validation and telemetry around advisor calls.
pub mod gate;

pub use contract::Advisor;
pub use fixed::{FnAdvisor, StaticAdvisor};
pub use gate::AdvisorGate;
