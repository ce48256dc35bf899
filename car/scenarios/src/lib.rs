#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Healthcare and governance case studies rendered through the narrative runtime.

/// Framework advisors consulted by the examples.
#[path = "../advisors.rs"]
pub mod advisors;

/// Typed patient record shapes.
#[path = "../schema.rs"]
pub mod schema;

/// Healthcare examples.
#[path = "../healthcare/main.rs"]
pub mod healthcare;

/// Governance examples.
#[path = "../governance/main.rs"]
pub mod governance;

/// Registry of every shipped example.
#[path = "../catalog.rs"]
pub mod catalog;

pub use advisors::{CarGovernance, CarHealthcare};
pub use catalog::{catalog, default_suite};
pub use schema::{ConsentRecord, Diagnosis, Medication, PatientRecord};
