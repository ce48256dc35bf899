/// Secondary use of patient records for model training.
pub mod records;
/// ICU ventilator allocation under scarcity.
pub mod triage;

pub use records::RecordsSecondaryUse;
pub use triage::VentilatorTriage;
