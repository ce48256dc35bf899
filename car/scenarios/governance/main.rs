/// Epistemic standards for algorithmic policy advice.
pub mod epistemology;
/// Oversight options for automated benefits decisions.
pub mod oversight;

pub use epistemology::PolicyEpistemology;
pub use oversight::BenefitsOversight;
