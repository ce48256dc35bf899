use std::sync::Arc;

use car_narrative::{ExampleScenario, ScenarioSuite};

use crate::{
    governance::{BenefitsOversight, PolicyEpistemology},
    healthcare::{RecordsSecondaryUse, VentilatorTriage},
};

/// Every shipped example, in presentation order.
#[must_use]
pub fn catalog() -> Vec<Arc<dyn ExampleScenario>> {
    vec![
        Arc::new(VentilatorTriage),
        Arc::new(RecordsSecondaryUse),
        Arc::new(PolicyEpistemology),
        Arc::new(BenefitsOversight),
    ]
}

/// Suite holding the whole catalog.
#[must_use]
pub fn default_suite() -> ScenarioSuite {
    catalog().into_iter().fold(ScenarioSuite::new(), ScenarioSuite::register)
}
