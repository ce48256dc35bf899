use std::{fmt, io::Write, sync::Arc};

use car_logging::LogLevel;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use serde_json::json;

use crate::{
    error::{NarrativeError, NarrativeResult},
    runner::{ExampleRunner, ExampleScenario, ScenarioRun},
};

/// A failed example and why it failed.
#[derive(Debug)]
pub struct ScenarioFailure {
    /// Example name.
    pub scenario: String,
    /// Failure cause.
    pub error: NarrativeError,
}

impl Serialize for ScenarioFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScenarioFailure", 3)?;
        state.serialize_field("scenario", &self.scenario)?;
        state.serialize_field("kind", self.error.kind())?;
        state.serialize_field("error", &self.error.to_string())?;
        state.end()
    }
}

/// Results of a suite pass.
#[derive(Debug, Default, Serialize)]
pub struct SuiteReport {
    /// Successful runs in execution order.
    pub runs: Vec<ScenarioRun>,
    /// Failed examples in execution order.
    pub failures: Vec<ScenarioFailure>,
}

impl SuiteReport {
    /// True when no example failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Examples attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.runs.len() + self.failures.len()
    }

    /// Successful run of `scenario`.
    #[must_use]
    pub fn run(&self, scenario: &str) -> Option<&ScenarioRun> {
        self.runs.iter().find(|run| run.scenario == scenario)
    }

    /// Failure of `scenario`.
    #[must_use]
    pub fn failure(&self, scenario: &str) -> Option<&ScenarioFailure> {
        self.failures
            .iter()
            .find(|failure| failure.scenario == scenario)
    }
}

/// Ordered collection of independent examples.
#[derive(Clone, Default)]
pub struct ScenarioSuite {
    examples: Vec<Arc<dyn ExampleScenario>>,
}

impl fmt::Debug for ScenarioSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioSuite")
            .field("examples", &self.names())
            .finish()
    }
}

impl ScenarioSuite {
    /// Empty suite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an example; an example with the same name is replaced in place.
    #[must_use]
    pub fn register(mut self, example: Arc<dyn ExampleScenario>) -> Self {
        self.push(example);
        self
    }

    /// In-place variant of [`Self::register`].
    pub fn push(&mut self, example: Arc<dyn ExampleScenario>) {
        match self
            .examples
            .iter()
            .position(|existing| existing.name() == example.name())
        {
            Some(idx) => self.examples[idx] = example,
            None => self.examples.push(example),
        }
    }

    /// Example names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.examples.iter().map(|example| example.name()).collect()
    }

    /// Registered examples in order.
    #[must_use]
    pub fn examples(&self) -> &[Arc<dyn ExampleScenario>] {
        &self.examples
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True without examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Example registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ExampleScenario>> {
        self.examples.iter().find(|example| example.name() == name)
    }

    /// Sub-suite with the named examples in the requested order. An empty
    /// selection keeps every example.
    pub fn select(&self, names: &[String]) -> NarrativeResult<Self> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        let mut selected = Self::new();
        for name in names {
            let example = self
                .get(name)
                .ok_or_else(|| NarrativeError::UnknownScenario(name.clone()))?;
            selected.push(Arc::clone(example));
        }
        Ok(selected)
    }

    /// Runs every example in order. A failure is recorded and the remaining
    /// examples still run.
    pub fn run_all(&self, runner: &ExampleRunner, out: &mut dyn Write) -> SuiteReport {
        let mut report = SuiteReport::default();
        for example in &self.examples {
            match runner.run(example.as_ref(), out) {
                Ok(run) => report.runs.push(run),
                Err(error) => report.failures.push(ScenarioFailure {
                    scenario: example.name().to_string(),
                    error,
                }),
            }
        }
        if let Some(tel) = runner.telemetry() {
            let level = if report.is_success() {
                LogLevel::Info
            } else {
                LogLevel::Warn
            };
            let payload = json!({
                "attempted": report.attempted(),
                "succeeded": report.runs.len(),
                "failed": report.failures.iter().map(|f| f.scenario.as_str()).collect::<Vec<_>>(),
            });
            let _ = tel.log(level, "narrative.suite.completed", payload.clone());
            let _ = tel.event("narrative.suite.completed", payload);
        }
        report
    }
}
