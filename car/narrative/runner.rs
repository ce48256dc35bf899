use std::{io::Write, sync::Arc};

use car_logging::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    advisor::{Advisor, AdvisorGate},
    config::AdvisorConfig,
    error::{NarrativeError, NarrativeResult},
    render::{RenderStyle, RenderTemplate, RenderedDocument, Renderer},
    telemetry::NarrativeTelemetry,
    tree::{AnalysisResult, ScenarioDefinition},
};

/// One runnable example: its definition, config, advisor, and template.
pub trait ExampleScenario: Send + Sync {
    /// Unique, kebab-case name.
    fn name(&self) -> &str;

    /// One-line summary.
    fn description(&self) -> &str;

    /// Builds the scenario definition.
    fn definition(&self) -> NarrativeResult<ScenarioDefinition>;

    /// Default advisor configuration.
    fn config(&self) -> AdvisorConfig;

    /// Advisor consulted for this example.
    fn advisor(&self) -> Arc<dyn Advisor>;

    /// Document template.
    fn template(&self) -> NarrativeResult<RenderTemplate>;
}

/// Settings shared by every run of a runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Render style.
    pub style: RenderStyle,
    /// Merged over each example's own config when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_override: Option<AdvisorConfig>,
}

/// Outcome of one example: the inputs, the analysis, and the rendered text.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    /// Run id.
    pub id: Uuid,
    /// Example name.
    pub scenario: String,
    /// Advisor label.
    pub advisor: String,
    /// Definition that was analysed.
    pub definition: ScenarioDefinition,
    /// Advisor output.
    pub analysis: AnalysisResult,
    /// Rendered document.
    pub document: RenderedDocument,
    /// Completion time.
    pub completed_at: DateTime<Utc>,
}

/// Runs examples: build, validate config, analyse, render.
#[derive(Debug, Default)]
pub struct ExampleRunner {
    renderer: Renderer,
    config_override: Option<AdvisorConfig>,
    telemetry: Option<NarrativeTelemetry>,
}

impl ExampleRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new(config: RunnerConfig, telemetry: Option<NarrativeTelemetry>) -> Self {
        Self {
            renderer: Renderer::new(config.style),
            config_override: config.config_override,
            telemetry,
        }
    }

    /// Telemetry handle, if any.
    #[must_use]
    pub const fn telemetry(&self) -> Option<&NarrativeTelemetry> {
        self.telemetry.as_ref()
    }

    /// Runs `example` and writes its document to `out` once rendering has
    /// fully succeeded. The run counts as rendered only after the write.
    pub fn run(
        &self,
        example: &dyn ExampleScenario,
        out: &mut dyn Write,
    ) -> NarrativeResult<ScenarioRun> {
        self.track(example, |run| Ok(run.document.write_to(out)?))
    }

    /// Runs `example` without writing anything.
    pub fn prepare(&self, example: &dyn ExampleScenario) -> NarrativeResult<ScenarioRun> {
        self.track(example, |_| Ok(()))
    }

    fn track<F>(&self, example: &dyn ExampleScenario, deliver: F) -> NarrativeResult<ScenarioRun>
    where
        F: FnOnce(&ScenarioRun) -> NarrativeResult<()>,
    {
        self.log(
            LogLevel::Info,
            "narrative.scenario.started",
            json!({ "scenario": example.name() }),
        );
        self.event(
            "narrative.scenario.started",
            json!({ "scenario": example.name() }),
        );
        let result = self
            .execute(example)
            .and_then(|run| deliver(&run).map(|()| run));
        match &result {
            Ok(run) => {
                let payload = json!({
                    "scenario": run.scenario,
                    "run_id": run.id,
                    "advisor": run.advisor,
                    "lines": run.document.len(),
                    "sections": run.document.sections(),
                });
                self.log(LogLevel::Info, "narrative.scenario.rendered", payload.clone());
                self.event("narrative.scenario.rendered", payload);
            }
            Err(err) => self.report_failure(example.name(), err),
        }
        result
    }

    fn execute(&self, example: &dyn ExampleScenario) -> NarrativeResult<ScenarioRun> {
        let definition = example.definition()?;
        let template = example.template()?;
        let config = match &self.config_override {
            Some(overrides) => example.config().merged_with(overrides),
            None => example.config(),
        };
        let gate = AdvisorGate::new(example.advisor(), self.telemetry.clone());
        let analysis = gate.consult(&definition, &config)?;
        let document = self
            .renderer
            .render(&template, &definition, Some(&analysis))?;
        Ok(ScenarioRun {
            id: Uuid::new_v4(),
            scenario: example.name().to_string(),
            advisor: gate.label().to_string(),
            definition,
            analysis,
            document,
            completed_at: Utc::now(),
        })
    }

    fn report_failure(&self, scenario: &str, err: &NarrativeError) {
        let payload = json!({
            "scenario": scenario,
            "kind": err.kind(),
            "error": err.to_string(),
        });
        self.log(LogLevel::Error, "narrative.scenario.failed", payload.clone());
        self.event("narrative.scenario.failed", payload);
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }

    fn event(&self, event_type: &str, payload: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.event(event_type, payload);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        advisor::{FnAdvisor, StaticAdvisor},
        config::ConfigRequirements,
        error::ConfigError,
        tree::build_definition,
    };
    use car_event_bus::MemoryEventBus;

    pub(crate) struct TriageExample {
        pub(crate) name: &'static str,
        pub(crate) advisor: Arc<dyn Advisor>,
    }

    impl TriageExample {
        pub(crate) fn new(name: &'static str) -> Self {
            let analysis = AnalysisResult::from_literal(json!({
                "recommendation": "allocate by clinical benefit",
                "concerns": ["bias in scoring", "transparency"],
            }))
            .unwrap();
            Self {
                name,
                advisor: Arc::new(
                    StaticAdvisor::new("car.healthcare", analysis).with_requirements(
                        ConfigRequirements::new().weight("ethicalEmphasis.justice"),
                    ),
                ),
            }
        }

        pub(crate) fn failing(name: &'static str) -> Self {
            Self {
                name,
                advisor: Arc::new(FnAdvisor::new("car.broken", |_, _| {
                    Err(NarrativeError::advisor("car.broken", "framework unavailable"))
                })),
            }
        }
    }

    impl ExampleScenario for TriageExample {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "ventilator triage"
        }

        fn definition(&self) -> NarrativeResult<ScenarioDefinition> {
            build_definition(json!({
                "title": "Ventilator allocation",
                "stakeholders": ["patients", "clinicians"],
            }))
        }

        fn config(&self) -> AdvisorConfig {
            AdvisorConfig::new().with_weight("ethicalEmphasis.justice", 0.7)
        }

        fn advisor(&self) -> Arc<dyn Advisor> {
            Arc::clone(&self.advisor)
        }

        fn template(&self) -> NarrativeResult<RenderTemplate> {
            RenderTemplate::builder()
                .definition("Case", "title")
                .definition("Stakeholders", "stakeholders")
                .analysis("Recommendation", "recommendation")
                .analysis("Concerns", "concerns")
                .build()
        }
    }

    #[test]
    fn run_returns_inputs_and_writes_document() {
        let runner = ExampleRunner::default();
        let mut out = Vec::new();
        let run = runner.run(&TriageExample::new("triage"), &mut out).unwrap();
        assert_eq!(run.scenario, "triage");
        assert_eq!(run.advisor, "car.healthcare");
        assert_eq!(run.definition.leaf_count(), 3);
        assert_eq!(run.analysis.leaf_count(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Case\nVentilator allocation\nStakeholders\n- patients\n- clinicians\n\
             Recommendation\nallocate by clinical benefit\n\
             Concerns\n- bias in scoring\n- transparency\n"
        );
    }

    #[test]
    fn override_is_validated_before_analysis_and_nothing_is_written() {
        let overrides = AdvisorConfig::new().with_weight("ethicalEmphasis.justice", 1.5);
        let runner = ExampleRunner::new(
            RunnerConfig {
                config_override: Some(overrides),
                ..RunnerConfig::default()
            },
            None,
        );
        let mut out = Vec::new();
        let err = runner
            .run(&TriageExample::new("triage"), &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            NarrativeError::Configuration(ConfigError::WeightOutOfRange { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn telemetry_tracks_success_and_failure() {
        let bus = Arc::new(MemoryEventBus::new(16));
        let telemetry = NarrativeTelemetry::builder("narrative")
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        let runner = ExampleRunner::new(RunnerConfig::default(), Some(telemetry));
        runner.prepare(&TriageExample::new("ok")).unwrap();
        assert!(runner.prepare(&TriageExample::failing("bad")).is_err());
        assert_eq!(
            bus.event_types(),
            vec![
                "narrative.scenario.started",
                "narrative.scenario.rendered",
                "narrative.scenario.started",
                "narrative.scenario.failed",
            ]
        );
        let failed = &bus.snapshot()[3];
        assert_eq!(failed.payload["kind"], json!("advisor"));
        assert_eq!(failed.payload["scenario"], json!("bad"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_is_reported_as_failure_not_rendered() {
        let bus = Arc::new(MemoryEventBus::new(16));
        let telemetry = NarrativeTelemetry::builder("narrative")
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        let runner = ExampleRunner::new(RunnerConfig::default(), Some(telemetry));
        let err = runner
            .run(&TriageExample::new("triage"), &mut ClosedPipe)
            .unwrap_err();
        assert_eq!(err.kind(), "io");
        assert_eq!(
            bus.event_types(),
            vec!["narrative.scenario.started", "narrative.scenario.failed"]
        );
        let failed = &bus.snapshot()[1];
        assert_eq!(failed.payload["kind"], json!("io"));
        assert_eq!(failed.payload["scenario"], json!("triage"));
    }

    #[test]
    fn style_flows_into_renderer() {
        let runner = ExampleRunner::new(
            RunnerConfig {
                style: RenderStyle::default().with_bullet("* "),
                config_override: None,
            },
            None,
        );
        let run = runner.prepare(&TriageExample::new("triage")).unwrap();
        assert!(run.document.lines().contains(&"* patients".to_string()));
    }
}
