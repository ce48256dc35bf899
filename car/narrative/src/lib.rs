#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Scenario narrative runtime: definition trees, the advisor boundary,
//! directive-driven rendering, and example runners.

/// Error taxonomy shared by every stage.
#[path = "../error.rs"]
pub mod error;

/// Dotted field paths into scenario trees.
#[path = "../path.rs"]
pub mod path;

/// Recursive scenario trees, definitions, and analysis results.
#[path = "../tree.rs"]
pub mod tree;

/// Advisor configuration and declared requirements.
#[path = "../config.rs"]
pub mod config;

/// Advisor contract and stock implementations.
#[path = "../advisor/main.rs"]
pub mod advisor;

/// Directive templates and the text renderer.
#[path = "../render/main.rs"]
pub mod render;

/// Telemetry builder/hook for narrative components.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Single-example runner.
#[path = "../runner.rs"]
pub mod runner;

/// Multi-example suite driver.
#[path = "../suite.rs"]
pub mod suite;

pub use advisor::{Advisor, AdvisorGate, FnAdvisor, StaticAdvisor};
pub use config::{AdvisorConfig, ConfigRequirements, OptionSpec, WeightSpec};
pub use error::{ConfigError, FieldFault, NarrativeError, NarrativeResult};
pub use path::FieldPath;
pub use render::{
    Directive, HeadingStyle, RenderStyle, RenderTemplate, RenderedDocument, Renderer, Source,
    TemplateBuilder,
};
pub use runner::{ExampleRunner, ExampleScenario, RunnerConfig, ScenarioRun};
pub use suite::{ScenarioFailure, ScenarioSuite, SuiteReport};
pub use telemetry::{NarrativeTelemetry, NarrativeTelemetryBuilder};
pub use tree::{build_definition, AnalysisResult, NodeKind, ScenarioDefinition, ScenarioTree};
