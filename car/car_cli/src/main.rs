use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use car_event_bus::FileEventPublisher;
use car_logging::LogLevel;
use car_narrative::{
    AdvisorConfig, AnalysisResult, ExampleRunner, HeadingStyle, NarrativeTelemetry,
    RenderStyle, RenderTemplate, RenderedDocument, Renderer, RunnerConfig, ScenarioDefinition,
    SuiteReport,
};
use car_scenarios::default_suite;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "car", version, about = "CAR narrative case-study runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the bundled examples.
    List,
    /// Runs bundled examples and prints their documents.
    Run(RunArgs),
    /// Renders a JSON definition with a JSON template.
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone)]
struct StyleArgs {
    /// Prefix for sequence items.
    #[arg(long, default_value = "- ")]
    bullet: String,
    /// Spaces per nesting level (0-255).
    #[arg(long, default_value_t = 2)]
    indent: u8,
    /// Underlines headings.
    #[arg(long)]
    underline: bool,
}

impl StyleArgs {
    fn style(&self) -> RenderStyle {
        let heading = if self.underline {
            HeadingStyle::Underlined
        } else {
            HeadingStyle::Plain
        };
        RenderStyle::default()
            .with_bullet(self.bullet.clone())
            .with_indent(self.indent)
            .with_heading(heading)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Example to run; repeat for several. Runs all when omitted.
    #[arg(long = "example")]
    examples: Vec<String>,
    /// Advisor config merged over each example's defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(flatten)]
    style: StyleArgs,
    /// JSON-lines log file.
    #[arg(long)]
    log: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
    /// JSON-lines event log.
    #[arg(long)]
    event_log: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long)]
    definition: PathBuf,
    #[arg(long)]
    template: PathBuf,
    /// Analysis consumed by analysis directives.
    #[arg(long)]
    analysis: Option<PathBuf>,
    #[command(flatten)]
    style: StyleArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::List => list(&mut io::stdout().lock()),
        Commands::Run(args) => {
            handle_run(&args, &mut io::stdout().lock(), &mut io::stderr().lock())
        }
        Commands::Render(args) => {
            let document = render_files(&args)?;
            document.write_to(&mut io::stdout().lock())?;
            Ok(())
        }
    }
}

fn list(out: &mut dyn Write) -> Result<()> {
    for example in default_suite().examples() {
        writeln!(out, "{} | {}", example.name(), example.description())?;
    }
    Ok(())
}

fn handle_run(args: &RunArgs, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let report = match args.format {
        OutputFormat::Text => run_examples(args, stdout)?,
        OutputFormat::Json => {
            let report = run_examples(args, &mut io::sink())?;
            writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
            report
        }
    };
    if report.is_success() {
        return Ok(());
    }
    for failure in &report.failures {
        writeln!(stderr, "{}: {}", failure.scenario, failure.error)?;
    }
    bail!(
        "{} of {} examples failed",
        report.failures.len(),
        report.attempted()
    )
}

fn run_examples(args: &RunArgs, out: &mut dyn Write) -> Result<SuiteReport> {
    let suite = default_suite().select(&args.examples)?;
    let config_override = match &args.config {
        Some(path) => Some(
            AdvisorConfig::from_json_file(path)
                .with_context(|| format!("loading advisor config {}", path.display()))?,
        ),
        None => None,
    };
    let runner = ExampleRunner::new(
        RunnerConfig {
            style: args.style.style(),
            config_override,
        },
        build_telemetry(args)?,
    );
    Ok(suite.run_all(&runner, out))
}

fn build_telemetry(args: &RunArgs) -> Result<Option<NarrativeTelemetry>> {
    if args.log.is_none() && args.event_log.is_none() {
        return Ok(None);
    }
    let mut builder = NarrativeTelemetry::builder("car").min_level(args.log_level);
    if let Some(path) = &args.log {
        builder = builder.log_path(path);
    }
    if let Some(path) = &args.event_log {
        builder = builder.event_publisher(Arc::new(FileEventPublisher::new(path)?));
    }
    builder.build().map(Some)
}

fn render_files(args: &RenderArgs) -> Result<RenderedDocument> {
    let definition = ScenarioDefinition::from_json_file(&args.definition)
        .with_context(|| describe("definition", &args.definition))?;
    let template = RenderTemplate::from_json_file(&args.template)
        .with_context(|| describe("template", &args.template))?;
    let analysis = match &args.analysis {
        Some(path) => Some(
            AnalysisResult::from_json_file(path).with_context(|| describe("analysis", path))?,
        ),
        None => None,
    };
    let document = Renderer::new(args.style.style()).render(
        &template,
        &definition,
        analysis.as_ref(),
    )?;
    Ok(document)
}

fn describe(what: &str, path: &Path) -> String {
    format!("loading {what} {}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_narrative::NarrativeError;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_collects_repeated_examples_and_style() {
        let Commands::Run(args) = parse(&[
            "car",
            "run",
            "--example",
            "healthcare-triage",
            "--example",
            "governance-oversight",
            "--bullet",
            "* ",
            "--underline",
            "--format",
            "json",
        ]) else {
            panic!("expected run");
        };
        assert_eq!(args.examples, ["healthcare-triage", "governance-oversight"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.log_level, LogLevel::Info);
        let style = args.style.style();
        assert_eq!(style.bullet, "* ");
        assert_eq!(style.heading, HeadingStyle::Underlined);
    }

    #[test]
    fn indent_is_bounded() {
        let Commands::Run(args) = parse(&["car", "run", "--indent", "255"]) else {
            panic!("expected run");
        };
        assert_eq!(args.style.style().indent, 255);
        for too_wide in ["256", "18446744073709551615", "-1"] {
            assert!(Cli::try_parse_from(["car", "run", "--indent", too_wide]).is_err());
        }
    }

    #[test]
    fn list_prints_every_example() {
        let mut out = Vec::new();
        list(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let names: Vec<&str> = text
            .lines()
            .filter_map(|line| line.split(" | ").next())
            .collect();
        assert_eq!(
            names,
            [
                "healthcare-triage",
                "healthcare-records",
                "governance-epistemology",
                "governance-oversight",
            ]
        );
    }

    #[test]
    fn json_run_reports_failures_and_exits_with_error() {
        let tmp = tempdir().unwrap();
        let config = tmp.path().join("config.json");
        fs::write(&config, r#"{ "weights": { "transparency": 2.0 } }"#).unwrap();
        let Commands::Run(args) = parse(&[
            "car",
            "run",
            "--example",
            "healthcare-triage",
            "--example",
            "governance-oversight",
            "--config",
            config.to_str().unwrap(),
            "--format",
            "json",
        ]) else {
            panic!("expected run");
        };
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let err = handle_run(&args, &mut stdout, &mut stderr).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 examples failed");

        let report: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
        assert_eq!(report["runs"][0]["scenario"], "healthcare-triage");
        assert_eq!(report["failures"][0]["scenario"], "governance-oversight");
        assert_eq!(report["failures"][0]["kind"], "configuration");

        let summary = String::from_utf8(stderr).unwrap();
        assert!(summary.starts_with("governance-oversight: configuration error:"));
    }

    #[test]
    fn text_run_succeeds_without_stderr() {
        let Commands::Run(args) = parse(&["car", "run", "--example", "healthcare-records"]) else {
            panic!("expected run");
        };
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        handle_run(&args, &mut stdout, &mut stderr).unwrap();
        assert!(String::from_utf8(stdout).unwrap().starts_with("CASE STUDY\n"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn run_with_config_override_and_logs() {
        let tmp = tempdir().unwrap();
        let config = tmp.path().join("config.json");
        fs::write(&config, r#"{ "options": { "analysisDepth": "exhaustive" } }"#).unwrap();
        let log = tmp.path().join("car.log");
        let events = tmp.path().join("events.jsonl");
        let Commands::Run(args) = parse(&[
            "car",
            "run",
            "--example",
            "healthcare-triage",
            "--example",
            "governance-epistemology",
            "--config",
            config.to_str().unwrap(),
            "--log",
            log.to_str().unwrap(),
            "--event-log",
            events.to_str().unwrap(),
        ]) else {
            panic!("expected run");
        };
        let mut out = Vec::new();
        let report = run_examples(&args, &mut out).unwrap();
        assert_eq!(report.attempted(), 2);
        assert!(matches!(
            report.failure("healthcare-triage").unwrap().error,
            NarrativeError::Configuration(_)
        ));
        assert!(report.run("governance-epistemology").is_some());
        assert!(String::from_utf8(out).unwrap().starts_with("FRAMEWORK\n"));
        let logged = fs::read_to_string(&log).unwrap();
        assert!(logged.contains("narrative.scenario.failed"));
        assert!(logged.contains("narrative.suite.completed"));
        assert!(fs::read_to_string(&events)
            .unwrap()
            .contains("narrative.scenario.rendered"));
    }

    #[test]
    fn unknown_example_is_rejected() {
        let Commands::Run(args) = parse(&["car", "run", "--example", "nope"]) else {
            panic!("expected run");
        };
        let err = run_examples(&args, &mut io::sink()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn render_reads_json_files() {
        let tmp = tempdir().unwrap();
        let definition = tmp.path().join("definition.json");
        let template = tmp.path().join("template.json");
        fs::write(&definition, r#"{ "title": "X", "items": ["a", "b"] }"#).unwrap();
        fs::write(
            &template,
            r#"[ { "label": "Title", "path": "title" }, { "label": "Items", "path": "items" } ]"#,
        )
        .unwrap();
        let Commands::Render(args) = parse(&[
            "car",
            "render",
            "--definition",
            definition.to_str().unwrap(),
            "--template",
            template.to_str().unwrap(),
        ]) else {
            panic!("expected render");
        };
        let document = render_files(&args).unwrap();
        assert_eq!(document.lines(), ["Title", "X", "Items", "- a", "- b"]);
    }

    #[test]
    fn render_without_analysis_rejects_analysis_directives() {
        let tmp = tempdir().unwrap();
        let definition = tmp.path().join("definition.json");
        let template = tmp.path().join("template.json");
        fs::write(&definition, r#"{ "title": "X" }"#).unwrap();
        fs::write(
            &template,
            r#"[ { "label": "Verdict", "path": "verdict", "source": "analysis" } ]"#,
        )
        .unwrap();
        let Commands::Render(args) = parse(&[
            "car",
            "render",
            "--definition",
            definition.to_str().unwrap(),
            "--template",
            template.to_str().unwrap(),
        ]) else {
            panic!("expected render");
        };
        let err = render_files(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NarrativeError>(),
            Some(NarrativeError::AnalysisUnavailable { .. })
        ));
    }
}
