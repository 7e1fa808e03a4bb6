#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # nbgrade
//!
//! Command line front end. Grades the variables of a JSON namespace against a
//! JSON list of variable cases.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use nbgrade::{
    Console, Namespace, Tolerance, VariableCase, VariableTest,
    config::{self, GraderConfig},
    grade::VariableCaseSpec,
};
use tabled::{Table, settings::Style};
use tracing::{Level, metadata::LevelFilter, warn};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Options of the `variables` command.
#[derive(Debug, Clone)]
struct VariablesOpts {
    /// JSON object of variable bindings.
    namespace: PathBuf,
    /// JSON array of variable cases.
    cases:     PathBuf,
    /// Points the suite is worth.
    points:    f64,
    /// Absolute tolerance override.
    abs_tol:   Option<f64>,
    /// Relative tolerance override.
    rel_tol:   Option<f64>,
    /// Print the report as JSON instead of text.
    json:      bool,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade variables
    Variables(VariablesOpts),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    let namespace = long("namespace")
        .short('n')
        .help("JSON file holding the student's variables")
        .argument::<PathBuf>("FILE");
    let cases = long("cases")
        .short('c')
        .help("JSON file holding the test cases")
        .argument::<PathBuf>("FILE");
    let points = long("points")
        .short('p')
        .help("Points the suite is worth")
        .argument::<f64>("POINTS")
        .fallback(10.0);
    let abs_tol = long("abs-tol")
        .help("Absolute tolerance")
        .argument::<f64>("TOL")
        .optional();
    let rel_tol = long("rel-tol")
        .help("Relative tolerance")
        .argument::<f64>("TOL")
        .optional();
    let json = long("json").help("Print the report as JSON").switch();

    let variables = construct!(VariablesOpts {
        namespace,
        cases,
        points,
        abs_tol,
        rel_tol,
        json
    })
    .to_options()
    .command("variables")
    .help("Grade the variables of a namespace")
    .map(Cmd::Variables);

    let cmd = construct!([variables]);

    cmd.to_options()
        .descr("Grading harness for notebook assignments")
        .run()
}

/// Reads and parses a JSON file.
fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Could not parse {}", path.display()))
}

/// Installs the environment configuration, with tolerance flags taking
/// precedence over `NBGRADE_ABS_TOL` and `NBGRADE_REL_TOL`.
fn install_config(opts: &VariablesOpts) {
    let loaded = GraderConfig::from_env();
    let defaults = loaded.tolerance();
    let tolerance = Tolerance::new(
        opts.abs_tol.unwrap_or(defaults.absolute),
        opts.rel_tol.unwrap_or(defaults.relative),
    );
    if !config::install(loaded.with_tolerance(tolerance)) {
        warn!("configuration was already loaded, ignoring tolerance flags");
    }
}

/// Grades variables as described by `opts`.
fn grade_variables(opts: VariablesOpts) -> Result<()> {
    let namespace = Namespace::from_json(read_json(&opts.namespace)?)?;
    let specs: Vec<VariableCaseSpec> = serde_json::from_value(read_json(&opts.cases)?)
        .with_context(|| format!("{} is not a list of test cases", opts.cases.display()))?;
    let cases = specs
        .into_iter()
        .map(VariableCase::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let suite = VariableTest::builder()
        .namespace(&namespace)
        .max_points(opts.points)
        .build();

    if opts.json {
        let console = Console::new(std::io::sink());
        let report = suite.test(&cases, &console)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let console = Console::stdout();
        let report = suite.test(&cases, &console)?;
        println!("{}", report.table());
        let mut summary = Table::new([report.grade_result("variables")]);
        summary.with(Style::modern());
        println!("{summary}");
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(Level::WARN);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Variables(opts) => {
            install_config(&opts);
            grade_variables(opts)?
        }
    }

    Ok(())
}
