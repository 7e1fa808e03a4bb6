#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The runner contract and the weighted aggregation over a suite of cases.

use tracing::{debug, info, warn};

use super::{
    case::Weighted,
    error::GradeError,
    results::{CaseReport, Grade, Outcome, SuiteReport, format_points, round2},
};
use crate::console::Console;

/// A set of checks against one subject.
pub trait Suite {
    /// The kind of test case this suite runs.
    type Case: Weighted;

    /// Heading printed above the report.
    fn title(&self) -> String;

    /// Rejects misconfigured cases before anything runs.
    fn validate(&self, _cases: &[Self::Case]) -> Result<(), GradeError> {
        Ok(())
    }

    /// Checks run once before any case. Returning `false` scores the whole
    /// suite zero. Diagnostics are written to `console`.
    fn run_pre_checks(&self, _console: &Console) -> Result<bool, GradeError> {
        Ok(true)
    }

    /// Runs one case. Failures of the code under test are part of the
    /// [`Outcome`]; the error path is only for report output failures.
    fn run_case(&self, case: &Self::Case, console: &Console) -> Result<Outcome, GradeError>;
}

/// Scales `weights` so they sum to one.
///
/// Weights must be finite and non-negative, and at least one must be positive
/// unless there are none at all.
pub fn normalize_weights(weights: &[f64]) -> Result<Vec<f64>, GradeError> {
    if let Some((idx, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(GradeError::Config(format!(
            "test case {} has an invalid weight of {w}",
            idx + 1
        )));
    }

    let total: f64 = weights.iter().sum();
    if !weights.is_empty() && total <= 0.0 {
        return Err(GradeError::Config(
            "the weights of a suite must not all be zero".to_string(),
        ));
    }

    Ok(weights.iter().map(|w| w / total).collect())
}

/// Runs every case of `suite` in order and prints a weighted score report to
/// `console`.
///
/// Each case is worth `max_points * weight / sum(weights)` points. If the
/// suite's pre-checks fail no case runs and the total is zero. A failing case
/// never stops the cases after it.
pub fn run_suite<S>(
    suite: &S,
    cases: &[S::Case],
    max_points: f64,
    console: &Console,
) -> Result<SuiteReport, GradeError>
where
    S: Suite + ?Sized,
{
    if !max_points.is_finite() || max_points < 0.0 {
        return Err(GradeError::Config(format!(
            "max points must be a non-negative number, got {max_points}"
        )));
    }
    suite.validate(cases)?;

    let weights: Vec<f64> = cases.iter().map(Weighted::weight).collect();
    let normalized = normalize_weights(&weights)?;
    let title = suite.title();

    console.banner()?;
    console.writeln(format_args!("{title}\n"))?;

    let mut score = 0.0;
    let mut reports = Vec::with_capacity(cases.len());
    let pre_checks_passed = suite.run_pre_checks(console)?;

    if pre_checks_passed {
        for (idx, (case, weight)) in cases.iter().zip(&normalized).enumerate() {
            let number = idx + 1;
            let points = round2(max_points * weight);

            console.rule()?;
            console.writeln(format_args!("Running test {number}"))?;
            let outcome = suite.run_case(case, console)?;
            debug!(suite = %title, case = number, score = outcome.score(), "ran test case");

            score += weight * outcome.score();
            if !outcome.passed() {
                console.writeln(outcome.message())?;
            }

            let awarded = round2(outcome.score() * points);
            console.writeln(format_args!(
                "\n{} / {} points.",
                format_points(awarded),
                format_points(points)
            ))?;
            console.rule()?;
            console.writeln("")?;

            reports.push(CaseReport {
                number,
                score: outcome.score(),
                points: Grade::new(awarded, points),
                message: outcome.message().to_string(),
            });
        }
    } else {
        warn!(suite = %title, "suite checks failed, skipping all test cases");
    }

    let total_points = round2(max_points * score);
    console.banner()?;
    console.writeln(format_args!(
        "Total points: {} / {}",
        format_points(total_points),
        format_points(max_points)
    ))?;
    console.banner()?;
    console.flush()?;
    info!(suite = %title, total_points, max_points, "graded suite");

    Ok(SuiteReport {
        title,
        max_points,
        pre_checks_passed,
        score,
        total_points,
        cases: reports,
    })
}
