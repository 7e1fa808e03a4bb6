#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grading plain values bound in the namespace.

use bon::Builder;
use tracing::warn;

use super::{
    case::VariableCase,
    compare::Comparator,
    error::GradeError,
    results::{Outcome, SuiteReport},
    suite::{Suite, run_suite},
};
use crate::{config, console::Console, namespace::Namespace, types::Tolerance};

/// Tests student variables against expected values.
#[derive(Clone, Builder)]
#[builder(on(String, into))]
pub struct VariableTest<'ns> {
    /// Where variables are looked up.
    namespace:     &'ns Namespace,
    /// Points the whole suite is worth.
    max_points:    f64,
    /// Comparator used unless a case overrides it.
    #[builder(default)]
    test_function: Comparator,
    /// Tolerance used unless a case overrides it.
    #[builder(default = config::get().tolerance())]
    tolerance:     Tolerance,
    /// Heading of the report.
    #[builder(default = "Variable Test".to_string())]
    title:         String,
}

impl VariableTest<'_> {
    /// Runs `cases` and prints the report to `console`.
    pub fn test(
        &self,
        cases: &[VariableCase],
        console: &Console,
    ) -> Result<SuiteReport, GradeError> {
        run_suite(self, cases, self.max_points, console)
    }
}

impl Suite for VariableTest<'_> {
    type Case = VariableCase;

    fn title(&self) -> String {
        self.title.clone()
    }

    fn run_case(&self, case: &VariableCase, _console: &Console) -> Result<Outcome, GradeError> {
        let name = case.name();
        let header = format!("Test for variable {name} failed!\n");

        let Some(value) = self.namespace.get(name) else {
            return Ok(Outcome::fail(format!(
                "{header}Variable {name} is not defined!"
            )));
        };
        if let Some(ty) = case.expected_type()
            && !self.namespace.has_type(name, ty)
        {
            return Ok(Outcome::fail(format!(
                "{header}Variable {name} is not of type {ty}!"
            )));
        }

        let comparator = case.test_function().unwrap_or(&self.test_function);
        let tolerance = case.tolerance().unwrap_or(self.tolerance);
        match comparator.compare(value, case.expected(), tolerance) {
            Ok(outcome) if outcome.passed() => Ok(Outcome::pass()),
            Ok(outcome) => Ok(Outcome::new(
                outcome.score(),
                format!("{header}{}", outcome.message()),
            )),
            Err(err) => {
                warn!(variable = %name, error = %err, "comparison raised an error");
                Ok(Outcome::fail(err.to_string()))
            }
        }
    }
}
