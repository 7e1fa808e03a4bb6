#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grading a function bound in the namespace.

use std::sync::Arc;

use bon::Builder;
use tracing::{debug, warn};

use super::{
    case::TestCase,
    compare::Comparator,
    error::{CaseError, GradeError},
    results::{Outcome, SuiteReport},
    suite::{Suite, run_suite},
};
use crate::{
    callable::{CallError, Callable, invoke},
    config,
    console::Console,
    namespace::Namespace,
    types::Tolerance,
};

/// Tests a student function against expected values or a reference
/// implementation.
#[derive(Clone, Builder)]
#[builder(on(String, into))]
pub struct FunctionTest<'ns> {
    /// Where the function is looked up.
    namespace:          &'ns Namespace,
    /// Name of the function under test.
    function_name:      String,
    /// Points the whole suite is worth.
    max_points:         f64,
    /// Computes the expected value for cases that do not give one.
    reference_function: Option<Arc<dyn Callable>>,
    /// Comparator used unless a case overrides it.
    #[builder(default)]
    test_function:      Comparator,
    /// Tolerance used unless a case overrides it.
    #[builder(default = config::get().tolerance())]
    tolerance:          Tolerance,
}

impl FunctionTest<'_> {
    /// Runs `cases` and prints the report to `console`.
    pub fn test(&self, cases: &[TestCase], console: &Console) -> Result<SuiteReport, GradeError> {
        run_suite(self, cases, self.max_points, console)
    }

    /// Returns the name of the function under test.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// The function under test, if it is bound to something callable.
    fn subject(&self) -> Option<&Arc<dyn Callable>> {
        self.namespace.get(&self.function_name)?.as_callable()
    }

    /// The first suite check that fails, if any.
    fn pre_check_failure(&self) -> Option<String> {
        let name = &self.function_name;
        let Some(value) = self.namespace.get(name) else {
            return Some(format!("Function {name} is not defined!"));
        };
        match value.as_callable() {
            None => Some(format!("{name} is not callable!")),
            Some(f) if !f.returns_value() => {
                Some(format!("{name} does not have a return statement!"))
            }
            Some(_) => None,
        }
    }

    /// Computes the target, calls the subject and compares.
    fn score_case(&self, case: &TestCase, console: &Console) -> Result<Outcome, CaseError> {
        let target = match case.expected() {
            Some(expected) => expected.clone(),
            None => {
                let reference = self
                    .reference_function
                    .as_ref()
                    .ok_or(CaseError::NoReference)?;
                invoke(&**reference, case.arguments(), console)?
            }
        };

        let subject = self
            .subject()
            .ok_or_else(|| CaseError::MissingSubject(self.function_name.clone()))?;
        let comparator = case.test_function().unwrap_or(&self.test_function);
        let tolerance = case.tolerance().unwrap_or(self.tolerance);

        let _hidden = console.hide();
        if case.max_reruns() > 1 {
            debug!(
                function = %self.function_name,
                max_reruns = case.max_reruns(),
                "only the first attempt of a rerun case is scored"
            );
        }
        let result =
            invoke(&**subject, case.arguments(), console).map_err(|err| match err {
                CallError::NotImplemented(_) => {
                    CaseError::NotImplemented(self.function_name.clone())
                }
                other => other.into(),
            })?;
        Ok(comparator.compare(&result, &target, tolerance)?)
    }
}

impl Suite for FunctionTest<'_> {
    type Case = TestCase;

    fn title(&self) -> String {
        format!("Function Test for {}", self.function_name)
    }

    fn validate(&self, cases: &[TestCase]) -> Result<(), GradeError> {
        for (idx, case) in cases.iter().enumerate() {
            if case.expected().is_none() && self.reference_function.is_none() {
                return Err(GradeError::Config(format!(
                    "test case {} for `{}` has no expected value and no reference function was \
                     supplied",
                    idx + 1,
                    self.function_name
                )));
            }
            if case.max_reruns() == 0 {
                return Err(GradeError::Config(format!(
                    "test case {} for `{}` must be allowed at least one run",
                    idx + 1,
                    self.function_name
                )));
            }
        }
        Ok(())
    }

    fn run_pre_checks(&self, console: &Console) -> Result<bool, GradeError> {
        match self.pre_check_failure() {
            Some(diagnostic) => {
                warn!(function = %self.function_name, "{diagnostic}");
                console.writeln(diagnostic)?;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    fn run_case(&self, case: &TestCase, console: &Console) -> Result<Outcome, GradeError> {
        match self.score_case(case, console) {
            Ok(outcome) if outcome.passed() => Ok(Outcome::pass()),
            Ok(outcome) => Ok(Outcome::new(
                outcome.score(),
                format!("Test for {} failed!\n{}", case.arguments(), outcome.message()),
            )),
            Err(err @ CaseError::NotImplemented(_)) => {
                debug!(function = %self.function_name, "subject is a stub");
                Ok(Outcome::fail(format!(
                    "Test for {} failed!\n{err}",
                    case.arguments()
                )))
            }
            Err(err) => {
                warn!(
                    function = %self.function_name,
                    case = %case.arguments(),
                    error = %err,
                    "test case raised an error"
                );
                console.rule()?;
                console.writeln(format_args!("Test with {} failed!\n{err}\n", case.arguments()))?;
                Ok(Outcome::fail(err.to_string()))
            }
        }
    }
}
