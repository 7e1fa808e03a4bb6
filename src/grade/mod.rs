#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Test cases, comparators, runners and the weighted score report.

/// Test case records.
pub mod case;
/// Comparison strategies.
pub mod compare;
/// Error types.
pub mod error;
/// Grading a function.
pub mod function;
/// Outcomes and reports.
pub mod results;
/// The runner contract and weighted aggregation.
pub mod suite;
/// Grading variables.
pub mod variable;

pub use case::{TestCase, VariableCase, VariableCaseSpec, Weighted};
pub use compare::{CompareError, Comparator, all_close, contains, exact, numerical};
pub use error::{CaseError, GradeError};
pub use function::FunctionTest;
pub use results::{CaseReport, Grade, GradeResult, Outcome, SuiteReport};
pub use suite::{Suite, normalize_weights, run_suite};
pub use variable::VariableTest;
