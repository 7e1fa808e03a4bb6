//! # nbgrade
//!
//! A grading harness for notebook assignments. It looks up student-defined
//! values and functions in a [`Namespace`], compares them against expected
//! results or a reference implementation within numeric tolerances, and
//! prints a weighted score report.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Function-like values and how graders call them
pub mod callable;
/// Process-wide defaults read from the environment
pub mod config;
/// Output channel for reports and subject output
pub mod console;
/// For all things related to grading
pub mod grade;
/// The read-only name bindings a grading session inspects
pub mod namespace;
/// Small shared types
pub mod types;
/// Dynamically typed values
pub mod value;

pub use callable::{Arguments, CallContext, CallError, Callable, Function, Params};
pub use console::{Captured, Console};
pub use grade::{
    Comparator, FunctionTest, GradeError, Outcome, SuiteReport, TestCase, VariableCase,
    VariableTest,
};
pub use namespace::Namespace;
pub use types::Tolerance;
pub use value::{Value, ValueType};
