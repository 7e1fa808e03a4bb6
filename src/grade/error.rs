#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::{callable::CallError, grade::compare::CompareError};

/// Errors that stop a whole grading run.
#[derive(thiserror::Error, Debug)]
pub enum GradeError {
    /// The suite or its test cases are set up incorrectly.
    #[error("Invalid grading configuration: {0}")]
    Config(String),
    /// The report could not be written.
    #[error("Could not write the grading report: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single test case could not be scored. Always turned into a zero
/// score for that case.
#[derive(thiserror::Error, Debug)]
pub enum CaseError {
    /// Calling the subject or the reference function failed.
    #[error(transparent)]
    Call(#[from] CallError),
    /// The comparator could not compare the two values.
    #[error(transparent)]
    Compare(#[from] CompareError),
    /// The subject signalled that it is still a stub.
    #[error("Function {0} is not implemented!")]
    NotImplemented(String),
    /// The subject is missing or not callable.
    #[error("{0} is not a callable in the namespace")]
    MissingSubject(String),
    /// Neither an expected value nor a reference function is available.
    #[error("No expected value was given and no reference function is available")]
    NoReference,
}
