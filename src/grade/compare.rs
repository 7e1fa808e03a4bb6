#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Comparators decide whether an answer matches a solution.

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use super::results::Outcome;
use crate::{
    callable::panic_message, console::quiet_panics, types::Tolerance, value::Value,
};

/// Reasons two values could not be compared at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    /// An operand of a numeric comparison is not a number.
    #[error("unsupported operand: {0} is not a number")]
    NotNumeric(String),
    /// The relative error was taken against a zero solution.
    #[error("division by zero")]
    DivisionByZero,
    /// A list comparison was handed something else.
    #[error("expected a list, found {0}")]
    NotAList(String),
    /// A custom comparator panicked.
    #[error("comparison panicked: {0}")]
    Panicked(String),
}

/// Signature shared by all comparison functions.
pub type CompareFn = dyn Fn(&Value, &Value, Tolerance) -> Result<Outcome, CompareError>;

/// A named, cloneable comparison strategy.
#[derive(Clone)]
pub struct Comparator {
    /// Name used in logs.
    name: String,
    /// The comparison itself.
    func: Arc<CompareFn>,
}

impl Comparator {
    /// Wraps a comparison function.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value, &Value, Tolerance) -> Result<Outcome, CompareError> + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// See [`numerical`].
    pub fn numerical() -> Self {
        Self::new("numerical", numerical)
    }

    /// See [`exact`].
    pub fn exact() -> Self {
        Self::new("exact", exact)
    }

    /// See [`contains`].
    pub fn contains() -> Self {
        Self::new("contains", contains)
    }

    /// See [`all_close`].
    pub fn all_close() -> Self {
        Self::new("all_close", all_close)
    }

    /// Looks up a built-in comparator by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "numerical" => Some(Self::numerical()),
            "exact" => Some(Self::exact()),
            "contains" => Some(Self::contains()),
            "all_close" => Some(Self::all_close()),
            _ => None,
        }
    }

    /// Returns the comparator's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compares `answer` against `solution`. A panicking comparator yields
    /// [`CompareError::Panicked`].
    pub fn compare(
        &self,
        answer: &Value,
        solution: &Value,
        tolerance: Tolerance,
    ) -> Result<Outcome, CompareError> {
        let _quiet = quiet_panics();
        panic::catch_unwind(AssertUnwindSafe(|| (self.func)(answer, solution, tolerance)))
            .unwrap_or_else(|payload| Err(CompareError::Panicked(panic_message(payload.as_ref()))))
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::numerical()
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Comparator").field(&self.name).finish()
    }
}

/// Feedback for a mismatched answer.
fn mismatch(answer: &Value, solution: &Value) -> Outcome {
    Outcome::fail(format!("Expected was {solution}. Your answer is {answer}."))
}

/// Reads a value as a number for a numeric comparison.
fn number(value: &Value) -> Result<f64, CompareError> {
    value
        .as_f64()
        .ok_or_else(|| CompareError::NotNumeric(value.repr()))
}

/// Passes when `|answer - solution| <= tolerance.absolute` or
/// `|answer - solution| / solution <= tolerance.relative`.
///
/// The relative error divides by the signed solution, so a zero solution is a
/// [`CompareError::DivisionByZero`] even when the answer is exact.
pub fn numerical(
    answer: &Value,
    solution: &Value,
    tolerance: Tolerance,
) -> Result<Outcome, CompareError> {
    let a = number(answer)?;
    let s = number(solution)?;

    let abs_error = (a - s).abs();
    if s == 0.0 {
        return Err(CompareError::DivisionByZero);
    }
    let rel_error = abs_error / s;

    if abs_error <= tolerance.absolute || rel_error <= tolerance.relative {
        Ok(Outcome::pass())
    } else {
        Ok(mismatch(answer, solution))
    }
}

/// Passes when the values are equal. Ints and floats compare by value.
pub fn exact(answer: &Value, solution: &Value, _: Tolerance) -> Result<Outcome, CompareError> {
    if answer == solution {
        Ok(Outcome::pass())
    } else {
        Ok(mismatch(answer, solution))
    }
}

/// Passes when the answer equals any item of the solution list.
pub fn contains(answer: &Value, solution: &Value, _: Tolerance) -> Result<Outcome, CompareError> {
    let options = solution
        .as_list()
        .ok_or_else(|| CompareError::NotAList(solution.repr()))?;

    if options.iter().any(|option| option == answer) {
        Ok(Outcome::pass())
    } else {
        Ok(Outcome::fail(format!(
            "Expected one of {solution}. Your answer is {answer}."
        )))
    }
}

/// Passes when both lists have the same length and every pair of items passes
/// [`numerical`].
pub fn all_close(
    answer: &Value,
    solution: &Value,
    tolerance: Tolerance,
) -> Result<Outcome, CompareError> {
    let expected = solution
        .as_list()
        .ok_or_else(|| CompareError::NotAList(solution.repr()))?;
    let Some(actual) = answer.as_list() else {
        return Ok(mismatch(answer, solution));
    };
    if actual.len() != expected.len() {
        return Ok(mismatch(answer, solution));
    }

    for (a, s) in actual.iter().zip(expected) {
        if !numerical(a, s, tolerance)?.passed() {
            return Ok(mismatch(answer, solution));
        }
    }
    Ok(Outcome::pass())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_tolerance_accepts_close_answer() {
        let outcome = numerical(
            &Value::from(5.001),
            &Value::from(5),
            Tolerance::new(0.01, 0.0),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::pass());
    }

    #[test]
    fn relative_error_above_tolerance_fails() {
        let outcome = numerical(
            &Value::from(6),
            &Value::from(5),
            Tolerance::new(0.0, 0.1),
        )
        .unwrap();
        assert_eq!(outcome.score(), 0.0);
        assert_eq!(outcome.message(), "Expected was 5. Your answer is 6.");
    }

    #[test]
    fn relative_tolerance_alone_can_pass() {
        let outcome = numerical(
            &Value::from(104),
            &Value::from(100),
            Tolerance::relative(0.05),
        )
        .unwrap();
        assert!(outcome.passed());
    }

    #[test]
    fn zero_solution_is_a_division_error() {
        let err = numerical(
            &Value::from(0),
            &Value::from(0),
            Tolerance::absolute(1.0),
        )
        .unwrap_err();
        assert_eq!(err, CompareError::DivisionByZero);
    }

    #[test]
    fn strings_are_not_numeric() {
        let err = numerical(
            &Value::from("5"),
            &Value::from(5),
            Tolerance::default(),
        )
        .unwrap_err();
        assert_eq!(err, CompareError::NotNumeric("'5'".to_string()));
    }

    #[test]
    fn contains_checks_membership() {
        let options = Value::from(vec!["red", "green"]);
        assert!(contains(&Value::from("green"), &options, Tolerance::default()).unwrap().passed());
        assert!(!contains(&Value::from("blue"), &options, Tolerance::default()).unwrap().passed());
    }

    #[test]
    fn all_close_compares_element_wise() {
        let expected = Value::from(vec![1.0, 2.0]);
        let close = Value::from(vec![1.001, 1.999]);
        let short = Value::from(vec![1.0]);
        let tol = Tolerance::absolute(0.01);
        assert!(all_close(&close, &expected, tol).unwrap().passed());
        assert!(!all_close(&short, &expected, tol).unwrap().passed());
    }

    #[test]
    fn panicking_comparator_is_an_error() {
        let cmp = Comparator::new("broken", |_, _, _| panic!("nope"));
        let err = cmp
            .compare(&Value::from(1), &Value::from(1), Tolerance::default())
            .unwrap_err();
        assert_eq!(err, CompareError::Panicked("nope".to_string()));
    }
}
