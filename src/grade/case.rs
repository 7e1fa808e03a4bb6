#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Test case records for function and variable suites.

use bon::Builder;
use serde::Deserialize;

use super::{compare::Comparator, error::GradeError};
use crate::{
    callable::Arguments,
    types::Tolerance,
    value::{Value, ValueType},
};

/// Anything that carries a relative weight within a suite.
pub trait Weighted {
    /// Relative weight of this case. Weights are normalised per suite.
    fn weight(&self) -> f64;
}

/// One call of a function under test.
#[derive(Clone, Debug, Builder)]
pub struct TestCase {
    /// Arguments passed to the subject and to the reference function.
    arguments:     Arguments,
    /// The expected result. When absent the reference function computes it.
    #[builder(into)]
    expected:      Option<Value>,
    /// Overrides the suite's comparator.
    test_function: Option<Comparator>,
    /// Overrides the suite's tolerance.
    tolerance:     Option<Tolerance>,
    /// Relative weight of the case.
    #[builder(default = 1.0)]
    weight:        f64,
    /// How many attempts the case is allowed. Only the first one is scored.
    #[builder(default = 1)]
    max_reruns:    usize,
}

impl TestCase {
    /// Returns the call arguments.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Returns the expected value, if given.
    pub fn expected(&self) -> Option<&Value> {
        self.expected.as_ref()
    }

    /// Returns the comparator override, if any.
    pub fn test_function(&self) -> Option<&Comparator> {
        self.test_function.as_ref()
    }

    /// Returns the tolerance override, if any.
    pub fn tolerance(&self) -> Option<Tolerance> {
        self.tolerance
    }

    /// Returns the allowed number of attempts.
    pub fn max_reruns(&self) -> usize {
        self.max_reruns
    }
}

impl Weighted for TestCase {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// One check of a variable's value.
#[derive(Clone, Debug, Builder)]
#[builder(on(String, into))]
pub struct VariableCase {
    /// Name of the variable.
    name:          String,
    /// Value the variable should hold.
    #[builder(into)]
    expected:      Value,
    /// Type the variable must have, checked before comparing.
    expected_type: Option<ValueType>,
    /// Overrides the suite's comparator.
    test_function: Option<Comparator>,
    /// Overrides the suite's tolerance.
    tolerance:     Option<Tolerance>,
    /// Relative weight of the case.
    #[builder(default = 1.0)]
    weight:        f64,
}

impl VariableCase {
    /// Returns the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the expected value.
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// Returns the required type, if any.
    pub fn expected_type(&self) -> Option<ValueType> {
        self.expected_type
    }

    /// Returns the comparator override, if any.
    pub fn test_function(&self) -> Option<&Comparator> {
        self.test_function.as_ref()
    }

    /// Returns the tolerance override, if any.
    pub fn tolerance(&self) -> Option<Tolerance> {
        self.tolerance
    }
}

impl Weighted for VariableCase {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Serialized form of a [`VariableCase`], comparators given by name.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableCaseSpec {
    /// Name of the variable.
    pub name:          String,
    /// Value the variable should hold.
    pub expected:      serde_json::Value,
    /// Type the variable must have.
    #[serde(default)]
    pub expected_type: Option<ValueType>,
    /// Name of a built-in comparator.
    #[serde(default)]
    pub test_function: Option<String>,
    /// Tolerance override.
    #[serde(default)]
    pub tolerance:     Option<Tolerance>,
    /// Relative weight.
    #[serde(default)]
    pub weight:        Option<f64>,
}

impl TryFrom<VariableCaseSpec> for VariableCase {
    type Error = GradeError;

    fn try_from(spec: VariableCaseSpec) -> Result<Self, Self::Error> {
        let test_function = spec
            .test_function
            .as_deref()
            .map(|name| {
                Comparator::by_name(name).ok_or_else(|| {
                    GradeError::Config(format!(
                        "unknown comparator `{name}` for variable `{}`",
                        spec.name
                    ))
                })
            })
            .transpose()?;

        Ok(VariableCase::builder()
            .name(spec.name)
            .expected(spec.expected)
            .maybe_expected_type(spec.expected_type)
            .maybe_test_function(test_function)
            .maybe_tolerance(spec.tolerance)
            .weight(spec.weight.unwrap_or(1.0))
            .build())
    }
}
