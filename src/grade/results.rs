#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Modify, Style, Width, object::Columns},
};

use crate::value::format_float;

/// Rounds to two decimal places. Exact halves go to the even neighbour, so
/// `0.125` becomes `0.12`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Formats a point value the way the console report shows it.
pub fn format_points(points: f64) -> String {
    format_float(points)
}

/// The result of running one test case: a score in `[0, 1]` and a message
/// explaining anything short of full marks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outcome {
    /// Fraction of the case that passed.
    score:   f64,
    /// Feedback for the student, empty on a pass.
    message: String,
}

impl Outcome {
    /// Creates an outcome. Scores are clamped into `[0, 1]`, and NaN counts as
    /// zero.
    pub fn new(score: f64, message: impl Into<String>) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Self {
            score,
            message: message.into(),
        }
    }

    /// Full marks with no message.
    pub fn pass() -> Self {
        Self::new(1.0, "")
    }

    /// Zero with the given message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(0.0, message)
    }

    /// Returns the score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the case earned full marks.
    pub fn passed(&self) -> bool {
        self.score >= 1.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// A struct representing a grade
pub struct Grade {
    /// The actual grade received
    pub grade:  f64,
    /// The maximum grade possible
    pub out_of: f64,
}

impl Grade {
    /// Creates a new grade -
    /// * `grade` - The actual grade received
    /// * `out_of` - The maximum grade possible
    pub fn new(grade: f64, out_of: f64) -> Self {
        Self { grade, out_of }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/{:.2}", self.grade, self.out_of)
    }
}

#[derive(Tabled, Clone, Debug, Default, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
/// A one-line summary of a graded suite
pub struct GradeResult {
    #[tabled(rename = "Requirement")]
    /// * `requirement`: refers to Requirement ID
    pub(crate) requirement: String,
    #[tabled(rename = "Grade")]
    /// * `grade`: grade received for above Requirement
    #[builder(default)]
    pub(crate) grade:       Grade,
    #[tabled(rename = "Reason")]
    /// * `reason`: why points were lost, if any
    pub(crate) reason:      String,
}

impl GradeResult {
    /// Returns the requirement name.
    pub fn requirement(&self) -> &str {
        &self.requirement
    }

    /// Returns the underlying grade struct.
    pub fn grade_struct(&self) -> &Grade {
        &self.grade
    }

    /// Returns the numeric grade value.
    pub fn grade_value(&self) -> f64 {
        self.grade.grade
    }

    /// Returns the numeric out-of value.
    pub fn out_of_value(&self) -> f64 {
        self.grade.out_of
    }

    /// Returns the reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// One row of a suite report.
#[derive(Tabled, Clone, Debug, Serialize)]
pub struct CaseReport {
    /// 1-based position of the case in the suite.
    #[tabled(rename = "Test")]
    pub(crate) number:  usize,
    /// Fraction of the case that passed.
    #[tabled(rename = "Score")]
    pub(crate) score:   f64,
    /// Points awarded out of the points the case is worth.
    #[tabled(rename = "Points")]
    pub(crate) points:  Grade,
    /// Feedback for the case, empty on a pass.
    #[tabled(rename = "Message")]
    pub(crate) message: String,
}

impl CaseReport {
    /// Returns the 1-based case number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Returns the case score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the rounded points awarded.
    pub fn awarded(&self) -> f64 {
        self.points.grade
    }

    /// Returns the rounded points the case is worth.
    pub fn possible(&self) -> f64 {
        self.points.out_of
    }

    /// Returns the feedback message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Everything a grading run produced.
#[derive(Clone, Debug, Serialize)]
pub struct SuiteReport {
    /// Heading of the suite.
    pub(crate) title:             String,
    /// Points the whole suite is worth.
    pub(crate) max_points:        f64,
    /// Whether the suite-level checks passed.
    pub(crate) pre_checks_passed: bool,
    /// Weighted pass fraction in `[0, 1]`.
    pub(crate) score:             f64,
    /// `max_points * score`, rounded.
    pub(crate) total_points:      f64,
    /// Per-case rows, in execution order.
    pub(crate) cases:             Vec<CaseReport>,
}

impl SuiteReport {
    /// Returns the suite heading.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the points the suite is worth.
    pub fn max_points(&self) -> f64 {
        self.max_points
    }

    /// Whether the suite-level checks passed.
    pub fn pre_checks_passed(&self) -> bool {
        self.pre_checks_passed
    }

    /// Returns the weighted pass fraction.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the rounded points earned.
    pub fn total_points(&self) -> f64 {
        self.total_points
    }

    /// Returns the per-case rows.
    pub fn cases(&self) -> &[CaseReport] {
        &self.cases
    }

    /// Returns the earned points as a [`Grade`].
    pub fn grade(&self) -> Grade {
        Grade::new(self.total_points, self.max_points)
    }

    /// Summarises the run as a single [`GradeResult`].
    pub fn grade_result(&self, requirement: impl Into<String>) -> GradeResult {
        let reason = if !self.pre_checks_passed {
            "Suite checks failed, no test cases were run".to_string()
        } else {
            let passed = self.cases.iter().filter(|c| c.score >= 1.0).count();
            format!("{passed}/{} test cases passed", self.cases.len())
        };

        GradeResult::builder()
            .requirement(requirement)
            .grade(self.grade())
            .reason(reason)
            .build()
    }

    /// Renders the per-case rows as a table.
    pub fn table(&self) -> String {
        let mut table = Table::new(&self.cases);
        table
            .with(Style::modern())
            .with(Modify::new(Columns::last()).with(Width::wrap(60)));
        table.to_string()
    }
}
