//! Tests for grading functions bound in a namespace.

use std::{cell::Cell, rc::Rc, sync::Arc};

use nbgrade::{
    Arguments, CallError, Comparator, Console, Function, FunctionTest, GradeError, Namespace,
    TestCase, Tolerance, Value,
};

fn add() -> Function {
    Function::new("add", ["a", "b"], |p, _| {
        Ok(Value::from(p.f64(0)? + p.f64(1)?))
    })
}

fn case(args: Arguments, expected: impl Into<Value>) -> TestCase {
    TestCase::builder()
        .arguments(args)
        .expected(expected)
        .build()
}

#[test]
fn matching_result_scores_full_marks() {
    let ns = Namespace::new().with("add", add());
    let (console, _) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(4.0)
        .build()
        .test(&[case(Arguments::args([2, 3]), 5)], &console)
        .expect("grade");

    assert_eq!(report.cases()[0].score(), 1.0);
    assert_eq!(report.total_points(), 4.0);
}

#[test]
fn wrong_result_reports_arguments_and_values() {
    let wrong = Function::new("add", ["a", "b"], |p, _| {
        Ok(Value::from(p.get(0)?.as_f64().unwrap_or(0.0) + 1.0))
    });
    let ns = Namespace::new().with("add", wrong);
    let (console, captured) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(1.0)
        .build()
        .test(&[case(Arguments::args([2, 3]), 5)], &console)
        .expect("grade");

    assert_eq!(report.total_points(), 0.0);
    assert_eq!(
        report.cases()[0].message(),
        "Test for args = [2, 3] failed!\nExpected was 5. Your answer is 3.0."
    );
    assert!(captured.contents().contains("0.0 / 1.0 points."));
}

#[test]
fn undefined_function_zeroes_the_suite() {
    let ns = Namespace::new();
    let (console, captured) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(10.0)
        .build()
        .test(&[case(Arguments::args([2, 3]), 5)], &console)
        .expect("grade");

    let out = captured.contents();
    assert!(!report.pre_checks_passed());
    assert!(report.cases().is_empty());
    assert_eq!(report.total_points(), 0.0);
    assert!(out.contains("Function add is not defined!"));
    assert!(!out.contains("Running test"));
    assert!(out.contains("Total points: 0.0 / 10.0"));
}

#[test]
fn non_callable_binding_zeroes_the_suite() {
    let ns = Namespace::new().with("add", 5);
    let (console, captured) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(10.0)
        .build()
        .test(&[case(Arguments::args([2, 3]), 5)], &console)
        .expect("grade");

    assert_eq!(report.score(), 0.0);
    assert!(captured.contents().contains("add is not callable!"));
}

#[test]
fn function_without_result_zeroes_the_suite() {
    let printer = Function::new("add", ["a", "b"], |_, ctx| {
        ctx.println("no result here")?;
        Ok(Value::None)
    })
    .without_return();
    let ns = Namespace::new().with("add", printer);
    let (console, captured) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(10.0)
        .build()
        .test(&[case(Arguments::args([2, 3]), 5)], &console)
        .expect("grade");

    assert_eq!(report.score(), 0.0);
    assert!(captured.contents().contains("add does not have a return statement!"));
}

#[test]
fn reference_function_supplies_missing_expectations() {
    let square = Function::new("square", ["x"], |p, _| {
        let x = p.f64(0)?;
        Ok(Value::from(x * x))
    });
    // Wrong for negative inputs.
    let student = Function::new("square", ["x"], |p, _| {
        let x = p.f64(0)?;
        Ok(Value::from(x * x.abs().max(x)))
    });
    let ns = Namespace::new().with("square", student);
    let (console, _) = Console::captured();
    let cases = [
        TestCase::builder().arguments(Arguments::arg(3)).build(),
        TestCase::builder().arguments(Arguments::arg(-2)).build(),
    ];
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("square")
        .max_points(10.0)
        .reference_function(Arc::new(square))
        .build()
        .test(&cases, &console)
        .expect("grade");

    assert_eq!(report.cases()[0].score(), 1.0);
    assert_eq!(report.cases()[1].score(), 0.0);
    assert_eq!(report.total_points(), 5.0);
}

#[test]
fn keyword_arguments_reach_subject_and_reference() {
    let reference = Function::new("scale", ["value", "factor"], |p, _| {
        Ok(Value::from(p.named("value")?.as_f64().unwrap_or(0.0) * p.f64(1)?))
    });
    let student = Function::new("scale", ["value", "factor"], |p, _| {
        Ok(Value::from(p.f64(0)? * p.f64(1)?))
    });
    let ns = Namespace::new().with("scale", student);
    let (console, _) = Console::captured();
    let cases = [TestCase::builder()
        .arguments(Arguments::kwargs([("factor", 3), ("value", 4)]))
        .build()];
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("scale")
        .max_points(1.0)
        .reference_function(Arc::new(reference))
        .build()
        .test(&cases, &console)
        .expect("grade");

    assert_eq!(report.score(), 1.0);
}

#[test]
fn errors_in_one_case_do_not_stop_the_next() {
    let divide = Function::new("divide", ["a", "b"], |p, _| {
        let b = p.f64(1)?;
        if b == 0.0 {
            return Err(CallError::failed("division by zero"));
        }
        Ok(Value::from(p.f64(0)? / b))
    });
    let ns = Namespace::new().with("divide", divide);
    let (console, captured) = Console::captured();
    let cases = [
        case(Arguments::args([1, 0]), 0),
        case(Arguments::args([6, 3]), 2),
    ];
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("divide")
        .max_points(2.0)
        .build()
        .test(&cases, &console)
        .expect("grade");

    assert_eq!(report.cases().len(), 2);
    assert_eq!(report.cases()[0].score(), 0.0);
    assert_eq!(report.cases()[0].message(), "division by zero");
    assert_eq!(report.cases()[1].score(), 1.0);
    assert_eq!(report.total_points(), 1.0);
    assert!(
        captured
            .contents()
            .contains("Test with args = [1, 0] failed!\ndivision by zero")
    );
}

#[test]
fn failing_reference_scores_zero_and_the_next_case_runs() {
    let reference = Function::new("sqrt", ["x"], |p, _| {
        let x = p.f64(0)?;
        if x < 0.0 {
            return Err(CallError::failed("math domain error"));
        }
        Ok(Value::from(x.sqrt()))
    });
    let student = Function::new("sqrt", ["x"], |p, _| Ok(Value::from(p.f64(0)?.sqrt())));
    let ns = Namespace::new().with("sqrt", student);
    let (console, captured) = Console::captured();
    let cases = [
        TestCase::builder().arguments(Arguments::arg(-4)).build(),
        TestCase::builder().arguments(Arguments::arg(9)).build(),
    ];
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("sqrt")
        .max_points(2.0)
        .reference_function(Arc::new(reference))
        .build()
        .test(&cases, &console)
        .expect("grade");

    assert_eq!(report.cases()[0].score(), 0.0);
    assert_eq!(report.cases()[0].message(), "math domain error");
    assert_eq!(report.cases()[1].score(), 1.0);
    assert_eq!(report.total_points(), 1.0);
    assert!(
        captured
            .contents()
            .contains("Test with arg = -4 failed!\nmath domain error")
    );
}

#[test]
fn panicking_reference_scores_zero() {
    let reference = Function::new("half", ["x"], |_, _| panic!("reference exploded"));
    let ns = Namespace::new().with("half", add());
    let (console, _) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("half")
        .max_points(1.0)
        .reference_function(Arc::new(reference))
        .build()
        .test(
            &[TestCase::builder().arguments(Arguments::arg(1)).build()],
            &console,
        )
        .expect("grade");

    assert_eq!(report.score(), 0.0);
    assert_eq!(report.cases()[0].message(), "reference exploded");
}

#[test]
fn zero_expected_value_is_a_comparison_error() {
    let ns = Namespace::new().with("add", add());
    let (console, _) = Console::captured();
    let cases = [
        case(Arguments::args([0, 0]), 0),
        case(Arguments::args([2, 3]), 5),
    ];
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(2.0)
        .build()
        .test(&cases, &console)
        .expect("grade");

    assert_eq!(report.cases()[0].score(), 0.0);
    assert_eq!(report.cases()[0].message(), "division by zero");
    assert_eq!(report.cases()[1].score(), 1.0);
    assert_eq!(report.total_points(), 1.0);
}

#[test]
fn stub_subject_is_reported_as_not_implemented() {
    let stub = Function::new("add", ["a", "b"], |_, _| {
        Err(CallError::NotImplemented("add".to_string()))
    });
    let ns = Namespace::new().with("add", stub);
    let (console, captured) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(1.0)
        .build()
        .test(&[case(Arguments::args([2, 3]), 5)], &console)
        .expect("grade");

    assert_eq!(report.score(), 0.0);
    assert_eq!(
        report.cases()[0].message(),
        "Test for args = [2, 3] failed!\nFunction add is not implemented!"
    );
    assert!(!captured.contents().contains("Test with"));
}

#[test]
fn panicking_subject_scores_zero() {
    let boom = Function::new("boom", ["x"], |_, _| panic!("index out of range"));
    let ns = Namespace::new().with("boom", boom);
    let (console, _) = Console::captured();
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("boom")
        .max_points(1.0)
        .build()
        .test(&[case(Arguments::arg(1), 1)], &console)
        .expect("grade");

    assert_eq!(report.score(), 0.0);
    assert_eq!(report.cases()[0].message(), "index out of range");
    assert!(!console.is_hidden());
}

#[test]
fn subject_output_is_hidden_while_scoring() {
    let chatty = Function::new("double", ["x"], |p, ctx| {
        ctx.println("debugging output from the student")?;
        Ok(Value::from(p.f64(0)? * 2.0))
    });
    let ns = Namespace::new().with("double", chatty);
    let (console, captured) = Console::captured();
    FunctionTest::builder()
        .namespace(&ns)
        .function_name("double")
        .max_points(1.0)
        .build()
        .test(&[case(Arguments::arg(2), 4)], &console)
        .expect("grade");

    assert!(!captured.contents().contains("debugging output"));
    assert!(!console.is_hidden());
}

#[test]
fn subject_output_can_be_shown() {
    let chatty = Function::new("double", ["x"], |p, ctx| {
        ctx.println("debugging output from the student")?;
        Ok(Value::from(p.f64(0)? * 2.0))
    });
    let ns = Namespace::new().with("double", chatty);
    let (console, captured) = Console::captured();
    let console = console.with_subject_output(true);
    FunctionTest::builder()
        .namespace(&ns)
        .function_name("double")
        .max_points(1.0)
        .build()
        .test(&[case(Arguments::arg(2), 4)], &console)
        .expect("grade");

    assert!(captured.contents().contains("debugging output"));
}

#[test]
fn only_the_first_attempt_is_run() {
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let counted = Function::new("id", ["x"], move |p, _| {
        counter.set(counter.get() + 1);
        Ok(p.get(0)?.clone())
    });
    let ns = Namespace::new().with("id", counted);
    let (console, _) = Console::captured();
    let cases = [TestCase::builder()
        .arguments(Arguments::arg(7))
        .expected(7)
        .max_reruns(3)
        .build()];
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("id")
        .max_points(1.0)
        .build()
        .test(&cases, &console)
        .expect("grade");

    assert_eq!(report.score(), 1.0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn case_overrides_take_precedence() {
    let ns = Namespace::new().with("add", add());
    let (console, _) = Console::captured();
    let cases = [
        TestCase::builder()
            .arguments(Arguments::args([2, 3]))
            .expected(5.5)
            .tolerance(Tolerance::absolute(1.0))
            .build(),
        TestCase::builder()
            .arguments(Arguments::args([2, 3]))
            .expected(5.5)
            .build(),
        TestCase::builder()
            .arguments(Arguments::args([1, 1]))
            .expected(vec![2, 3])
            .test_function(Comparator::contains())
            .build(),
    ];
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(3.0)
        .build()
        .test(&cases, &console)
        .expect("grade");

    let scores: Vec<f64> = report.cases().iter().map(|c| c.score()).collect();
    assert_eq!(scores, vec![1.0, 0.0, 1.0]);
}

#[test]
fn missing_expectation_without_reference_is_a_config_error() {
    let ns = Namespace::new().with("add", add());
    let (console, captured) = Console::captured();
    let result = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(1.0)
        .build()
        .test(
            &[TestCase::builder().arguments(Arguments::args([1, 2])).build()],
            &console,
        );

    assert!(matches!(result, Err(GradeError::Config(_))));
    assert!(captured.contents().is_empty());
}

#[test]
fn zero_reruns_is_a_config_error() {
    let ns = Namespace::new().with("add", add());
    let (console, _) = Console::captured();
    let result = FunctionTest::builder()
        .namespace(&ns)
        .function_name("add")
        .max_points(1.0)
        .build()
        .test(
            &[TestCase::builder()
                .arguments(Arguments::args([1, 2]))
                .expected(3)
                .max_reruns(0)
                .build()],
            &console,
        );

    assert!(matches!(result, Err(GradeError::Config(_))));
}
