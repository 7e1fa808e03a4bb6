//! Panics raised by graded code are reported in the case outcome only.
//!
//! The panic hook is process-wide, so this binary holds a single test.

use std::{
    panic,
    sync::atomic::{AtomicUsize, Ordering},
};

use nbgrade::{
    Arguments, Comparator, Console, Function, FunctionTest, Namespace, TestCase, Value,
};

static REPORTED: AtomicUsize = AtomicUsize::new(0);

#[test]
fn caught_panics_do_not_reach_the_panic_hook() {
    panic::set_hook(Box::new(|_| {
        REPORTED.fetch_add(1, Ordering::SeqCst);
    }));

    let boom = Function::variadic("boom", |_, _| panic!("student panic text"));
    let ident = Function::new("ident", ["x"], |p, _| Ok(p.get(0)?.clone()));
    let ns = Namespace::new().with("boom", boom).with("ident", ident);
    let (console, captured) = Console::captured();

    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("boom")
        .max_points(1.0)
        .build()
        .test(
            &[TestCase::builder()
                .arguments(Arguments::arg(1))
                .expected(1)
                .build()],
            &console,
        )
        .expect("grade");
    assert_eq!(report.total_points(), 0.0);
    assert!(captured.contents().contains("student panic text"));

    let broken = Comparator::new("broken", |_, _, _| panic!("comparator panic text"));
    let report = FunctionTest::builder()
        .namespace(&ns)
        .function_name("ident")
        .max_points(1.0)
        .test_function(broken)
        .build()
        .test(
            &[TestCase::builder()
                .arguments(Arguments::arg(1))
                .expected(Value::from(1))
                .build()],
            &console,
        )
        .expect("grade");
    assert_eq!(report.total_points(), 0.0);
    assert!(
        report.cases()[0]
            .message()
            .contains("comparator panic text")
    );

    assert_eq!(REPORTED.load(Ordering::SeqCst), 0);

    let outside = panic::catch_unwind(|| {
        panic!("harness panic");
    });
    assert!(outside.is_err());
    assert_eq!(REPORTED.load(Ordering::SeqCst), 1);
}
