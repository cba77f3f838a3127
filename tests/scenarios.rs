// End-to-end runs of single test cases through resolve, expand and execute.

mod common;

use casework::exception::{TYPE_ERROR, VALUE_ERROR};
use casework::{CallArgs, Globals, RunConfig, Runner, Symbol, TestCase, Value};
use common::{run_one, Counter};

#[test]
fn plain_case_without_expectation_passes() {
    let group = run_one(TestCase::new("returns_five", |_| Ok(Value::from(5))));
    assert!(group.is_passed());
    assert_eq!(group.results().len(), 1);
    assert!(group.results()[0].is_passed());
    assert_eq!(group.results()[0].returned(), Some(&Value::from(5)));
}

#[test]
fn expected_exception_is_a_pass() {
    let group = run_one(
        TestCase::new("raises_value_error", |_| Err(VALUE_ERROR.raise("x")))
            .expect_exception(&*VALUE_ERROR),
    );
    assert!(group.is_passed());
    assert!(group.results()[0].is_passed());
    assert_eq!(group.results()[0].raised().unwrap().message(), "x");
}

#[test]
fn unexpected_exception_type_fails_with_one_message() {
    let group = run_one(
        TestCase::new("raises_type_error", |_| Err(TYPE_ERROR.raise("x")))
            .expect_exception(&*VALUE_ERROR),
    );
    assert!(group.is_failed());
    assert!(group.results()[0].is_failed());
    let messages: Vec<String> = group.iter_failure_messages().collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("ValueError"));
    assert!(messages[0].contains("TypeError('x')"));
}

#[test]
fn holding_skip_never_executes_the_callable() {
    let counter = Counter::default();
    let seen = counter.clone();
    let group = run_one(
        TestCase::new("skipped", move |_| {
            seen.bump();
            Ok(Value::from(1))
        })
        .skip_when(true, "not on this platform")
        .expect_return(1),
    );
    assert!(group.is_skipped());
    assert!(group.is_passed());
    assert!(group.results().is_empty());
    assert_eq!(counter.get(), 0);
}

#[test]
fn competing_mocks_at_equal_priority_conflict() {
    let counter = Counter::default();
    let seen = counter.clone();
    let group = run_one(
        TestCase::new("double_patch", move |_| {
            seen.bump();
            Ok(Value::Nil)
        })
        .mock_global("config.timeout", 1)
        .mock_global("config.timeout", 2),
    );
    assert!(group.is_failed());
    assert!(group.conflict().is_some());
    assert!(group.results().is_empty());
    assert_eq!(group.iter_failure_messages().count(), 1);
    assert_eq!(counter.get(), 0);
}

#[test]
fn mocks_are_visible_during_the_call_and_gone_after() {
    let globals = Globals::new();
    globals.set("net.retries", 3);
    let runner = Runner::new(RunConfig::default())
        .unwrap()
        .with_globals(globals.clone());
    let case = TestCase::new("patched", |call| call.global("net.retries"))
        .mock_global("net.retries", 0)
        .expect_return(0);
    assert!(runner.run_case(&case).unwrap().is_passed());
    assert_eq!(globals.get(&Symbol::from("net.retries")), Some(Value::from(3)));
}

#[test]
fn each_parameterized_invocation_gets_its_own_result() {
    let group = run_one(
        TestCase::new("halves", |call| {
            let n = call.int(0)?;
            call.check(n % 2 == 0, format!("{n} is odd"))?;
            Ok(Value::from(n / 2))
        })
        .parameterize([2, 3, 4, 5].map(|n| CallArgs::positional([n]))),
    );
    assert!(group.is_failed());
    let names: Vec<&str> = group
        .results()
        .iter()
        .filter(|r| r.is_failed())
        .map(|r| r.name())
        .collect();
    assert_eq!(names, ["halves[1]", "halves[3]"]);
    let messages: Vec<String> = group.iter_failure_messages().collect();
    assert!(messages[0].starts_with("halves[1]: unexpected exception AssertionError('3 is odd')"));
}
