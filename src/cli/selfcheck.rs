//! A bundled suite that drives every wrapper kind through the engine.
//!
//! Every case here is expected to pass (or be skipped), so a non-zero exit
//! from `casework selfcheck` means the engine itself misbehaved.

use crate::exception::{
    Exception, KEY_ERROR, LOOKUP_ERROR, TYPE_ERROR, VALUE_ERROR, ZERO_DIVISION_ERROR,
};
use crate::globals::Globals;
use crate::test::{Call, TestCase, Wrapper};
use crate::value::{CallArgs, Value};

/// Initial module attributes the suite reads and patches.
pub fn globals() -> Globals {
    let globals = Globals::new();
    globals.set("config.timeout", 30);
    globals.set("config.mode", "prod");
    globals.set("stats.calls", 0);
    globals
}

fn int_kwarg(call: &Call, name: &str) -> Result<i64, Exception> {
    call.kwarg(name)?
        .as_int()
        .ok_or_else(|| TYPE_ERROR.raise(format!("`{name}` must be int")))
}

fn divide(call: &Call) -> Result<Value, Exception> {
    let (a, b) = (call.int(0)?, call.int(1)?);
    if b == 0 {
        return Err(ZERO_DIVISION_ERROR.raise("division by zero"));
    }
    Ok(Value::from(a / b))
}

pub fn suite() -> Vec<TestCase> {
    vec![
        TestCase::new("returns_without_expectation", |_| Ok(Value::from(5))),
        TestCase::new("call_with_injects_arguments", divide)
            .call_with(CallArgs::positional([10, 2]))
            .expect_return(5),
        TestCase::new("raises_expected_type", |_| Err(VALUE_ERROR.raise("x")))
            .expect_exception(&*VALUE_ERROR),
        TestCase::new("family_accepts_subtypes", |_| Err(KEY_ERROR.raise("missing")))
            .expect_exception_family(&*LOOKUP_ERROR),
        TestCase::new("nested_declaration_matches_instance", |_| {
            Err(VALUE_ERROR.raise("bad input"))
        })
        .expect_exception(Value::tuple([
            Value::tuple([Value::from(&*TYPE_ERROR)]),
            Value::from(VALUE_ERROR.raise("bad input")),
        ])),
        TestCase::new("expectations_union_across_wrappers", divide)
            .call_with(CallArgs::positional([1, 0]))
            .expect_exception(&*TYPE_ERROR)
            .expect_exception(&*ZERO_DIVISION_ERROR),
        TestCase::new("skipped_unconditionally", |_| {
            Err(VALUE_ERROR.raise("never runs"))
        })
        .skip("demonstrates an unconditional skip"),
        TestCase::new("skipped_by_predicate", |_| Err(VALUE_ERROR.raise("never runs")))
            .skip_if(|| true, "predicate held")
            .expect_return(1),
        TestCase::new("not_skipped_when_false", |_| Ok(Value::from(true)))
            .skip_when(false, "condition is false")
            .expect_return(true),
        TestCase::new("cartesian_grid", |call| {
            let product = int_kwarg(call, "x")? * int_kwarg(call, "y")?;
            call.check(product >= 0, "grid values are non-negative")?;
            Ok(Value::from(product))
        })
        .parameterize((0..2).map(|x| CallArgs::new().kwarg("x", x)))
        .parameterize((0..3).map(|y| CallArgs::new().kwarg("y", y))),
        TestCase::new("zipped_pairs", |call| {
            let (n, doubled) = (int_kwarg(call, "n")?, int_kwarg(call, "doubled")?);
            call.check(n * 2 == doubled, format!("{n} * 2 != {doubled}"))?;
            Ok(Value::Nil)
        })
        .parameterize_zipped((1..=3).map(|n| CallArgs::new().kwarg("n", n)))
        .parameterize_zipped((1..=3).map(|n| CallArgs::new().kwarg("doubled", n * 2))),
        TestCase::new("duplicate_sets_still_run", |call| {
            Ok(Value::from(call.arg(0)?.to_string()))
        })
        .parameterize([
            CallArgs::positional([Value::list([1, 2])]),
            CallArgs::positional([Value::list([1, 2])]),
        ]),
        TestCase::new("mock_global_patches", |call| call.global("config.timeout"))
            .mock_global("config.timeout", 1)
            .expect_return(1),
        TestCase::new("mock_global_restored", |call| call.global("config.timeout"))
            .expect_return(30),
        TestCase::new("mocks_apply_in_priority_order", |call| call.global("config.mode"))
            .mock_global_at("config.mode", "late", 5)
            .mock_global_at("config.mode", "early", -1)
            .expect_return("late"),
        TestCase::new("mock_can_create_a_global", |call| call.global("feature.flag"))
            .wrap(Wrapper::mock_new_global("feature.flag", true))
            .expect_return(true),
        TestCase::new("revert_undoes_writes", |call| {
            let calls = call.global("stats.calls")?.as_int().unwrap_or_default();
            call.set_global("stats.calls", calls + 1);
            call.set_global("stats.scratch", "temporary");
            Ok(Value::Nil)
        })
        .revert(),
        TestCase::new("reverted_state_is_clean", |call| {
            call.check(
                call.global("stats.scratch").is_err(),
                "scratch survived revert",
            )?;
            call.global("stats.calls")
        })
        .expect_return(0),
        TestCase::new("multiline_text_return", |_| Ok(Value::from("alpha\nbeta")))
            .expect_return("alpha\nbeta"),
    ]
}
