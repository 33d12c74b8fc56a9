//! Integration tests for the `#[fast_pipes]` attribute.
//!
//! Every test pairs a rewritten function with its hand-written equivalent
//! and asserts that the observable behavior is identical.

#![cfg(feature = "macros")]

use std::sync::atomic::{AtomicUsize, Ordering};

use fnpipe::{fast_pipes, pipe};

fn add_one(value: i32) -> i32 {
    value + 1
}

fn times_twelve(value: i32) -> i32 {
    value * 12
}

// =============================================================================
// Plain function chains
// =============================================================================

#[fast_pipes]
fn pipe_version() -> i32 {
    pipe!(12, add_one, times_twelve, times_twelve, add_one)
}

fn raw_version() -> i32 {
    add_one(times_twelve(times_twelve(add_one(12))))
}

#[test]
fn rewritten_chain_matches_nested_calls() {
    assert_eq!(pipe_version(), raw_version());
}

#[fast_pipes]
fn pipe_with_parameter(value: i32) -> i32 {
    pipe!(value, add_one, times_twelve)
}

#[test]
fn rewritten_function_keeps_its_calling_convention() {
    for value in [-3, 0, 7] {
        assert_eq!(pipe_with_parameter(value), times_twelve(add_one(value)));
    }
}

#[test]
fn rewritten_and_unrewritten_pipes_are_interchangeable() {
    let unrewritten = pipe!(12, add_one, times_twelve, times_twelve, add_one);
    assert_eq!(pipe_version(), unrewritten);
}

// =============================================================================
// Closure stages
// =============================================================================

#[fast_pipes]
fn pipe_version_with_closure() -> f64 {
    pipe!(12, add_one, times_twelve, times_twelve, add_one, |x| {
        f64::from(x) / 2.0
    })
}

fn raw_version_with_closure() -> f64 {
    f64::from(add_one(times_twelve(times_twelve(add_one(12))))) / 2.0
}

#[test]
fn once_used_closure_matches_ordinary_call() {
    assert!((pipe_version_with_closure() - raw_version_with_closure()).abs() < f64::EPSILON);
}

#[fast_pipes]
fn pipe_version_with_multi_use_closure() -> i32 {
    pipe!(12, add_one, times_twelve, times_twelve, add_one, |x| x + x + 2)
}

fn raw_version_with_multi_use_closure() -> i32 {
    let value = add_one(times_twelve(times_twelve(add_one(12))));
    value + value + 2
}

#[test]
fn multi_use_closure_matches_bound_value() {
    assert_eq!(
        pipe_version_with_multi_use_closure(),
        raw_version_with_multi_use_closure()
    );
}

static UPSTREAM_CALLS: AtomicUsize = AtomicUsize::new(0);

fn observed_add_one(value: i32) -> i32 {
    UPSTREAM_CALLS.fetch_add(1, Ordering::SeqCst);
    value + 1
}

#[fast_pipes]
fn pipe_with_observed_upstream() -> i32 {
    pipe!(5, observed_add_one, |x| x + x + 2)
}

#[test]
fn multi_use_closure_evaluates_upstream_exactly_once() {
    UPSTREAM_CALLS.store(0, Ordering::SeqCst);
    assert_eq!(pipe_with_observed_upstream(), 2 * 6 + 2);
    assert_eq!(UPSTREAM_CALLS.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Scope behavior
// =============================================================================

const TAX: i32 = 7;

#[fast_pipes]
fn pipe_with_free_variable() -> i32 {
    pipe!(10, add_one, |x| x + TAX)
}

#[test]
fn free_variables_still_resolve_after_rewriting() {
    assert_eq!(pipe_with_free_variable(), 18);
}

#[fast_pipes]
fn pipe_with_shadowing_stage_argument(x: i32) -> i32 {
    // The stage argument shares its name with the function parameter.
    pipe!(x, add_one, |x| x + x)
}

#[test]
fn stage_arguments_may_shadow_caller_variables() {
    assert_eq!(pipe_with_shadowing_stage_argument(4), 10);
}

#[fast_pipes]
fn pipe_with_local_closure_stage() -> i32 {
    let double = |x: i32| x * 2;
    pipe!(5, double, add_one)
}

#[test]
fn local_bindings_are_valid_stages() {
    assert_eq!(pipe_with_local_closure_stage(), 11);
}

// =============================================================================
// Call-site shapes
// =============================================================================

#[fast_pipes]
fn nested_pipes() -> i32 {
    pipe!(pipe!(2, add_one), times_twelve)
}

#[test]
fn nested_pipe_calls_fold_inside_out() {
    assert_eq!(nested_pipes(), 36);
}

#[fast_pipes]
fn pipe_as_statement() -> i32 {
    let mut total = 0;
    pipe!(3, add_one, |x| {
        total += x;
        x
    });
    total
}

#[test]
fn statement_position_pipes_are_folded() {
    assert_eq!(pipe_as_statement(), 4);
}

#[fast_pipes]
fn several_pipes_in_one_function() -> i32 {
    let first = pipe!(1, add_one, add_one);
    let second = pipe!(first, times_twelve);
    pipe!(second, |x| x - first)
}

#[test]
fn every_call_site_in_the_body_is_folded() {
    assert_eq!(several_pipes_in_one_function(), 33);
}

#[fast_pipes]
fn pipe_with_path_stage() -> i32 {
    pipe!(-5, i32::abs, add_one)
}

#[test]
fn qualified_paths_are_plain_stages() {
    assert_eq!(pipe_with_path_stage(), 6);
}

#[fast_pipes]
fn pipe_with_trailing_comma() -> i32 {
    pipe!(1, add_one,)
}

#[test]
fn trailing_commas_are_accepted() {
    assert_eq!(pipe_with_trailing_comma(), 2);
}

// =============================================================================
// Stage bodies the splice must not change the meaning of
// =============================================================================

#[fast_pipes]
fn pipe_with_rebound_stage_argument(value: i32) -> i32 {
    pipe!(value, |x| {
        let x = x + 1;
        x * x
    })
}

#[test]
fn let_rebinding_matches_the_runtime_closure() {
    let runtime = (|x: i32| {
        let x = x + 1;
        x * x
    })(4);
    assert_eq!(pipe_with_rebound_stage_argument(4), runtime);
    assert_eq!(pipe_with_rebound_stage_argument(4), 25);
}

#[fast_pipes]
fn pipe_with_format_stage(x: i32) -> String {
    pipe!(x * 10, |x| format!("{x}"))
}

#[test]
fn format_captures_bind_the_piped_value() {
    assert_eq!(pipe_with_format_stage(4), "40");
}

#[fast_pipes]
fn pipe_with_macro_and_direct_uses(x: i32) -> String {
    pipe!(x * 10, |x| {
        let label = format!("{x}");
        let doubled = x + x;
        format!("{label}-{doubled}")
    })
}

#[test]
fn macro_and_direct_uses_agree_on_the_piped_value() {
    assert_eq!(pipe_with_macro_and_direct_uses(4), "40-80");
}

#[fast_pipes]
fn pipe_with_typed_stage() -> usize {
    pipe!("hello".into(), |s: String| s.len())
}

#[test]
fn typed_stage_parameters_still_drive_inference() {
    assert_eq!(pipe_with_typed_stage(), 5);
}

// Stacking the marker must not re-trigger the transformation; the second
// attribute is stripped by the first expansion.
#[fast_pipes]
#[fast_pipes]
fn stacked_markers() -> i32 {
    pipe!(1, add_one)
}

#[test]
fn stacked_markers_apply_the_rewrite_once() {
    assert_eq!(stacked_markers(), 2);
}
