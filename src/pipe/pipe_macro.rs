//! The `pipe!` macro for left-to-right function application.
//!
//! This module provides the [`pipe!`] macro which applies a value through a
//! series of unary functions in the order they are written.

/// Pipes a value through a series of functions from left to right.
///
/// `pipe!(x, f, g, h)` is equivalent to `h(g(f(x)))`.
///
/// The value flows through the transformations in the order they are
/// written, matching the mental model of data moving down a pipeline.
///
/// # Syntax
///
/// - `pipe!(x)` - Returns `x` unchanged
/// - `pipe!(x, f)` - Returns `f(x)`
/// - `pipe!(x, f, g)` - Returns `g(f(x))`
/// - `pipe!(x, f, g, h, ...)` - Returns `...h(g(f(x)))`
///
/// A trailing comma is accepted.
///
/// # Type Requirements
///
/// Each stage only needs to implement [`FnOnce`], since each stage is called
/// exactly once. Stages may consume their captured environment, and the
/// output type of each stage becomes the input type of the next.
///
/// # Zero-overhead variant
///
/// Inside a function marked `#[fast_pipes]`, `pipe!` call sites are folded
/// at compile time and closure stages are spliced into the surrounding
/// expression with no call frame at all. The result is identical; only the
/// generated code differs.
///
/// # Examples
///
/// ## Basic pipeline
///
/// ```
/// use fnpipe::pipe;
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn times_twelve(x: i32) -> i32 { x * 12 }
///
/// let result = pipe!(12, add_one, times_twelve, times_twelve, add_one);
/// assert_eq!(result, add_one(times_twelve(times_twelve(add_one(12)))));
/// ```
///
/// ## Closure stages
///
/// ```
/// use fnpipe::pipe;
///
/// let result = pipe!(10, |x| x + 2, |x| x / 2);
/// assert_eq!(result, 6);
/// ```
///
/// ## Type conversion through the pipeline
///
/// ```
/// use fnpipe::pipe;
///
/// fn to_string(x: i32) -> String { x.to_string() }
/// fn length(s: String) -> usize { s.len() }
///
/// let result = pipe!(12345, to_string, length);
/// assert_eq!(result, 5);
/// ```
///
/// ## With consuming stages
///
/// ```
/// use fnpipe::pipe;
///
/// fn double_all(values: Vec<i32>) -> Vec<i32> {
///     values.into_iter().map(|x| x * 2).collect()
/// }
///
/// fn keep_large(values: Vec<i32>) -> Vec<i32> {
///     values.into_iter().filter(|x| *x > 5).collect()
/// }
///
/// let result = pipe!(vec![1, 2, 3, 4, 5], double_all, keep_large);
/// assert_eq!(result, vec![6, 8, 10]);
/// ```
#[macro_export]
macro_rules! pipe {
    // Value only: return as is
    ($value:expr $(,)?) => {
        $value
    };

    // Single stage: apply it
    ($value:expr, $stage:expr $(,)?) => {
        $stage($value)
    };

    // Multiple stages: apply left to right recursively
    ($value:expr, $stage:expr, $($remaining_stages:expr),+ $(,)?) => {
        $crate::pipe!($stage($value), $($remaining_stages),+)
    };
}
