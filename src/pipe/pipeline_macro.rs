//! The `pipeline!` macro for building a pipeline as a reusable function.
//!
//! This module provides the [`pipeline!`] macro which composes a sequence of
//! unary functions into a single function, applied left to right.

/// Composes a series of functions into one function, applied left to right.
///
/// `pipeline!(f, g, h)(x)` is equivalent to `h(g(f(x)))`.
///
/// Where [`pipe!`](crate::pipe!) immediately applies the stages to a value,
/// `pipeline!` produces a function that can be stored, passed around, and
/// called many times.
///
/// # Relationship with pipe!
///
/// `pipeline!(f, g)(x)` is equivalent to `pipe!(x, f, g)`.
///
/// # Syntax
///
/// - `pipeline!(f)` - Returns `f` unchanged
/// - `pipeline!(f, g)` - Returns `|x| g(f(x))`
/// - `pipeline!(f, g, h, ...)` - Chains any number of stages
///
/// # Type Requirements
///
/// The stages must implement [`Fn`] so the resulting pipeline can be called
/// repeatedly. Every stage is unary; the output type of each stage becomes
/// the input type of the next.
///
/// # Examples
///
/// ## Basic pipeline
///
/// ```
/// use fnpipe::pipeline;
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn double(x: i32) -> i32 { x * 2 }
///
/// let process = pipeline!(add_one, double);
/// assert_eq!(process(5), 12); // double(add_one(5))
/// ```
///
/// ## Reuse
///
/// ```
/// use fnpipe::pipeline;
///
/// let normalize = pipeline!(str::trim, str::to_lowercase);
/// assert_eq!(normalize("  HELLO "), "hello");
/// assert_eq!(normalize("World"), "world");
/// ```
///
/// ## As an iterator adapter
///
/// ```
/// use fnpipe::pipeline;
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn double(x: i32) -> i32 { x * 2 }
///
/// let doubled: Vec<i32> = vec![1, 2, 3]
///     .into_iter()
///     .map(pipeline!(add_one, double))
///     .collect();
/// assert_eq!(doubled, vec![4, 6, 8]);
/// ```
///
/// ## Equivalence with pipe!
///
/// ```
/// use fnpipe::{pipe, pipeline};
///
/// fn f(x: i32) -> i32 { x + 1 }
/// fn g(x: i32) -> i32 { x * 2 }
///
/// assert_eq!(pipeline!(f, g)(10), pipe!(10, f, g));
/// ```
#[macro_export]
macro_rules! pipeline {
    // Single stage: the pipeline is the stage itself
    ($stage:expr $(,)?) => {
        $stage
    };

    // Two or more stages: bind the first, compose the rest recursively
    ($first_stage:expr, $($remaining_stages:expr),+ $(,)?) => {{
        let first = $first_stage;
        let rest = $crate::pipeline!($($remaining_stages),+);
        move |input| rest(first(input))
    }};
}
