//! Helper functions for pipelines.
//!
//! This module provides the small runtime companions to the pipeline macros:
//!
//! - [`identity`]: the identity function, the unit of composition
//! - [`bridge`]: lets a side-effecting inspection function sit inside a
//!   pipeline without breaking the chain
//! - [`apply_all`]: applies a runtime-sized sequence of functions to a value

/// Returns the value unchanged.
///
/// The identity function is the unit element of pipeline composition:
/// `pipe!(x, identity)` is equivalent to `x`, and inserting `identity`
/// anywhere in a pipeline leaves the result unchanged.
///
/// # Examples
///
/// ```
/// use fnpipe::pipe;
/// use fnpipe::pipe::identity;
///
/// assert_eq!(identity(42), 42);
/// assert_eq!(pipe!(7, identity, |x: i32| x * 2, identity), 14);
/// ```
#[inline]
pub fn identity<T>(value: T) -> T {
    value
}

/// Wraps an inspection function so it can sit inside a pipeline.
///
/// When debugging, you might want to use a function to look at the current
/// value in the pipe, but examination functions generally do not return the
/// value to let it continue down the chain. `bridge` wraps such a function:
/// the observer receives a reference to the value, its result is discarded,
/// and the value itself is passed on unchanged.
///
/// # Examples
///
/// ```
/// use fnpipe::pipe;
/// use fnpipe::pipe::bridge;
///
/// let result = pipe!(
///     1,
///     |x| x + 2,
///     bridge(|value: &i32| eprintln!("currently {value}")),
///     |x: i32| x.to_string(),
/// );
///
/// // The printing stage did not swallow the value.
/// assert_eq!(result, "3");
/// ```
///
/// Observations are by reference, so non-`Copy` values flow through without
/// cloning:
///
/// ```
/// use fnpipe::pipe;
/// use fnpipe::pipe::bridge;
///
/// let mut lengths = Vec::new();
/// let result = pipe!(
///     String::from("hello"),
///     bridge(|s: &String| lengths.push(s.len())),
///     |s: String| s.to_uppercase(),
/// );
/// assert_eq!(result, "HELLO");
/// assert_eq!(lengths, vec![5]);
/// ```
#[inline]
pub fn bridge<Value, Observer, Ignored>(mut observer: Observer) -> impl FnMut(Value) -> Value
where
    Observer: FnMut(&Value) -> Ignored,
{
    move |value| {
        observer(&value);
        value
    }
}

/// Applies an arbitrary number of functions to a value, left to right.
///
/// This is the fallback for pipelines whose stage list is only known at
/// runtime. All stages share one value type, since a heterogeneous chain
/// cannot be expressed over a runtime sequence.
///
/// # Examples
///
/// ```
/// use fnpipe::pipe::apply_all;
///
/// fn add_one(x: i64) -> i64 { x + 1 }
/// fn times_ten(x: i64) -> i64 { x * 10 }
///
/// let stages: Vec<&dyn Fn(i64) -> i64> = vec![&add_one, &times_ten];
/// assert_eq!(apply_all(1, &stages), 20);
/// assert_eq!(apply_all(1, &[]), 1);
/// ```
pub fn apply_all<Value>(value: Value, stages: &[&dyn Fn(Value) -> Value]) -> Value {
    stages.iter().fold(value, |value, stage| stage(value))
}
