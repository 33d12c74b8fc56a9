//! Procedural macros for fnpipe pipelines.
//!
//! This crate provides the `#[fast_pipes]` attribute, which rewrites every
//! `pipe!` call inside a function into the direct equivalent of the
//! pipeline at compile time.
//!
//! # What the rewrite produces
//!
//! ```text
//! pipe!(a, b, c, d)
//! ```
//!
//! becomes
//!
//! ```text
//! d(c(b(a)))
//! ```
//!
//! Closure stages are expanded so that there is no closure calling
//! overhead:
//!
//! ```text
//! pipe!(a, b, c, |x| x + 1)
//! ```
//!
//! becomes
//!
//! ```text
//! (c(b(a))) + 1
//! ```
//!
//! Where a closure body uses its argument more than once, a hidden `let`
//! binding is introduced to avoid duplicating the calculation:
//!
//! ```text
//! pipe!(a, b, c, |x| x + x + 1)
//! ```
//!
//! becomes
//!
//! ```text
//! { let v = c(b(a)); v + v + 1 }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod count;
mod rewrite;
mod substitute;

use proc_macro::TokenStream;

/// Rewrites `pipe!` call sites in the function body into nested calls.
///
/// The rewritten function is emitted in place, with the same name,
/// signature, and scope, so callers and free variables are unaffected; only
/// the generated code differs. The rewrite runs once, at compile time.
///
/// # Stage handling
///
/// - A plain stage (function path, or any expression evaluating to a
///   callable) becomes one nested call.
/// - A single-argument closure stage is spliced into the expression: its
///   body replaces the call, with the piped value substituted for the
///   argument. If the body reads the argument more than once, the piped
///   value is bound to a hidden name first and evaluated exactly once.
///
/// # Errors
///
/// All failures are reported at compile time, at the offending call site:
///
/// - a closure stage that never reads the piped value ("This lambda has no
///   arguments.");
/// - a closure stage with more than one argument, or with a destructuring
///   argument pattern;
/// - a `..stages` spread in the stage list ("pipe can't take a starred
///   expression as an argument when fast_pipes is used.").
///
/// # Example
///
/// ```rust,ignore
/// use fnpipe::{fast_pipes, pipe};
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn double(x: i32) -> i32 { x * 2 }
///
/// #[fast_pipes]
/// fn process(seed: i32) -> i32 {
///     // compiles to: (double(add_one(seed))) / 2
///     pipe!(seed, add_one, double, |x| x / 2)
/// }
///
/// assert_eq!(process(3), 4);
/// ```
#[proc_macro_attribute]
pub fn fast_pipes(attribute: TokenStream, item: TokenStream) -> TokenStream {
    rewrite::fast_pipes_impl(attribute.into(), item.into()).into()
}
