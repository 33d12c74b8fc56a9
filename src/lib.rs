//! # fnpipe
//!
//! Pipe syntax for Rust: left-to-right function pipelines with a
//! zero-overhead rewriting attribute.
//!
//! ## Overview
//!
//! The crate has two halves:
//!
//! - **Runtime pipelines**: the [`pipe!`] macro applies a value through a
//!   sequence of unary functions in the order they are written, and
//!   [`pipeline!`] composes such a sequence into a single reusable function.
//!   Helpers: [`pipe::bridge`] for observing a value mid-pipeline and
//!   [`pipe::apply_all`] for pipelines whose length is only known at runtime.
//! - **The optimizing rewriter**: the [`fast_pipes`] attribute rewrites every
//!   `pipe!` call inside a function into plain nested calls at compile time,
//!   splicing single-argument closure stages directly into the expression so
//!   no closure call frame remains.
//!
//! ## Feature Flags
//!
//! - `macros` (default): the `#[fast_pipes]` attribute, re-exported from the
//!   `fnpipe-macros` proc-macro crate.
//!
//! ## Example
//!
//! ```rust
//! use fnpipe::{fast_pipes, pipe};
//!
//! fn add_one(x: i32) -> i32 { x + 1 }
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! #[fast_pipes]
//! fn process(seed: i32) -> i32 {
//!     // compiles to: (double(add_one(seed))) + 3
//!     pipe!(seed, add_one, double, |x| x + 3)
//! }
//!
//! assert_eq!(process(5), 15);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the pipeline helpers and, with the `macros` feature, the
/// `#[fast_pipes]` attribute.
///
/// # Usage
///
/// ```rust
/// use fnpipe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::pipe::*;

    #[cfg(feature = "macros")]
    pub use fnpipe_macros::fast_pipes;
}

pub mod pipe;

#[cfg(feature = "macros")]
pub use fnpipe_macros::fast_pipes;
