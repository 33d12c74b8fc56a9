//! Pipeline utilities.
//!
//! This module provides the runtime half of the crate: macros and functions
//! for applying a sequence of unary transformations to a value, left to
//! right.
//!
//! # Overview
//!
//! - [`pipe!`]: apply a value through a sequence of functions immediately
//! - [`pipeline!`]: compose a sequence of functions into one function
//! - [`bridge`]: wrap an inspection function so it observes a value without
//!   breaking the chain
//! - [`apply_all`]: fold a runtime-sized slice of functions over a value
//! - [`identity`]: the identity function
//!
//! # Relationship with `#[fast_pipes]`
//!
//! `pipe!` already expands to nested calls, but a closure stage keeps its own
//! call frame: `pipe!(x, |n| n + 1)` becomes `(|n| n + 1)(x)`. Functions
//! marked with the [`fast_pipes`](https://docs.rs/fnpipe) attribute have
//! every `pipe!` call site folded at compile time instead, with closure
//! bodies spliced directly into the expression. The two forms are
//! behaviorally interchangeable.
//!
//! # Examples
//!
//! ## Immediate application
//!
//! ```
//! use fnpipe::pipe;
//!
//! fn add_one(x: i32) -> i32 { x + 1 }
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! // pipe!(x, f, g) = g(f(x))
//! let result = pipe!(5, double, add_one);
//! assert_eq!(result, 11);
//! ```
//!
//! ## Reusable pipeline
//!
//! ```
//! use fnpipe::pipeline;
//!
//! fn add_one(x: i32) -> i32 { x + 1 }
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! let process = pipeline!(double, add_one);
//! assert_eq!(process(5), 11);
//! assert_eq!(process(8), 17);
//! ```
//!
//! ## Observing a value mid-pipeline
//!
//! ```
//! use fnpipe::pipe;
//! use fnpipe::pipe::bridge;
//!
//! let result = pipe!(
//!     1,
//!     |x| x + 2,
//!     bridge(|value: &i32| println!("currently {value}")),
//!     |x: i32| x.to_string(),
//! );
//! assert_eq!(result, "3");
//! ```

mod pipe_macro;
mod pipeline_macro;
mod utils;

// Re-export helper functions
pub use utils::{apply_all, bridge, identity};

// Re-export macros (they are already at crate root via #[macro_export])
pub use crate::pipe;
pub use crate::pipeline;
