//! Query execution
//!
//! The executor walks a [`Query`](crate::core::query::Query) depth-first
//! against a data node:
//! - `executor`: field execution and list fan-out
//! - `context`: per-execution path and depth tracking
//! - `response`: the per-node response accumulator

mod context;
mod executor;
mod response;

pub use executor::{Executor, execute};
