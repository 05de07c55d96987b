//! # This-Select
//!
//! A declarative field-selection engine: given a tree describing which
//! fields of a data graph to select and a root data node, it produces a
//! nested response holding exactly the requested values.
//!
//! ## Features
//!
//! - **Heterogeneous Data**: JSON mappings and attribute-bearing records behind one accessor
//! - **Resolvers**: Invocable links receive the field's arguments as named parameters
//! - **Equality Filters**: Arguments on plain links drop non-matching list elements
//! - **Fragments**: Type-scoped selections, by type name, interface or custom matcher
//! - **Aliases and Directives**: Response keys are renamed; directives are carried opaquely
//! - **Reusable Queries**: Validated once, executed any number of times from any thread
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use select::prelude::*;
//! use serde_json::json;
//!
//! let data = json!({
//!     "name": "John",
//!     "friends": [{"name": "Alice", "age": 30}, {"name": "Bob", "age": 28}]
//! });
//!
//! let query = Query::new(
//!     Field::root()
//!         .field(Field::scalar("name"))
//!         .field(Field::object("friends").field(Field::scalar("name").arg("age", 30))),
//! )?;
//!
//! let response = query.execute(&data.into())?;
//! assert_eq!(response, json!({"name": "John", "friends": [{"name": "Alice"}]}));
//! ```

pub mod config;
pub mod core;
pub mod execution;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Data Model ===
    pub use crate::core::{
        accessor::{Resolution, resolve},
        field::{Directive, Field, FragmentField, ObjectField, ScalarField, TypeCondition, TypeMatcher},
        node::{Arguments, Invocable, Link, NodeValue, Record},
        path::FieldPath,
        query::Query,
        record::DynamicRecord,
    };

    // === Errors ===
    pub use crate::core::error::{ConfigError, ExecutionError, QueryError, SelectError};

    // === Macros ===
    pub use crate::impl_record;

    // === Execution ===
    pub use crate::execution::{Executor, execute};

    // === Config ===
    pub use crate::config::ExecutorConfig;
}
