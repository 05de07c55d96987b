//! Core module containing the data model of the selection engine

pub mod accessor;
pub mod error;
pub mod field;
pub mod node;
pub mod path;
pub mod query;
pub mod record;

pub use accessor::{Resolution, lookup, resolve};
pub use error::{ConfigError, ExecutionError, QueryError, SelectError};
pub use field::{Directive, Field, FragmentField, ObjectField, ScalarField, TypeCondition, TypeMatcher};
pub use node::{Arguments, Invocable, Link, NodeValue, Record};
pub use path::{FieldPath, PathSegment};
pub use query::Query;
pub use record::DynamicRecord;
