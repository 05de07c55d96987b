//! Validated query trees
//!
//! A [`Query`] wraps a field tree that has been checked once against the
//! construction invariants. It is the only thing the executor accepts,
//! so an invalid tree can never be executed.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::core::error::{ExecutionError, QueryError};
use crate::core::field::Field;
use crate::core::node::NodeValue;
use crate::core::path::FieldPath;
use crate::execution::Executor;

/// A field tree ready for execution
///
/// Immutable once built; it can be executed any number of times, from
/// any number of threads.
///
/// # Example
/// ```rust,ignore
/// let query = Query::new(
///     Field::root()
///         .field(Field::scalar("name"))
///         .field(Field::object("friends").field(Field::scalar("name"))),
/// )?;
///
/// let response = query.execute(&json!({"name": "John", "friends": []}).into())?;
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    root: Field,
}

impl Query {
    /// Validate a field tree
    ///
    /// # Errors
    ///
    /// Returns the first [`QueryError`] found, walking the tree depth-first.
    pub fn new(root: impl Into<Field>) -> Result<Self, QueryError> {
        let root = root.into();
        validate_root(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Field {
        &self.root
    }

    /// Execute against `node` with the default executor configuration
    pub fn execute(&self, node: &NodeValue) -> Result<Value, ExecutionError> {
        Executor::default().execute(self, node)
    }
}

impl TryFrom<Field> for Query {
    type Error = QueryError;

    fn try_from(root: Field) -> Result<Self, Self::Error> {
        Query::new(root)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

fn validate_root(root: &Field) -> Result<(), QueryError> {
    match root {
        Field::Fragment(_) => Err(QueryError::FragmentRoot),
        Field::Object(object) if object.is_root() => {
            if let Some(alias) = &object.alias {
                return Err(QueryError::AliasOnRoot {
                    alias: alias.clone(),
                });
            }
            if !object.args.is_empty() {
                return Err(QueryError::ArgumentsOnRoot {
                    arguments: object.args.keys().cloned().collect(),
                });
            }
            validate_selection(&object.fields, &FieldPath::root())?;

            let mut writers = Vec::new();
            collect_writers(&object.fields, &mut writers);
            validate_merge(&writers, &FieldPath::root())
        }
        field => {
            validate_field(field, &FieldPath::root())?;
            validate_merge(&[field], &FieldPath::root())
        }
    }
}

/// Validate a non-root field found under `parent`
fn validate_field(field: &Field, parent: &FieldPath) -> Result<(), QueryError> {
    match field {
        Field::Scalar(scalar) => {
            if scalar.name.is_empty() {
                return Err(QueryError::EmptyName {
                    path: parent.clone(),
                });
            }
            Ok(())
        }
        Field::Object(object) => {
            let Some(name) = object.name() else {
                return Err(QueryError::NamelessField {
                    path: parent.clone(),
                });
            };
            if name.is_empty() {
                return Err(QueryError::EmptyName {
                    path: parent.clone(),
                });
            }
            let path = parent.key(object.response_key().unwrap_or(name));
            validate_selection(&object.fields, &path)
        }
        Field::Fragment(fragment) => validate_selection(&fragment.fields, parent),
    }
}

/// Validate a selection set: every child, then key uniqueness among
/// the direct scalar and object children
fn validate_selection(fields: &[Field], path: &FieldPath) -> Result<(), QueryError> {
    let mut seen = HashSet::new();
    for field in fields {
        validate_field(field, path)?;

        if let Some(key) = field.response_key()
            && !seen.insert(key)
        {
            return Err(QueryError::DuplicateKey {
                key: key.to_string(),
                path: path.clone(),
            });
        }
    }
    Ok(())
}

/// Fields writing into one response mapping, with every fragment
/// flattened in since any of them may apply at execution time
fn collect_writers<'q>(fields: &'q [Field], writers: &mut Vec<&'q Field>) {
    for field in fields {
        match field {
            Field::Fragment(fragment) => collect_writers(&fragment.fields, writers),
            field => writers.push(field),
        }
    }
}

/// Check that fields sharing a response key can be resolved as one
///
/// Fields writing the same key must read the same link with the same
/// arguments; their sub-selections are merged and checked in turn.
fn validate_merge(writers: &[&Field], path: &FieldPath) -> Result<(), QueryError> {
    let mut groups: IndexMap<&str, Vec<&Field>> = IndexMap::new();
    for &field in writers {
        if let Some(key) = field.response_key() {
            groups.entry(key).or_default().push(field);
        }
    }

    for (key, group) in groups {
        if let Some((first, rest)) = group.split_first()
            && rest.iter().any(|other| !same_link(first, other))
        {
            return Err(QueryError::DuplicateKey {
                key: key.to_string(),
                path: path.clone(),
            });
        }

        let mut children = Vec::new();
        for field in &group {
            if let Field::Object(object) = field {
                collect_writers(&object.fields, &mut children);
            }
        }
        if !children.is_empty() {
            validate_merge(&children, &path.key(key))?;
        }
    }
    Ok(())
}

fn same_link(a: &Field, b: &Field) -> bool {
    match (a, b) {
        (Field::Scalar(a), Field::Scalar(b)) => a.name == b.name && a.args == b.args,
        (Field::Object(a), Field::Object(b)) => a.name == b.name && a.args == b.args,
        _ => false,
    }
}
