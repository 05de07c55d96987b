//! Node accessor: resolves a named link on any data node
//!
//! Lookup order is keyed lookup first, then member lookup. A link that is
//! invocable is called with the field's arguments. A plain link with
//! arguments is equality-filtered instead: every argument names another
//! link of the same node that must equal the argument value, otherwise
//! the node is [`Resolution::Filtered`].

use serde_json::Value;

use crate::core::error::ExecutionError;
use crate::core::node::{Arguments, Link, NodeValue};
use crate::core::path::FieldPath;

/// Outcome of resolving a link
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The link resolved to a value
    Resolved(NodeValue),

    /// The node failed an equality filter and should be omitted
    Filtered,
}

impl Resolution {
    pub fn is_filtered(&self) -> bool {
        matches!(self, Resolution::Filtered)
    }

    /// The resolved value, if any
    pub fn into_value(self) -> Option<NodeValue> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Filtered => None,
        }
    }
}

/// Find a link on a node without invoking or filtering it
///
/// JSON objects only answer keyed lookups; records answer keyed then
/// member lookups. Any other node has no links.
pub fn lookup(node: &NodeValue, link_name: &str) -> Option<Link> {
    match node {
        NodeValue::Json(Value::Object(map)) => map.get(link_name).cloned().map(Link::from),
        NodeValue::Record(record) => record.get(link_name).or_else(|| record.member(link_name)),
        _ => None,
    }
}

/// Resolve `link_name` on `node` with the given arguments
///
/// `path` is the location of the field being executed and is only used to
/// give errors their context.
///
/// # Errors
///
/// - [`ExecutionError::UnknownLink`] when neither lookup strategy finds the link
///   (including any link named by an equality-filter argument)
/// - [`ExecutionError::Invocation`] when an invocable link fails
pub fn resolve(
    node: &NodeValue,
    link_name: &str,
    args: &Arguments,
    path: &FieldPath,
) -> Result<Resolution, ExecutionError> {
    let link = lookup(node, link_name).ok_or_else(|| ExecutionError::UnknownLink {
        link: link_name.to_string(),
        node_type: node.type_name().into_owned(),
        path: path.clone(),
    })?;

    match link {
        Link::Invocable(resolver) => {
            let value = resolver
                .invoke(args)
                .map_err(|source| ExecutionError::Invocation {
                    link: link_name.to_string(),
                    path: path.clone(),
                    source,
                })?;
            Ok(Resolution::Resolved(value))
        }
        Link::Value(value) if args.is_empty() => Ok(Resolution::Resolved(value)),
        Link::Value(value) => {
            let no_args = Arguments::new();
            for (key, expected) in args {
                // Resolving without arguments never filters
                let Resolution::Resolved(actual) = resolve(node, key, &no_args, path)? else {
                    return Ok(Resolution::Filtered);
                };

                if !actual.matches(expected) {
                    tracing::trace!(
                        link = %link_name,
                        filter = %key,
                        expected = %expected,
                        path = %path,
                        "equality filter rejected node"
                    );
                    return Ok(Resolution::Filtered);
                }
            }
            Ok(Resolution::Resolved(value))
        }
    }
}
