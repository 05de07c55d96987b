//! Data nodes: the values a selection is executed against
//!
//! A node is either plain JSON-shaped data, a [`Record`] exposing named
//! links, or a list of nodes. Records are the extension point: any data
//! shape can take part in execution by implementing [`Record`].

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::core::error::ExecutionError;
use crate::core::path::FieldPath;

/// Key used to read the type tag of a JSON object when none is configured
pub const DEFAULT_TYPENAME_KEY: &str = "__typename";

/// Call arguments of a field, in the order they were declared
pub type Arguments = IndexMap<String, Value>;

/// A link that is called rather than read
///
/// The field's arguments are passed as named parameters. Any error is
/// reported as-is to the caller of the execution.
///
/// Closures implement this trait directly:
///
/// ```rust,ignore
/// let posts = |args: &Arguments| -> anyhow::Result<NodeValue> {
///     let limit = args.get("limit").and_then(|v| v.as_u64()).unwrap_or(10);
///     Ok(load_posts(limit)?.into())
/// };
/// ```
pub trait Invocable: Send + Sync {
    fn invoke(&self, args: &Arguments) -> anyhow::Result<NodeValue>;
}

impl<F> Invocable for F
where
    F: Fn(&Arguments) -> anyhow::Result<NodeValue> + Send + Sync,
{
    fn invoke(&self, args: &Arguments) -> anyhow::Result<NodeValue> {
        self(args)
    }
}

/// A named value or invocable member of a node
#[derive(Clone)]
pub enum Link {
    /// A plain value, returned as-is (or equality-filtered when arguments are given)
    Value(NodeValue),

    /// A resolver, called with the field's arguments
    Invocable(Arc<dyn Invocable>),
}

impl Link {
    /// Wrap a resolver closure
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&Arguments) -> anyhow::Result<NodeValue> + Send + Sync + 'static,
    {
        Link::Invocable(Arc::new(f))
    }

    /// Serialize a value into a plain link
    ///
    /// A value with no JSON form becomes an invocable link failing with the
    /// serialization error, so reading it aborts the execution instead of
    /// rendering `null`.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Link::from(value),
            Err(err) => {
                let err = Arc::new(err);
                Link::resolver(move |_args: &Arguments| Err(anyhow::Error::new(Arc::clone(&err))))
            }
        }
    }

    pub fn is_invocable(&self) -> bool {
        matches!(self, Link::Invocable(_))
    }
}

impl From<NodeValue> for Link {
    fn from(value: NodeValue) -> Self {
        Link::Value(value)
    }
}

impl From<Value> for Link {
    fn from(value: Value) -> Self {
        Link::Value(NodeValue::Json(value))
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Link::Invocable(_) => write!(f, "Invocable(..)"),
        }
    }
}

/// An entity exposing named links
///
/// Two lookup strategies are offered and tried in order: keyed lookup
/// (`get`, the mapping view of the entity) then member lookup (`member`,
/// its attributes). Both default to "absent", so an implementation only
/// provides the view it has.
pub trait Record: Send + Sync {
    /// Runtime type tag, used to match type-scoped fragments
    fn type_name(&self) -> &str;

    /// Look a link up by key
    fn get(&self, _key: &str) -> Option<Link> {
        None
    }

    /// Look a link up as a named member
    fn member(&self, _name: &str) -> Option<Link> {
        None
    }

    /// Whether this record also satisfies the given interface or union type
    fn implements(&self, _type_name: &str) -> bool {
        false
    }
}

/// A value flowing through execution
#[derive(Clone)]
pub enum NodeValue {
    /// JSON-shaped data; objects are mapping nodes, arrays are lists
    Json(Value),

    /// An attribute-bearing entity
    Record(Arc<dyn Record>),

    /// A list of nodes, possibly of different shapes
    List(Vec<NodeValue>),
}

impl NodeValue {
    pub fn null() -> Self {
        NodeValue::Json(Value::Null)
    }

    /// Wrap a record
    pub fn record<R: Record + 'static>(record: R) -> Self {
        NodeValue::Record(Arc::new(record))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NodeValue::Json(Value::Null))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeValue::List(_) | NodeValue::Json(Value::Array(_)))
    }

    /// Type tag of this node, reading JSON objects' tag under `__typename`
    pub fn type_name(&self) -> Cow<'_, str> {
        self.type_name_with(DEFAULT_TYPENAME_KEY)
    }

    /// Type tag of this node, reading JSON objects' tag under `typename_key`
    ///
    /// JSON objects without a string tag are reported as `Object`.
    pub fn type_name_with(&self, typename_key: &str) -> Cow<'_, str> {
        match self {
            NodeValue::Record(record) => Cow::Borrowed(record.type_name()),
            NodeValue::List(_) => Cow::Borrowed("List"),
            NodeValue::Json(value) => match value {
                Value::Null => Cow::Borrowed("Null"),
                Value::Bool(_) => Cow::Borrowed("Boolean"),
                Value::Number(n) if n.is_f64() => Cow::Borrowed("Float"),
                Value::Number(_) => Cow::Borrowed("Int"),
                Value::String(_) => Cow::Borrowed("String"),
                Value::Array(_) => Cow::Borrowed("List"),
                Value::Object(map) => match map.get(typename_key) {
                    Some(Value::String(tag)) => Cow::Borrowed(tag.as_str()),
                    _ => Cow::Borrowed("Object"),
                },
            },
        }
    }

    /// Split a list node into its elements
    ///
    /// Returns the node unchanged in `Err` when it is not a list.
    pub fn into_items(self) -> Result<Vec<NodeValue>, NodeValue> {
        match self {
            NodeValue::List(items) => Ok(items),
            NodeValue::Json(Value::Array(items)) => {
                Ok(items.into_iter().map(NodeValue::Json).collect())
            }
            other => Err(other),
        }
    }

    /// Equality against a literal argument value
    ///
    /// Numbers compare by value, so `30` matches `30.0`. Values of
    /// different kinds never match. Records are never equal to a literal.
    pub fn matches(&self, expected: &Value) -> bool {
        match (self, expected) {
            (NodeValue::Json(value), _) => json_eq(value, expected),
            (NodeValue::List(items), Value::Array(expected_items)) => {
                items.len() == expected_items.len()
                    && items
                        .iter()
                        .zip(expected_items)
                        .all(|(item, expected)| item.matches(expected))
            }
            _ => false,
        }
    }

    /// Convert a leaf value into its response form
    ///
    /// Fails with [`ExecutionError::LeafExpected`] when a record is found,
    /// since a record can only be rendered through a selection set.
    pub fn into_response(self, path: &FieldPath) -> Result<Value, ExecutionError> {
        match self {
            NodeValue::Json(value) => Ok(value),
            NodeValue::List(items) => items
                .into_iter()
                .map(|item| item.into_response(path))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            NodeValue::Record(record) => Err(ExecutionError::LeafExpected {
                type_name: record.type_name().to_string(),
                path: path.clone(),
            }),
        }
    }
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => number_eq(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| json_eq(a, b)))
        }
        _ => a == b,
    }
}

fn number_eq(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl Default for NodeValue {
    fn default() -> Self {
        NodeValue::null()
    }
}

impl From<Value> for NodeValue {
    fn from(value: Value) -> Self {
        NodeValue::Json(value)
    }
}

impl From<Vec<NodeValue>> for NodeValue {
    fn from(items: Vec<NodeValue>) -> Self {
        NodeValue::List(items)
    }
}

impl From<Arc<dyn Record>> for NodeValue {
    fn from(record: Arc<dyn Record>) -> Self {
        NodeValue::Record(record)
    }
}

impl fmt::Debug for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Json(value) => write!(f, "Json({})", value),
            NodeValue::Record(record) => write!(f, "Record({})", record.type_name()),
            NodeValue::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}
