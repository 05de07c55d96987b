//! Ready-made record implementations
//!
//! [`DynamicRecord`] covers entities assembled at runtime, and the
//! [`impl_record!`](crate::impl_record) macro exposes the fields of a
//! serializable struct as members.

use indexmap::IndexMap;
use serde_json::Value;

use crate::core::node::{Arguments, Link, NodeValue, Record};

/// A record assembled from keyed entries and members
///
/// Entries answer keyed lookups and members answer member lookups, so a
/// name present in both resolves to the entry.
///
/// # Example
///
/// ```rust,ignore
/// let user = DynamicRecord::new("User")
///     .with_entry("name", json!("John"))
///     .with_resolver("friends", |args| load_friends(args));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DynamicRecord {
    type_name: String,
    interfaces: Vec<String>,
    entries: IndexMap<String, Link>,
    members: IndexMap<String, Link>,
}

impl DynamicRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Add a keyed entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Link>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Add a member
    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<Link>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// Add an invocable member
    pub fn with_resolver<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&Arguments) -> anyhow::Result<NodeValue> + Send + Sync + 'static,
    {
        self.members.insert(name.into(), Link::resolver(resolver));
        self
    }

    /// Declare an interface or union this record belongs to
    pub fn with_interface(mut self, type_name: impl Into<String>) -> Self {
        self.interfaces.push(type_name.into());
        self
    }

    /// Build a record whose entries are the fields of a JSON object
    ///
    /// Non-object values produce a record without entries.
    pub fn from_json(type_name: impl Into<String>, value: Value) -> Self {
        let mut record = Self::new(type_name);
        if let Value::Object(map) = value {
            for (key, value) in map {
                record.entries.insert(key, Link::from(value));
            }
        }
        record
    }

    pub fn into_node(self) -> NodeValue {
        NodeValue::record(self)
    }
}

impl Record for DynamicRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get(&self, key: &str) -> Option<Link> {
        self.entries.get(key).cloned()
    }

    fn member(&self, name: &str) -> Option<Link> {
        self.members.get(name).cloned()
    }

    fn implements(&self, type_name: &str) -> bool {
        self.interfaces.iter().any(|i| i == type_name)
    }
}

impl From<DynamicRecord> for NodeValue {
    fn from(record: DynamicRecord) -> Self {
        record.into_node()
    }
}

/// Implement [`Record`] for a struct whose fields are serializable
///
/// Each listed field becomes a member, serialized to JSON on lookup. A
/// field that cannot be serialized fails the execution reading it.
/// Interfaces the type belongs to can be listed after `implements`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Serialize)]
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl_record!(User, "User", [name, age]);
/// impl_record!(Admin, "Admin", [name, level], implements ["User"]);
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ty,
        $type_name:expr,
        [ $( $field:ident ),* $(,)? ]
        $(, implements [ $( $interface:expr ),* $(,)? ] )?
    ) => {
        impl $crate::core::node::Record for $type {
            fn type_name(&self) -> &str {
                $type_name
            }

            fn member(&self, name: &str) -> Option<$crate::core::node::Link> {
                match name {
                    $(
                        stringify!($field) => Some($crate::core::node::Link::serialize(&self.$field)),
                    )*
                    _ => None,
                }
            }

            fn implements(&self, type_name: &str) -> bool {
                let interfaces: &[&str] = &[$( $( $interface ),* )?];
                interfaces.contains(&type_name)
            }
        }
    };
}
