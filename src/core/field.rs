//! Field tree: what to select from a data node
//!
//! A query is a tree of [`Field`]s. Scalar fields read a leaf value,
//! object fields read a node and execute their own selection set against
//! it, and fragments contribute their selection set to the enclosing
//! object when the node's type matches.
//!
//! Trees are built with chained constructors:
//!
//! ```rust,ignore
//! let root = Field::root()
//!     .field(Field::scalar("name"))
//!     .field(
//!         Field::object("friends")
//!             .field(Field::scalar("name").arg("age", 30)),
//!     )
//!     .field(Field::fragment("Admin").field(Field::scalar("level")));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::core::node::{Arguments, NodeValue};

/// Opaque directive metadata attached to a field
///
/// Directives are carried through the tree but never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,

    #[serde(default)]
    pub arguments: Arguments,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Arguments::new(),
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }
}

/// Custom type matching for fragments
pub trait TypeMatcher: Send + Sync {
    fn matches(&self, node: &NodeValue) -> bool;
}

impl<F> TypeMatcher for F
where
    F: Fn(&NodeValue) -> bool + Send + Sync,
{
    fn matches(&self, node: &NodeValue) -> bool {
        self(node)
    }
}

/// The type a fragment applies to
#[derive(Clone)]
pub enum TypeCondition {
    /// Matches nodes whose type tag is this name, or records implementing it
    Named(String),

    /// Delegates the decision to a custom matcher
    Matcher(Arc<dyn TypeMatcher>),
}

impl TypeCondition {
    pub fn named(type_name: impl Into<String>) -> Self {
        TypeCondition::Named(type_name.into())
    }

    pub fn matcher<M: TypeMatcher + 'static>(matcher: M) -> Self {
        TypeCondition::Matcher(Arc::new(matcher))
    }

    /// Whether `node` satisfies this condition
    ///
    /// `typename_key` is the key holding the type tag of JSON objects.
    pub fn matches(&self, node: &NodeValue, typename_key: &str) -> bool {
        match self {
            TypeCondition::Named(expected) => {
                if node.type_name_with(typename_key) == expected.as_str() {
                    return true;
                }
                match node {
                    NodeValue::Record(record) => record.implements(expected),
                    _ => false,
                }
            }
            TypeCondition::Matcher(matcher) => matcher.matches(node),
        }
    }
}

impl From<&str> for TypeCondition {
    fn from(type_name: &str) -> Self {
        TypeCondition::named(type_name)
    }
}

impl From<String> for TypeCondition {
    fn from(type_name: String) -> Self {
        TypeCondition::Named(type_name)
    }
}

impl fmt::Debug for TypeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCondition::Named(name) => f.debug_tuple("Named").field(name).finish(),
            TypeCondition::Matcher(_) => write!(f, "Matcher(..)"),
        }
    }
}

impl fmt::Display for TypeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCondition::Named(name) => write!(f, "{}", name),
            TypeCondition::Matcher(_) => write!(f, "<matcher>"),
        }
    }
}

/// A node of the query tree
#[derive(Debug, Clone)]
pub enum Field {
    Scalar(ScalarField),
    Object(ObjectField),
    Fragment(FragmentField),
}

impl Field {
    /// A leaf field
    pub fn scalar(name: impl Into<String>) -> ScalarField {
        ScalarField::new(name)
    }

    /// A named field with a selection set
    pub fn object(name: impl Into<String>) -> ObjectField {
        ObjectField::new(Some(name.into()), Vec::new())
    }

    /// The nameless root field, executed against the root node itself
    pub fn root() -> ObjectField {
        ObjectField::new(None, Vec::new())
    }

    /// A fragment applying to nodes matching `condition`
    pub fn fragment(condition: impl Into<TypeCondition>) -> FragmentField {
        FragmentField::new(condition, Vec::new())
    }

    /// Name of the link this field reads, absent for fragments and the root
    pub fn name(&self) -> Option<&str> {
        match self {
            Field::Scalar(f) => Some(&f.name),
            Field::Object(f) => f.name(),
            Field::Fragment(_) => None,
        }
    }

    /// Key this field writes in the response, absent for fragments and the root
    pub fn response_key(&self) -> Option<&str> {
        match self {
            Field::Scalar(f) => Some(f.response_key()),
            Field::Object(f) => f.response_key(),
            Field::Fragment(_) => None,
        }
    }

    pub fn directives(&self) -> &[Directive] {
        match self {
            Field::Scalar(f) => &f.directives,
            Field::Object(f) => &f.directives,
            Field::Fragment(f) => &f.directives,
        }
    }
}

impl From<ScalarField> for Field {
    fn from(field: ScalarField) -> Self {
        Field::Scalar(field)
    }
}

impl From<ObjectField> for Field {
    fn from(field: ObjectField) -> Self {
        Field::Object(field)
    }
}

impl From<FragmentField> for Field {
    fn from(field: FragmentField) -> Self {
        Field::Fragment(field)
    }
}

/// A leaf field
#[derive(Debug, Clone)]
pub struct ScalarField {
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) args: Arguments,
    pub(crate) directives: Vec<Directive>,
}

impl ScalarField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            args: Arguments::new(),
            directives: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn args(mut self, args: Arguments) -> Self {
        self.args.extend(args);
        self
    }

    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn arguments(&self) -> &Arguments {
        &self.args
    }
}

/// A field with a selection set
///
/// Without a name it is the root field: it executes its selection set
/// against the node it is given.
#[derive(Debug, Clone)]
pub struct ObjectField {
    pub(crate) name: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) args: Arguments,
    pub(crate) directives: Vec<Directive>,
    pub(crate) fields: Vec<Field>,
}

impl ObjectField {
    pub fn new(name: Option<String>, fields: Vec<Field>) -> Self {
        Self {
            name,
            alias: None,
            args: Arguments::new(),
            directives: Vec::new(),
            fields,
        }
    }

    /// Append a field to the selection set
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Append several fields to the selection set
    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn args(mut self, args: Arguments) -> Self {
        self.args.extend(args);
        self
    }

    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn response_key(&self) -> Option<&str> {
        self.alias.as_deref().or(self.name.as_deref())
    }

    pub fn arguments(&self) -> &Arguments {
        &self.args
    }

    pub fn selection(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_root(&self) -> bool {
        self.name.is_none()
    }
}

/// A type-scoped selection merged into the enclosing object's result
#[derive(Debug, Clone)]
pub struct FragmentField {
    pub(crate) condition: TypeCondition,
    pub(crate) directives: Vec<Directive>,
    pub(crate) fields: Vec<Field>,
}

impl FragmentField {
    pub fn new(condition: impl Into<TypeCondition>, fields: Vec<Field>) -> Self {
        Self {
            condition: condition.into(),
            directives: Vec::new(),
            fields,
        }
    }

    /// Apply the fragment through a custom matcher instead of a type name
    pub fn matching<M: TypeMatcher + 'static>(matcher: M) -> Self {
        Self::new(TypeCondition::matcher(matcher), Vec::new())
    }

    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn condition(&self) -> &TypeCondition {
        &self.condition
    }

    pub fn selection(&self) -> &[Field] {
        &self.fields
    }
}

// =============================================================================
// Display
// =============================================================================

fn write_arguments(f: &mut fmt::Formatter<'_>, args: &Arguments) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    write!(f, "(")?;
    for (i, (name, value)) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", name, value)?;
    }
    write!(f, ")")
}

fn write_directives(f: &mut fmt::Formatter<'_>, directives: &[Directive]) -> fmt::Result {
    for directive in directives {
        write!(f, " @{}", directive.name)?;
        write_arguments(f, &directive.arguments)?;
    }
    Ok(())
}

fn write_selection(f: &mut fmt::Formatter<'_>, fields: &[Field]) -> fmt::Result {
    write!(f, "{{")?;
    for field in fields {
        write!(f, " {}", field)?;
    }
    write!(f, " }}")
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{}: ", alias)?;
        }
        write!(f, "{}", self.name)?;
        write_arguments(f, &self.args)?;
        write_directives(f, &self.directives)
    }
}

impl fmt::Display for ObjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => {
                if let Some(alias) = &self.alias {
                    write!(f, "{}: ", alias)?;
                }
                write!(f, "{}", name)?;
                write_arguments(f, &self.args)?;
                write_directives(f, &self.directives)?;
                write!(f, " ")?;
            }
            // The root renders as `@a @b { ... }`
            None => {
                for directive in &self.directives {
                    write!(f, "@{}", directive.name)?;
                    write_arguments(f, &directive.arguments)?;
                    write!(f, " ")?;
                }
            }
        }
        write_selection(f, &self.fields)
    }
}

impl fmt::Display for FragmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "... on {}", self.condition)?;
        write_directives(f, &self.directives)?;
        write!(f, " ")?;
        write_selection(f, &self.fields)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Scalar(field) => fmt::Display::fmt(field, f),
            Field::Object(field) => fmt::Display::fmt(field, f),
            Field::Fragment(field) => fmt::Display::fmt(field, f),
        }
    }
}
