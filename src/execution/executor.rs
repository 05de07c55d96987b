//! Field execution and list fan-out
//!
//! Each node's selection is collected first: fragments that apply to the
//! node are flattened into it and fields writing the same response key
//! are grouped, so a key is resolved once with the union of its
//! sub-selections. `Query::new` guarantees that grouped fields read the
//! same link with the same arguments.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::context::ExecutionContext;
use super::response::ResponseBuilder;
use crate::config::ExecutorConfig;
use crate::core::accessor::{Resolution, resolve};
use crate::core::error::ExecutionError;
use crate::core::field::{Field, ObjectField};
use crate::core::node::NodeValue;
use crate::core::query::Query;

/// Result of executing part of a selection
///
/// `Skipped` means the node being executed failed an equality filter. It
/// travels up to the nearest list fan-out, which drops that element.
enum Outcome<T> {
    Complete(T),
    Skipped,
}

/// Fields writing into one node's mapping, by response key
type Collected<'q> = IndexMap<&'q str, Vec<&'q Field>>;

/// Executes queries against data nodes
///
/// Holds configuration only; every execution builds its response from
/// scratch, so one executor can serve any number of queries.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute `query` against `node`
    ///
    /// The nameless root returns its result mapping directly (or a list of
    /// mappings when `node` is a list). A named root field returns a
    /// mapping holding its single key.
    ///
    /// If the root node itself is filtered out, the nameless root yields
    /// `null` and a named root yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Any [`ExecutionError`] aborts the execution; no partial response is
    /// returned.
    pub fn execute(&self, query: &Query, node: &NodeValue) -> Result<Value, ExecutionError> {
        let mut ctx = ExecutionContext::new(&self.config);
        tracing::debug!(
            query = %query,
            node_type = %node.type_name_with(ctx.typename_key()),
            "executing query"
        );

        let response = match query.root() {
            Field::Object(root) if root.is_root() => match complete(&[root], &mut ctx, node.clone())? {
                Outcome::Complete(value) => value,
                Outcome::Skipped => {
                    tracing::debug!("root node filtered out");
                    Value::Null
                }
            },
            field => {
                let mut collected = Collected::new();
                collect_fields(std::slice::from_ref(field), &ctx, node, &mut collected);
                match execute_collected(collected, &mut ctx, node)? {
                    Outcome::Complete(value) => value,
                    Outcome::Skipped => {
                        tracing::debug!("root node filtered out");
                        Value::Object(Map::new())
                    }
                }
            }
        };

        tracing::debug!("query executed");
        Ok(response)
    }
}

/// Execute `query` against `node` with the default configuration
pub fn execute(query: &Query, node: &NodeValue) -> Result<Value, ExecutionError> {
    Executor::default().execute(query, node)
}

/// Group the fields of `fields` by response key, flattening the
/// fragments that apply to `node`
fn collect_fields<'q>(
    fields: &'q [Field],
    ctx: &ExecutionContext<'_>,
    node: &NodeValue,
    collected: &mut Collected<'q>,
) {
    for field in fields {
        match field {
            Field::Fragment(fragment) => {
                if fragment.condition.matches(node, ctx.typename_key()) {
                    collect_fields(&fragment.fields, ctx, node, collected);
                } else {
                    tracing::trace!(
                        condition = %fragment.condition,
                        node_type = %node.type_name_with(ctx.typename_key()),
                        path = %ctx.path(),
                        "fragment does not apply"
                    );
                }
            }
            field => {
                // Nested nameless objects are rejected by Query::new
                let key = field.response_key().unwrap_or_default();
                collected.entry(key).or_default().push(field);
            }
        }
    }
}

/// Execute collected fields against a single node
fn execute_collected(
    collected: Collected<'_>,
    ctx: &mut ExecutionContext<'_>,
    node: &NodeValue,
) -> Result<Outcome<Value>, ExecutionError> {
    let mut response = ResponseBuilder::with_capacity(collected.len());
    for (key, group) in collected {
        let outcome = ctx.enter(key).and_then(|()| execute_group(&group, ctx, node));
        ctx.leave();
        match outcome? {
            Outcome::Complete(value) => response.insert(key, value),
            Outcome::Skipped => return Ok(Outcome::Skipped),
        }
    }
    Ok(Outcome::Complete(response.finish()))
}

/// Resolve one response key
///
/// Every field of `group` reads the same link with the same arguments,
/// so the link is resolved once through the first of them.
fn execute_group(
    group: &[&Field],
    ctx: &mut ExecutionContext<'_>,
    node: &NodeValue,
) -> Result<Outcome<Value>, ExecutionError> {
    match group.first() {
        Some(Field::Scalar(scalar)) => {
            match resolve(node, &scalar.name, &scalar.args, ctx.path())? {
                Resolution::Resolved(value) => {
                    Ok(Outcome::Complete(value.into_response(ctx.path())?))
                }
                Resolution::Filtered => Ok(Outcome::Skipped),
            }
        }
        Some(Field::Object(object)) => {
            let name = object.name.as_deref().unwrap_or_default();
            let target = match resolve(node, name, &object.args, ctx.path())? {
                Resolution::Resolved(target) => target,
                Resolution::Filtered => return Ok(Outcome::Skipped),
            };
            let objects: Vec<&ObjectField> = group
                .iter()
                .filter_map(|field| match field {
                    Field::Object(object) => Some(object),
                    _ => None,
                })
                .collect();
            complete(&objects, ctx, target)
        }
        Some(Field::Fragment(_)) | None => Ok(Outcome::Complete(Value::Null)),
    }
}

/// Execute the merged selection sets of `objects` against a resolved target
///
/// Lists fan out: each element is executed on its own and elements
/// that were filtered out are dropped, keeping the others in order.
/// Nested lists fan out recursively. `null` stays `null`.
fn complete(
    objects: &[&ObjectField],
    ctx: &mut ExecutionContext<'_>,
    target: NodeValue,
) -> Result<Outcome<Value>, ExecutionError> {
    if target.is_null() {
        return Ok(Outcome::Complete(Value::Null));
    }

    let target = match target.into_items() {
        Ok(items) => {
            let mut results = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let outcome = ctx
                    .enter_index(index)
                    .and_then(|()| complete(objects, ctx, item));
                ctx.leave();
                match outcome? {
                    Outcome::Complete(value) => results.push(value),
                    Outcome::Skipped => {
                        tracing::trace!(
                            path = %ctx.path(),
                            index,
                            "dropping filtered list element"
                        );
                    }
                }
            }
            return Ok(Outcome::Complete(Value::Array(results)));
        }
        Err(target) => target,
    };

    let mut collected = Collected::new();
    for object in objects {
        collect_fields(&object.fields, ctx, &target, &mut collected);
    }
    execute_collected(collected, ctx, &target)
}
