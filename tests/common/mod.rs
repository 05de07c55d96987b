//! Shared fixtures for the integration tests

#![allow(dead_code)]

use select::prelude::*;
use serde_json::{Value, json};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route engine logs to the test writer; `RUST_LOG=trace` shows them
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// John and his two friends
pub fn john() -> Value {
    json!({
        "name": "John",
        "friends": [
            {"name": "Alice", "age": 30},
            {"name": "Bob", "age": 28}
        ]
    })
}

/// `{ name friends { name } }`, with optional arguments on `friends.name`
pub fn name_and_friends(friend_name_args: Arguments) -> Query {
    Query::new(
        Field::root()
            .field(Field::scalar("name"))
            .field(Field::object("friends").field(Field::scalar("name").args(friend_name_args))),
    )
    .expect("valid query")
}

pub fn args(pairs: &[(&str, Value)]) -> Arguments {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
