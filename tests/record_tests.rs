//! Record and resolver tests
//!
//! These tests verify that:
//! - Invocable links receive the field's arguments
//! - Resolver failures abort the execution with their cause
//! - Records returned to scalar fields are rejected
//! - Both lookup strategies work on hand-written and macro-generated records

mod common;

use common::*;
use select::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Serialize)]
struct Car {
    brand: String,
    seats: u8,
}

impl_record!(Car, "Car", [brand, seats], implements ["Vehicle"]);

#[derive(Serialize)]
struct Grid {
    width: u8,
    cells: HashMap<(u8, u8), u8>,
}

impl_record!(Grid, "Grid", [width, cells]);

/// Keyed data plus one computed member
struct Account {
    fields: HashMap<String, serde_json::Value>,
}

impl Record for Account {
    fn type_name(&self) -> &str {
        "Account"
    }

    fn get(&self, key: &str) -> Option<Link> {
        self.fields.get(key).cloned().map(Link::from)
    }

    fn member(&self, name: &str) -> Option<Link> {
        match name {
            "display" => {
                let owner = self.fields.get("owner")?.as_str()?.to_string();
                Some(Link::from(json!(format!("@{}", owner))))
            }
            _ => None,
        }
    }
}

fn account(owner: &str, balance: i64) -> NodeValue {
    NodeValue::record(Account {
        fields: HashMap::from([
            ("owner".to_string(), json!(owner)),
            ("balance".to_string(), json!(balance)),
        ]),
    })
}

fn library() -> NodeValue {
    let books = json!([
        {"title": "Dune", "genre": "scifi", "author": "Herbert"},
        {"title": "Emma", "genre": "novel", "author": "Austen"},
        {"title": "Solaris", "genre": "scifi", "author": "Lem"}
    ]);

    DynamicRecord::new("Library")
        .with_entry("name", json!("City Library"))
        .with_resolver("books", move |args: &Arguments| {
            let genre = args.get("genre").and_then(|v| v.as_str());
            let limit = args.get("limit").and_then(|v| v.as_u64()).map(|l| l as usize);

            let found: Vec<serde_json::Value> = books
                .as_array()
                .into_iter()
                .flatten()
                .filter(|book| genre.is_none_or(|g| book["genre"] == g))
                .take(limit.unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok(json!(found).into())
        })
        .with_resolver("closed", |_args: &Arguments| {
            Err(anyhow::anyhow!("library is closed on sundays"))
        })
        .into_node()
}

#[test]
fn test_resolver_receives_arguments() {
    init_tracing();
    let query = Query::new(
        Field::root().field(
            Field::object("books")
                .arg("genre", "scifi")
                .arg("limit", 1)
                .field(Field::scalar("title")),
        ),
    )
    .expect("valid query");

    let response = query.execute(&library()).expect("should execute");
    assert_eq!(response, json!({"books": [{"title": "Dune"}]}));
}

#[test]
fn test_resolver_without_arguments() {
    let query = Query::new(
        Field::root()
            .field(Field::scalar("name"))
            .field(Field::object("books").field(Field::scalar("title"))),
    )
    .expect("valid query");

    let response = query.execute(&library()).expect("should execute");
    assert_eq!(
        response,
        json!({
            "name": "City Library",
            "books": [{"title": "Dune"}, {"title": "Emma"}, {"title": "Solaris"}]
        })
    );
}

#[test]
fn test_filter_applies_to_each_resolved_element() {
    let query = Query::new(
        Field::root().field(
            Field::object("books").field(Field::scalar("title").arg("genre", "novel")),
        ),
    )
    .expect("valid query");

    let response = query.execute(&library()).expect("should execute");
    assert_eq!(response, json!({"books": [{"title": "Emma"}]}));
}

#[test]
fn test_resolver_failure_aborts_execution() {
    let query = Query::new(
        Field::root()
            .field(Field::scalar("name"))
            .field(Field::scalar("closed")),
    )
    .expect("valid query");

    let err = query.execute(&library()).expect_err("resolver fails");
    match &err {
        ExecutionError::Invocation { link, path, source } => {
            assert_eq!(link, "closed");
            assert_eq!(path.to_string(), "closed");
            assert!(source.to_string().contains("closed on sundays"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.error_code(), "INVOCATION_FAILED");
}

#[test]
fn test_resolver_is_called_once_per_field_per_node() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let node = DynamicRecord::new("Counter")
        .with_resolver("tick", move |_args: &Arguments| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!(n).into())
        })
        .into_node();

    let query = Query::new(
        Field::root()
            .field(Field::scalar("tick").alias("first"))
            .field(Field::scalar("tick").alias("second")),
    )
    .expect("valid query");

    let response = query.execute(&node).expect("should execute");
    assert_eq!(response, json!({"first": 0, "second": 1}));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fragment_reselection_calls_resolver_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let node = DynamicRecord::new("Counter")
        .with_resolver("tick", move |_args: &Arguments| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!("tock").into())
        })
        .into_node();

    let query = Query::new(
        Field::root()
            .field(Field::scalar("tick"))
            .field(Field::fragment("Counter").field(Field::scalar("tick"))),
    )
    .expect("valid query");

    let response = query.execute(&node).expect("should execute");
    assert_eq!(response, json!({"tick": "tock"}));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unserializable_member_aborts_execution() {
    let grid = NodeValue::record(Grid {
        width: 2,
        cells: HashMap::from([((0, 0), 1), ((1, 0), 0)]),
    });

    let width = Query::new(Field::root().field(Field::scalar("width"))).expect("valid query");
    assert_eq!(
        width.execute(&grid).expect("width serializes"),
        json!({"width": 2})
    );

    let cells = Query::new(Field::root().field(Field::scalar("cells"))).expect("valid query");
    match cells.execute(&grid).expect_err("tuple keys have no json form") {
        ExecutionError::Invocation { link, path, source } => {
            assert_eq!(link, "cells");
            assert_eq!(path.to_string(), "cells");
            assert!(source.to_string().contains("key must be a string"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_scalar_resolving_to_record_is_rejected() {
    let node = DynamicRecord::new("Garage")
        .with_resolver("car", |_args: &Arguments| {
            Ok(NodeValue::record(Car {
                brand: "Smart".to_string(),
                seats: 2,
            }))
        })
        .into_node();

    let scalar = Query::new(Field::root().field(Field::scalar("car"))).expect("valid query");
    let err = scalar.execute(&node).expect_err("a record is not a leaf");
    assert_eq!(err.error_code(), "LEAF_EXPECTED");
    assert_eq!(err.path().to_string(), "car");

    let object = Query::new(Field::root().field(Field::object("car").field(Field::scalar("brand"))))
        .expect("valid query");
    let response = object.execute(&node).expect("should execute");
    assert_eq!(response, json!({"car": {"brand": "Smart"}}));
}

#[test]
fn test_impl_record_members_with_fragment_and_filter() {
    let cars: NodeValue = vec![
        NodeValue::record(Car {
            brand: "Smart".to_string(),
            seats: 2,
        }),
        NodeValue::record(Car {
            brand: "Volvo".to_string(),
            seats: 7,
        }),
    ]
    .into();

    let query = Query::new(
        Field::root().field(
            Field::fragment("Vehicle")
                .field(Field::scalar("brand"))
                .field(Field::scalar("seats").arg("seats", 2)),
        ),
    )
    .expect("valid query");

    let response = query.execute(&cars).expect("should execute");
    assert_eq!(response, json!([{"brand": "Smart", "seats": 2}]));
}

#[test]
fn test_hand_written_record_uses_both_strategies() {
    let query = Query::new(
        Field::root()
            .field(Field::scalar("balance"))
            .field(Field::scalar("display")),
    )
    .expect("valid query");

    let response = query
        .execute(&account("ada", 120))
        .expect("should execute");
    assert_eq!(response, json!({"balance": 120, "display": "@ada"}));
}

#[test]
fn test_unknown_link_reports_record_type() {
    let car = NodeValue::record(Car {
        brand: "Smart".to_string(),
        seats: 2,
    });
    let query = Query::new(Field::root().field(Field::scalar("wheels"))).expect("valid query");

    match query.execute(&car).expect_err("cars have no wheels member") {
        ExecutionError::UnknownLink {
            link, node_type, ..
        } => {
            assert_eq!(link, "wheels");
            assert_eq!(node_type, "Car");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_mixed_json_and_record_list() {
    let mixed: NodeValue = vec![
        account("ada", 10),
        NodeValue::from(json!({"owner": "bob", "balance": 20})),
    ]
    .into();

    let query = Query::new(
        Field::root()
            .field(Field::scalar("owner"))
            .field(Field::scalar("balance")),
    )
    .expect("valid query");

    let response = query.execute(&mixed).expect("should execute");
    assert_eq!(
        response,
        json!([
            {"owner": "ada", "balance": 10},
            {"owner": "bob", "balance": 20}
        ])
    );
}
