use autocore::{template, ExecutionContext, Value, ValueKind};
use std::collections::HashMap;

fn ctx_with(name: &str, value: Value) -> ExecutionContext {
    let mut ctx = ExecutionContext::new();
    ctx.set(name, value, "node-1", "extractedValue");
    ctx
}

#[test]
fn whole_string_reference_passes_value_through_typed() {
    let ctx = ctx_with(
        "items",
        Value::Array(vec![1.0.into(), 2.0.into(), 3.0.into()]),
    );

    let resolved = ctx.resolve(&Value::String("${items}".to_string()));

    assert_eq!(
        resolved,
        Value::Array(vec![1.0.into(), 2.0.into(), 3.0.into()]),
        "an array bound to the variable must survive substitution intact"
    );
}

#[test]
fn interpolation_coerces_to_string() {
    let ctx = ctx_with(
        "items",
        Value::Array(vec![1.0.into(), 2.0.into(), 3.0.into()]),
    );

    let resolved = ctx.resolve(&Value::String("id=${items}".to_string()));

    assert_eq!(resolved, Value::String("id=1,2,3".to_string()));
}

#[test]
fn unbound_whole_string_reference_stays_literal() {
    let ctx = ExecutionContext::new();

    let resolved = ctx.resolve(&Value::String("${missing}".to_string()));

    assert_eq!(resolved, Value::String("${missing}".to_string()));
}

#[test]
fn unbound_interpolation_becomes_empty_string() {
    let ctx = ExecutionContext::new();

    let resolved = ctx.resolve(&Value::String("v=${missing}".to_string()));

    assert_eq!(resolved, Value::String("v=".to_string()));
}

#[test]
fn multiple_references_interpolate_in_place() {
    let mut ctx = ExecutionContext::new();
    ctx.set("user", Value::String("ada".to_string()), "node-1", "value");
    ctx.set("page", Value::Number(3.0), "node-2", "value");

    let resolved = ctx.resolve(&Value::String("/u/${user}?page=${page}".to_string()));

    assert_eq!(resolved, Value::String("/u/ada?page=3".to_string()));
}

#[test]
fn numbers_render_without_fractional_part() {
    let ctx = ctx_with("count", Value::Number(7.0));

    let resolved = ctx.resolve(&Value::String("count=${count}".to_string()));

    assert_eq!(resolved, Value::String("count=7".to_string()));
}

#[test]
fn objects_resolve_field_by_field() {
    let mut ctx = ExecutionContext::new();
    ctx.set("sel", Value::String("#login".to_string()), "node-1", "value");

    let mut params = HashMap::new();
    params.insert("selector".to_string(), Value::String("${sel}".to_string()));
    params.insert("timeout".to_string(), Value::Number(5000.0));
    params.insert("clearFirst".to_string(), Value::Bool(true));

    let resolved = ctx.resolve_map(&params);

    assert_eq!(resolved["selector"], Value::String("#login".to_string()));
    assert_eq!(resolved["timeout"], Value::Number(5000.0));
    assert_eq!(resolved["clearFirst"], Value::Bool(true));
}

#[test]
fn nested_payloads_resolve_recursively() {
    let mut ctx = ExecutionContext::new();
    ctx.set("city", Value::String("Oslo".to_string()), "node-1", "value");

    let mut inner = HashMap::new();
    inner.insert("q".to_string(), Value::String("weather ${city}".to_string()));
    let input = Value::Array(vec![Value::Object(inner)]);

    let resolved = ctx.resolve(&input);

    let Value::Array(items) = resolved else {
        panic!("expected array");
    };
    let Value::Object(map) = &items[0] else {
        panic!("expected object");
    };
    assert_eq!(map["q"], Value::String("weather Oslo".to_string()));
}

#[test]
fn get_strips_reference_wrapper() {
    let ctx = ctx_with("heading", Value::String("Welcome".to_string()));

    assert_eq!(
        ctx.get("${heading}").map(|v| &v.value),
        ctx.get("heading").map(|v| &v.value)
    );
    assert!(ctx.get("${absent}").is_none());
}

#[test]
fn set_records_kind_and_provenance() {
    let ctx = ctx_with("items", Value::Array(vec![Value::Bool(true)]));

    let var = ctx.get("items").expect("variable should exist");
    assert_eq!(var.kind, ValueKind::Array);
    assert_eq!(var.source_node_id, "node-1");
    assert_eq!(var.output_key, "extractedValue");
}

#[test]
fn last_write_wins() {
    let mut ctx = ExecutionContext::new();
    ctx.set("x", Value::Number(1.0), "node-1", "value");
    ctx.set("x", Value::String("two".to_string()), "node-2", "value");

    let var = ctx.get("x").expect("variable should exist");
    assert_eq!(var.value, Value::String("two".to_string()));
    assert_eq!(var.kind, ValueKind::Text);
    assert_eq!(var.source_node_id, "node-2");
}

#[test]
fn malformed_references_stay_literal() {
    let ctx = ctx_with("x", Value::String("bound".to_string()));

    assert_eq!(
        ctx.resolve(&Value::String("${x".to_string())),
        Value::String("${x".to_string()),
        "unclosed reference is literal text"
    );
    assert_eq!(
        ctx.resolve(&Value::String("${}".to_string())),
        Value::String("${}".to_string()),
        "empty reference is literal text"
    );
}

#[test]
fn tokenizer_splits_literals_and_references() {
    use autocore::template::Segment;

    let segments = template::parse("go to ${url} now");
    assert_eq!(
        segments,
        vec![
            Segment::Literal("go to "),
            Segment::Reference("url"),
            Segment::Literal(" now"),
        ]
    );

    assert_eq!(template::as_reference("${url}"), Some("url"));
    assert_eq!(template::as_reference("x${url}"), None);
    assert_eq!(template::as_reference("${a}${b}"), None);
}
