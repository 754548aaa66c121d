use dbgenie_core::{
    ColumnKind, ColumnSpec, OutputFormat, SchemaState, build_request, request_json_schema,
};
use jsonschema::JSONSchema;
use serde_json::{Value, json};

fn compiled_schema() -> JSONSchema {
    let schema = serde_json::to_value(request_json_schema()).expect("schema to json");
    JSONSchema::compile(&schema).expect("compile request schema")
}

#[test]
fn built_requests_satisfy_the_published_schema() {
    let mut state = SchemaState::new();
    let mut price = ColumnSpec::new("price").with_kind(ColumnKind::Float);
    price.nullable = true;
    price.options = "min=1,max=500".to_string();
    state.add_table(Some("products".into()), vec![price]);
    state.add_table(
        Some("notes".into()),
        vec![ColumnSpec::new("body").with_kind(ColumnKind::parse("markdown"))],
    );
    state.set_database_context("a hardware store");

    let request = build_request(&state, OutputFormat::Excel).expect("build request");
    let instance = serde_json::to_value(&request).expect("serialize request");
    assert!(compiled_schema().is_valid(&instance));
}

#[test]
fn schema_rejects_bodies_the_service_would_not_accept() {
    let schema = compiled_schema();
    let base = json!({
        "tables": [{"name": "t", "columns": [{
            "name": "c", "type": "string", "options": "",
            "unique": false, "nullable": false, "nullable_chance": 0
        }]}],
        "num_rows": 10,
        "database_context": "general data",
        "requested_format": "csv"
    });
    assert!(schema.is_valid(&base));

    let mut bad_format = base.clone();
    bad_format["requested_format"] = Value::from("pdf");
    assert!(!schema.is_valid(&bad_format));

    let mut missing_tables = base.clone();
    if let Some(object) = missing_tables.as_object_mut() {
        object.remove("tables");
    }
    assert!(!schema.is_valid(&missing_tables));

    let mut negative_rows = base.clone();
    negative_rows["num_rows"] = Value::from(-1);
    assert!(!schema.is_valid(&negative_rows));

    let mut zero_rows = base;
    zero_rows["num_rows"] = Value::from(0);
    assert!(!schema.is_valid(&zero_rows));
}
