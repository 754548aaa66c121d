use dbgenie_core::{ColumnKind, ColumnSpec, OutputFormat, SchemaState, build_request};
use serde_json::json;

#[test]
fn default_table_plus_unique_email_serializes_as_expected() {
    let mut state = SchemaState::new();
    let mut email = ColumnSpec::new("email").with_kind(ColumnKind::String);
    email.unique = true;
    state.add_column(0, Some(email)).expect("add email column");
    state.set_num_rows_input("5");

    let request = build_request(&state, OutputFormat::Csv).expect("build request");
    let value = serde_json::to_value(&request).expect("serialize request");

    let expected = json!({
        "tables": [{
            "name": "Table1",
            "columns": [
                {
                    "name": "col1",
                    "type": "string",
                    "options": "",
                    "unique": false,
                    "nullable": false,
                    "nullable_chance": 0
                },
                {
                    "name": "email",
                    "type": "string",
                    "options": "",
                    "unique": true,
                    "nullable": false,
                    "nullable_chance": 0
                }
            ]
        }],
        "num_rows": 5,
        "database_context": "general data",
        "requested_format": "csv"
    });
    assert_eq!(value, expected);
}

#[test]
fn serializes_fields_in_wire_order() {
    let state = SchemaState::new();
    let request = build_request(&state, OutputFormat::Excel).expect("build request");
    let json = serde_json::to_string(&request).expect("serialize request");
    let expected = concat!(
        r#"{"tables":[{"name":"Table1","columns":[{"name":"col1","type":"string","options":"","#,
        r#""unique":false,"nullable":false,"nullable_chance":0}]}],"num_rows":10,"#,
        r#""database_context":"general data","requested_format":"excel"}"#
    );
    assert_eq!(json, expected);
}

#[test]
fn unknown_column_types_pass_through() {
    let mut state = SchemaState::new();
    state
        .add_column(0, Some(ColumnSpec::new("ref").with_kind(ColumnKind::parse("uuid"))))
        .expect("add column");
    let request = build_request(&state, OutputFormat::Csv).expect("build request");
    let value = serde_json::to_value(&request).expect("serialize request");
    assert_eq!(value["tables"][0]["columns"][1]["type"], "uuid");
}
