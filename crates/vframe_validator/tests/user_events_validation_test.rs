//! Integration tests for the validation engine.
//!
//! These tests demonstrate end-to-end validation scenarios using a complete
//! schema and a realistic events table, with raw values as they typically
//! arrive from a CSV export (everything as text).

use chrono::NaiveDate;
use std::sync::Arc;
use vframe_core::{
    AllOf, AllowedValuesCheck, BoolStrings, ColumnBuilder, ColumnCheck, ColumnType,
    ExtraColumnPolicy, PatternCheck, Schema, SchemaBuilder, UniqueCheck, Value,
};
use vframe_validator::{ReasonCode, Table, ValidationWarning, validate};

/// Creates a realistic user events schema.
fn create_user_events_schema(extra_columns: ExtraColumnPolicy) -> Schema {
    let event_id_checks: Vec<Arc<dyn ColumnCheck>> = vec![
        Arc::new(PatternCheck::new(r"^evt_\d{3}$").unwrap()),
        Arc::new(UniqueCheck),
    ];

    SchemaBuilder::new(extra_columns)
        .column(
            ColumnBuilder::new("event_id", ColumnType::String)
                .nullable(false)
                .description("Unique identifier for each event")
                .check(AllOf::new(event_id_checks))
                .build()
                .unwrap(),
        )
        .column(
            ColumnBuilder::new("event_type", ColumnType::String)
                .nullable(false)
                .check(AllowedValuesCheck::new(
                    ["page_view", "button_click", "purchase"].map(Value::from),
                ))
                .build()
                .unwrap(),
        )
        .column(
            ColumnBuilder::new("event_timestamp", ColumnType::Datetime)
                .nullable(false)
                .lower(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
                .build()
                .unwrap(),
        )
        .column(
            ColumnBuilder::new("amount", ColumnType::Float)
                .lower(0)
                .description("Purchase amount, if any")
                .build()
                .unwrap(),
        )
        .column(
            ColumnBuilder::new("is_mobile", ColumnType::Boolean)
                .bool_strings(
                    BoolStrings::new(["yes", "true"], ["no", "false"]).case_sensitive(false),
                )
                .build()
                .unwrap(),
        )
        .column(
            ColumnBuilder::new("tags", ColumnType::Set)
                .max_items(3)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn create_valid_events() -> Table {
    Table::new()
        .with_column(
            "event_id",
            vec!["evt_001", "evt_002", "evt_003"].into_iter().map(Value::from).collect(),
        )
        .unwrap()
        .with_column(
            "event_type",
            vec!["page_view", "purchase", "button_click"]
                .into_iter()
                .map(Value::from)
                .collect(),
        )
        .unwrap()
        .with_column(
            "event_timestamp",
            vec![
                Value::from("2024-03-01T10:00:00"),
                Value::from("2024-03-01 10:05:30.250"),
                Value::from("2024-03-02T08:00:00+02:00"),
            ],
        )
        .unwrap()
        .with_column(
            "amount",
            vec![Value::Null, Value::from("19.99"), Value::Int(0)],
        )
        .unwrap()
        .with_column(
            "is_mobile",
            vec![Value::from("YES"), Value::Bool(false), Value::from("no")],
        )
        .unwrap()
        .with_column(
            "tags",
            vec![
                Value::from("{'web', 'home'}"),
                Value::from("set()"),
                Value::from("{'app', 'app'}"),
            ],
        )
        .unwrap()
}

#[test]
fn test_valid_events_pass_and_are_coerced() {
    let schema = create_user_events_schema(ExtraColumnPolicy::Drop);
    let table = create_valid_events();

    let result = validate(&schema, &table).unwrap();

    assert!(result.is_valid(), "failures: {:?}", result.failures());
    assert_eq!(result.stats().rows, 3);
    assert_eq!(result.stats().columns_validated, 6);
    assert_eq!(result.stats().cells_checked, 18);

    let coerced = result.coerced();
    assert_eq!(
        coerced.column("amount"),
        Some(&[Value::Null, Value::Float(19.99), Value::Float(0.0)][..])
    );
    assert_eq!(
        coerced.column("is_mobile"),
        Some(&[Value::Bool(true), Value::Bool(false), Value::Bool(false)][..])
    );
    assert_eq!(
        coerced.column("event_timestamp").map(|c| c[2].clone()),
        Some(Value::DateTime(
            NaiveDate::from_ymd_opt(2024, 3, 2)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap()
        ))
    );
    assert_eq!(
        coerced.column("tags").map(|c| c[2].clone()),
        Some(Value::Set(vec![Value::from("app")]))
    );

    // The caller's table is left untouched.
    assert_eq!(table, create_valid_events());
}

#[test]
fn test_invalid_events_report_every_failure() {
    let schema = create_user_events_schema(ExtraColumnPolicy::Drop);
    let table = Table::new()
        .with_column(
            "event_id",
            vec!["evt_001", "evt_001", "bad-id"].into_iter().map(Value::from).collect(),
        )
        .unwrap()
        .with_column(
            "event_type",
            vec![Value::from("page_view"), Value::from("logout"), Value::Null],
        )
        .unwrap()
        .with_column(
            "event_timestamp",
            vec![
                Value::from("2023-12-31"),
                Value::from("yesterday"),
                Value::from("2024-06-01"),
            ],
        )
        .unwrap()
        .with_column(
            "amount",
            vec![Value::from("-5"), Value::Float(f64::NAN), Value::from("ten")],
        )
        .unwrap()
        .with_column(
            "is_mobile",
            vec![Value::from("maybe"), Value::Null, Value::Int(1)],
        )
        .unwrap()
        .with_column(
            "tags",
            vec![
                Value::from("{'a', 'b', 'c', 'd'}"),
                Value::from("['a']"),
                Value::from("{'a'"),
            ],
        )
        .unwrap();

    let result = validate(&schema, &table).unwrap();

    assert!(!result.is_valid());
    let failures: Vec<(&str, usize, String)> = result
        .failures()
        .iter()
        .map(|f| (f.column.as_str(), f.row, f.reason.to_string()))
        .collect();
    assert_eq!(
        failures,
        vec![
            ("event_id", 1, "duplicate".to_string()),
            ("event_id", 2, "pattern_mismatch".to_string()),
            ("event_type", 1, "not_allowed".to_string()),
            ("event_type", 2, "null_not_allowed".to_string()),
            ("event_timestamp", 0, "below_lower".to_string()),
            ("event_timestamp", 1, "type_mismatch".to_string()),
            ("amount", 0, "below_lower".to_string()),
            ("amount", 2, "type_mismatch".to_string()),
            ("is_mobile", 0, "type_mismatch".to_string()),
            ("is_mobile", 2, "type_mismatch".to_string()),
            ("tags", 0, "above_max_size".to_string()),
            ("tags", 1, "type_mismatch".to_string()),
            ("tags", 2, "type_mismatch".to_string()),
        ]
    );

    // Failed coercions keep their raw value in the output.
    assert_eq!(result.failures()[5].value, Value::from("yesterday"));
    assert_eq!(result.stats().cells_failed, 13);
    assert_eq!(result.reason_counts().get("type_mismatch"), Some(&6));
}

#[test]
fn test_extra_columns_follow_policy() {
    let table = create_valid_events()
        .with_column("referrer", vec![Value::Null, Value::from("ad"), Value::Int(3)])
        .unwrap();

    let schema = create_user_events_schema(ExtraColumnPolicy::PassThrough);
    let kept = validate(&schema, &table).unwrap();
    assert!(kept.is_valid());
    assert_eq!(kept.coerced().column("referrer"), table.column("referrer"));
    assert_eq!(
        kept.warnings(),
        &[ValidationWarning::ExtraColumn {
            column: "referrer".to_string(),
            policy: ExtraColumnPolicy::PassThrough,
        }]
    );

    let schema = create_user_events_schema(ExtraColumnPolicy::Drop);
    let dropped = validate(&schema, &table).unwrap();
    assert!(dropped.is_valid(), "extra columns never fail validation");
    assert!(!dropped.coerced().contains("referrer"));
    assert_eq!(dropped.coerced().column_count(), 6);
    assert_eq!(dropped.warnings().len(), 1);
}

#[test]
fn test_schema_policy_can_be_switched_without_rebuilding() {
    let table = create_valid_events()
        .with_column("referrer", vec![Value::Null; 3])
        .unwrap();
    let schema = create_user_events_schema(ExtraColumnPolicy::Drop);

    let pass_through = schema.with_extra_columns(ExtraColumnPolicy::PassThrough);
    let result = validate(&pass_through, &table).unwrap();

    assert!(result.coerced().contains("referrer"));
    assert_eq!(schema.extra_columns(), ExtraColumnPolicy::Drop);
}

#[test]
fn test_failure_reasons_are_single_per_cell() {
    // "-5" fails the lower bound; the custom check must not add a second reason.
    let schema = SchemaBuilder::new(ExtraColumnPolicy::Drop)
        .column(
            ColumnBuilder::new("amount", ColumnType::Integer)
                .lower(0)
                .check(UniqueCheck)
                .check_scope(vframe_core::HookScope::WholeColumn)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let table = Table::new()
        .with_column("amount", vec![Value::from("-5"), Value::Int(-5), Value::Int(1)])
        .unwrap();

    let result = validate(&schema, &table).unwrap();

    let reasons: Vec<&ReasonCode> = result.failures().iter().map(|f| &f.reason).collect();
    assert_eq!(reasons, vec![&ReasonCode::BelowLower, &ReasonCode::BelowLower]);
}
