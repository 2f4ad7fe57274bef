//! Behavioural tests for the per-type rules: bounds, sizes, container
//! literals, Object columns and the column-presence check.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use vframe_core::{
    CheckOutcome, ColumnBuilder, ColumnSpec, ColumnType, ExtraColumnPolicy, FnCheck, Schema,
    SchemaBuilder, Value,
};
use vframe_validator::{ReasonCode, Table, ValidationError, ValidationResult, validate};

fn run(column: ColumnSpec, values: Vec<Value>) -> ValidationResult {
    let name = column.name().to_string();
    let schema = SchemaBuilder::new(ExtraColumnPolicy::Drop)
        .column(column)
        .build()
        .unwrap();
    let table = Table::new().with_column(name, values).unwrap();
    validate(&schema, &table).unwrap()
}

/// `None` for passing cells, the reason text for failing ones.
fn outcomes(result: &ValidationResult, column: &str) -> Vec<Option<String>> {
    let mask = result.mask(column).unwrap();
    let mut out: Vec<Option<String>> = vec![None; mask.len()];
    for failure in result.failures_for(column) {
        out[failure.row] = Some(failure.reason.to_string());
    }
    out
}

fn fails(reason: &str) -> Option<String> {
    Some(reason.to_string())
}

#[test]
fn test_integer_bounds_are_inclusive() {
    let column = ColumnBuilder::new("n", ColumnType::Integer)
        .lower(-1)
        .upper(6)
        .build()
        .unwrap();

    let result = run(
        column,
        vec![
            Value::Int(7),
            Value::Int(-2),
            Value::Int(6),
            Value::from("3"),
            Value::Int(-1),
        ],
    );

    assert_eq!(
        outcomes(&result, "n"),
        vec![fails("above_upper"), fails("below_lower"), None, None, None]
    );
    assert_eq!(result.coerced().column("n").unwrap()[3], Value::Int(3));
}

#[test]
fn test_float_bounds_against_integer_limits() {
    let column = ColumnBuilder::new("x", ColumnType::Float)
        .lower(0)
        .upper(1)
        .build()
        .unwrap();

    let result = run(
        column,
        vec![Value::Float(1.0), Value::Float(1.000_001), Value::from("-0.0")],
    );

    assert_eq!(outcomes(&result, "x"), vec![None, fails("above_upper"), None]);
}

#[test]
fn test_datetime_bounds_are_chronological() {
    let day = |d| {
        chrono::NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    };
    let column = ColumnBuilder::new("at", ColumnType::Datetime)
        .lower(day(10))
        .upper(day(20))
        .build()
        .unwrap();

    let result = run(
        column,
        vec![
            Value::from("2024-05-09T23:59:59"),
            Value::from("2024-05-10"),
            Value::DateTime(day(20)),
            Value::from("2024-05-20T00:00:01"),
        ],
    );

    assert_eq!(
        outcomes(&result, "at"),
        vec![fails("below_lower"), None, None, fails("above_upper")]
    );
}

#[test]
fn test_string_length() {
    let column = ColumnBuilder::new("s", ColumnType::String)
        .min_length(0)
        .max_length(5)
        .build()
        .unwrap();

    let result = run(
        column,
        vec![Value::from(""), Value::from("123456"), Value::from("12345")],
    );

    assert_eq!(outcomes(&result, "s"), vec![None, fails("above_max_size"), None]);
}

#[test]
fn test_list_item_counts_and_literals() {
    let column = ColumnBuilder::new("l", ColumnType::List)
        .min_items(1)
        .max_items(3)
        .build()
        .unwrap();

    let result = run(
        column,
        vec![
            Value::List(vec![]),
            Value::List(vec![Value::Int(1)]),
            Value::List((1..=4).map(Value::Int).collect()),
            Value::from("[1,2]"),
        ],
    );

    assert_eq!(
        outcomes(&result, "l"),
        vec![fails("below_min_size"), None, fails("above_max_size"), None]
    );
    assert_eq!(
        result.coerced().column("l").unwrap()[3],
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn test_containers_share_item_count_semantics() {
    let cases = [
        (ColumnType::Tuple, ["()", "(1,)", "(1, 2, 3, 4)", "(1, 2)"]),
        (ColumnType::Set, ["set()", "{1}", "{1, 2, 3, 4}", "{1, 2}"]),
        (
            ColumnType::Dictionary,
            ["{}", "{'a': 1}", "{'a': 1, 'b': 2, 'c': 3, 'd': 4}", "{'a': 1, 'b': 2}"],
        ),
    ];

    for (column_type, literals) in cases {
        let column = ColumnBuilder::new("c", column_type)
            .min_items(1)
            .max_items(3)
            .build()
            .unwrap();

        let result = run(column, literals.map(Value::from).to_vec());

        assert_eq!(
            outcomes(&result, "c"),
            vec![fails("below_min_size"), None, fails("above_max_size"), None],
            "{column_type}"
        );
        assert_eq!(
            result.coerced().column("c").unwrap()[3].item_count(),
            Some(2),
            "{column_type}"
        );
    }
}

#[test]
fn test_equal_numbers_count_once_in_sets_and_dicts() {
    let column = ColumnBuilder::new("s", ColumnType::Set)
        .max_items(1)
        .build()
        .unwrap();
    let result = run(
        column,
        vec![Value::from("{1, 1.0}"), Value::from("{1, True}"), Value::from("{1, 2}")],
    );
    assert_eq!(outcomes(&result, "s"), vec![None, None, fails("above_max_size")]);

    let column = ColumnBuilder::new("d", ColumnType::Dictionary)
        .max_items(1)
        .build()
        .unwrap();
    let result = run(column, vec![Value::from("{1: 'a', 1.0: 'b'}")]);
    assert_eq!(outcomes(&result, "d"), vec![None]);
    assert_eq!(
        result.coerced().column("d").unwrap()[0],
        Value::Dict(vec![(Value::Int(1), Value::from("b"))])
    );
}

#[test]
fn test_integer_upper_bound_beyond_float_precision() {
    let column = ColumnBuilder::new("n", ColumnType::Integer)
        .upper(9_007_199_254_740_992.0)
        .build()
        .unwrap();

    let result = run(
        column,
        vec![Value::Int(9_007_199_254_740_993), Value::Int(9_007_199_254_740_992)],
    );

    assert_eq!(outcomes(&result, "n"), vec![fails("above_upper"), None]);
}

#[test]
fn test_container_literal_must_match_kind() {
    let column = ColumnBuilder::new("t", ColumnType::Tuple).build().unwrap();

    let result = run(
        column,
        vec![
            Value::from("[1, 2]"),
            Value::from("(1)"),
            Value::from("(1, (2,))"),
            Value::List(vec![Value::Int(1)]),
        ],
    );

    assert_eq!(
        outcomes(&result, "t"),
        vec![
            fails("type_mismatch"),
            fails("type_mismatch"),
            fails("type_mismatch"),
            fails("type_mismatch"),
        ]
    );
    // Raw values are kept for cells that could not be coerced.
    assert_eq!(result.coerced().column("t").unwrap()[0], Value::from("[1, 2]"));
}

#[test]
fn test_object_accepts_anything() {
    let column = ColumnBuilder::new("o", ColumnType::Object).build().unwrap();
    let values = vec![
        Value::Null,
        Value::Float(f64::NAN),
        Value::from("[1, 2]"),
        Value::Dict(vec![(Value::Int(1), Value::Null)]),
        Value::Bool(true),
    ];

    let result = run(column, values.clone());

    assert!(result.is_valid());
    let coerced = result.coerced().column("o").unwrap();
    assert_eq!(coerced[2], values[2]);
    assert!(coerced[1].is_nan());
}

#[test]
fn test_missing_column_raised_before_any_cell_is_processed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let schema: Schema = SchemaBuilder::new(ExtraColumnPolicy::PassThrough)
        .column(
            ColumnBuilder::new("a", ColumnType::Integer)
                .check(FnCheck::new("count", move |values: &[Value]| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    CheckOutcome::from_mask(vec![true; values.len()])
                }))
                .build()
                .unwrap(),
        )
        .column(ColumnBuilder::new("x", ColumnType::Integer).build().unwrap())
        .build()
        .unwrap();
    let table = Table::new()
        .with_column("a", vec![Value::Int(1)])
        .unwrap();

    let err = validate(&schema, &table).unwrap_err();

    assert_eq!(err, ValidationError::MissingColumn(vec!["x".to_string()]));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no column may be processed");
}

#[test]
fn test_custom_reasons_reach_the_report() {
    let column = ColumnBuilder::new("n", ColumnType::Integer)
        .lower(0)
        .check(FnCheck::new("even", |values: &[Value]| {
            CheckOutcome::evaluate(values, |value| match value.as_int() {
                Some(i) if i % 2 == 0 => Ok(()),
                _ => Err("odd".to_string()),
            })
        }))
        .build()
        .unwrap();

    let result = run(
        column,
        vec![Value::Int(2), Value::Int(3), Value::Int(-4), Value::from("5")],
    );

    assert_eq!(
        outcomes(&result, "n"),
        vec![None, fails("odd"), fails("below_lower"), fails("odd")]
    );
    assert_eq!(
        result.failures()[0].reason,
        ReasonCode::Custom("odd".to_string())
    );
}
