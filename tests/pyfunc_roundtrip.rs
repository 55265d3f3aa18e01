//! Predict Round Trip Tests
//!
//! A model behaves the same before and after a save/load cycle:
//! - outputs are equal (records compared in mapping form) for every
//!   supported hint kind, with the example persisted in the manifest
//! - rejected inputs fail with the same message
//! - decorated functions and class-based models agree on every message

mod common;

use chrono::{DateTime, Utc};
use common::{custom_example, custom_example2, message};
use hintsig::hints::{HintParser, RecordDef, TypeHint, TypeHints};
use hintsig::observability::Logger;
use hintsig::pyfunc::{
    pyfunc, ModelContext, Params, PyfuncError, PyfuncResult, PythonModel, TypedCallable,
    ValidatedModel,
};
use hintsig::store::{ModelStore, StoreConfig};
use hintsig::value::{Frame, Record, Value};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, ModelStore) {
    let tmp = TempDir::new().unwrap();
    let store = ModelStore::open(StoreConfig::new(tmp.path())).unwrap();
    (tmp, store)
}

fn message_def() -> RecordDef {
    RecordDef::new("Message")
        .field("role", TypeHint::str())
        .field("content", TypeHint::str())
        .field_with_default("name", TypeHint::optional(TypeHint::str()), Value::Null)
}

fn messages_hint() -> TypeHint {
    TypeHint::list(TypeHint::record(message_def()))
}

fn roles(input: Value) -> PyfuncResult<Value> {
    let items = input.as_list().unwrap_or_default();
    items
        .iter()
        .map(|item| {
            item.as_record()
                .and_then(|r| r.get("role"))
                .cloned()
                .ok_or_else(|| PyfuncError::predict("'dict' object has no attribute 'role'"))
        })
        .collect::<PyfuncResult<Vec<_>>>()
        .map(Value::List)
}

fn roles_callable() -> TypedCallable {
    TypedCallable::new(
        "predict",
        TypeHints::new(Some(messages_hint()), Some(TypeHint::list(TypeHint::str()))),
        |input, _| roles(input),
    )
}

struct RolesModel;

impl PythonModel for RolesModel {
    fn type_hints(&self) -> TypeHints {
        TypeHints::new(Some(messages_hint()), Some(TypeHint::list(TypeHint::str())))
    }

    fn predict(
        &self,
        _context: Option<&ModelContext>,
        model_input: Value,
        _params: Option<&Params>,
    ) -> PyfuncResult<Value> {
        roles(model_input)
    }

    fn name(&self) -> &str {
        "RolesModel"
    }
}

fn echo(hint: TypeHint) -> TypedCallable {
    TypedCallable::new("predict", TypeHints::same(hint), |input, _| Ok(input))
}

fn map(entries: Vec<(&str, Value)>) -> Value {
    Value::Map(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn timestamp() -> Value {
    Value::from(
        DateTime::parse_from_rfc3339("2024-01-01T12:30:45.123456Z")
            .unwrap()
            .with_timezone(&Utc),
    )
}

fn custom_example_value() -> Value {
    map(vec![
        ("long_field", Value::Long(1)),
        ("str_field", Value::from("a")),
        ("bool_field", Value::Bool(true)),
        ("double_field", Value::Double(1.0715660391465826e-75)),
        ("binary_field", Value::from(b"bytes".to_vec())),
        ("datetime_field", timestamp()),
        ("any_field", Value::from(json!({"nested": [1, "x"]}))),
        ("optional_str", Value::Null),
    ])
}

fn chat_example() -> Value {
    Value::from(json!([
        {"role": "user", "content": "hi"},
        {"role": "assistant", "content": "hello", "name": "bot"}
    ]))
}

// =============================================================================
// Output Equality
// =============================================================================

/// load(save(f)).predict(x) == f(x) for a decorated function.
#[test]
fn test_decorated_roundtrip_output_equal() {
    let (_tmp, store) = setup_store();
    let local = pyfunc(roles_callable());
    let expected = local.predict(chat_example(), None).unwrap();

    let info = store.save(pyfunc(roles_callable()), Some(chat_example()), None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    assert_eq!(loaded.predict(chat_example(), None).unwrap(), expected);
    assert_eq!(expected, Value::from(json!(["user", "assistant"])));
}

/// Class-based models round-trip the same way.
#[test]
fn test_class_roundtrip_output_equal() {
    let (_tmp, store) = setup_store();
    let local = ValidatedModel::new(RolesModel);
    let expected = local.predict(None, chat_example(), None).unwrap();

    let info = store.save(&local, Some(chat_example()), None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    assert_eq!(loaded.predict(chat_example(), None).unwrap(), expected);
}

/// Record outputs compare equal in mapping form.
#[test]
fn test_record_outputs_compare_as_mappings() {
    let (_tmp, store) = setup_store();
    let echo = || {
        pyfunc(TypedCallable::new(
            "predict",
            TypeHints::same(messages_hint()),
            |input, _| Ok(input),
        ))
    };

    let info = store.save(echo(), None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let out = loaded.predict(chat_example(), None).unwrap();
    let local = echo().predict(chat_example(), None).unwrap();
    assert_eq!(out.normalized(), local.normalized());

    let first = Record::new("Message")
        .with("role", "user")
        .with("content", "hi")
        .with("name", Value::Null);
    assert_eq!(out.as_list().unwrap()[0], Value::from(first));
}

/// A bare function still validates once loaded.
#[test]
fn test_undecorated_function_validates_after_load() {
    let (_tmp, store) = setup_store();
    let info = store.save(roles_callable(), None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let err = loaded.predict("not a list", None).unwrap_err();
    assert_eq!(err.message(), "Expected list, but got str");
}

/// A single-column frame is accepted where a list is expected.
#[test]
fn test_frame_input_converted_to_list() {
    let (_tmp, store) = setup_store();
    let upper = pyfunc(TypedCallable::new(
        "predict",
        TypeHints::same(TypeHint::list(TypeHint::str())),
        |input, _| Ok(input),
    ));
    let info = store.save(upper, None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let frame = Frame::from_columns(vec![("text".to_string(), vec![Value::from("a"), Value::from("b")])]);
    let out = loaded.predict(frame, None).unwrap();
    assert_eq!(out, Value::from(json!(["a", "b"])));
}

// =============================================================================
// Hint Kinds
// =============================================================================

/// Every supported hint kind survives save, load and predict with its example.
#[test]
fn test_every_hint_kind_roundtrips_with_example() {
    let cases: Vec<(TypeHint, Value)> = vec![
        (TypeHint::int(), Value::Long(123)),
        (TypeHint::str(), Value::from("hello")),
        (TypeHint::bool(), Value::Bool(true)),
        (TypeHint::float(), Value::Double(1.0715660391465826e-75)),
        (TypeHint::float(), Value::Double(0.1 + 0.2)),
        (TypeHint::bytes(), Value::from(b"hello".to_vec())),
        (TypeHint::datetime(), timestamp()),
        (TypeHint::Any, Value::from(json!({"a": [1, 2.5, null]}))),
        (TypeHint::list(TypeHint::str()), Value::from(json!(["a", "b"]))),
        (TypeHint::dict(TypeHint::int()), Value::from(json!({"a": 1, "b": 2}))),
        (
            TypeHint::list(TypeHint::list(TypeHint::float())),
            Value::from(json!([[1.5, 2.25], [3.125]])),
        ),
        (
            TypeHint::dict(TypeHint::list(TypeHint::str())),
            Value::from(json!({"a": ["b", "c"]})),
        ),
        (TypeHint::union(vec![TypeHint::int(), TypeHint::str()]), Value::from("a")),
        (
            TypeHint::list(TypeHint::union(vec![TypeHint::int(), TypeHint::str()])),
            Value::from(json!([1, "a"])),
        ),
        (TypeHint::optional(TypeHint::str()), Value::Null),
        (TypeHint::list(TypeHint::Any), Value::from(json!([1, "a", null]))),
        (TypeHint::record(custom_example()), custom_example_value()),
        (
            TypeHint::list(TypeHint::record(custom_example())),
            Value::List(vec![custom_example_value()]),
        ),
        (
            TypeHint::record(custom_example2()),
            map(vec![
                ("custom_field", Value::from(json!({"a": 1, "b": [true]}))),
                ("messages", Value::from(json!([{"role": "admin", "content": "hello"}]))),
                ("optional_int", Value::Null),
            ]),
        ),
    ];

    let (_tmp, store) = setup_store();
    for (hint, example) in cases {
        let (info, logs) =
            Logger::capture(|| store.save(pyfunc(echo(hint.clone())), Some(example.clone()), None));
        let info = info.unwrap_or_else(|e| panic!("save `{}`: {}", hint, e));
        assert!(logs.iter().all(|l| !l.is_warning()), "hint `{}`: {:?}", hint, logs);
        assert!(info.signature.as_ref().unwrap().from_type_hint, "hint `{}`", hint);

        let loaded = store
            .load(&info.model_uri)
            .unwrap_or_else(|e| panic!("load `{}`: {}", hint, e));
        assert_eq!(loaded.input_example(), Some(&example), "hint `{}`", hint);

        let out = loaded.predict(example.clone(), None).unwrap();
        assert_eq!(out.normalized(), example.normalized(), "hint `{}`", hint);
    }
}

/// A frame example with missing (NaN) cells can be saved and loaded.
#[test]
fn test_nan_frame_example_roundtrip() {
    let (_tmp, store) = setup_store();
    let frame = Frame::from_columns(vec![(
        "x".to_string(),
        vec![Value::Double(1.0), Value::Double(f64::NAN)],
    )]);
    let tabular = pyfunc(TypedCallable::new(
        "predict",
        TypeHints::input_only(TypeHint::DataFrame),
        |input, _| Ok(input),
    ));

    let info = store.save(tabular, Some(Value::from(frame.clone())), None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let column = match loaded.input_example() {
        Some(Value::Frame(saved)) => saved.column(0),
        other => panic!("expected frame example, got {:?}", other),
    };
    assert_eq!(column[0], Value::Double(1.0));
    assert!(matches!(column[1], Value::Double(x) if x.is_nan()));
    assert!(loaded.predict(frame, None).is_ok());
}

/// Frame rows are rebuilt as records for a record hint after load.
#[test]
fn test_frame_input_to_record_hint() {
    let (_tmp, store) = setup_store();
    let rows = pyfunc(TypedCallable::new(
        "predict",
        TypeHints::input_only(TypeHint::record(message())),
        |input, _| Ok(input),
    ));
    let info = store.save(rows, None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let frame = Frame::from_columns(vec![
        ("role".to_string(), vec![Value::from("admin")]),
        ("content".to_string(), vec![Value::from("hello")]),
    ]);
    let out = loaded.predict(frame, None).unwrap();

    let expected = Record::new("Message").with("role", "admin").with("content", "hello");
    assert_eq!(out, Value::List(vec![Value::from(expected)]));
}

// =============================================================================
// Error Equality
// =============================================================================

/// Local and loaded models reject the same input with the same message.
#[test]
fn test_local_and_loaded_messages_identical() {
    let (_tmp, store) = setup_store();
    let local = pyfunc(roles_callable());
    let info = store.save(pyfunc(roles_callable()), None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let bad_inputs = vec![
        Value::from("a"),
        Value::from(json!({"role": "user", "content": "hi"})),
        Value::from(json!([{"role": "user"}])),
        Value::from(json!([{"role": 1, "content": "hi"}])),
        Value::from(json!(["plain string"])),
    ];

    for input in bad_inputs {
        let local_err = local.predict(input.clone(), None).unwrap_err();
        let loaded_err = loaded.predict(input.clone(), None).unwrap_err();
        assert_eq!(local_err.message(), loaded_err.message(), "input {}", input);
        assert!(local_err.schema_error().is_some());
    }
}

/// Decorated function and class-based model raise identical messages.
#[test]
fn test_decorated_and_class_messages_identical() {
    let decorated = pyfunc(roles_callable());
    let class = ValidatedModel::new(RolesModel);

    let bad_inputs = vec![
        Value::from("a"),
        Value::from(json!([{"content": "hi"}])),
        Value::from(json!([{"role": "user", "content": 5}])),
    ];

    for input in bad_inputs {
        let a = decorated.predict(input.clone(), None).unwrap_err();
        let b = class.predict(None, input.clone(), None).unwrap_err();
        assert_eq!(a.message(), b.message(), "input {}", input);
    }
}

/// A missing required field names the field.
#[test]
fn test_missing_field_message() {
    let decorated = pyfunc(roles_callable());
    let err = decorated
        .predict(Value::from(json!([{"role": "user"}])), None)
        .unwrap_err();
    assert_eq!(err.message(), "Missing required field `[0].content`");
}

// =============================================================================
// Optional Fields
// =============================================================================

/// An Optional field with a default may be omitted.
#[test]
fn test_optional_field_may_be_omitted() {
    let def = RecordDef::new("Query")
        .field("text", TypeHint::str())
        .field_with_default("limit", TypeHint::optional(TypeHint::int()), Value::Null);
    let echo = pyfunc(TypedCallable::new(
        "predict",
        TypeHints::input_only(TypeHint::record(def)),
        |input, _| Ok(input),
    ));

    let out = echo.predict(Value::from(json!({"text": "q"})), None).unwrap();
    let record = out.as_record().unwrap();
    assert_eq!(record.get("limit"), Some(&Value::Null));
}

// =============================================================================
// Textual Hints
// =============================================================================

/// Hints parsed from text validate exactly like constructed hints.
#[test]
fn test_parsed_hints_roundtrip() {
    let (_tmp, store) = setup_store();
    let hints = HintParser::new()
        .with_record(message_def())
        .parse_hints(Some("list[Message]"), Some("list[str]"))
        .unwrap();
    let parsed = TypedCallable::new("predict", hints, |input, _| roles(input));

    let info = store.save(pyfunc(parsed), None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    assert_eq!(
        loaded.predict(chat_example(), None).unwrap(),
        Value::from(json!(["user", "assistant"]))
    );
    assert_eq!(
        loaded.predict("a", None).unwrap_err().message(),
        pyfunc(roles_callable()).predict("a", None).unwrap_err().message()
    );
}

/// Params reach the predict body after load.
#[test]
fn test_params_forwarded() {
    let (_tmp, store) = setup_store();
    let scaled = pyfunc(TypedCallable::new(
        "predict",
        TypeHints::same(TypeHint::float()),
        |input, params| {
            let factor = params
                .and_then(|p| p.get("factor"))
                .and_then(Value::as_i64)
                .unwrap_or(1);
            match input {
                Value::Double(x) => Ok(Value::Double(x * factor as f64)),
                other => Err(PyfuncError::predict(format!("unexpected {}", other))),
            }
        },
    ));
    let info = store.save(scaled, None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let params = Params::from([("factor".to_string(), Value::Long(3))]);
    assert_eq!(loaded.predict(2, Some(&params)).unwrap(), Value::Double(6.0));
}
