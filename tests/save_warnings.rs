//! Save-Time Warning Tests
//!
//! Problems with type hints never fail a save; they surface as warnings:
//! - unsupported hints warn once and skip validation
//! - output mismatches warn and persist an Any output schema
//! - tabular hints fall back to the input example
//! - return-only hints skip signature inference

use std::fs;

use hintsig::hints::{TypeHint, TypeHints};
use hintsig::observability::{CapturedLog, Logger};
use hintsig::pyfunc::{pyfunc, ModelContext, Params, PyfuncResult, PythonModel, TypedCallable, ValidatedModel};
use hintsig::schema::{ColSpec, ColType, DataType, ModelSignature, Schema};
use hintsig::store::{ModelStore, StoreConfig};
use hintsig::value::{Frame, Value};
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

fn echo(name: &str, hints: TypeHints) -> TypedCallable {
    TypedCallable::new(name, hints, |input, _| Ok(input))
}

fn warnings(logs: &[CapturedLog]) -> Vec<&CapturedLog> {
    logs.iter().filter(|l| l.is_warning()).collect()
}

fn frame_example() -> Value {
    Value::from(Frame::from_columns(vec![(
        "a".to_string(),
        vec![Value::Long(1), Value::Long(2)],
    )]))
}

// =============================================================================
// Unsupported Hints
// =============================================================================

/// list[object] warns exactly once across decoration, save, load and predict.
#[test]
fn test_unsupported_hint_warns_once_per_wrapper() {
    let (_tmp, store) = setup_store();
    let hints = TypeHints::input_only(TypeHint::list(TypeHint::opaque("object")));

    let (decorated, logs) = Logger::capture(|| pyfunc(echo("predict", hints.clone())));
    let found = warnings(&logs);
    assert_eq!(found.len(), 1);
    assert!(found[0]
        .message()
        .starts_with("Type hint used in the model's predict function is not supported"));

    let (result, logs) = Logger::capture(|| decorated.predict(json!([1, "a"]), None));
    assert!(result.is_ok());
    assert!(warnings(&logs).is_empty());

    let info = store.save(decorated, None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();
    let (result, logs) = Logger::capture(|| loaded.predict(json!([1, "a"]), None));
    assert_eq!(result.unwrap(), Value::from(json!([1, "a"])));
    assert!(warnings(&logs).is_empty());
}

/// Saving with an unsupported hint warns and infers from the example.
#[test]
fn test_unsupported_hint_save_uses_example() {
    let (_tmp, store) = setup_store();
    let bare = echo("predict", TypeHints::input_only(TypeHint::list(TypeHint::opaque("object"))));

    let (info, logs) = Logger::capture(|| store.save(bare, Some(Value::from(json!(["a", "b"]))), None));
    let signature = info.unwrap().signature.unwrap();

    assert!(!signature.from_type_hint);
    assert_eq!(signature.inputs, Some(Schema::single(ColType::array(DataType::String))));
    let found = warnings(&logs);
    assert_eq!(found.len(), 1);
    assert!(found[0].message().starts_with("Unsupported type hint `list[object]`"));
}

struct ObjectModel;

impl PythonModel for ObjectModel {
    fn type_hints(&self) -> TypeHints {
        TypeHints::input_only(TypeHint::list(TypeHint::opaque("object")))
    }

    fn predict(&self, _context: Option<&ModelContext>, model_input: Value, _params: Option<&Params>) -> PyfuncResult<Value> {
        Ok(model_input)
    }
}

/// Class-based models warn when wrapped, not on every call.
#[test]
fn test_class_model_warns_at_definition() {
    let (model, logs) = Logger::capture(|| ValidatedModel::new(ObjectModel));
    assert_eq!(warnings(&logs).len(), 1);

    let (_, logs) = Logger::capture(|| {
        model.predict(None, json!(["a"]), None).unwrap();
        model.predict(None, json!([1]), None).unwrap();
    });
    assert!(warnings(&logs).is_empty());
}

// =============================================================================
// Output Mismatch
// =============================================================================

/// Output hint str with an int result: warns, predict succeeds, outputs Any.
#[test]
fn test_output_mismatch_persists_any() {
    let (tmp, store) = setup_store();
    let decorated = pyfunc(echo("predict", TypeHints::new(Some(TypeHint::int()), Some(TypeHint::str()))));

    let (info, logs) = Logger::capture(|| store.save(decorated, Some(Value::Long(123)), None));
    let info = info.unwrap();

    assert!(warnings(&logs)
        .iter()
        .any(|l| l.message().starts_with("Failed to validate output `123` against type hint `str`")));
    let signature = info.signature.clone().unwrap();
    assert_eq!(signature.inputs, Some(Schema::single(DataType::Long)));
    assert_eq!(signature.outputs, Some(Schema::any()));

    // persisted, not just returned
    let manifest = store.manifest(&info.model_uri).unwrap();
    assert_eq!(manifest.signature, Some(signature));
    assert!(info.path.starts_with(tmp.path()));

    let loaded = store.load(&info.model_uri).unwrap();
    let (result, logs) = Logger::capture(|| loaded.predict(123, None));
    assert_eq!(result.unwrap(), Value::Long(123));
    assert_eq!(warnings(&logs).len(), 1);
    assert_eq!(logs[0].event, "PREDICT_OUTPUT_MISMATCH");
}

/// Output validation can be turned off in the store config.
#[test]
fn test_output_validation_disabled_by_config() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("hintsig.json");
    fs::write(
        &config_path,
        json!({"root_dir": tmp.path().join("store"), "validate_outputs": false}).to_string(),
    )
    .unwrap();
    let store = ModelStore::open(StoreConfig::load(&config_path).unwrap()).unwrap();

    let decorated = pyfunc(echo("predict", TypeHints::new(Some(TypeHint::int()), Some(TypeHint::str()))));
    let info = store.save(decorated, None, None).unwrap();
    let loaded = store.load(&info.model_uri).unwrap();

    let (_, logs) = Logger::capture(|| loaded.predict(1, None));
    assert!(warnings(&logs).is_empty());
}

// =============================================================================
// Tabular Hints
// =============================================================================

/// A DataFrame hint without example: no signature, two-part warning.
#[test]
fn test_dataframe_hint_without_example() {
    let (_tmp, store) = setup_store();
    let decorated = pyfunc(echo("predict", TypeHints::input_only(TypeHint::DataFrame)));

    let (info, logs) = Logger::capture(|| store.save(decorated, None, None));

    assert!(info.unwrap().signature.is_none());
    let found = warnings(&logs);
    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].message(),
        "Type hint `DataFrame` cannot be used to infer model signature. \
         Input example is not provided, model signature cannot be inferred."
    );
}

/// A DataFrame hint with an example infers named columns and enforces them.
#[test]
fn test_dataframe_hint_with_example() {
    let (_tmp, store) = setup_store();
    let decorated = pyfunc(echo("predict", TypeHints::input_only(TypeHint::DataFrame)));

    let (info, logs) = Logger::capture(|| store.save(decorated, Some(frame_example()), None));
    let info = info.unwrap();

    assert!(warnings(&logs).is_empty());
    let signature = info.signature.unwrap();
    assert_eq!(signature.inputs, Some(Schema::new(vec![ColSpec::named("a", DataType::Long)])));

    let loaded = store.load(&info.model_uri).unwrap();
    assert!(loaded.predict(frame_example(), None).is_ok());

    let wrong = Frame::from_columns(vec![("b".to_string(), vec![Value::Long(1)])]);
    let err = loaded.predict(wrong, None).unwrap_err();
    assert_eq!(err.message(), "Missing required field `a`");
}

/// An explicit signature bypasses inference entirely.
#[test]
fn test_explicit_signature_used() {
    let (_tmp, store) = setup_store();
    let decorated = pyfunc(echo("predict", TypeHints::input_only(TypeHint::DataFrame)));
    let explicit = ModelSignature::new(Some(Schema::new(vec![ColSpec::named("a", DataType::Long)])), None);

    let (info, logs) = Logger::capture(|| store.save(decorated, None, Some(explicit.clone())));

    assert_eq!(info.unwrap().signature, Some(explicit));
    assert!(warnings(&logs).is_empty());
}

/// An empty frame example cannot produce a schema.
#[test]
fn test_dataframe_hint_with_unusable_example() {
    let (_tmp, store) = setup_store();
    let decorated = pyfunc(echo("predict", TypeHints::input_only(TypeHint::DataFrame)));

    let (info, logs) = Logger::capture(|| store.save(decorated, Some(Value::from(Frame::default())), None));

    assert!(info.unwrap().signature.is_none());
    assert!(warnings(&logs)[0].message().contains(
        "Inferring model signature from input example failure: Cannot infer a schema from a DataFrame without columns"
    ));
}

// =============================================================================
// Signature Inference Rules
// =============================================================================

/// Return-only hints produce no signature.
#[test]
fn test_output_only_hints_skip_signature() {
    let (_tmp, store) = setup_store();
    let decorated = pyfunc(echo("predict", TypeHints::output_only(TypeHint::list(TypeHint::str()))));

    let (info, logs) = Logger::capture(|| store.save(decorated, Some(Value::from(json!(["a"]))), None));

    assert!(info.unwrap().signature.is_none());
    assert_eq!(warnings(&logs)[0].event, "SIGNATURE_INFERENCE_SKIPPED");
}

/// No hints at all: the example decides.
#[test]
fn test_unhinted_function_uses_example() {
    let (_tmp, store) = setup_store();
    let bare = echo("predict", TypeHints::none());

    let (info, logs) = Logger::capture(|| store.save(bare, Some(Value::from(json!({"k": 1.5}))), None));
    let signature = info.unwrap().signature.unwrap();

    assert!(!signature.from_type_hint);
    assert_eq!(signature.inputs, Some(Schema::single(ColType::map(DataType::Double))));
    assert_eq!(signature.outputs, Some(Schema::single(ColType::map(DataType::Double))));
    assert!(warnings(&logs).is_empty());
}

/// No hints and an example with no inferable schema: no signature, one warning.
#[test]
fn test_unhinted_function_with_unusable_example_warns() {
    let (_tmp, store) = setup_store();
    let bare = echo("predict", TypeHints::none());

    let (info, logs) = Logger::capture(|| store.save(bare, Some(Value::from(json!([]))), None));

    assert!(info.unwrap().signature.is_none());
    let found = warnings(&logs);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event, "SIGNATURE_INFERENCE_FAILED");
    assert_eq!(
        found[0].message(),
        "Inferring model signature from input example failure: Cannot infer the element type of an empty list"
    );
}

/// An example that violates the input hint warns but the save succeeds.
#[test]
fn test_incompatible_example_warns() {
    let (_tmp, store) = setup_store();
    let decorated = pyfunc(echo("predict", TypeHints::same(TypeHint::int())));

    let (info, logs) = Logger::capture(|| store.save(decorated, Some(Value::from("string")), None));

    assert!(info.unwrap().signature.unwrap().from_type_hint);
    let found = warnings(&logs);
    assert_eq!(found.len(), 1);
    assert!(found[0]
        .message()
        .starts_with("Input example is not compatible with the type hint of the `predict` function."));
}

// =============================================================================
// Undecorated Functions
// =============================================================================

/// A bare function with supported hints gets the decorate advisory.
#[test]
fn test_undecorated_advisory_only_for_valid_hints() {
    let (_tmp, store) = setup_store();

    let (_, logs) = Logger::capture(|| store.save(echo("predict", TypeHints::same(TypeHint::list(TypeHint::str()))), None, None));
    let found = warnings(&logs);
    assert_eq!(found.len(), 1);
    assert!(found[0].message().starts_with("Decorate your function"));

    let (_, logs) = Logger::capture(|| store.save(pyfunc(echo("predict", TypeHints::same(TypeHint::int()))), None, None));
    assert!(warnings(&logs).is_empty());

    let (_, logs) = Logger::capture(|| store.save(echo("predict", TypeHints::input_only(TypeHint::DataFrame)), Some(frame_example()), None));
    assert!(!warnings(&logs).iter().any(|l| l.event == "UNDECORATED_CALLABLE"));
}

/// The advisory can be silenced in the store config.
#[test]
fn test_undecorated_advisory_disabled() {
    let tmp = TempDir::new().unwrap();
    let mut config = StoreConfig::new(tmp.path());
    config.warn_undecorated = false;
    let store = ModelStore::open(config).unwrap();

    let (_, logs) = Logger::capture(|| store.save(echo("predict", TypeHints::same(TypeHint::int())), None, None));
    assert!(warnings(&logs).is_empty());
}
