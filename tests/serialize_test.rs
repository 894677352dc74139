//! Integration tests for the transport shape of results.

use composure::{
    make_step, serialize, ErrorPath, SerializedError, SerializedResult, StepError, StepErrors,
    StepResult, Typed,
};
use serde_json::json;
use std::convert::Infallible;
use stillwater::prelude::*;

#[test]
fn test_failure_partitions_errors_by_kind() {
    let result: StepResult<()> = Validation::Failure(
        StepErrors::single(StepError::input(ErrorPath::root().key("email"), "invalid"))
            .combine(StepErrors::single(StepError::new("smtp unavailable"))),
    );

    match serialize(result) {
        SerializedResult::Failure {
            errors,
            input_errors,
            context_errors,
        } => {
            assert_eq!(
                errors,
                vec![SerializedError {
                    message: "smtp unavailable".to_string(),
                    path: ErrorPath::root(),
                }]
            );
            assert_eq!(
                input_errors,
                vec![SerializedError {
                    message: "invalid".to_string(),
                    path: ErrorPath::root().key("email"),
                }]
            );
            assert!(context_errors.is_empty());
        }
        SerializedResult::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn test_failure_json_shape() {
    let result: StepResult<()> = Validation::Failure(
        StepErrors::single(StepError::new("boom"))
            .combine(StepErrors::single(StepError::input(
                ErrorPath::root().key("items").index(1),
                "out of stock",
            )))
            .combine(StepErrors::single(StepError::context(
                ErrorPath::root().key("user"),
                "not signed in",
            ))),
    );

    let value = serde_json::to_value(serialize(result)).unwrap();

    assert_eq!(
        value,
        json!({
            "ok": false,
            "errors": [{"message": "boom", "path": []}],
            "inputErrors": [{"message": "out of stock", "path": ["items", 1]}],
            "contextErrors": [{"message": "not signed in", "path": ["user"]}]
        })
    );
}

#[tokio::test]
async fn test_serialize_validated_step_outcomes() {
    let step = make_step()
        .input(Typed::<u8>::new())
        .handler_fn(|n, _ctx| Ok::<_, Infallible>(n * 2));

    let ok = serde_json::to_value(serialize(step.call(json!(4)).await)).unwrap();
    assert_eq!(ok, json!({"ok": true, "value": 8}));

    let failed = serde_json::to_value(serialize(step.call(json!(-1)).await)).unwrap();
    assert_eq!(failed["ok"], false);
    assert_eq!(failed["errors"], json!([]));
    assert_eq!(failed["inputErrors"].as_array().map(Vec::len), Some(1));
}
