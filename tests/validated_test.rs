//! Integration tests for validated steps.

use composure::{
    all, make_step, pipe, validator_fn, ErrorKind, ErrorPath, Issue, Step, StepError, Typed,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stillwater::prelude::*;

#[derive(Debug, Deserialize)]
struct Session {
    user_id: u64,
}

fn increment() -> Step<Value, i64> {
    make_step()
        .input(Typed::<i64>::new())
        .handler_fn(|n, _ctx| Ok::<_, Infallible>(n + 1))
}

#[tokio::test]
async fn test_number_step_accepts_numbers() {
    assert_eq!(increment().call(json!(1)).await, Validation::Success(2));
}

#[tokio::test]
async fn test_number_step_rejects_text_as_input_error() {
    match increment().call(json!("abc")).await {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 1);
            let error = errors.first();
            assert_eq!(error.kind, ErrorKind::Input);
            assert!(error.path.is_root());
            assert!(error.message.contains("invalid type"), "{}", error.message);
        }
        Validation::Success(_) => panic!("expected failure"),
    }
}

#[tokio::test]
async fn test_handler_does_not_run_on_rejected_input() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let step = make_step()
        .input(Typed::<i64>::new())
        .handler_fn(move |n, _ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(n)
        });

    assert!(step.call(json!(null)).await.is_failure());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_input_and_context_errors_reported_together() {
    let step = make_step()
        .input(Typed::<i64>::new())
        .context(Typed::<Session>::new())
        .handler_fn(|n, session: Session| Ok::<_, Infallible>(n + session.user_id as i64));

    match step.run(json!("abc"), json!({"user": 1})).await {
        Validation::Failure(errors) => {
            let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
            assert_eq!(kinds, vec![ErrorKind::Input, ErrorKind::Context]);
        }
        Validation::Success(_) => panic!("expected failure"),
    }

    assert_eq!(
        step.run(json!(1), json!({"user_id": 41})).await,
        Validation::Success(42)
    );
}

#[tokio::test]
async fn test_context_error_keeps_validator_path() {
    let tenant = validator_fn(|raw: &Value| match raw["tenant"].as_str() {
        Some(tenant) => Validation::Success(tenant.to_string()),
        None => Validation::Failure(NonEmptyVec::singleton(Issue::new(
            ErrorPath::root().key("tenant"),
            "tenant is required",
        ))),
    });
    let step = make_step()
        .context(tenant)
        .handler_fn(|(), tenant: String| Ok::<_, Infallible>(tenant));

    match step.run(Value::Null, json!({})).await {
        Validation::Failure(errors) => {
            assert_eq!(
                errors.first(),
                &StepError::context(ErrorPath::root().key("tenant"), "tenant is required")
            );
        }
        Validation::Success(_) => panic!("expected failure"),
    }

    assert_eq!(
        step.run(Value::Null, json!({"tenant": "acme"})).await,
        Validation::Success("acme".to_string())
    );
}

#[tokio::test]
async fn test_handler_failure_is_generic() {
    let step = make_step()
        .input(Typed::<i64>::new())
        .handler(|n, _ctx: Map<String, Value>| async move {
            if n < 0 {
                Err("negative balance")
            } else {
                Ok(n)
            }
        });

    match step.call(json!(-5)).await {
        Validation::Failure(errors) => {
            assert!(errors.first().is_generic());
            assert_eq!(errors.first().message, "negative balance");
        }
        Validation::Success(_) => panic!("expected failure"),
    }
}

#[tokio::test]
async fn test_validated_steps_compose() {
    let to_json: Step<Value, Value> = make_step()
        .input(Typed::<i64>::new())
        .handler_fn(|n, _ctx| Ok::<_, Infallible>(json!(n * 2)));
    let fan_out = all(vec![increment(), increment()]);
    let step = pipe(to_json, fan_out);

    assert_eq!(step.call(json!(5)).await, Validation::Success(vec![11, 11]));

    match step.call(json!("five")).await {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.first().is_input());
        }
        Validation::Success(_) => panic!("expected failure"),
    }
}

#[tokio::test]
async fn test_default_input_rejects_values() {
    let step = make_step().handler_fn(|(), _ctx| Ok::<_, Infallible>("ran"));

    assert_eq!(step.call(Value::Null).await, Validation::Success("ran"));
    match step.call(json!(3)).await {
        Validation::Failure(errors) => assert!(errors.first().is_input()),
        Validation::Success(_) => panic!("expected failure"),
    }
}

#[tokio::test]
async fn test_panicking_input_validator_becomes_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let step = make_step()
        .input(validator_fn(|raw| {
            Validation::Success(raw["n"].as_i64().expect("adapter bug"))
        }))
        .handler_fn(move |n: i64, _ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(n)
        });

    match step.call(json!({})).await {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.first().is_generic());
            assert_eq!(errors.first().message, "adapter bug");
        }
        Validation::Success(_) => panic!("expected failure"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(step.call(json!({"n": 3})).await, Validation::Success(3));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_panicking_context_validator_stays_inside_combinators() {
    let tenant = make_step()
        .context(validator_fn(|raw| {
            Validation::Success(raw["tenant"].as_str().expect("tenant missing").to_string())
        }))
        .handler_fn(|(), tenant: String| Ok::<_, Infallible>(tenant));
    let both = all(vec![tenant.clone(), tenant]);

    match both.run(Value::Null, json!({})).await {
        Validation::Failure(errors) => {
            let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
            assert_eq!(messages, vec!["tenant missing", "tenant missing"]);
            assert!(errors.iter().all(StepError::is_generic));
        }
        Validation::Success(_) => panic!("expected failure"),
    }

    assert_eq!(
        both.run(Value::Null, json!({"tenant": "acme"})).await,
        Validation::Success(vec!["acme".to_string(), "acme".to_string()])
    );
}

#[tokio::test]
async fn test_typed_input_error_points_at_field() {
    #[derive(Debug, Deserialize)]
    struct Signup {
        email: String,
        age: u8,
    }

    let step = make_step()
        .input(Typed::<Signup>::new())
        .handler_fn(|signup, _ctx| {
            Ok::<_, Infallible>(format!("{}:{}", signup.email, signup.age))
        });

    match step.call(json!({"email": "ada@example.com", "age": -3})).await {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.first().is_input());
            assert_eq!(errors.first().path, ErrorPath::root().key("age"));
        }
        Validation::Success(_) => panic!("expected failure"),
    }
}
