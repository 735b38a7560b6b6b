//! End-to-end calls through a proxy, a local transport and a processor.

use async_trait::async_trait;
use bytes::Bytes;
use lpfcp::{
    CallRequest, Envelope, ExposureRegistry, FailureKind, Interface, LpfcpError, Processor,
    ProcessorOptions, Proxy, Transport, TypeDescriptor,
};
use std::sync::Arc;

lpfcp::interface! {
    pub interface Calculator => CalculatorClient {
        fn hello() -> String;
        fn add(a: i32, b: i32) -> i32;
        fn add_strings(a: String, b: String) -> String as "add";
        fn subtract(a: i32, b: i32) -> i32;
        fn multiply(a: i32, b: i32) -> i32;
        fn divide(a: i32, b: i32) -> i32;
        fn describe(value: Option<i32>) -> Option<String>;
        fn crash() -> i32;
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Division by zero")]
struct DivisionByZero;

struct CalculatorImpl;

fn registry() -> ExposureRegistry<CalculatorImpl> {
    ExposureRegistry::new()
        .declare::<Calculator>()
        .expose("hello", |_: &CalculatorImpl, ()| "Hello, World!".to_string())
        .unwrap()
        .expose("add", |_: &CalculatorImpl, (a, b): (i32, i32)| a + b)
        .unwrap()
        .expose("add", |_: &CalculatorImpl, (a, b): (String, String)| a + &b)
        .unwrap()
        .expose("subtract", |_: &CalculatorImpl, (a, b): (i32, i32)| a - b)
        .unwrap()
        .expose_fallible("divide", |_: &CalculatorImpl, (a, b): (i32, i32)| {
            a.checked_div(b).ok_or(DivisionByZero)
        })
        .unwrap()
        .expose("describe", |_: &CalculatorImpl, (value,): (Option<i32>,)| {
            value.map(|v| format!("value {}", v))
        })
        .unwrap()
        .expose("crash", |_: &CalculatorImpl, ()| -> i32 {
            panic!("calculator exploded")
        })
        .unwrap()
}

fn client() -> CalculatorClient {
    client_with(ProcessorOptions::default())
}

fn client_with(options: ProcessorOptions) -> CalculatorClient {
    let processor = Processor::new(CalculatorImpl, registry()).with_options(options);
    CalculatorClient::new(Proxy::local(Arc::new(processor)))
}

#[tokio::test]
async fn test_zero_argument_call() {
    assert_eq!(client().hello().await.unwrap(), "Hello, World!");
}

#[tokio::test]
async fn test_exposed_methods_return_values() {
    let client = client();
    assert_eq!(client.add(3, 5).await.unwrap(), 8);
    assert_eq!(client.subtract(1, 2).await.unwrap(), -1);
    assert_eq!(client.divide(9, 3).await.unwrap(), 3);
}

#[tokio::test]
async fn test_overloads_resolve_by_descriptor() {
    let client = client();
    assert_eq!(client.add(3, 5).await.unwrap(), 8);
    assert_eq!(
        client
            .add_strings("foo".to_string(), "bar".to_string())
            .await
            .unwrap(),
        "foobar"
    );
}

#[tokio::test]
async fn test_unexposed_method_is_rejected() {
    let err = client().multiply(2, 3).await.unwrap_err();
    assert!(err.is_method_not_found());
    assert!(!err.is_transport());
    assert_eq!(
        err.failure().unwrap().protocol_kind(),
        Some(FailureKind::NotExposed)
    );
}

#[tokio::test]
async fn test_concealed_unexposed_method_looks_absent() {
    let client = client_with(ProcessorOptions {
        reveal_unexposed: false,
    });
    let err = client.multiply(2, 3).await.unwrap_err();
    assert_eq!(
        err.failure().unwrap().protocol_kind(),
        Some(FailureKind::MethodNotFound)
    );
}

#[tokio::test]
async fn test_undeclared_method_is_not_found() {
    let proxy = client().proxy().clone();
    let err = proxy.invoke::<_, i32>("power", (2, 8)).await.unwrap_err();
    assert_eq!(
        err.failure().unwrap().protocol_kind(),
        Some(FailureKind::MethodNotFound)
    );
}

#[tokio::test]
async fn test_wrong_descriptors_do_not_widen() {
    let proxy = client().proxy().clone();
    let err = proxy
        .invoke::<_, i64>("add", (3_i64, 5_i64))
        .await
        .unwrap_err();
    assert!(err.is_method_not_found());
}

#[tokio::test]
async fn test_method_error_is_carried_as_cause() {
    let err = client().divide(1, 0).await.unwrap_err();
    assert!(err.is_invocation_failure());

    let failure = err.failure().unwrap();
    let cause = failure.cause.as_deref().unwrap();
    assert_eq!(cause.kind, "DivisionByZero");
    assert_eq!(cause.message, "Division by zero");
}

#[tokio::test]
async fn test_null_values_roundtrip() {
    let client = client();
    assert_eq!(client.describe(None).await.unwrap(), None);
    assert_eq!(
        client.describe(Some(4)).await.unwrap(),
        Some("value 4".to_string())
    );
}

#[tokio::test]
async fn test_panicking_method_becomes_failure() {
    let client = client();
    let err = client.crash().await.unwrap_err();
    assert!(err.is_invocation_failure());
    assert_eq!(
        err.failure().unwrap().root_cause().message,
        "calculator exploded"
    );

    // Still serving.
    assert_eq!(client.add(1, 1).await.unwrap(), 2);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_proxy() {
    let client = client();
    let calls = (0..32).map(|i| {
        let client = client.clone();
        tokio::spawn(async move { client.add(i, i).await })
    });

    let results = futures::future::join_all(calls).await;
    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap().unwrap(), 2 * i as i32);
    }
}

#[test]
fn test_interface_declares_every_method() {
    let methods = Calculator::methods();
    assert_eq!(methods.len(), 8);
    let add_overloads: Vec<_> = methods.iter().filter(|m| m.name == "add").collect();
    assert_eq!(add_overloads.len(), 2);
    assert_ne!(
        add_overloads[0].parameter_types,
        add_overloads[1].parameter_types
    );
}

#[test]
fn test_duplicate_exposure_is_rejected_at_registration() {
    let err = registry()
        .expose("add", |_: &CalculatorImpl, (a, b): (i32, i32)| a * b)
        .unwrap_err();
    assert!(matches!(err, LpfcpError::DuplicateExposure(_)));
}

#[test]
fn test_registry_reports_exposure() {
    let registry = registry();
    let ints = [TypeDescriptor::from("i32"), TypeDescriptor::from("i32")];
    assert!(registry.is_exposed("add", &ints));
    assert!(!registry.is_exposed("multiply", &ints));
}

#[test]
fn test_processor_answers_malformed_body_with_failure() {
    let processor = Processor::new(CalculatorImpl, registry());
    match processor.process_slice(br#"{"methodName": "add", "arguments": [1, 2]}"#) {
        Envelope::Failure(failure) => {
            assert!(failure.is_kind(FailureKind::MalformedRequest));
            assert!(failure.message.contains("parameterTypes"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_processor_accepts_hand_written_request() {
    let processor = Processor::new(CalculatorImpl, registry());
    let request = CallRequest::new(
        "add",
        vec!["string".into(), "string".into()],
        vec!["a".into(), "b".into()],
    )
    .unwrap();
    assert_eq!(
        processor.process(request),
        Envelope::Success(serde_json::json!("ab"))
    );
}

/// Transport that answers every call with a fixed body.
struct BrokenTransport(&'static [u8]);

#[async_trait]
impl Transport for BrokenTransport {
    async fn send(&self, _request: Bytes) -> lpfcp::Result<Bytes> {
        Ok(Bytes::from_static(self.0))
    }

    fn destination(&self) -> String {
        "broken".to_string()
    }
}

#[tokio::test]
async fn test_malformed_response_is_transport_error() {
    let client = CalculatorClient::new(Proxy::new(BrokenTransport(b"<html>oops</html>")));
    let err = client.add(1, 2).await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.failure().is_none());
}

#[tokio::test]
async fn test_transport_error_is_not_a_failure() {
    struct Down;

    #[async_trait]
    impl Transport for Down {
        async fn send(&self, _request: Bytes) -> lpfcp::Result<Bytes> {
            Err(LpfcpError::Transport {
                message: "connection refused".to_string(),
                cause: None,
            })
        }

        fn destination(&self) -> String {
            "down".to_string()
        }
    }

    let err = CalculatorClient::new(Proxy::new(Down))
        .hello()
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert!(!err.is_method_not_found());
}
