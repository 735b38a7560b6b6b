//! Calculator served over HTTP and called through the generated client.

use lpfcp::{FailureKind, LpfcpError, Proxy};
use lpfcp_axum::{LpfcpServer, ServerConfig};
use lpfcp_calculator::{processor, CalculatorClient};
use std::sync::Arc;
use std::time::Duration;

async fn start() -> LpfcpServer {
    LpfcpServer::start(
        Arc::new(processor().unwrap()),
        ServerConfig::default().with_port(0),
    )
    .await
    .unwrap()
}

fn client_for(endpoint: &str) -> CalculatorClient {
    CalculatorClient::new(Proxy::http(endpoint).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_calls_over_http() {
    let server = start().await;
    let calculator = client_for(&server.endpoint());

    assert_eq!(calculator.hello().await.unwrap(), "Hello, World!");
    assert_eq!(calculator.add(3, 5).await.unwrap(), 8);
    assert_eq!(calculator.subtract(1, 2).await.unwrap(), -1);
    assert_eq!(
        calculator
            .add_strings("foo".to_string(), "bar".to_string())
            .await
            .unwrap(),
        "foobar"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_null_result_is_success() {
    let server = start().await;
    let calculator = client_for(&server.endpoint());
    assert_eq!(calculator.divide_safely(5, 0).await.unwrap(), None);
    assert_eq!(calculator.divide_safely(10, 2).await.unwrap(), Some(5));
    assert_eq!(calculator.average(Vec::new()).await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unexposed_method_fails_remotely() {
    let server = start().await;
    let err = client_for(&server.endpoint())
        .multiply(2, 3)
        .await
        .unwrap_err();

    assert!(!err.is_transport());
    assert!(err.is_method_not_found());
    assert_eq!(
        err.failure().unwrap().protocol_kind(),
        Some(FailureKind::NotExposed)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_method_error_crosses_the_wire() {
    let server = start().await;
    let err = client_for(&server.endpoint())
        .divide(5, 0)
        .await
        .unwrap_err();

    assert!(!err.is_transport());
    assert!(err.is_invocation_failure());
    let cause = err.failure().unwrap().root_cause();
    assert_eq!(cause.kind, "CalcError");
    assert_eq!(cause.message, "Division by zero");
    assert!(err.to_string().contains("Division by zero"), "{}", err);
    let reported = format!("{:#}", anyhow::Error::from(err));
    assert!(reported.contains("CalcError: Division by zero"), "{}", reported);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_non_finite_average_is_not_null() {
    let server = start().await;
    let err = client_for(&server.endpoint())
        .average(vec![f64::MAX, f64::MAX])
        .await
        .unwrap_err();

    assert!(err.is_invocation_failure());
    assert_eq!(err.failure().unwrap().root_cause().kind, "CalcError");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls() {
    let server = start().await;
    let calculator = client_for(&server.endpoint());

    let calls = (0..50).map(|i| {
        let calculator = calculator.clone();
        tokio::spawn(async move { calculator.subtract(i, 1).await })
    });
    let results = futures::future::join_all(calls).await;

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap().unwrap(), i as i32 - 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wrong_path_is_http_status_error() {
    let server = start().await;
    let endpoint = format!("http://{}/not-lpfcp", server.addr());
    let err = client_for(&endpoint).hello().await.unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, LpfcpError::HttpStatus { status: 404, .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stopped_server_is_transport_error() {
    let mut server = start().await;
    let endpoint = server.endpoint();
    server.shutdown();
    tokio::time::timeout(Duration::from_secs(10), server.join())
        .await
        .unwrap();

    let err = client_for(&endpoint).hello().await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.failure().is_none());
}
