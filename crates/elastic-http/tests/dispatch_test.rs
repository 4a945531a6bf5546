//! Dispatch core behavior against a scripted transport.

mod support;

use std::sync::Arc;

use elastic_core::{ElasticError, GetRequest, SearchRequest, TransportError};
use elastic_http::ElasticClient;
use support::{compatible_server, found_doc, json_envelope, missing_doc, MockTransport};

fn client_over(transport: Arc<MockTransport>) -> ElasticClient {
    ElasticClient::builder()
        .api_compatibility(false)
        .build(transport)
}

#[tokio::test]
async fn invalid_requests_never_reach_the_transport() {
    let transport = Arc::new(MockTransport::new(compatible_server(|request| {
        Ok(json_envelope(200, found_doc("docs", &request.path)))
    })));
    let client = client_over(Arc::clone(&transport));

    let result = client.get(&GetRequest::new("", "1")).await;

    assert!(matches!(result, Err(ElasticError::Validation(_))));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn successful_responses_go_through_the_converter() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Ok(json_envelope(200, found_doc("docs", "1")))
    })));
    let client = client_over(Arc::clone(&transport));

    let response = client.get(&GetRequest::new("docs", "1")).await.unwrap();

    assert!(response.found);
    assert_eq!(response.id, "1");
    assert_eq!(transport.substantive_calls(), 1);
}

#[tokio::test]
async fn acceptable_status_is_converted_as_a_valid_response() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Err(TransportError::Status {
            response: json_envelope(404, missing_doc("docs", "absent")),
        })
    })));
    let client = client_over(transport);

    let response = client.get(&GetRequest::new("docs", "absent")).await.unwrap();

    assert!(!response.found);
    assert_eq!(response.id, "absent");
}

#[tokio::test]
async fn acceptable_status_with_unconvertible_body_normalizes() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Err(TransportError::Status {
            response: json_envelope(
                404,
                serde_json::json!({"error": {"type": "index_not_found_exception"}, "status": 404}),
            ),
        })
    })));
    let client = client_over(transport);

    let result = client.get(&GetRequest::new("gone", "1")).await;

    match result {
        Err(ElasticError::Api(error)) => {
            assert_eq!(error.status, 404);
            assert_eq!(
                error.error.unwrap().error.kind.as_deref(),
                Some("index_not_found_exception")
            );
        }
        other => panic!("expected an api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unacceptable_status_normalizes_directly() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Err(TransportError::Status {
            response: json_envelope(
                500,
                serde_json::json!({"error": {"type": "internal", "reason": "boom"}, "status": 500}),
            ),
        })
    })));
    let client = client_over(transport);

    let result = client
        .search(&SearchRequest::new(serde_json::json!({})))
        .await;

    match result {
        Err(ElasticError::Api(error)) => assert_eq!(error.status, 500),
        other => panic!("expected an api error, got {other:?}"),
    }
}

#[tokio::test]
async fn success_conversion_failures_become_parse_errors() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Ok(json_envelope(200, serde_json::json!({"unexpected": "shape"})))
    })));
    let client = client_over(transport);

    let result = client.get(&GetRequest::new("docs", "1")).await;

    match result {
        Err(ElasticError::Parse { message, source }) => {
            assert!(message.contains("200"));
            // The original cause is preserved, not swallowed.
            assert!(!source.to_string().is_empty());
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn exists_maps_statuses_to_bools() {
    let transport = Arc::new(MockTransport::new(compatible_server(|request| {
        if request.path.ends_with("/present") {
            Ok(json_envelope(200, serde_json::json!({})))
        } else {
            Err(TransportError::Status {
                response: elastic_core::ResponseEnvelope::new(404),
            })
        }
    })));
    let client = client_over(transport);

    assert!(client.exists(&GetRequest::new("docs", "present")).await.unwrap());
    assert!(!client.exists(&GetRequest::new("docs", "absent")).await.unwrap());
}

#[tokio::test]
async fn listener_path_delivers_results() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Ok(json_envelope(200, found_doc("docs", "1")))
    })));
    let client = client_over(transport);

    let (tx, rx) = tokio::sync::oneshot::channel();
    let cancellable = client.get_with_listener(&GetRequest::new("docs", "1"), move |result| {
        let _ = tx.send(result);
    });

    let response = rx.await.unwrap().unwrap();
    assert!(response.found);
    assert!(!cancellable.is_cancelled());
}

#[tokio::test]
async fn listener_path_reports_validation_failures_without_dispatch() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Ok(json_envelope(200, found_doc("docs", "1")))
    })));
    let client = client_over(Arc::clone(&transport));

    let (tx, rx) = tokio::sync::oneshot::channel();
    let cancellable = client.get_with_listener(&GetRequest::new("", "1"), move |result| {
        let _ = tx.send(result);
    });

    assert!(matches!(
        rx.await.unwrap(),
        Err(ElasticError::Validation(_))
    ));
    // Nothing was sent and there is nothing to cancel.
    assert_eq!(transport.call_count(), 0);
    cancellable.cancel();
    assert!(!cancellable.is_cancelled());
}

#[test]
fn blocking_path_needs_no_ambient_runtime() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Ok(json_envelope(200, found_doc("docs", "1")))
    })));
    let client = client_over(transport);

    let response = client.get_blocking(&GetRequest::new("docs", "1")).unwrap();
    assert!(response.found);

    let pong = client.ping_blocking().unwrap();
    assert!(pong);
}

#[tokio::test]
async fn network_failures_surface_as_transport_errors() {
    let transport = Arc::new(MockTransport::new(compatible_server(|_| {
        Err(TransportError::Connect("connection refused".to_string()))
    })));
    let client = client_over(transport);

    let result = client.get(&GetRequest::new("docs", "1")).await;
    assert!(matches!(
        result,
        Err(ElasticError::Transport(TransportError::Connect(_)))
    ));
}
