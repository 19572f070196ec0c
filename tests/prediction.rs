//! Prediction flow against a scripted stub service.

mod common;

use common::{test_config, StubResponse, StubServer};
use cropcast::client::AdvisoryClient;
use cropcast::error::FlowError;
use cropcast::lifecycle::RequestState;
use cropcast::validate::Field;

fn fill_valid_form(client: &mut AdvisoryClient) {
    let values = [
        (Field::N, "90"),
        (Field::P, "42"),
        (Field::K, "43"),
        (Field::Temperature, "21"),
        (Field::Humidity, "82"),
        (Field::Ph, "6.5"),
        (Field::Rainfall, "203"),
    ];
    for (field, raw) in values {
        client.record_input(field, raw);
    }
}

#[test]
fn submit_posts_the_form_and_surfaces_the_label() {
    let server = StubServer::start(vec![StubResponse::json(
        200,
        r#"{"predicted_label":"rice"}"#,
    )]);
    let mut client = AdvisoryClient::new(test_config(&server.url()));
    fill_valid_form(&mut client);

    match client.submit_measurements() {
        RequestState::Success(prediction) => assert_eq!(prediction.predicted_label, "rice"),
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(client.recommended_guide_id(), Some("rice".to_string()));

    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/predict");
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        requests[0].body,
        r#"{"N":"90","P":"42","K":"43","temperature":"21","humidity":"82","ph":"6.5","rainfall":"203"}"#
    );
}

#[test]
fn label_is_normalized_for_the_guide_handoff() {
    let server = StubServer::start(vec![StubResponse::json(
        200,
        r#"{"predicted_label":" Wheat "}"#,
    )]);
    let mut client = AdvisoryClient::new(test_config(&server.url()));
    fill_valid_form(&mut client);

    client.submit_measurements();
    assert_eq!(client.recommended_guide_id(), Some("wheat".to_string()));
    server.finish();
}

#[test]
fn out_of_range_input_blocks_submission_without_a_request() {
    let server = StubServer::start(Vec::new());
    let mut client = AdvisoryClient::new(test_config(&server.url()));
    fill_valid_form(&mut client);
    client.record_input(Field::Ph, "99");

    match client.submit_measurements() {
        RequestState::Error(err) => {
            assert!(matches!(err, FlowError::Validation(_)));
            assert_eq!(err.message(), "Please correct the input errors.");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(
        client.errors().message(Field::Ph),
        Some("Enter between 0 - 14")
    );
    assert!(server.finish().is_empty());
}

#[test]
fn untouched_field_blocks_submission_without_a_request() {
    let server = StubServer::start(Vec::new());
    let mut client = AdvisoryClient::new(test_config(&server.url()));
    for (field, raw) in [(Field::N, "90"), (Field::P, "42"), (Field::K, "43")] {
        client.record_input(field, raw);
    }

    match client.submit_measurements() {
        RequestState::Error(err) => assert!(matches!(err, FlowError::Validation(_))),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(server.finish().is_empty());
}

#[test]
fn server_error_resolves_to_a_transport_failure() {
    let server = StubServer::start(vec![StubResponse::json(500, r#"{"detail":"boom"}"#)]);
    let mut client = AdvisoryClient::new(test_config(&server.url()));
    fill_valid_form(&mut client);

    match client.submit_measurements() {
        RequestState::Error(err) => {
            assert!(matches!(err, FlowError::Transport(_)));
            assert_eq!(err.message(), "Failed to fetch prediction. Please try again.");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(client.recommended_guide_id().is_none());
    assert_eq!(server.finish().len(), 1);
}

#[test]
fn missing_label_resolves_to_a_payload_failure() {
    let server = StubServer::start(vec![StubResponse::json(200, r#"{"confidence":0.93}"#)]);
    let mut client = AdvisoryClient::new(test_config(&server.url()));
    fill_valid_form(&mut client);

    match client.submit_measurements() {
        RequestState::Error(err) => {
            assert!(matches!(err, FlowError::Payload(_)));
            assert_eq!(err.message(), "Failed to fetch prediction. Please try again.");
        }
        other => panic!("expected payload error, got {other:?}"),
    }
    server.finish();
}

#[test]
fn resubmission_supersedes_the_previous_outcome() {
    let server = StubServer::start(vec![
        StubResponse::json(500, r#"{"detail":"boom"}"#),
        StubResponse::json(200, r#"{"predicted_label":"maize"}"#),
    ]);
    let mut client = AdvisoryClient::new(test_config(&server.url()));
    fill_valid_form(&mut client);

    assert!(matches!(
        client.submit_measurements(),
        RequestState::Error(FlowError::Transport(_))
    ));

    match client.submit_measurements() {
        RequestState::Success(prediction) => assert_eq!(prediction.predicted_label, "maize"),
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(client.recommended_guide_id(), Some("maize".to_string()));

    let requests = server.finish();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.path == "/predict"));
}
