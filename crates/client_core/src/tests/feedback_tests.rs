use super::*;

use shared::error::ServiceErrorBody;

fn status(code: StatusCode, body: Option<ServiceErrorBody>) -> ClientError {
    ClientError::Status { status: code, body }
}

fn body(json: &str) -> Option<ServiceErrorBody> {
    Some(serde_json::from_str(json).expect("error body"))
}

#[test]
fn create_bad_request_uses_server_message() {
    let feedback = failure_feedback(
        Operation::Create,
        &status(StatusCode::BAD_REQUEST, body(r#"{"message":"name too long"}"#)),
    );
    assert_eq!(feedback.message, "name too long");
    assert_eq!(feedback.level, NotificationLevel::Error);
    assert_eq!(feedback.duration, LONG_DURATION);

    let feedback = failure_feedback(Operation::Create, &status(StatusCode::BAD_REQUEST, None));
    assert_eq!(feedback.message, "Bad request");
}

#[test]
fn unprocessable_prefers_field_errors_then_enum_then_message() {
    let err = status(
        StatusCode::UNPROCESSABLE_ENTITY,
        body(r#"{"errors":{"coordinates.y":"must be <= 626"},"error":"INVALID_ENUM_VALUE"}"#),
    );
    assert_eq!(
        failure_feedback(Operation::Create, &err).message,
        "coordinates.y: must be <= 626"
    );

    let err = status(
        StatusCode::UNPROCESSABLE_ENTITY,
        body(r#"{"error":"INVALID_ENUM_VALUE","message":"bad enum"}"#),
    );
    assert_eq!(
        failure_feedback(Operation::Update, &err).message,
        "Invalid enum value. Check the selected options."
    );

    let err = status(StatusCode::UNPROCESSABLE_ENTITY, None);
    assert_eq!(failure_feedback(Operation::Update, &err).message, "Validation error");
}

#[test]
fn not_found_maps_per_operation() {
    let err = status(StatusCode::NOT_FOUND, None);

    let delete = failure_feedback(Operation::Delete, &err);
    assert_eq!(delete.message, "Person not found");
    assert_eq!(delete.level, NotificationLevel::Warning);

    let update = failure_feedback(Operation::Update, &err);
    assert_eq!(update.message, "Person not found");
    assert_eq!(update.level, NotificationLevel::Error);

    let by_color = failure_feedback(Operation::DeleteByHairColor(Color::Orange), &err);
    assert_eq!(by_color.message, "No Person with hair color ORANGE found");
    assert_eq!(by_color.level, NotificationLevel::Warning);

    let max_name = failure_feedback(Operation::MaxName, &err);
    assert_eq!(max_name.message, "No Person in the database");
}

#[test]
fn unexpected_status_is_generic() {
    let err = status(StatusCode::INTERNAL_SERVER_ERROR, None);
    assert_eq!(failure_feedback(Operation::Create, &err).message, "Unexpected error");
    assert_eq!(failure_feedback(Operation::Delete, &err).message, "Failed to delete Person");
    assert_eq!(
        failure_feedback(Operation::Demography, &err).message,
        "Failed to fetch statistics"
    );
}

async fn transport_error() -> ClientError {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    reqwest::get(format!("http://{addr}/persons"))
        .await
        .expect_err("nothing listening")
        .into()
}

#[tokio::test]
async fn connectivity_failures_do_not_mention_status() {
    let err = transport_error().await;
    assert!(err.is_connectivity());
    assert_eq!(
        failure_feedback(Operation::Create, &err).message,
        "Could not connect to the server"
    );
    assert_eq!(
        failure_feedback(Operation::MaxName, &err).message,
        "Connection to the server failed"
    );
    assert_eq!(failure_feedback(Operation::Load, &err).message, "Failed to load data");
}

#[tokio::test]
async fn report_failure_publishes_one_notification() {
    let notifier = Notifier::new();
    let mut rx = notifier.subscribe();

    let id = report_failure(&notifier, Operation::Delete, &status(StatusCode::NOT_FOUND, None));

    let notification = rx.recv().await.expect("notification");
    assert_eq!(notification.id, id);
    assert_eq!(notification.message, "Person not found");
    assert!(rx.try_recv().is_err());
}
