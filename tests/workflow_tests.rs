//! Tests for the delivery status dialogs
//!
//! Each dialog validates locally, then submits through the endpoint that
//! matches the signed-in role.

use std::sync::Arc;

use dlvery::config::ClientConfig;
use dlvery::error::ClientError;
use dlvery::forms::{CompleteDeliveryForm, DamageReportForm, DoorLockForm};
use dlvery::models::{Delivery, DeliveryStatus, LoginResponse, Role, StatusUpdate};
use dlvery::session::SessionManager;
use dlvery::signature::Signature;
use dlvery::workflow::DeliveryWorkflow;
use dlvery::Services;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn services(api_url: &str, role: Option<Role>) -> Services {
    let cfg = ClientConfig {
        api_url: api_url.to_string(),
        timeout_ms: 2_000,
        retry_attempts: 1,
        retry_delay_ms: 10,
        session_file: None,
    };
    let session = Arc::new(SessionManager::in_memory());
    if let Some(role) = role {
        session
            .establish(&LoginResponse {
                id: "u-3".to_string(),
                username: "suresh".to_string(),
                email: "suresh@dlvery.io".to_string(),
                full_name: "Suresh Kumar".to_string(),
                role,
                token: "tok".to_string(),
                token_type: "Bearer".to_string(),
            })
            .unwrap();
    }
    Services::new(&cfg, session).unwrap()
}

fn delivery_json(status: &str) -> Value {
    json!({
        "id": "d-42",
        "deliveryAgentId": "u-3",
        "customerName": "Rajesh Patel",
        "customerAddress": "12 MG Road, Bengaluru",
        "status": status,
        "priority": "HIGH",
        "scheduledDate": "2024-01-20",
        "items": [
            {"sku": "FOOD-001", "productName": "Rice 5kg", "quantity": 4},
            {"sku": "ELEC-002", "productName": "Kettle", "quantity": 1}
        ]
    })
}

fn delivery() -> Delivery {
    serde_json::from_value(delivery_json("IN_TRANSIT")).unwrap()
}

async fn mount_status(server: &MockServer, route: &str, reply_status: &str) {
    Mock::given(method("PUT"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Delivery status updated",
            "data": delivery_json(reply_status)
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn sent_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn test_complete_as_agent_uses_dlteam_path() {
    let server = MockServer::start().await;
    mount_status(&server, "/dlteam/deliveries/d-42/status", "DELIVERED").await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    let form = CompleteDeliveryForm::new("Rajesh Patel", Signature::from_png(PNG.to_vec()).unwrap())
        .with_notes(" handed over ");
    let updated = DeliveryWorkflow::new(&services.deliveries)
        .complete(&delivery(), &form)
        .await
        .unwrap();
    assert_eq!(updated.status, DeliveryStatus::Delivered);

    let body = sent_body(&server).await;
    assert_eq!(body["status"], "DELIVERED");
    assert_eq!(body["customerName"], "Rajesh Patel");
    assert_eq!(body["notes"], "handed over");
    assert_eq!(body["customerSignature"], "data:image/png;base64,iVBORw0KGgo=");
    assert!(body["deliveredAt"].is_string());
}

#[tokio::test]
async fn test_door_lock_as_staff_uses_invteam_path() {
    let server = MockServer::start().await;
    mount_status(&server, "/invteam/deliveries/d-42/status", "DOOR_LOCK").await;

    let services = services(&server.uri(), Some(Role::InvTeam));
    let updated = DeliveryWorkflow::new(&services.deliveries)
        .door_lock(&delivery(), &DoorLockForm::new("Gate locked, no answer"))
        .await
        .unwrap();
    assert_eq!(updated.status, DeliveryStatus::DoorLock);

    let body = sent_body(&server).await;
    assert_eq!(body["status"], "DOOR_LOCK");
    assert_eq!(body["notes"], "Gate locked, no answer");
    assert!(body["attemptedAt"].is_string());
}

#[tokio::test]
async fn test_damage_report_sends_item_flags() {
    let server = MockServer::start().await;
    mount_status(&server, "/dlteam/deliveries/d-42/status", "DAMAGED").await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    let delivery = delivery();
    let mut form = DamageReportForm::for_delivery(&delivery).with_notes("Carton wet");
    form.mark_damaged("FOOD-001", true);
    form.set_damaged_quantity("FOOD-001", 2);

    DeliveryWorkflow::new(&services.deliveries)
        .damage_report(&delivery, &form)
        .await
        .unwrap();

    let body = sent_body(&server).await;
    assert_eq!(body["status"], "DAMAGED");
    assert_eq!(body["items"][0]["damaged"], true);
    assert_eq!(body["items"][0]["damagedQuantity"], 2);
    assert_eq!(body["items"][1]["damaged"], false);
    assert_eq!(body["items"][1]["damagedQuantity"], 0);
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    let workflow = DeliveryWorkflow::new(&services.deliveries);
    let delivery = delivery();

    let err = workflow
        .complete(&delivery, &CompleteDeliveryForm::new("Rajesh", Signature::empty()))
        .await
        .unwrap_err();
    match err {
        ClientError::Form(errors) => {
            assert_eq!(errors.get("customerSignature"), Some("Customer signature is required"))
        }
        other => panic!("expected Form error, got {:?}", other),
    }

    let err = workflow
        .damage_report(&delivery, &DamageReportForm::for_delivery(&delivery).with_notes("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Form(_)));
}

#[tokio::test]
async fn test_any_status_label_is_submitted() {
    let server = MockServer::start().await;
    mount_status(&server, "/dlteam/deliveries/d-42/status", "PENDING").await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    let delivered: Delivery = serde_json::from_value(delivery_json("DELIVERED")).unwrap();
    let update = StatusUpdate::new(DeliveryStatus::Pending);
    let updated = services
        .deliveries
        .update_status(&delivered.id, &update)
        .await
        .unwrap();
    assert_eq!(updated.status, DeliveryStatus::Pending);
    assert_eq!(sent_body(&server).await, json!({"status": "PENDING"}));
}

#[tokio::test]
async fn test_role_aware_call_needs_a_user() {
    let server = MockServer::start().await;
    let services = services(&server.uri(), None);
    let err = services.deliveries.get("d-42").await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_door_lock_endpoint_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/dlteam/deliveries/d-42/door-lock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": delivery_json("DOOR_LOCK")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    services.deliveries.mark_door_lock("d-42", "No one home").await.unwrap();
    assert_eq!(sent_body(&server).await, json!({"notes": "No one home"}));
}

#[tokio::test]
async fn test_complete_endpoint_body() {
    let server = MockServer::start().await;
    mount_status(&server, "/dlteam/deliveries/d-42/complete", "DELIVERED").await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    let form = CompleteDeliveryForm::new(" Rajesh Patel ", Signature::from_png(PNG.to_vec()).unwrap())
        .with_notes("Left with security");
    let updated = services
        .deliveries
        .complete("d-42", &form.completion_request())
        .await
        .unwrap();
    assert_eq!(updated.status, DeliveryStatus::Delivered);
    assert_eq!(
        sent_body(&server).await,
        json!({
            "customerName": "Rajesh Patel",
            "customerSignature": "data:image/png;base64,iVBORw0KGgo=",
            "notes": "Left with security"
        })
    );
}

#[tokio::test]
async fn test_report_damage_forces_damaged() {
    let server = MockServer::start().await;
    mount_status(&server, "/dlteam/deliveries/d-42/status", "DAMAGED").await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    let updated = services
        .deliveries
        .report_damage("d-42", StatusUpdate::new(DeliveryStatus::Returned))
        .await
        .unwrap();
    assert_eq!(updated.status, DeliveryStatus::Damaged);
    assert_eq!(sent_body(&server).await, json!({"status": "DAMAGED"}));
}

#[tokio::test]
async fn test_return_delivery_forces_returned() {
    let server = MockServer::start().await;
    mount_status(&server, "/dlteam/deliveries/d-42/status", "RETURNED").await;

    let services = services(&server.uri(), Some(Role::DlTeam));
    let update = StatusUpdate::new(DeliveryStatus::Damaged).with_notes("Customer refused");
    services.deliveries.return_delivery("d-42", update).await.unwrap();
    assert_eq!(
        sent_body(&server).await,
        json!({"status": "RETURNED", "notes": "Customer refused"})
    );
}
