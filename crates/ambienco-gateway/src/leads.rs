//! Contact form and product inquiries. Submitting is public; reading the
//! submissions and moving them through `new`, `contacted` and `closed` is
//! admin-only.

use crate::error::{ok, ApiResult};
use crate::middleware::AdminSession;
use crate::records::{
    Contact, NewContact, NewInquiry, ProductInquiry, StatusUpdate, CONTACT_PREFIX,
    INQUIRY_PREFIX,
};
use crate::server::AppState;
use ambienco_core::AmbiencoError;
use ambienco_store::KvStoreExt;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn submit_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewContact>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(body) = payload?;
    let contact = body.into_contact(&state.sanitizer)?;
    state.store.set_as(&Contact::key(&contact.id), &contact).await?;
    info!(contact_id = %contact.id, subject = %contact.subject, "Contact form submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Thank you for contacting us. We will get back to you shortly.",
            "data": {"contact_id": contact.id},
        })),
    ))
}

pub(crate) async fn submit_inquiry(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewInquiry>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(body) = payload?;
    let inquiry = body.into_inquiry(&state.sanitizer)?;
    state
        .store
        .set_as(&ProductInquiry::key(&inquiry.id), &inquiry)
        .await?;
    info!(inquiry_id = %inquiry.id, "Product inquiry submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Inquiry received. Our team will contact you with details.",
            "data": {"inquiry_id": inquiry.id},
        })),
    ))
}

pub(crate) async fn list_contacts(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut contacts: Vec<Contact> = state.store.get_by_prefix_as(CONTACT_PREFIX).await?;
    contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ok(contacts)
}

pub(crate) async fn list_inquiries(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut inquiries: Vec<ProductInquiry> = state.store.get_by_prefix_as(INQUIRY_PREFIX).await?;
    inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ok(inquiries)
}

/// `PUT /contacts/{id}/status`.
pub(crate) async fn update_contact_status(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(body) = payload?;
    let contact: Contact = state
        .store
        .update_as(&Contact::key(&id), |current: Option<Contact>| {
            let mut contact =
                current.ok_or_else(|| AmbiencoError::NotFound("Contact not found".to_string()))?;
            contact.status = body.status;
            Ok(contact)
        })
        .await?;
    info!(contact_id = %id, status = ?contact.status, "Contact status changed");
    ok(contact)
}

/// `PUT /inquiries/{id}/status`.
pub(crate) async fn update_inquiry_status(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(body) = payload?;
    let inquiry: ProductInquiry = state
        .store
        .update_as(&ProductInquiry::key(&id), |current: Option<ProductInquiry>| {
            let mut inquiry =
                current.ok_or_else(|| AmbiencoError::NotFound("Inquiry not found".to_string()))?;
            inquiry.status = body.status;
            Ok(inquiry)
        })
        .await?;
    info!(inquiry_id = %id, status = ?inquiry.status, "Inquiry status changed");
    ok(inquiry)
}
