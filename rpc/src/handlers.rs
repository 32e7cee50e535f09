//! Route handlers for the verified-email API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use foyer_mediator::{ContactMediator, ContactRequest, MediatorError, MemberDirectory};
use foyer_types::{Actor, EmailAddress, EmailHash, MemberId};
use foyer_verification::{VerificationEngine, VerificationError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{AuthorizationPolicy, RequestIdentity};
use crate::error::ApiError;
use crate::params::ListParams;
use crate::projection::EntryView;

/// Shared collaborators, one set per server.
pub struct AppState {
    pub engine: Arc<VerificationEngine>,
    pub mediator: Arc<ContactMediator>,
    pub directory: Arc<dyn MemberDirectory>,
    pub policy: Arc<dyn AuthorizationPolicy>,
}

/// GET /email — filtered, paginated listing for moderators.
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let who = RequestIdentity::from_headers(&headers);
    state.policy.can_list(&who).into_result()?;

    let query = params.to_query();
    let page = state.engine.store().query(&query)?;
    let total_pages = page.total_pages(query.effective_per_page());
    let views: Vec<EntryView> = page.entries.iter().map(EntryView::from_entry).collect();

    Ok((
        [
            ("x-total", page.total.to_string()),
            ("x-total-pages", total_pages.to_string()),
        ],
        Json(views),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub email: String,
    /// Name of the visitor asking for verification.
    #[serde(default)]
    pub name: String,
    /// The member the visitor wants to reach once verified.
    pub member_id: u64,
}

/// POST /email — submit an address and dispatch its confirmation code.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<EntryView>), ApiError> {
    let who = RequestIdentity::from_headers(&headers);
    state.policy.can_create(&who).into_result()?;

    let member_id = MemberId::new(body.member_id);
    let member = state
        .directory
        .find(member_id)
        .ok_or(ApiError::UnknownMember(member_id))?;

    let submitted = state.engine.submit(&body.email)?;
    state
        .mediator
        .send_verification_code(&submitted, &body.name, &member)
        .map_err(|err| match err {
            // The entry is persisted at this point; the caller can retry
            // delivery without resubmitting.
            MediatorError::DeliveryFailed(_) => ApiError::CodeDeliveryFailed,
            other => ApiError::Mediator(other),
        })?;

    info!(entry_id = submitted.entry.id, member = %member_id, "verification requested");
    Ok((
        StatusCode::CREATED,
        Json(EntryView::from_entry(&submitted.entry)),
    ))
}

/// GET /email/check/{email} — status probe; an unknown address yields the
/// empty projection, never 404.
pub async fn check_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<EntryView>, ApiError> {
    let who = RequestIdentity::from_headers(&headers);
    state.policy.can_check(&who).into_result()?;

    let entry = state.engine.store().find_by_hash(&EmailHash::of_raw(&email))?;
    Ok(Json(
        entry
            .map(|e| EntryView::from_entry(&e))
            .unwrap_or_else(EntryView::empty),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ValidateBody {
    pub code: String,
}

/// PUT /email/validate/{email} — confirm an address with its code.
pub async fn validate_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(email): Path<String>,
    Json(body): Json<ValidateBody>,
) -> Result<Json<EntryView>, ApiError> {
    let who = RequestIdentity::from_headers(&headers);
    state.policy.can_validate(&who).into_result()?;

    let entry = state.engine.validate(&email, &body.code)?;
    Ok(Json(EntryView::from_entry(&entry)))
}

#[derive(Debug, Deserialize)]
pub struct SendBody {
    pub message: String,
    /// Authenticated member id; absent or zero means an anonymous visitor.
    #[serde(default)]
    pub current_user: Option<u64>,
    /// Optional custom situation key, visitor path only.
    #[serde(default)]
    pub situation: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub sent: bool,
    #[serde(rename = "verifiedEmail")]
    pub verified_email: EntryView,
}

/// POST /email/send/{member_id} — run one contact attempt.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(member_id): Path<u64>,
    Json(body): Json<SendBody>,
) -> Result<Json<SendResponse>, ApiError> {
    let who = RequestIdentity::from_headers(&headers);
    state.policy.can_send(&who).into_result()?;

    let visitor_email = match body.email.as_deref() {
        Some(raw) => Some(
            EmailAddress::parse(raw)
                .map_err(|e| VerificationError::InvalidInput(e.to_string()))?,
        ),
        None => None,
    };
    let request = ContactRequest {
        actor: Actor::from_wire(body.current_user),
        target: MemberId::new(member_id),
        message: body.message,
        visitor_name: body.name,
        visitor_email,
        situation: body.situation,
    };
    let outcome = state.mediator.deliver(&request)?;

    Ok(Json(SendResponse {
        sent: outcome.sent,
        verified_email: outcome
            .entry
            .as_ref()
            .map(EntryView::from_entry)
            .unwrap_or_else(EntryView::empty),
    }))
}

/// PUT /email/{id}/spam — moderation veto.
pub async fn mark_spam(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<EntryView>, ApiError> {
    set_spam_flag(&state, &headers, id, true).await
}

/// PUT /email/{id}/unspam — lift the veto.
pub async fn unmark_spam(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<EntryView>, ApiError> {
    set_spam_flag(&state, &headers, id, false).await
}

async fn set_spam_flag(
    state: &AppState,
    headers: &HeaderMap,
    id: u64,
    spam: bool,
) -> Result<Json<EntryView>, ApiError> {
    let who = RequestIdentity::from_headers(headers);
    state.policy.can_moderate(&who).into_result()?;

    state.engine.set_spam(id, spam)?;
    let entry = state
        .engine
        .store()
        .find_by_id(id)?
        .ok_or_else(|| foyer_store::StoreError::NotFound(format!("entry {id}")))?;
    Ok(Json(EntryView::from_entry(&entry)))
}

/// DELETE /email/{id} — entries are never deleted; the spam flag is the
/// moderation tool.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(_id): Path<u64>,
) -> Result<Json<EntryView>, ApiError> {
    let who = RequestIdentity::from_headers(&headers);
    state.policy.can_delete(&who).into_result()?;

    Err(ApiError::NotSupported(
        "verified email entries cannot be deleted; use the spam flag",
    ))
}
