//! Rental service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ApiError,
    middleware::require_session,
    models::{BookingQuery, BookingStatus, Identity, LoginCredentials, NewAccount, NewBooking},
    state::AppState,
};

/// Request for the self-service OTP issue endpoint
#[derive(Deserialize)]
pub struct OtpSendRequest {
    pub email: String,
}

/// Request for the self-service OTP check endpoint
#[derive(Deserialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub code: String,
}

/// Request for a booking status change
#[derive(Deserialize)]
pub struct StatusChangeRequest {
    pub status: BookingStatus,
    /// Free-text reason, recorded on admin-driven cancellations
    pub reason: Option<String>,
}

/// Request carrying an admin-side verification code
#[derive(Deserialize)]
pub struct CodeSubmitRequest {
    pub code: String,
}

/// Catalog listing filters
#[derive(Deserialize)]
pub struct CarsQuery {
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub city: Option<String>,
}

/// Create the router for the rental service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/cars", get(list_cars))
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/:id", get(get_booking).delete(delete_booking))
        .route("/bookings/:id/status", patch(change_status))
        .route("/bookings/:id/verify-id", post(verify_government_id))
        .route("/bookings/:id/otp/send", post(send_booking_otp))
        .route("/bookings/:id/otp/verify", post(verify_booking_otp))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "rental-service"
    }))
}

/// Register a new account and make it the active session
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.directory.register(&payload).await?;
    let identity = Identity::from(&account);
    state.session.set(&identity).await?;

    Ok((StatusCode::CREATED, Json(identity)))
}

/// Authenticate and make the identity the active session
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginCredentials>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = state.directory.authenticate(&payload).await?;
    state.session.set(&identity).await?;

    Ok(Json(identity))
}

/// Clear the session; succeeds whether or not one was active
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.session.clear().await?;
    Ok(Json(json!({"message": "Logged out successfully"})))
}

/// Current identity, 204 when signed out
pub async fn current_session(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    match state.session.get().await? {
        Some(identity) => Ok(Json(identity).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Proxy the fleet catalog listing
pub async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<CarsQuery>,
) -> impl IntoResponse {
    let cars = state
        .catalog
        .list_vehicles(query.vehicle_type.as_deref(), query.city.as_deref())
        .await;

    Json(cars)
}

/// Issue a self-service OTP
pub async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpSendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.otp.issue(&payload.email).await?;
    Ok(Json(json!({"message": "OTP sent successfully!"})))
}

/// Check a self-service OTP
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpVerifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.otp.verify(&payload.email, &payload.code).await?;
    Ok(Json(json!({"message": "OTP verified successfully!"})))
}

/// Create a booking
///
/// The requester's consumed OTP mark is carried into the record.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<NewBooking>,
) -> Result<impl IntoResponse, ApiError> {
    let email_verified = state.otp.consume_verified(&payload.user_email).await;
    let booking = state.lifecycle.create(&payload, email_verified).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// List bookings: administrators see every record, customers their own
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(mut query): Query<BookingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !identity.is_admin() {
        query.requester = Some(identity.email.clone());
    }

    Ok(Json(state.lifecycle.list(&query).await?))
}

/// Fetch one booking
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state.lifecycle.get(&id).await?;

    // Customers only ever see their own records
    if !identity.is_admin() && booking.user_email != identity.email {
        return Err(ApiError::NotFound);
    }

    Ok(Json(booking))
}

/// Change a booking's status
///
/// Confirmation and rejection are administrator actions; cancellation
/// is open to the requester as well. Self-service cancellations record
/// the fixed reason regardless of payload.
pub async fn change_status(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match payload.status {
        BookingStatus::Confirmed | BookingStatus::Rejected => {
            if !identity.is_admin() {
                return Err(ApiError::Forbidden);
            }
        }
        BookingStatus::Cancelled => {
            if !identity.is_admin() {
                let booking = state.lifecycle.get(&id).await?;
                if booking.user_email != identity.email {
                    return Err(ApiError::Forbidden);
                }
            }
        }
        BookingStatus::Pending => {}
    }

    let reason = if identity.is_admin() {
        payload.reason
    } else {
        None
    };

    let booking = state
        .lifecycle
        .set_status(&id, payload.status, &identity, reason)
        .await?;

    Ok(Json(booking))
}

/// Attest a government ID after manual review
pub async fn verify_government_id(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&identity)?;
    Ok(Json(state.lifecycle.verify_government_id(&id).await?))
}

/// Issue the admin-side verification code for a booking
pub async fn send_booking_otp(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&identity)?;
    state.lifecycle.send_verification_code(&id).await?;
    Ok(Json(json!({"message": "OTP sent successfully!"})))
}

/// Check the admin-side verification code for a booking
pub async fn verify_booking_otp(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<CodeSubmitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&identity)?;
    Ok(Json(
        state.lifecycle.verify_submitted_code(&id, &payload.code).await?,
    ))
}

/// Delete a booking permanently
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&identity)?;
    state.lifecycle.delete(&id).await?;
    Ok(Json(json!({"message": "Booking deleted successfully"})))
}

fn ensure_admin(identity: &Identity) -> Result<(), ApiError> {
    if !identity.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}
