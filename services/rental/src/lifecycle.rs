//! Booking lifecycle: creation, status transitions and verification gates
//!
//! The status machine is deliberately small. A pending request is either
//! confirmed or rejected; only a confirmed booking can be cancelled;
//! rejected and cancelled are terminal. Confirmation is gated on both
//! verification flags.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Booking, BookingQuery, BookingStatus, Identity, NewBooking};
use crate::notifier::Notifier;
use crate::otp::generate_code;
use crate::repositories::BookingStore;

/// Reason recorded for a self-service cancellation
const USER_CANCELLED_REASON: &str = "Cancelled by user";

/// Check a status change against the allowed transition set
fn transition_allowed(from: BookingStatus, to: BookingStatus) -> bool {
    matches!(
        (from, to),
        (BookingStatus::Pending, BookingStatus::Confirmed)
            | (BookingStatus::Pending, BookingStatus::Rejected)
            | (BookingStatus::Confirmed, BookingStatus::Cancelled)
    )
}

/// Whole hours in the window, rounded up, times the hourly rate
fn total_price(request: &NewBooking) -> u64 {
    let seconds = request
        .end_time
        .signed_duration_since(request.start_time)
        .num_seconds()
        .max(0) as u64;
    seconds.div_ceil(3600) * request.price_per_hour
}

/// Outcome emails dispatched after a state change
enum Outcome {
    Submitted,
    Approved,
    Rejected,
}

/// Booking lifecycle service
#[derive(Clone)]
pub struct BookingLifecycle {
    store: BookingStore,
    notifier: Arc<dyn Notifier>,
}

impl BookingLifecycle {
    /// Create a new lifecycle service over a booking store
    pub fn new(store: BookingStore, notifier: Arc<dyn Notifier>) -> Self {
        BookingLifecycle { store, notifier }
    }

    /// Create a new pending booking
    ///
    /// `email_verified` carries the requester's consumed OTP state into
    /// the record; government-ID verification always starts unset.
    pub async fn create(&self, request: &NewBooking, email_verified: bool) -> ApiResult<Booking> {
        if request.end_time <= request.start_time {
            return Err(ApiError::InvalidWindow);
        }

        let now = Utc::now();
        let booking = Booking {
            id: format!("booking-{}", Uuid::new_v4()),
            user_name: request.user_name.clone(),
            user_email: request.user_email.clone(),
            user_phone: request.user_phone.clone(),
            car_id: request.car_id,
            car_name: request.car_name.clone(),
            car_image: request.car_image.clone(),
            car_type: request.car_type.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
            total_price: total_price(request),
            status: BookingStatus::Pending,
            govt_id_type: request.govt_id_type,
            govt_id_number: request.govt_id_number.clone(),
            govt_id_image: request.govt_id_image.clone(),
            address: request.address.clone(),
            city: request.city.clone(),
            location: request.location.clone(),
            created_at: now,
            updated_at: now,
            otp_verified: email_verified,
            govt_id_verified: false,
            otp: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
        };

        self.store.insert(&booking).await?;
        info!("Booking {} created for {}", booking.id, booking.user_email);

        self.notify(booking.clone(), Outcome::Submitted);
        Ok(booking)
    }

    /// Transition a booking to a new status
    ///
    /// Confirmation requires both verification flags. A cancellation
    /// records the acting identity, a reason (the fixed self-service
    /// string unless the caller supplied one) and the moment it
    /// happened. The outcome email never blocks or rolls back the
    /// transition.
    pub async fn set_status(
        &self,
        id: &str,
        new_status: BookingStatus,
        actor: &Identity,
        reason: Option<String>,
    ) -> ApiResult<Booking> {
        let actor_email = actor.email.clone();
        let updated = self
            .store
            .update_with(id, move |booking| {
                if !transition_allowed(booking.status, new_status) {
                    return Err(ApiError::IllegalTransition {
                        from: booking.status,
                        to: new_status,
                    });
                }

                if new_status == BookingStatus::Confirmed
                    && !(booking.otp_verified && booking.govt_id_verified)
                {
                    return Err(ApiError::VerificationIncomplete);
                }

                let now = Utc::now();
                booking.status = new_status;
                booking.updated_at = now;

                if new_status == BookingStatus::Cancelled {
                    booking.cancelled_at = Some(now);
                    booking.cancelled_by = Some(actor_email);
                    booking.cancellation_reason =
                        Some(reason.unwrap_or_else(|| USER_CANCELLED_REASON.to_string()));
                }

                Ok(())
            })
            .await?;

        info!("Booking {} is now {} (by {})", id, new_status, actor.email);

        match new_status {
            BookingStatus::Confirmed => self.notify(updated.clone(), Outcome::Approved),
            BookingStatus::Rejected => self.notify(updated.clone(), Outcome::Rejected),
            _ => {}
        }

        Ok(updated)
    }

    /// Record the manual government-ID attestation
    ///
    /// No document check happens here; an administrator has looked at
    /// the uploaded image and vouches for it.
    pub async fn verify_government_id(&self, id: &str) -> ApiResult<Booking> {
        let updated = self
            .store
            .update_with(id, |booking| {
                booking.govt_id_verified = true;
                booking.updated_at = Utc::now();
                Ok(())
            })
            .await?;

        info!("Government ID attested for {}", id);
        Ok(updated)
    }

    /// Issue the admin-side verification code for a booking
    ///
    /// The code is dispatched to the requester and attached to the
    /// record. It carries no expiry; a resend overwrites it.
    pub async fn send_verification_code(&self, id: &str) -> ApiResult<()> {
        let booking = self.store.get(id).await?;
        let code = generate_code();

        // Expiry shown in the email is display-only
        self.notifier
            .send_otp(&booking.user_email, &code, Utc::now() + Duration::minutes(15))
            .await
            .map_err(|err| {
                error!("Failed to send OTP for {}: {}", id, err);
                ApiError::OtpDelivery
            })?;

        self.store
            .update_with(id, move |booking| {
                booking.otp = Some(code);
                booking.updated_at = Utc::now();
                Ok(())
            })
            .await?;

        info!("Verification code issued for booking {}", id);
        Ok(())
    }

    /// Validate the admin-side code and flip the email flag
    pub async fn verify_submitted_code(&self, id: &str, submitted: &str) -> ApiResult<Booking> {
        let submitted = submitted.to_string();
        let updated = self
            .store
            .update_with(id, move |booking| match booking.otp.as_deref() {
                None => Err(ApiError::NoActiveChallenge),
                Some(code) if code != submitted => Err(ApiError::InvalidCode),
                Some(_) => {
                    booking.otp = None;
                    booking.otp_verified = true;
                    booking.updated_at = Utc::now();
                    Ok(())
                }
            })
            .await?;

        info!("Email ownership verified for booking {}", id);
        Ok(updated)
    }

    /// Delete a booking permanently
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.store.delete(id).await?;
        info!("Booking {} deleted", id);
        Ok(())
    }

    /// Fetch one booking
    pub async fn get(&self, id: &str) -> ApiResult<Booking> {
        self.store.get(id).await
    }

    /// List bookings matching a filter, newest first
    pub async fn list(&self, query: &BookingQuery) -> ApiResult<Vec<Booking>> {
        self.store.list(query).await
    }

    /// Dispatch an outcome email without awaiting delivery
    fn notify(&self, booking: Booking, outcome: Outcome) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            let (label, result) = match outcome {
                Outcome::Submitted => (
                    "submission",
                    notifier.send_booking_submitted(&booking).await,
                ),
                Outcome::Approved => ("approval", notifier.send_booking_approved(&booking).await),
                Outcome::Rejected => ("rejection", notifier.send_booking_rejected(&booking).await),
            };

            if let Err(err) = result {
                error!("Failed to send {} email for {}: {}", label, booking.id, err);
            }
        });
    }
}
