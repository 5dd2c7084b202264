//! Email notification sinks
//!
//! Every customer-facing email goes through the [`Notifier`] trait.
//! Delivery is best-effort: apart from the primary OTP send, callers
//! log failures and move on.

pub mod emailjs;

pub use emailjs::{EmailJsConfig, EmailJsNotifier};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::Booking;

/// Trait for dispatching customer-facing emails
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a one-time code together with its display-formatted expiry
    async fn send_otp(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), String>;

    /// Acknowledge a newly submitted booking request
    async fn send_booking_submitted(&self, booking: &Booking) -> Result<(), String>;

    /// Tell the requester the booking was approved
    async fn send_booking_approved(&self, booking: &Booking) -> Result<(), String>;

    /// Tell the requester the booking was rejected
    async fn send_booking_rejected(&self, booking: &Booking) -> Result<(), String>;
}

/// Notifier that writes to the log instead of delivering
///
/// Used when no email gateway is configured, and by tests.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_otp(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), String> {
        info!(
            "[email] OTP for {}: {} (expires at {})",
            email,
            code,
            expires_at.format("%H:%M")
        );
        Ok(())
    }

    async fn send_booking_submitted(&self, booking: &Booking) -> Result<(), String> {
        info!(
            "[email] Booking {} submitted for {}",
            booking.id, booking.user_email
        );
        Ok(())
    }

    async fn send_booking_approved(&self, booking: &Booking) -> Result<(), String> {
        info!(
            "[email] Booking {} approved for {}",
            booking.id, booking.user_email
        );
        Ok(())
    }

    async fn send_booking_rejected(&self, booking: &Booking) -> Result<(), String> {
        info!(
            "[email] Booking {} rejected for {}",
            booking.id, booking.user_email
        );
        Ok(())
    }
}
