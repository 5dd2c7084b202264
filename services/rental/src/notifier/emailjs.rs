//! EmailJS-compatible delivery gateway

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::Notifier;
use crate::models::Booking;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    /// Send endpoint of the gateway
    pub endpoint: String,
    pub service_id: String,
    pub user_id: String,
    pub otp_template_id: String,
    pub booking_template_id: String,
    pub approval_template_id: String,
}

impl EmailJsConfig {
    /// Create a new EmailJsConfig from environment variables, when the
    /// gateway is configured at all
    ///
    /// # Environment Variables
    /// - `EMAILJS_SERVICE_ID`, `EMAILJS_USER_ID`: gateway credentials (both required)
    /// - `EMAILJS_ENDPOINT`: send endpoint (default: the EmailJS REST API)
    /// - `EMAILJS_OTP_TEMPLATE_ID`: OTP template
    /// - `EMAILJS_BOOKING_TEMPLATE_ID`: submission-acknowledgement template
    /// - `EMAILJS_APPROVAL_TEMPLATE_ID`: outcome template
    pub fn from_env() -> Option<Self> {
        let service_id = std::env::var("EMAILJS_SERVICE_ID").ok()?;
        let user_id = std::env::var("EMAILJS_USER_ID").ok()?;

        Some(EmailJsConfig {
            endpoint: std::env::var("EMAILJS_ENDPOINT")
                .unwrap_or_else(|_| "https://api.emailjs.com/api/v1.0/email/send".to_string()),
            service_id,
            user_id,
            otp_template_id: std::env::var("EMAILJS_OTP_TEMPLATE_ID")
                .unwrap_or_else(|_| "template_otp".to_string()),
            booking_template_id: std::env::var("EMAILJS_BOOKING_TEMPLATE_ID")
                .unwrap_or_else(|_| "template_booking_confirmation".to_string()),
            approval_template_id: std::env::var("EMAILJS_APPROVAL_TEMPLATE_ID")
                .unwrap_or_else(|_| "template_booking_outcome".to_string()),
        })
    }
}

/// Notifier delivering through an EmailJS-compatible HTTP gateway
pub struct EmailJsNotifier {
    client: reqwest::Client,
    config: EmailJsConfig,
}

impl EmailJsNotifier {
    /// Create a new notifier for a configured gateway
    pub fn new(config: EmailJsConfig) -> Self {
        EmailJsNotifier {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// POST one templated send; a 2xx response is the only success signal
    async fn dispatch(&self, template_id: &str, params: serde_json::Value) -> Result<(), String> {
        let body = json!({
            "service_id": self.config.service_id,
            "template_id": template_id,
            "user_id": self.config.user_id,
            "template_params": params,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| err.to_string())?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("gateway returned {}", response.status()))
        }
    }
}

fn format_local(time: DateTime<Utc>) -> String {
    time.format("%d/%m/%Y, %H:%M").to_string()
}

/// Pickup instructions included in the approval email
fn guidelines(booking: &Booking) -> String {
    format!(
        "1. Please arrive at the pickup location 15 minutes before your scheduled time.\n\
         2. Bring the following documents:\n\
         \x20  - Original Government ID ({})\n\
         \x20  - Valid Driving License\n\
         \x20  - Credit Card for security deposit\n\
         3. The car will be inspected before and after your rental period.\n\
         4. Please ensure the car is returned with the same fuel level as at pickup.\n\
         5. Any damages or violations will be charged to your account.\n\
         6. For any emergencies, call our 24/7 support: +91-XXXXXXXXXX",
        booking.govt_id_type.label()
    )
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    async fn send_otp(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), String> {
        let expiry_display = expires_at.format("%H:%M").to_string();
        let params = json!({
            "to_email": email,
            "user_email": email,
            "email": email,
            "message": format!("Your OTP is {}. It will expire at {}", code, expiry_display),
            "otp": code,
            "passcode": code,
            "time": expiry_display,
            "from_name": "CarRental",
            "reply_to": email,
        });

        self.dispatch(&self.config.otp_template_id, params).await
    }

    async fn send_booking_submitted(&self, booking: &Booking) -> Result<(), String> {
        let params = json!({
            "to_email": booking.user_email,
            "user_name": booking.user_name,
            "car_name": booking.car_name,
            "start_time": format_local(booking.start_time),
            "end_time": format_local(booking.end_time),
            "total_price": booking.total_price,
            "booking_id": booking.id,
        });

        self.dispatch(&self.config.booking_template_id, params).await
    }

    async fn send_booking_approved(&self, booking: &Booking) -> Result<(), String> {
        let params = json!({
            "to_email": booking.user_email,
            "user_email": booking.user_email,
            "email": booking.user_email,
            "user_name": booking.user_name,
            "car_name": booking.car_name,
            "pickup_location": format!("{}, {}", booking.location, booking.city),
            "pickup_time": format_local(booking.start_time),
            "return_time": format_local(booking.end_time),
            "total_price": booking.total_price,
            "booking_id": booking.id,
            "status": "confirmed",
            "guidelines": guidelines(booking),
        });

        self.dispatch(&self.config.approval_template_id, params).await
    }

    async fn send_booking_rejected(&self, booking: &Booking) -> Result<(), String> {
        // Rejections reuse the outcome template with the status field set
        let params = json!({
            "to_email": booking.user_email,
            "user_email": booking.user_email,
            "email": booking.user_email,
            "user_name": booking.user_name,
            "car_name": booking.car_name,
            "total_price": booking.total_price,
            "booking_id": booking.id,
            "status": "rejected",
        });

        self.dispatch(&self.config.approval_template_id, params).await
    }
}
