//! Booking records and status machine types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking approval state
///
/// A closed set; every transition between states goes through the
/// lifecycle's gating function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Government ID document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovtIdType {
    Aadhar,
    Dl,
    Passport,
    Voter,
    Pan,
}

impl GovtIdType {
    /// Human-readable document name used in customer-facing text
    pub fn label(&self) -> &'static str {
        match self {
            GovtIdType::Aadhar => "Aadhaar Card",
            GovtIdType::Dl => "Driving License",
            GovtIdType::Passport => "Passport",
            GovtIdType::Voter => "Voter ID",
            GovtIdType::Pan => "PAN Card",
        }
    }
}

/// Booking entity
///
/// Owned exclusively by the booking store; surfaces hold copies and
/// submit mutations back through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub car_id: u64,
    pub car_name: String,
    pub car_image: String,
    pub car_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Derived from the time window and hourly rate, never set directly
    pub total_price: u64,
    pub status: BookingStatus,
    pub govt_id_type: GovtIdType,
    pub govt_id_number: String,
    /// Uploaded document as a data URL
    pub govt_id_image: String,
    pub address: String,
    pub city: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub otp_verified: bool,
    pub govt_id_verified: bool,
    /// One-time code attached during admin-side email verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

/// New booking request payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub car_id: u64,
    pub car_name: String,
    pub car_image: String,
    pub car_type: String,
    /// Hourly rate from the catalog listing the request was made from
    pub price_per_hour: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub govt_id_type: GovtIdType,
    pub govt_id_number: String,
    pub govt_id_image: String,
    pub address: String,
    pub city: String,
    pub location: String,
}

/// Listing filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    /// Restrict to bookings created by this requester; set from the
    /// session, never from the query string
    #[serde(skip)]
    pub requester: Option<String>,
}
