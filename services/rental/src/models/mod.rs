//! Rental service models

pub mod account;
pub mod booking;
pub mod vehicle;

// Re-export for convenience
pub use account::{Account, Identity, LoginCredentials, NewAccount, Role};
pub use booking::{Booking, BookingQuery, BookingStatus, GovtIdType, NewBooking};
pub use vehicle::{Vehicle, VehicleSpecs};
