//! Application state shared across handlers

use std::sync::Arc;

use common::storage::Storage;

use crate::catalog::CatalogClient;
use crate::lifecycle::BookingLifecycle;
use crate::notifier::Notifier;
use crate::otp::OtpVerifier;
use crate::repositories::{BookingStore, UserDirectory};
use crate::session::SessionHolder;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub directory: UserDirectory,
    pub session: SessionHolder,
    pub otp: OtpVerifier,
    pub lifecycle: BookingLifecycle,
    pub catalog: CatalogClient,
}

impl AppState {
    /// Wire the shared components over one storage profile
    pub fn new(storage: Arc<Storage>, notifier: Arc<dyn Notifier>, catalog: CatalogClient) -> Self {
        let directory = UserDirectory::new(storage.clone());
        let session = SessionHolder::new(storage.clone());
        let otp = OtpVerifier::new(notifier.clone());
        let lifecycle = BookingLifecycle::new(BookingStore::new(storage.clone()), notifier);

        AppState {
            storage,
            directory,
            session,
            otp,
            lifecycle,
            catalog,
        }
    }
}
