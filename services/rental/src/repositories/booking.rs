//! Booking store over the persisted profile
//!
//! Records live as one JSON sequence under the `bookings` key. Every
//! operation re-reads the sequence and writes it back whole; the last
//! writer wins and there is no per-record version token.

use std::sync::Arc;

use common::storage::Storage;
use crate::error::{ApiError, ApiResult};
use crate::models::{Booking, BookingQuery};

const BOOKINGS_KEY: &str = "bookings";

/// Booking store
#[derive(Clone)]
pub struct BookingStore {
    storage: Arc<Storage>,
}

impl BookingStore {
    /// Create a new booking store over a storage profile
    pub fn new(storage: Arc<Storage>) -> Self {
        BookingStore { storage }
    }

    /// Load the full persisted sequence
    pub async fn load_all(&self) -> ApiResult<Vec<Booking>> {
        match self.storage.get(BOOKINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn store_all(&self, bookings: &[Booking]) -> ApiResult<()> {
        self.storage
            .set(BOOKINGS_KEY, &serde_json::to_string(bookings)?)
            .await?;
        Ok(())
    }

    /// Append a new record
    pub async fn insert(&self, booking: &Booking) -> ApiResult<()> {
        let mut bookings = self.load_all().await?;
        bookings.push(booking.clone());
        self.store_all(&bookings).await
    }

    /// Fetch one record by id
    pub async fn get(&self, id: &str) -> ApiResult<Booking> {
        self.load_all()
            .await?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or(ApiError::NotFound)
    }

    /// Apply an in-place update to one record
    ///
    /// Nothing is persisted when the closure fails, so a rejected
    /// update leaves no partial state behind.
    pub async fn update_with<F>(&self, id: &str, apply: F) -> ApiResult<Booking>
    where
        F: FnOnce(&mut Booking) -> ApiResult<()>,
    {
        let mut bookings = self.load_all().await?;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ApiError::NotFound)?;

        apply(booking)?;
        let updated = booking.clone();

        self.store_all(&bookings).await?;
        Ok(updated)
    }

    /// Remove a record permanently
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let mut bookings = self.load_all().await?;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);

        if bookings.len() == before {
            return Err(ApiError::NotFound);
        }

        self.store_all(&bookings).await
    }

    /// List records matching the filter, newest first
    pub async fn list(&self, query: &BookingQuery) -> ApiResult<Vec<Booking>> {
        let mut bookings = self.load_all().await?;

        if let Some(status) = query.status {
            bookings.retain(|b| b.status == status);
        }
        if let Some(requester) = &query.requester {
            bookings.retain(|b| &b.user_email == requester);
        }

        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, GovtIdType};
    use chrono::{Duration, Utc};
    use common::storage::StorageConfig;

    fn store() -> BookingStore {
        let storage = Arc::new(Storage::open(&StorageConfig::in_memory()).expect("open"));
        BookingStore::new(storage)
    }

    fn booking(id: &str, email: &str, age_hours: i64) -> Booking {
        let now = Utc::now() - Duration::hours(age_hours);
        Booking {
            id: id.to_string(),
            user_name: "Alice".to_string(),
            user_email: email.to_string(),
            user_phone: "9999999999".to_string(),
            car_id: 1,
            car_name: "Toyota Highlander".to_string(),
            car_image: "https://example.com/highlander.jpg".to_string(),
            car_type: "suv".to_string(),
            start_time: now + Duration::days(1),
            end_time: now + Duration::days(1) + Duration::hours(3),
            total_price: 1500,
            status: BookingStatus::Pending,
            govt_id_type: GovtIdType::Aadhar,
            govt_id_number: "1234-5678-9012".to_string(),
            govt_id_image: "data:image/png;base64,xxxx".to_string(),
            address: "12 MG Road".to_string(),
            city: "mumbai".to_string(),
            location: "Andheri".to_string(),
            created_at: now,
            updated_at: now,
            otp_verified: true,
            govt_id_verified: false,
            otp: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
        }
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let store = store();

        store.insert(&booking("booking-1", "a@b.c", 0)).await.expect("insert");
        assert_eq!(store.get("booking-1").await.expect("get").id, "booking-1");

        assert!(matches!(
            store.get("booking-2").await.expect_err("missing"),
            ApiError::NotFound
        ));

        store.delete("booking-1").await.expect("delete");
        assert!(matches!(
            store.delete("booking-1").await.expect_err("already gone"),
            ApiError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_failed_update_persists_nothing() {
        let store = store();
        store.insert(&booking("booking-1", "a@b.c", 0)).await.expect("insert");

        let err = store
            .update_with("booking-1", |b| {
                b.status = BookingStatus::Confirmed;
                Err(ApiError::VerificationIncomplete)
            })
            .await
            .expect_err("update must fail");
        assert!(matches!(err, ApiError::VerificationIncomplete));

        let stored = store.get("booking-1").await.expect("get");
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = store();
        store.insert(&booking("booking-old", "a@b.c", 48)).await.expect("insert");
        store.insert(&booking("booking-new", "a@b.c", 1)).await.expect("insert");
        store.insert(&booking("booking-other", "x@y.z", 2)).await.expect("insert");

        let all = store.list(&BookingQuery::default()).await.expect("list");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "booking-new");

        let mine = store
            .list(&BookingQuery {
                status: None,
                requester: Some("a@b.c".to_string()),
            })
            .await
            .expect("list");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, "booking-new");
        assert_eq!(mine[1].id, "booking-old");

        let confirmed = store
            .list(&BookingQuery {
                status: Some(BookingStatus::Confirmed),
                requester: None,
            })
            .await
            .expect("list");
        assert!(confirmed.is_empty());
    }
}
