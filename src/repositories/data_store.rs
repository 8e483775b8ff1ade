use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{
    Booking, Feedback, Payment, PaymentStatus, StoreError, StoreResult, User, UserRole,
};

/// The persisted document: one JSON object keyed by entity class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub users: HashMap<String, User>,
    #[serde(default)]
    pub bookings: HashMap<String, Booking>,
    #[serde(default)]
    pub payments: HashMap<String, Payment>,
    #[serde(default)]
    pub feedbacks: HashMap<String, Feedback>,
}

/// The process-wide entity store backed by a single JSON file
///
/// Exactly one instance exists per process; `main` constructs it and hands it
/// to every service behind an `Arc`. All mutations take the write lock,
/// rewrite the whole document, and replace the backing file atomically
/// (write to `<path>.tmp`, then rename), so a crash mid-write never leaves a
/// torn file behind.
pub struct JsonDataStore {
    path: PathBuf,
    inner: RwLock<StoreDocument>,
}

impl JsonDataStore {
    /// Open the store at `path`.
    ///
    /// A missing file is "no data yet": the built-in demo data is seeded and
    /// persisted. A file that exists but fails to read or parse is an error
    /// surfaced to the caller, never silently replaced.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let document = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            let document: StoreDocument = serde_json::from_str(&raw)?;
            info!(
                path = %path.display(),
                users = document.users.len(),
                bookings = document.bookings.len(),
                "Loaded entity store"
            );
            document
        } else {
            info!(path = %path.display(), "No store file found, seeding demo data");
            let document = super::seed::demo_document()?;
            persist(&path, &document).await?;
            document
        };

        Ok(Self {
            path,
            inner: RwLock::new(document),
        })
    }

    /// Clone of the whole document, for report queries and tests
    pub async fn snapshot(&self) -> StoreDocument {
        self.inner.read().await.clone()
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut doc = self.inner.write().await;
        doc.users.insert(user.user_id.clone(), user.clone());
        persist(&self.path, &doc).await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Option<User> {
        self.inner.read().await.users.get(id).cloned()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub async fn update_user(&self, user: User) -> StoreResult<()> {
        let mut doc = self.inner.write().await;
        if !doc.users.contains_key(&user.user_id) {
            return Err(StoreError::NotFound);
        }
        doc.users.insert(user.user_id.clone(), user);
        persist(&self.path, &doc).await?;
        Ok(())
    }

    pub async fn list_barbers(&self) -> Vec<User> {
        let doc = self.inner.read().await;
        let mut barbers: Vec<User> = doc
            .users
            .values()
            .filter(|user| user.role == UserRole::Barber)
            .cloned()
            .collect();
        barbers.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        barbers
    }

    // -------------------------------------------------------------------------
    // Bookings
    // -------------------------------------------------------------------------

    pub async fn insert_booking(&self, booking: Booking) -> StoreResult<Booking> {
        let mut doc = self.inner.write().await;
        doc.bookings.insert(booking.booking_id.clone(), booking.clone());
        persist(&self.path, &doc).await?;
        Ok(booking)
    }

    pub async fn get_booking(&self, id: &str) -> Option<Booking> {
        self.inner.read().await.bookings.get(id).cloned()
    }

    pub async fn update_booking(&self, booking: Booking) -> StoreResult<()> {
        let mut doc = self.inner.write().await;
        if !doc.bookings.contains_key(&booking.booking_id) {
            return Err(StoreError::NotFound);
        }
        doc.bookings.insert(booking.booking_id.clone(), booking);
        persist(&self.path, &doc).await?;
        Ok(())
    }

    pub async fn bookings_for_customer(&self, customer_id: &str) -> Vec<Booking> {
        let doc = self.inner.read().await;
        let mut bookings: Vec<Booking> = doc
            .bookings
            .values()
            .filter(|booking| booking.customer_id == customer_id)
            .cloned()
            .collect();
        // newest first, the order the original booking list rendered in
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }

    pub async fn bookings_for_barber(&self, barber_id: &str) -> Vec<Booking> {
        let doc = self.inner.read().await;
        let mut bookings: Vec<Booking> = doc
            .bookings
            .values()
            .filter(|booking| booking.barber_id.as_deref() == Some(barber_id))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }

    pub async fn bookings_on(&self, date: NaiveDate) -> Vec<Booking> {
        let doc = self.inner.read().await;
        let mut bookings: Vec<Booking> = doc
            .bookings
            .values()
            .filter(|booking| booking.booking_date == date)
            .cloned()
            .collect();
        bookings.sort_by_key(|booking| booking.booking_time);
        bookings
    }

    pub async fn list_bookings(&self) -> Vec<Booking> {
        self.inner.read().await.bookings.values().cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    pub async fn insert_payment(&self, payment: Payment) -> StoreResult<Payment> {
        let mut doc = self.inner.write().await;
        doc.payments.insert(payment.payment_id.clone(), payment.clone());
        persist(&self.path, &doc).await?;
        Ok(payment)
    }

    pub async fn payment_for_booking(&self, booking_id: &str) -> Option<Payment> {
        self.inner
            .read()
            .await
            .payments
            .values()
            .find(|payment| payment.booking_id == booking_id)
            .cloned()
    }

    pub async fn paid_payments(&self) -> Vec<Payment> {
        self.inner
            .read()
            .await
            .payments
            .values()
            .filter(|payment| payment.payment_status == PaymentStatus::Paid)
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Feedback
    // -------------------------------------------------------------------------

    pub async fn insert_feedback(&self, feedback: Feedback) -> StoreResult<Feedback> {
        let mut doc = self.inner.write().await;
        doc.feedbacks.insert(feedback.feedback_id.clone(), feedback.clone());
        persist(&self.path, &doc).await?;
        Ok(feedback)
    }

    pub async fn feedback_for_booking(&self, booking_id: &str) -> Option<Feedback> {
        self.inner
            .read()
            .await
            .feedbacks
            .values()
            .find(|feedback| feedback.booking_id == booking_id)
            .cloned()
    }

    pub async fn feedbacks_for_barber(&self, barber_id: &str) -> Vec<Feedback> {
        let doc = self.inner.read().await;
        let mut feedbacks: Vec<Feedback> = doc
            .feedbacks
            .values()
            .filter(|feedback| feedback.barber_id == barber_id)
            .cloned()
            .collect();
        feedbacks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        feedbacks
    }

    pub async fn list_feedbacks(&self) -> Vec<Feedback> {
        self.inner.read().await.feedbacks.values().cloned().collect()
    }
}

/// Serialize the whole document and atomically replace the backing file
async fn persist(path: &Path, document: &StoreDocument) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(document)?;

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, json.as_bytes()).await?;
    if let Err(err) = tokio::fs::rename(&tmp, path).await {
        warn!(path = %path.display(), error = %err, "Atomic store replace failed");
        return Err(err.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseService, PaymentMethod, ServiceSelection};
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("barbershop_data.json")
    }

    fn test_booking(customer_id: &str, date: NaiveDate, time: NaiveTime) -> Booking {
        Booking::new(
            customer_id.to_string(),
            Some("B001".to_string()),
            ServiceSelection::new(BaseService::Haircut),
            date,
            time,
        )
    }

    #[tokio::test]
    async fn test_missing_file_seeds_demo_data() {
        let dir = tempdir().unwrap();
        let store = JsonDataStore::open(store_path(&dir)).await.unwrap();

        let doc = store.snapshot().await;
        assert_eq!(doc.users.len(), 3);
        assert!(doc.bookings.is_empty());

        let barbers = store.list_barbers().await;
        assert_eq!(barbers.len(), 2);
        assert_eq!(barbers[0].user_id, "B001");

        // the seed file was written out
        assert!(store_path(&dir).exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_not_a_reseed() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let result = JsonDataStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));

        // the broken file is left in place for inspection
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw, "{ not json");
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let booking_id = {
            let store = JsonDataStore::open(&path).await.unwrap();
            let booking = test_booking(
                "C001",
                NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            );
            let booking = store.insert_booking(booking).await.unwrap();

            let mut payment =
                Payment::new(booking.booking_id.clone(), dec!(50000), PaymentMethod::Cash);
            payment.process();
            store.insert_payment(payment).await.unwrap();

            booking.booking_id
        };

        let reopened = JsonDataStore::open(&path).await.unwrap();
        let booking = reopened.get_booking(&booking_id).await.unwrap();
        assert_eq!(booking.customer_id, "C001");
        assert_eq!(booking.service.base, BaseService::Haircut);

        let payment = reopened.payment_for_booking(&booking_id).await.unwrap();
        assert_eq!(payment.amount, dec!(50000));
    }

    #[tokio::test]
    async fn test_round_trip_is_field_for_field_lossless() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let store = JsonDataStore::open(&path).await.unwrap();
        let booking = test_booking(
            "C001",
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        );
        store.insert_booking(booking).await.unwrap();

        let feedback = Feedback::new(
            "BK0001".to_string(),
            "C001".to_string(),
            "B002".to_string(),
            4,
            "solid".to_string(),
        );
        store.insert_feedback(feedback).await.unwrap();

        let before = store.snapshot().await;
        drop(store);

        let reopened = JsonDataStore::open(&path).await.unwrap();
        let after = reopened.snapshot().await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_no_tmp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let store = JsonDataStore::open(&path).await.unwrap();
        let booking = test_booking(
            "C001",
            NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        );
        store.insert_booking(booking).await.unwrap();

        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_update_missing_entity_is_not_found() {
        let dir = tempdir().unwrap();
        let store = JsonDataStore::open(store_path(&dir)).await.unwrap();

        let booking = test_booking(
            "C001",
            NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        );
        let result = store.update_booking(booking).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let store = JsonDataStore::open(store_path(&dir)).await.unwrap();

        let user = store.find_user_by_email("JOHN@BARBER.COM").await;
        assert!(user.is_some());
        assert_eq!(user.unwrap().user_id, "B001");
    }
}
