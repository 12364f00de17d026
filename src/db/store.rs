use chrono::NaiveDate;

use crate::db::storage::{KeyValueStorage, MemoryStorage};
use crate::models::{Booking, BookingUpdate, SlotTime};

/// Storage key of the booking list. The suffix is the schema version.
pub const DEFAULT_STORAGE_KEY: &str = "bdt.bookings.v1";

const WRITE_CHECK_KEY: &str = "__storage_test__";

/// The booking list, kept in memory and written through to storage after
/// every change.
///
/// Storage problems never reach the caller. If the test write on construction
/// fails the store runs memory-only for its lifetime. Unreadable data loads as
/// an empty list, and failed writes are logged while the in-memory list stays
/// authoritative.
pub struct BookingStore {
    storage: Box<dyn KeyValueStorage>,
    key: String,
    durable: bool,
    bookings: Vec<Booking>,
}

impl BookingStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(mut storage: Box<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let durable = is_writable(storage.as_mut());
        let mut store = Self {
            storage,
            key: key.into(),
            durable,
            bookings: Vec::new(),
        };
        store.load();
        store
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::default()))
    }

    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn KeyValueStorage {
        self.storage.as_mut()
    }

    fn load(&mut self) {
        if !self.durable {
            self.bookings = Vec::new();
            return;
        }

        self.bookings = match self.storage.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Booking>>(&raw) {
                Ok(bookings) => bookings,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        key = %self.key,
                        "could not read booking data, starting empty"
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    key = %self.key,
                    "could not load booking data, starting empty"
                );
                Vec::new()
            }
        };

        tracing::info!(count = self.bookings.len(), "loaded bookings");
    }

    fn persist(&mut self) {
        if !self.durable {
            return;
        }

        let result = serde_json::to_string(&self.bookings)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .set(&self.key, &json)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            tracing::error!(error = %e, key = %self.key, "could not save booking data");
        }
    }

    /// All bookings ordered by date, then time.
    pub fn get_all(&self) -> Vec<Booking> {
        let mut all = self.bookings.clone();
        all.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        all
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| b.date == date).collect()
    }

    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.bookings.iter().filter(|b| b.date == date).count()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn is_slot_booked(
        &self,
        date: NaiveDate,
        time: SlotTime,
        ignore_id: Option<&str>,
    ) -> bool {
        self.bookings
            .iter()
            .any(|b| b.occupies(date, time) && ignore_id != Some(b.id.as_str()))
    }

    /// Appends without checking the slot; callers check availability first.
    pub fn add(&mut self, booking: Booking) -> Booking {
        self.bookings.push(booking.clone());
        self.persist();
        tracing::info!(
            id = %booking.id,
            date = %booking.date,
            time = %booking.time,
            "booking added"
        );
        booking
    }

    pub fn update(&mut self, id: &str, updates: BookingUpdate) -> Option<Booking> {
        let booking = self.bookings.iter_mut().find(|b| b.id == id)?;
        booking.apply(updates);
        let updated = booking.clone();
        self.persist();
        tracing::info!(
            id = %updated.id,
            date = %updated.date,
            time = %updated.time,
            "booking updated"
        );
        Some(updated)
    }

    pub fn remove(&mut self, id: &str) {
        let before = self.bookings.len();
        self.bookings.retain(|b| b.id != id);
        self.persist();
        if self.bookings.len() < before {
            tracing::info!(id, "booking removed");
        }
    }
}

fn is_writable(storage: &mut dyn KeyValueStorage) -> bool {
    match storage
        .set(WRITE_CHECK_KEY, "1")
        .and_then(|_| storage.remove(WRITE_CHECK_KEY))
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "local storage unavailable, keeping bookings in memory"
            );
            false
        }
    }
}
