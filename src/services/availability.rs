use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::db::BookingStore;
use crate::models::{Booking, SlotTime};
use crate::services::dates::{is_business_day, slot_date_time};

pub const OPEN_HOUR: u32 = 8;
pub const CLOSE_HOUR: u32 = 17;
pub const SLOT_INTERVAL_MIN: u32 = 30;
pub const LUNCH_START_MIN: u32 = 12 * 60;
pub const LUNCH_END_MIN: u32 = 13 * 60;

/// Slot start times from opening to closing hour inclusive, lunch excluded.
pub fn time_slots() -> &'static [SlotTime] {
    static SLOTS: OnceLock<Vec<SlotTime>> = OnceLock::new();
    SLOTS.get_or_init(|| {
        (OPEN_HOUR * 60..=CLOSE_HOUR * 60)
            .step_by(SLOT_INTERVAL_MIN as usize)
            .filter(|m| !(LUNCH_START_MIN..LUNCH_END_MIN).contains(m))
            .filter_map(SlotTime::from_minutes)
            .collect()
    })
}

pub fn is_on_grid(time: SlotTime) -> bool {
    time_slots().contains(&time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Booked,
    Past,
    Closed,
}

impl SlotStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SlotStatus::Available => "Ledig",
            SlotStatus::Booked => "Bokad",
            SlotStatus::Past => "Ej tillgänglig",
            SlotStatus::Closed => "Stängt",
        }
    }
}

/// Raw facts about one slot. A slot can be booked and past at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCheck {
    pub booked: bool,
    pub past: bool,
    pub closed: bool,
}

impl SlotCheck {
    pub fn status(&self) -> SlotStatus {
        if self.closed {
            SlotStatus::Closed
        } else if self.past {
            SlotStatus::Past
        } else if self.booked {
            SlotStatus::Booked
        } else {
            SlotStatus::Available
        }
    }

    pub fn is_available(&self) -> bool {
        self.status() == SlotStatus::Available
    }
}

/// Checks a slot against the store. While `editing` is set, that booking's own
/// slot is neither booked nor past.
pub fn check_slot(
    store: &BookingStore,
    date: NaiveDate,
    time: SlotTime,
    editing: Option<&Booking>,
    now: NaiveDateTime,
) -> SlotCheck {
    let ignore_id = editing.map(|b| b.id.as_str());
    let own_slot = editing.map(|b| b.occupies(date, time)).unwrap_or(false);

    SlotCheck {
        booked: store.is_slot_booked(date, time, ignore_id),
        past: is_slot_in_past(date, time, now) && !own_slot,
        closed: !is_business_day(date),
    }
}

pub fn is_slot_in_past(date: NaiveDate, time: SlotTime, now: NaiveDateTime) -> bool {
    slot_date_time(date, time) < now
}

/// Free slots on a day by count alone; past slots are not subtracted.
pub fn available_count(store: &BookingStore, date: NaiveDate) -> usize {
    time_slots().len().saturating_sub(store.count_on(date))
}

pub fn is_fully_booked(store: &BookingStore, date: NaiveDate) -> bool {
    is_business_day(date) && store.count_on(date) >= time_slots().len()
}

pub fn closed_day_message() -> String {
    format!(
        "Bokningar görs endast måndag till fredag mellan {:02}:00 och {:02}:00.",
        OPEN_HOUR, CLOSE_HOUR
    )
}
