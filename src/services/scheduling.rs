use chrono::{NaiveDate, NaiveDateTime};

use crate::db::BookingStore;
use crate::models::{Booking, SlotTime};
use crate::services::availability::{check_slot, is_on_grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingError {
    ClosedDay,
    OffGrid,
    Conflict,
    InPast,
}

impl std::fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingError::ClosedDay => write!(f, "Bokningar görs måndag till fredag."),
            SchedulingError::OffGrid => write!(f, "Den tiden finns inte i schemat."),
            SchedulingError::Conflict => write!(f, "Den här tiden är redan bokad."),
            SchedulingError::InPast => {
                write!(f, "Du kan inte boka en tid som redan passerat.")
            }
        }
    }
}

/// Decides whether a slot may be picked. The check happens at selection time
/// only; nothing re-checks it when the form is submitted.
pub fn validate_slot_selection(
    store: &BookingStore,
    date: NaiveDate,
    time: SlotTime,
    editing: Option<&Booking>,
    now: NaiveDateTime,
) -> Result<(), SchedulingError> {
    let check = check_slot(store, date, time, editing, now);

    if check.closed {
        return Err(SchedulingError::ClosedDay);
    }
    if !is_on_grid(time) {
        return Err(SchedulingError::OffGrid);
    }
    if check.booked {
        return Err(SchedulingError::Conflict);
    }
    if check.past {
        return Err(SchedulingError::InPast);
    }

    Ok(())
}
