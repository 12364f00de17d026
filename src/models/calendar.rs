use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Booking, SlotTime};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarView::Month => "month",
            CalendarView::Week => "week",
            CalendarView::Day => "day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSlot {
    pub date: NaiveDate,
    pub time: SlotTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modal {
    #[default]
    Closed,
    Form,
    Confirmation {
        message: String,
    },
}

/// Everything the calendar widget knows between two user actions. Nothing of
/// this is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarState {
    pub view: CalendarView,
    /// First of month, start of week or the day itself, depending on `view`.
    pub current_date: NaiveDate,
    pub selected_date: NaiveDate,
    pub pending_slot: Option<PendingSlot>,
    pub booking_in_edit: Option<Booking>,
    pub modal: Modal,
}

impl CalendarState {
    pub fn editing_id(&self) -> Option<&str> {
        self.booking_in_edit.as_ref().map(|b| b.id.as_str())
    }

    pub fn is_pending(&self, date: NaiveDate, time: SlotTime) -> bool {
        self.pending_slot
            .map(|slot| slot.date == date && slot.time == time)
            .unwrap_or(false)
    }
}
