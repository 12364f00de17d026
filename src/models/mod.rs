pub mod booking;
pub mod calendar;

pub use booking::{Booking, BookingUpdate, ContactDetails, InvalidSlotTime, SlotTime};
pub use calendar::{CalendarState, CalendarView, Modal, PendingSlot};
