pub mod availability;
pub mod calendar;
pub mod clock;
pub mod companion;
pub mod dates;
pub mod form;
pub mod render;
pub mod scheduling;
pub mod session;
