pub mod bookings;
pub mod calendar;
pub mod health;
pub mod session;
