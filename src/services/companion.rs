//! Read-only "my bookings" list for pages outside the calendar. It reads the
//! same storage key as the calendar and never writes.

use serde::Serialize;
use serde_json::Value;

use crate::db::KeyValueStorage;
use crate::services::dates::{format_full_date, parse_date_key};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MyBookingEntry {
    /// `{full date} - {time}`, or whichever half is present.
    pub primary: String,
    pub extra: Option<String>,
}

/// Entries in stored order. Anything unreadable yields an empty list.
pub fn read_my_bookings(storage: &dyn KeyValueStorage, key: &str) -> Vec<MyBookingEntry> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::debug!(error = %e, key, "my bookings unavailable");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items.iter().filter_map(entry).collect(),
        _ => Vec::new(),
    }
}

fn entry(item: &Value) -> Option<MyBookingEntry> {
    let date = field(item, &["date"]).map(|raw| match parse_date_key(&raw) {
        Ok(date) => format_full_date(date),
        Err(_) => raw,
    });
    let time = field(item, &["time"]);

    let primary = match (date, time) {
        (Some(date), Some(time)) => format!("{date} - {time}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => String::new(),
    };

    let what = field(item, &["name", "service", "tjanst"]);
    let place = field(item, &["place", "location", "plats"]);
    let extra = match (what, place) {
        (Some(what), Some(place)) => Some(format!("{what} - {place}")),
        (what, place) => what.or(place),
    };

    if primary.is_empty() && extra.is_none() {
        return None;
    }
    Some(MyBookingEntry { primary, extra })
}

/// First non-empty value among `names`, as text.
fn field(item: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match item.get(*name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
