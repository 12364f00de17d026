use serde::Serialize;

use crate::models::{Booking, ContactDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("missing field: {0}")]
    Missing(&'static str),
}

/// Trims every field and requires all three to be present. Formats are not
/// checked.
pub fn validate(details: &ContactDetails) -> Result<ContactDetails, FormError> {
    let name = details.name.trim();
    let email = details.email.trim();
    let phone = details.phone.trim();

    if name.is_empty() {
        return Err(FormError::Missing("name"));
    }
    if email.is_empty() {
        return Err(FormError::Missing("email"));
    }
    if phone.is_empty() {
        return Err(FormError::Missing("phone"));
    }

    Ok(ContactDetails {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "booking", rename_all = "snake_case")]
pub enum FormOutcome {
    Created(Booking),
    Updated(Booking),
}

impl FormOutcome {
    pub fn booking(&self) -> &Booking {
        match self {
            FormOutcome::Created(b) | FormOutcome::Updated(b) => b,
        }
    }
}

pub fn created_message(name: &str) -> String {
    format!("{name}, din tid är bokad.")
}

pub fn updated_message(name: &str) -> String {
    format!("{name}, din bokning är uppdaterad.")
}
