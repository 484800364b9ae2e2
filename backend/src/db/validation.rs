//! Field constraints applied before any write reaches the store.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::repository::{RepositoryError, RepositoryResult};
use crate::models::{Attachment, Calendar, Meeting, Participant};

pub const MAX_CALENDAR_TITLE_CHARS: usize = 2000;
pub const MAX_CALENDAR_DETAILS_CHARS: usize = 10000;
pub const MAX_PARTICIPANT_NAME_CHARS: usize = 600;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Meetings carry no server-side constraints; titles and details are
/// checked by the console.
pub fn validate_meeting(_meeting: &Meeting) -> RepositoryResult<()> {
    Ok(())
}

pub fn validate_calendar(calendar: &Calendar) -> RepositoryResult<()> {
    check_length("title", &calendar.title, MAX_CALENDAR_TITLE_CHARS)?;
    check_length("details", &calendar.details, MAX_CALENDAR_DETAILS_CHARS)
}

pub fn validate_participant(participant: &Participant) -> RepositoryResult<()> {
    check_length("name", &participant.name, MAX_PARTICIPANT_NAME_CHARS)?;
    if !EMAIL_RE.is_match(&participant.email) {
        return Err(RepositoryError::invalid_argument(format!(
            "Invalid email format: '{}'",
            participant.email
        )));
    }
    Ok(())
}

pub fn validate_attachment(attachment: &Attachment) -> RepositoryResult<()> {
    let url = Url::parse(&attachment.url).map_err(|e| {
        RepositoryError::invalid_argument(format!("Invalid url '{}': {}", attachment.url, e))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(RepositoryError::invalid_argument(format!(
            "Unsupported url scheme '{}', expected http or https",
            other
        ))),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> RepositoryResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(RepositoryError::invalid_argument(format!(
            "{} must not exceed {} characters (got {})",
            field, max, len
        )));
    }
    Ok(())
}
