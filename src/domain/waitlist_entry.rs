use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Serialize;

use super::WaitlistEmail;

/// Request body for the collector. Built once per submission attempt; the
/// collector owns it from then on.
#[derive(Debug, Serialize)]
pub struct WaitlistEntry {
    email: String,
    /// ISO-8601, UTC, millisecond precision (`2025-01-01T09:30:00.000Z`)
    submitted_at: String,
}

impl WaitlistEntry {
    pub fn new(email: WaitlistEmail) -> Self { Self::at(email, Utc::now()) }

    pub fn at(
        email: WaitlistEmail,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn submitted_at(&self) -> &str { &self.submitted_at }
}
