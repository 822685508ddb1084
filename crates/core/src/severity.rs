//! Severity scale shared by violations, events, and alerts.

use serde::{Deserialize, Serialize};

/// Severity level on the 1-5 scale.
///
/// A closed enum rather than a bare integer so every producer is forced
/// onto the valid range at compile time. Serializes as the integer value
/// for wire and storage compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum Severity {
    Low = 1,
    Minor = 2,
    Moderate = 3,
    High = 4,
    Critical = 5,
}

impl Severity {
    /// Integer form used by the database and JSON payloads.
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Severity 4 and above is treated as critical by the event queries.
    pub fn is_critical(self) -> bool {
        self >= Severity::High
    }
}

impl From<Severity> for i16 {
    fn from(severity: Severity) -> i16 {
        severity.as_i16()
    }
}

impl TryFrom<i16> for Severity {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Severity::Low),
            2 => Ok(Severity::Minor),
            3 => Ok(Severity::Moderate),
            4 => Ok(Severity::High),
            5 => Ok(Severity::Critical),
            other => Err(format!("severity must be between 1 and 5, got {other}")),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_i16() {
        for value in 1..=5i16 {
            let severity = Severity::try_from(value).unwrap();
            assert_eq!(severity.as_i16(), value);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Severity::try_from(0).is_err());
        assert!(Severity::try_from(6).is_err());
    }

    #[test]
    fn high_and_critical_are_critical() {
        assert!(!Severity::Moderate.is_critical());
        assert!(Severity::High.is_critical());
        assert!(Severity::Critical.is_critical());
    }
}
