use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// User-visible activity state. `InOffice`/`OutOfOffice` may be derived from a
/// geolocation check-in; the other three are only ever set manually.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum PresenceStatus {
    #[serde(rename = "In Office")]
    #[strum(serialize = "In Office")]
    InOffice,
    #[serde(rename = "Out of Office")]
    #[strum(serialize = "Out of Office")]
    OutOfOffice,
    #[serde(rename = "In Meeting")]
    #[strum(serialize = "In Meeting")]
    InMeeting,
    #[serde(rename = "On Break")]
    #[strum(serialize = "On Break")]
    OnBreak,
    #[serde(rename = "On Leave")]
    #[strum(serialize = "On Leave")]
    OnLeave,
}

impl PresenceStatus {
    pub const ALLOWED: &'static str =
        "In Office, Out of Office, In Meeting, On Break, On Leave";
}

#[cfg(test)]
mod tests {
    use super::PresenceStatus;
    use std::str::FromStr;

    #[test]
    fn parses_all_five_states() {
        assert_eq!(
            PresenceStatus::from_str("In Office").unwrap(),
            PresenceStatus::InOffice
        );
        assert_eq!(
            PresenceStatus::from_str("Out of Office").unwrap(),
            PresenceStatus::OutOfOffice
        );
        assert_eq!(
            PresenceStatus::from_str("In Meeting").unwrap(),
            PresenceStatus::InMeeting
        );
        assert_eq!(
            PresenceStatus::from_str("On Break").unwrap(),
            PresenceStatus::OnBreak
        );
        assert_eq!(
            PresenceStatus::from_str("On Leave").unwrap(),
            PresenceStatus::OnLeave
        );
    }

    #[test]
    fn rejects_unknown_value() {
        assert!(PresenceStatus::from_str("Working From Home").is_err());
        assert!(PresenceStatus::from_str("in office").is_err());
        assert!(PresenceStatus::from_str("").is_err());
    }

    #[test]
    fn display_matches_stored_form() {
        assert_eq!(PresenceStatus::InOffice.to_string(), "In Office");
        assert_eq!(PresenceStatus::OnLeave.to_string(), "On Leave");
    }
}
