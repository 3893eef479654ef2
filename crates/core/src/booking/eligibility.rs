//! Renter license validation against an asset's requirement.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BookingError;

/// License levels, ordered from least to most qualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum LicenseLevel {
    None = 0,
    Basic = 1,
    Coastal = 2,
    Offshore = 3,
    Professional = 4,
}

impl LicenseLevel {
    /// Position in the hierarchy; also the value stored in the database.
    pub fn ordinal(self) -> i16 {
        self as i16
    }

    pub fn from_ordinal(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Basic),
            2 => Some(Self::Coastal),
            3 => Some(Self::Offshore),
            4 => Some(Self::Professional),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Coastal => "coastal",
            Self::Offshore => "offshore",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for LicenseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A renter's license record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub level: LicenseLevel,
    /// `None` means the license does not expire.
    pub expires_on: Option<NaiveDate>,
}

/// Check that `credential` satisfies `required` on `today`.
///
/// Rules, in order: nothing required passes; no credential (or level
/// `none`) is missing; an expiry before `today` is expired; a lower level
/// is insufficient.
pub fn validate_eligibility(
    required: LicenseLevel,
    credential: Option<&Credential>,
    today: NaiveDate,
) -> Result<(), BookingError> {
    if required == LicenseLevel::None {
        return Ok(());
    }

    let credential = match credential {
        Some(c) if c.level != LicenseLevel::None => c,
        _ => return Err(BookingError::CredentialMissing),
    };

    if let Some(expires_on) = credential.expires_on {
        if expires_on < today {
            return Err(BookingError::CredentialExpired {
                expired_on: expires_on,
            });
        }
    }

    if credential.level.ordinal() < required.ordinal() {
        return Err(BookingError::CredentialInsufficient {
            required,
            held: credential.level,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn credential(level: LicenseLevel, expires_on: Option<NaiveDate>) -> Credential {
        Credential { level, expires_on }
    }

    fn next_year() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 6, 1)
    }

    #[test]
    fn nothing_required_always_passes() {
        assert!(validate_eligibility(LicenseLevel::None, None, today()).is_ok());
    }

    #[test]
    fn missing_credential() {
        assert_matches!(
            validate_eligibility(LicenseLevel::Basic, None, today()),
            Err(BookingError::CredentialMissing)
        );
    }

    #[test]
    fn level_none_counts_as_missing() {
        let c = credential(LicenseLevel::None, next_year());
        assert_matches!(
            validate_eligibility(LicenseLevel::Basic, Some(&c), today()),
            Err(BookingError::CredentialMissing)
        );
    }

    #[test]
    fn expired_credential() {
        let expired = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let c = credential(LicenseLevel::Professional, Some(expired));
        assert_matches!(
            validate_eligibility(LicenseLevel::Basic, Some(&c), today()),
            Err(BookingError::CredentialExpired { expired_on }) if expired_on == expired
        );
    }

    #[test]
    fn expiring_today_is_still_valid() {
        let c = credential(LicenseLevel::Basic, Some(today()));
        assert!(validate_eligibility(LicenseLevel::Basic, Some(&c), today()).is_ok());
    }

    #[test]
    fn basic_cannot_rent_coastal() {
        let c = credential(LicenseLevel::Basic, next_year());
        assert_matches!(
            validate_eligibility(LicenseLevel::Coastal, Some(&c), today()),
            Err(BookingError::CredentialInsufficient {
                required: LicenseLevel::Coastal,
                held: LicenseLevel::Basic,
            })
        );
    }

    #[test]
    fn higher_level_satisfies_lower_requirement() {
        let c = credential(LicenseLevel::Offshore, None);
        assert!(validate_eligibility(LicenseLevel::Coastal, Some(&c), today()).is_ok());
        assert!(validate_eligibility(LicenseLevel::Offshore, Some(&c), today()).is_ok());
    }

    #[test]
    fn ordinals_follow_hierarchy() {
        for ordinal in 0..=4 {
            let level = LicenseLevel::from_ordinal(ordinal).unwrap();
            assert_eq!(level.ordinal(), ordinal);
        }
        assert!(LicenseLevel::from_ordinal(5).is_none());
        assert!(LicenseLevel::Basic < LicenseLevel::Professional);
    }
}
