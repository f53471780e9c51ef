//! One-time verification codes for phone authentication.
//!
//! A code row is issued per OTP request. A code is live only while unused and
//! unexpired, and only the most recently issued live code for a phone is ever
//! considered during verification.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::phone::PhoneNumber;

/// Number of digits in a verification code.
pub const CODE_DIGITS: u32 = 6;

/// Lifetime of an issued verification code.
#[must_use]
pub fn code_ttl() -> TimeDelta {
    TimeDelta::minutes(5)
}

/// What the requester intends to do with a verified phone.
///
/// Signup and login issue separate code types so the caller can distinguish
/// the flows; verification itself only matches on the phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Creating a new client account.
    Signup,
    /// Logging into an existing client account.
    Login,
}

impl OtpPurpose {
    /// Stable string form used in persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Login => "login",
        }
    }

    /// Parse the persisted string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "signup" => Some(Self::Signup),
            "login" => Some(Self::Login),
            _ => None,
        }
    }
}

/// An issued one-time verification code.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationCode {
    /// Row identifier.
    pub id: Uuid,
    /// Phone the code was sent to.
    pub phone: PhoneNumber,
    /// The code digits.
    pub code: String,
    /// Flow the code was issued for.
    pub purpose: OtpPurpose,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the code has already been consumed.
    pub used: bool,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    /// A code is live while unused and unexpired.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.used && now <= self.expires_at
    }

    /// Constant-shape comparison against a candidate code.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.code == candidate
    }
}

/// Generate a zero-padded numeric verification code.
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    let bound = 10_u32.pow(CODE_DIGITS);
    format!("{:06}", rng.gen_range(0..bound))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn code(used: bool, expires_at: DateTime<Utc>) -> VerificationCode {
        VerificationCode {
            id: Uuid::new_v4(),
            phone: PhoneNumber::new("01012345678").expect("valid phone"),
            code: "123456".into(),
            purpose: OtpPurpose::Login,
            expires_at,
            used,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn generated_codes_are_six_digits() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..32 {
            let code = generate_code(&mut rng);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn live_requires_unused_and_unexpired() {
        let now = Utc::now();
        assert!(code(false, now + TimeDelta::minutes(1)).is_live(now));
        assert!(!code(true, now + TimeDelta::minutes(1)).is_live(now));
        assert!(!code(false, now - TimeDelta::seconds(1)).is_live(now));
    }

    #[test]
    fn purpose_round_trips_persisted_form() {
        assert_eq!(OtpPurpose::parse("signup"), Some(OtpPurpose::Signup));
        assert_eq!(OtpPurpose::parse("login"), Some(OtpPurpose::Login));
        assert_eq!(OtpPurpose::parse("reset"), None);
    }
}
