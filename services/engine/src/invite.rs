use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Invitation codes grant join access for 12 hours from issuance.
pub const INVITE_TTL_SECS: i64 = 12 * 60 * 60;

const CODE_LENGTH: usize = 22;
// No 0/O, 1/l/I: codes get read aloud and retyped from chat messages.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";

pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteError {
    NotFound,
    Expired,
}

/// A gap of exactly 12:00:00 counts as expired; validity is exclusive on
/// the boundary.
pub fn is_expired(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(issued_at) >= Duration::seconds(INVITE_TTL_SECS)
}

/// Gate for a join attempt against a league row that matched the presented
/// code. A row without an issue timestamp never had a usable invite.
pub fn check(issued_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<(), InviteError> {
    match issued_at {
        None => Err(InviteError::NotFound),
        Some(ts) if is_expired(ts, now) => Err(InviteError::Expired),
        Some(_) => Ok(()),
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn is_over(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

/// Whole hours/minutes/seconds until the 12-hour boundary, zero at or past
/// it. Clamped above by the full window in case of clock skew.
pub fn remaining(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let elapsed = now.signed_duration_since(issued_at).num_seconds();
    let left = (INVITE_TTL_SECS - elapsed).clamp(0, INVITE_TTL_SECS);
    Countdown {
        hours: left / 3600,
        minutes: (left % 3600) / 60,
        seconds: left % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap()
    }

    #[test]
    fn valid_one_second_before_the_boundary() {
        let now = issued() + Duration::seconds(INVITE_TTL_SECS - 1);
        assert!(!is_expired(issued(), now));
    }

    #[test]
    fn expired_exactly_at_the_boundary() {
        let now = issued() + Duration::seconds(INVITE_TTL_SECS);
        assert!(is_expired(issued(), now));
    }

    #[test]
    fn expired_after_the_boundary() {
        let now = issued() + Duration::seconds(INVITE_TTL_SECS + 1);
        assert!(is_expired(issued(), now));
    }

    #[test]
    fn check_maps_missing_timestamp_to_not_found() {
        assert_eq!(check(None, issued()), Err(InviteError::NotFound));
    }

    #[test]
    fn check_maps_elapsed_window_to_expired() {
        let now = issued() + Duration::hours(13);
        assert_eq!(check(Some(issued()), now), Err(InviteError::Expired));
        assert_eq!(check(Some(issued()), issued()), Ok(()));
    }

    #[test]
    fn countdown_breaks_into_whole_units() {
        let now = issued() + Duration::seconds(30 * 60 + 15);
        let left = remaining(issued(), now);
        assert_eq!(
            left,
            Countdown {
                hours: 11,
                minutes: 29,
                seconds: 45
            }
        );
        assert!(!left.is_over());
    }

    #[test]
    fn countdown_is_zero_at_and_past_the_boundary() {
        let at = remaining(issued(), issued() + Duration::seconds(INVITE_TTL_SECS));
        let past = remaining(issued(), issued() + Duration::days(2));
        for left in [at, past] {
            assert_eq!(
                left,
                Countdown {
                    hours: 0,
                    minutes: 0,
                    seconds: 0
                }
            );
            assert!(left.is_over());
        }
    }

    #[test]
    fn countdown_never_exceeds_the_full_window() {
        let left = remaining(issued() + Duration::hours(1), issued());
        assert_eq!(left.hours, 12);
        assert_eq!(left.minutes, 0);
        assert_eq!(left.seconds, 0);
    }

    #[test]
    fn codes_are_fresh_and_well_formed() {
        let a = generate_code();
        let b = generate_code();
        assert_eq!(a.len(), CODE_LENGTH);
        assert_ne!(a, b);
        assert!(a.bytes().all(|c| CODE_ALPHABET.contains(&c)));
    }
}
