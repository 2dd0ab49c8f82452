//! Link lifetime choices and the expiry policy derived from them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifetime requested by the link owner at creation time.
///
/// The wire names match the public API (`AFTER_THE_LINK`, `1_DAY`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeTime {
    /// The link works once and deactivates on its first visit.
    #[serde(rename = "AFTER_THE_LINK")]
    AfterTheLink,
    #[serde(rename = "1_DAY")]
    OneDay,
    #[serde(rename = "3_DAYS")]
    ThreeDays,
    #[serde(rename = "7_DAYS")]
    OneWeek,
}

impl LifeTime {
    pub const ALL: [LifeTime; 4] = [
        LifeTime::AfterTheLink,
        LifeTime::OneDay,
        LifeTime::ThreeDays,
        LifeTime::OneWeek,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LifeTime::AfterTheLink => "AFTER_THE_LINK",
            LifeTime::OneDay => "1_DAY",
            LifeTime::ThreeDays => "3_DAYS",
            LifeTime::OneWeek => "7_DAYS",
        }
    }

    /// Fixed duration for deadline-based choices, `None` for single use.
    pub fn duration(self) -> Option<Duration> {
        match self {
            LifeTime::AfterTheLink => None,
            LifeTime::OneDay => Some(Duration::days(1)),
            LifeTime::ThreeDays => Some(Duration::days(3)),
            LifeTime::OneWeek => Some(Duration::days(7)),
        }
    }

    /// Derives the expiry policy for a link created at `now`.
    pub fn expiry_from(self, now: DateTime<Utc>) -> Expiry {
        match self.duration() {
            Some(d) => Expiry::At(now + d),
            None => Expiry::OnFirstVisit,
        }
    }
}

impl fmt::Display for LifeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a lifetime string is not one of [`LifeTime::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid life time value: {0}")]
pub struct InvalidLifeTime(pub String);

impl FromStr for LifeTime {
    type Err = InvalidLifeTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifeTime::ALL
            .into_iter()
            .find(|lt| lt.as_str() == s)
            .ok_or_else(|| InvalidLifeTime(s.to_string()))
    }
}

/// When a link stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// No fixed deadline; the first successful visit deactivates the link.
    OnFirstVisit,
    /// Deactivated by the expiry sweep once this instant has passed.
    At(DateTime<Utc>),
}

impl Expiry {
    pub const ON_FIRST_VISIT: &'static str = "on_first_visit";
    pub const DEADLINE: &'static str = "deadline";

    /// Storage name of the policy.
    pub fn policy(&self) -> &'static str {
        match self {
            Expiry::OnFirstVisit => Self::ON_FIRST_VISIT,
            Expiry::At(_) => Self::DEADLINE,
        }
    }

    /// Fixed deadline, `None` for the on-first-visit policy.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        match self {
            Expiry::OnFirstVisit => None,
            Expiry::At(at) => Some(*at),
        }
    }

    /// Rebuilds the policy from its stored columns.
    ///
    /// Returns `None` for combinations the schema forbids.
    pub fn from_parts(policy: &str, expiry_at: Option<DateTime<Utc>>) -> Option<Self> {
        match (policy, expiry_at) {
            (Self::ON_FIRST_VISIT, None) => Some(Expiry::OnFirstVisit),
            (Self::DEADLINE, Some(at)) => Some(Expiry::At(at)),
            _ => None,
        }
    }

    /// True once a fixed deadline is at or before `now`.
    pub fn is_matured(&self, now: DateTime<Utc>) -> bool {
        self.deadline().is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_now_plus_duration() {
        let now = Utc::now();

        assert_eq!(LifeTime::OneDay.expiry_from(now), Expiry::At(now + Duration::days(1)));
        assert_eq!(
            LifeTime::ThreeDays.expiry_from(now),
            Expiry::At(now + Duration::days(3))
        );
        assert_eq!(LifeTime::OneWeek.expiry_from(now), Expiry::At(now + Duration::days(7)));
        assert_eq!(LifeTime::AfterTheLink.expiry_from(now), Expiry::OnFirstVisit);
    }

    #[test]
    fn test_parse_wire_names() {
        assert_eq!("AFTER_THE_LINK".parse::<LifeTime>(), Ok(LifeTime::AfterTheLink));
        assert_eq!("1_DAY".parse::<LifeTime>(), Ok(LifeTime::OneDay));
        assert_eq!("3_DAYS".parse::<LifeTime>(), Ok(LifeTime::ThreeDays));
        assert_eq!("7_DAYS".parse::<LifeTime>(), Ok(LifeTime::OneWeek));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("2_DAYS".parse::<LifeTime>().is_err());
        assert!("1_day".parse::<LifeTime>().is_err());
        assert!("".parse::<LifeTime>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for lt in LifeTime::ALL {
            let json = serde_json::to_string(&lt).unwrap();
            assert_eq!(json, format!("\"{}\"", lt.as_str()));
        }
    }

    #[test]
    fn test_from_parts() {
        let at = Utc::now();
        assert_eq!(
            Expiry::from_parts("on_first_visit", None),
            Some(Expiry::OnFirstVisit)
        );
        assert_eq!(Expiry::from_parts("deadline", Some(at)), Some(Expiry::At(at)));
        assert_eq!(Expiry::from_parts("deadline", None), None);
        assert_eq!(Expiry::from_parts("on_first_visit", Some(at)), None);
        assert_eq!(Expiry::from_parts("forever", None), None);
    }

    #[test]
    fn test_is_matured_boundary() {
        let now = Utc::now();
        assert!(Expiry::At(now).is_matured(now));
        assert!(Expiry::At(now - Duration::seconds(1)).is_matured(now));
        assert!(!Expiry::At(now + Duration::seconds(1)).is_matured(now));
        assert!(!Expiry::OnFirstVisit.is_matured(now));
    }
}
