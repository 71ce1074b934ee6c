use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Interview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Interview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    fn stage(&self) -> u8 {
        match self {
            ApplicationStatus::Pending => 0,
            ApplicationStatus::Reviewing => 1,
            ApplicationStatus::Interview => 2,
            ApplicationStatus::Approved | ApplicationStatus::Rejected => 3,
        }
    }

    /// Forward-only: stages may be skipped, terminal states never move and
    /// nothing moves backwards. Staying put is always allowed.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        if *self == next {
            return true;
        }
        !self.is_terminal() && next.stage() > self.stage()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let valid: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.as_str()).collect();
                format!("invalid status '{}', expected one of: {}", s, valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    pub candidate_id: i64,
    pub status: ApplicationStatus,
    pub match_score: i16,
    pub cover_letter: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: i64,
    pub candidate_id: i64,
    pub match_score: i16,
    pub cover_letter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus::*;
    use super::*;

    #[test]
    fn forward_moves_are_allowed() {
        assert!(Pending.can_transition_to(Reviewing));
        assert!(Reviewing.can_transition_to(Interview));
        assert!(Interview.can_transition_to(Approved));
        assert!(Interview.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Rejected));
    }

    #[test]
    fn backward_moves_are_rejected() {
        assert!(!Interview.can_transition_to(Pending));
        assert!(!Reviewing.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states_are_frozen() {
        for next in ApplicationStatus::ALL {
            if next != Approved {
                assert!(!Approved.can_transition_to(next), "approved -> {}", next);
            }
            if next != Rejected {
                assert!(!Rejected.can_transition_to(next), "rejected -> {}", next);
            }
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Interview".parse::<ApplicationStatus>(), Ok(Interview));
        assert!("accepted".parse::<ApplicationStatus>().is_err());
    }
}
