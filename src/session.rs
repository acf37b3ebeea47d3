use chrono::Local;
use serde::{Deserialize, Serialize};

pub const EXP_NAME: &str = "Fish-Flanker";

/// Who is sitting at the keyboard, collected once before the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub participant: String,
    pub timepoint: String,
    pub administrator: String,
    pub exp_name: String,
    /// Local time at collection, `%Y-%m-%d-%H%M`.
    pub date: String,
}

impl SessionInfo {
    pub fn new(participant: &str, timepoint: &str, administrator: &str) -> Self {
        Self::with_date(
            participant,
            timepoint,
            administrator,
            &Local::now().format("%Y-%m-%d-%H%M").to_string(),
        )
    }

    pub fn with_date(participant: &str, timepoint: &str, administrator: &str, date: &str) -> Self {
        Self {
            participant: participant.to_string(),
            timepoint: timepoint.to_string(),
            administrator: administrator.to_string(),
            exp_name: EXP_NAME.to_string(),
            date: date.to_string(),
        }
    }

    /// Filename stem shared by the CSV sink and the JSON artifact.
    pub fn stem(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.participant, self.exp_name, self.date, self.timepoint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_layout() {
        let info = SessionInfo::with_date("p07", "2", "kb", "2024-01-05-0930");
        assert_eq!(info.stem(), "p07_Fish-Flanker_2024-01-05-0930_2");
    }

    #[test]
    fn test_new_stamps_a_parseable_date() {
        let info = SessionInfo::new("p07", "1", "kb");
        assert!(chrono::NaiveDateTime::parse_from_str(&info.date, "%Y-%m-%d-%H%M").is_ok());
    }
}
