use crate::trial::{Direction, DirectionCode, StimulusKind, TrialSpec};
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Why a condition table could not be loaded. A block cannot run without its
/// trial list, so every variant is fatal at block start.
#[derive(Debug)]
pub enum ConditionsError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// `condition` outside 1–4.
    BadCode { row: usize, value: String },
    /// `stimulus` is neither `fish` nor `arrow`.
    BadStimulus { row: usize, value: String },
    /// `corrAns` is neither `left` nor `right`.
    BadAnswer { row: usize, value: String },
    /// `corrAns` contradicts the answer the condition code derives.
    AnswerMismatch {
        row: usize,
        expected: Direction,
        found: Direction,
    },
    Empty,
}

impl fmt::Display for ConditionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read condition table: {}", e),
            Self::Csv(e) => write!(f, "malformed condition table: {}", e),
            Self::BadCode { row, value } => {
                write!(f, "row {}: condition '{}' is not 1-4", row, value)
            }
            Self::BadStimulus { row, value } => {
                write!(f, "row {}: stimulus '{}' is not fish or arrow", row, value)
            }
            Self::BadAnswer { row, value } => {
                write!(f, "row {}: corrAns '{}' is not left or right", row, value)
            }
            Self::AnswerMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {}: corrAns '{}' contradicts the condition code (expected '{}')",
                row, found, expected
            ),
            Self::Empty => write!(f, "condition table has no trials"),
        }
    }
}

impl Error for ConditionsError {}

impl From<std::io::Error> for ConditionsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for ConditionsError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    condition: String,
    stimulus: String,
    #[serde(rename = "corrAns", default)]
    corr_ans: Option<String>,
}

/// Loads one block's ordered trial list from a CSV condition table with
/// headers `condition,stimulus[,corrAns]`. Row order is preserved; when the
/// optional `corrAns` column is present it is checked against the answer the
/// condition code derives, since the two are redundant by construction.
pub fn load_block<P: AsRef<Path>>(path: P) -> Result<Vec<TrialSpec>, ConditionsError> {
    // Open the file directly so a missing table and a permission problem
    // surface as their own I/O errors, not a generic CSV failure.
    let file = std::fs::File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(file);

    let mut trials = Vec::new();
    for (i, row) in reader.deserialize::<RawRow>().enumerate() {
        let row_number = i + 1;
        let raw = row?;

        let code = raw
            .condition
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(DirectionCode::from_number)
            .ok_or_else(|| ConditionsError::BadCode {
                row: row_number,
                value: raw.condition.clone(),
            })?;

        let kind = match raw.stimulus.trim().to_lowercase().as_str() {
            "fish" => StimulusKind::Fish,
            "arrow" => StimulusKind::Arrow,
            _ => {
                return Err(ConditionsError::BadStimulus {
                    row: row_number,
                    value: raw.stimulus,
                })
            }
        };

        if let Some(ans) = raw.corr_ans.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let found = match ans.to_lowercase().as_str() {
                "left" => Direction::Left,
                "right" => Direction::Right,
                _ => {
                    return Err(ConditionsError::BadAnswer {
                        row: row_number,
                        value: ans.to_string(),
                    })
                }
            };
            if found != code.correct_response() {
                return Err(ConditionsError::AnswerMismatch {
                    row: row_number,
                    expected: code.correct_response(),
                    found,
                });
            }
        }

        trials.push(TrialSpec::new(kind, code));
    }

    if trials.is_empty() {
        return Err(ConditionsError::Empty);
    }

    Ok(trials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_loads_rows_in_order() {
        let f = table("condition,stimulus\n1,fish\n4,arrow\n2,fish\n");
        let trials = load_block(f.path()).unwrap();
        assert_eq!(trials.len(), 3);
        assert_eq!(trials[0].direction_code.number(), 1);
        assert_eq!(trials[0].stimulus_kind, StimulusKind::Fish);
        assert_eq!(trials[1].direction_code.number(), 4);
        assert_eq!(trials[1].stimulus_kind, StimulusKind::Arrow);
        assert_eq!(trials[2].direction_code.number(), 2);
    }

    #[test]
    fn test_corr_ans_validated_when_present() {
        let f = table("condition,stimulus,corrAns\n3,fish,right\n");
        let trials = load_block(f.path()).unwrap();
        assert_eq!(trials[0].correct_response, Direction::Right);
    }

    #[test]
    fn test_corr_ans_mismatch_is_fatal() {
        let f = table("condition,stimulus,corrAns\n3,fish,left\n");
        assert_matches!(
            load_block(f.path()),
            Err(ConditionsError::AnswerMismatch { row: 1, .. })
        );
    }

    #[test]
    fn test_bad_code_is_fatal() {
        let f = table("condition,stimulus\n7,fish\n");
        assert_matches!(load_block(f.path()), Err(ConditionsError::BadCode { row: 1, .. }));
    }

    #[test]
    fn test_bad_stimulus_is_fatal() {
        let f = table("condition,stimulus\n1,bird\n");
        assert_matches!(
            load_block(f.path()),
            Err(ConditionsError::BadStimulus { row: 1, .. })
        );
    }

    #[test]
    fn test_missing_file_keeps_the_underlying_io_error() {
        match load_block("/nonexistent/conditions.csv") {
            Err(ConditionsError::Io(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
                // The OS-level cause must survive, not be replaced by a
                // synthesized error that only names the path.
                assert!(e.raw_os_error().is_some());
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let f = table("condition,stimulus\n");
        assert_matches!(load_block(f.path()), Err(ConditionsError::Empty));
    }

    #[test]
    fn test_whitespace_and_case_tolerated() {
        let f = table("condition,stimulus,corrAns\n 2 , Arrow , RIGHT \n");
        let trials = load_block(f.path()).unwrap();
        assert_eq!(trials[0].stimulus_kind, StimulusKind::Arrow);
    }
}
