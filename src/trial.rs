use serde::{Deserialize, Serialize};

/// Which image family a trial draws its five slots from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StimulusKind {
    Fish,
    Arrow,
}

/// Whether the flankers agree with the center target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Congruency {
    Congruent,
    Incongruent,
}

/// A lateral: slot orientation, response key identity, and correct answer
/// are all one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// One of the four stimulus layouts from the condition table.
///
/// Everything derivable from the code (slot layout, congruency, correct
/// answer) is derived here and nowhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionCode {
    /// All five point left.
    Code1,
    /// All five point right.
    Code2,
    /// Flankers left, center target right.
    Code3,
    /// Flankers right, center target left.
    Code4,
}

impl DirectionCode {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Code1),
            2 => Some(Self::Code2),
            3 => Some(Self::Code3),
            4 => Some(Self::Code4),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::Code1 => 1,
            Self::Code2 => 2,
            Self::Code3 => 3,
            Self::Code4 => 4,
        }
    }

    /// Five slot orientations, left to right. Codes 3 and 4 flip only the
    /// center target.
    pub fn layout(&self) -> [Direction; 5] {
        use Direction::*;
        match self {
            Self::Code1 => [Left, Left, Left, Left, Left],
            Self::Code2 => [Right, Right, Right, Right, Right],
            Self::Code3 => [Left, Left, Right, Left, Left],
            Self::Code4 => [Right, Right, Left, Right, Right],
        }
    }

    pub fn congruency(&self) -> Congruency {
        match self {
            Self::Code1 | Self::Code2 => Congruency::Congruent,
            Self::Code3 | Self::Code4 => Congruency::Incongruent,
        }
    }

    /// The answer always follows the center target, not the flankers.
    pub fn correct_response(&self) -> Direction {
        self.layout()[2]
    }
}

/// One row of the condition table.
///
/// `congruency` and `correct_response` are fully determined by
/// `direction_code`; they are populated from it at load time and carried
/// redundantly so scoring and labeling read stored fields instead of
/// re-deriving the mapping per call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub stimulus_kind: StimulusKind,
    pub direction_code: DirectionCode,
    pub congruency: Congruency,
    pub correct_response: Direction,
}

impl TrialSpec {
    pub fn new(stimulus_kind: StimulusKind, direction_code: DirectionCode) -> Self {
        Self {
            stimulus_kind,
            direction_code,
            congruency: direction_code.congruency(),
            correct_response: direction_code.correct_response(),
        }
    }

    /// True iff a response was recorded and it matches the correct answer.
    /// A missing response scores false, not undefined.
    pub fn score(&self, response: Option<Direction>) -> bool {
        response == Some(self.correct_response)
    }
}

/// The first qualifying key press of a stimulus window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub key: Direction,
    /// Milliseconds from stimulus onset to the press.
    pub reaction_time_ms: f64,
}

/// Immutable record of one completed trial, appended to the output sink the
/// moment the stimulus window closes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub block_index: usize,
    pub trial_index: usize,
    /// Time of stimulus display, relative to the trial clock start.
    pub stimulus_onset_ms: f64,
    /// Time of trial end, relative to the trial clock start.
    pub trial_duration_ms: f64,
    pub condition: Congruency,
    pub response: Option<Direction>,
    pub reaction_time_ms: Option<f64>,
    pub is_correct: bool,
}
