use crate::trial::{Direction, Response, TrialResult, TrialSpec};

/// Phase durations in milliseconds. Both windows default to two seconds and
/// stay configurable rather than baked in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Durations {
    pub fixation_ms: f64,
    pub stimulus_ms: f64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            fixation_ms: 2000.0,
            stimulus_ms: 2000.0,
        }
    }
}

/// Where the runner is within the current trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlockPhase {
    /// `start` has not been called yet.
    Idle,
    Fixation,
    Stimulus,
    Done,
}

/// Drives one block, an ordered sequence of trials, to completion,
/// producing exactly one `TrialResult` per completed trial.
///
/// The runner is a pure state machine over explicit session-clock
/// milliseconds: the binary feeds it wall-clock time, tests feed it a
/// script. It never touches the terminal or the system clock itself.
///
/// Per trial: fixation (no input capture) → stimulus window (first
/// qualifying press wins, later presses are discarded) → score → emit.
/// A window with no press is a valid trial, scored incorrect with no RT.
#[derive(Debug)]
pub struct BlockRunner {
    block_index: usize,
    trials: Vec<TrialSpec>,
    durations: Durations,
    trial_cursor: usize,
    phase: BlockPhase,
    /// Trial clock zero, on the session clock.
    trial_start_ms: f64,
    /// Stimulus onset, on the session clock. The response clock is zero here.
    stimulus_onset_ms: f64,
    response: Option<Response>,
    aborted: bool,
}

impl BlockRunner {
    pub fn new(block_index: usize, trials: Vec<TrialSpec>, durations: Durations) -> Self {
        Self {
            block_index,
            trials,
            durations,
            trial_cursor: 0,
            phase: BlockPhase::Idle,
            trial_start_ms: 0.0,
            stimulus_onset_ms: 0.0,
            response: None,
            aborted: false,
        }
    }

    /// Begins the first trial's fixation. `now_ms` becomes the trial clock
    /// zero; any input buffered before this instant is the caller's to drop.
    pub fn start(&mut self, now_ms: f64) {
        if self.trials.is_empty() {
            self.phase = BlockPhase::Done;
            return;
        }
        self.begin_trial(now_ms);
    }

    fn begin_trial(&mut self, now_ms: f64) {
        self.trial_start_ms = now_ms;
        self.response = None;
        self.phase = BlockPhase::Fixation;
    }

    /// Advances the phase machine. Returns the completed trial's result when
    /// a stimulus window closes on this tick, otherwise `None`.
    pub fn tick(&mut self, now_ms: f64) -> Option<TrialResult> {
        match self.phase {
            BlockPhase::Fixation => {
                if now_ms - self.trial_start_ms >= self.durations.fixation_ms {
                    self.stimulus_onset_ms = now_ms;
                    self.phase = BlockPhase::Stimulus;
                }
                None
            }
            BlockPhase::Stimulus => {
                if now_ms - self.stimulus_onset_ms >= self.durations.stimulus_ms {
                    Some(self.complete_trial(now_ms))
                } else {
                    None
                }
            }
            BlockPhase::Idle | BlockPhase::Done => None,
        }
    }

    /// A qualifying left/right press at `now_ms`. Captured only inside the
    /// stimulus window, and only the first press of the window is kept.
    pub fn key(&mut self, key: Direction, now_ms: f64) {
        if self.phase != BlockPhase::Stimulus || self.response.is_some() {
            return;
        }
        let rt = (now_ms - self.stimulus_onset_ms).max(0.0);
        self.response = Some(Response {
            key,
            reaction_time_ms: rt,
        });
    }

    fn complete_trial(&mut self, now_ms: f64) -> TrialResult {
        let spec = self.trials[self.trial_cursor];
        let response = self.response.take();

        let result = TrialResult {
            block_index: self.block_index,
            trial_index: self.trial_cursor + 1,
            stimulus_onset_ms: self.stimulus_onset_ms - self.trial_start_ms,
            trial_duration_ms: now_ms - self.trial_start_ms,
            condition: spec.congruency,
            response: response.map(|r| r.key),
            reaction_time_ms: response.map(|r| r.reaction_time_ms),
            is_correct: spec.score(response.map(|r| r.key)),
        };

        self.trial_cursor += 1;
        if self.trial_cursor < self.trials.len() {
            self.begin_trial(now_ms);
        } else {
            self.phase = BlockPhase::Done;
        }

        result
    }

    /// Terminates the block immediately. Results already emitted stand; the
    /// in-flight trial produces nothing.
    pub fn abort(&mut self) {
        self.aborted = true;
        self.phase = BlockPhase::Done;
    }

    pub fn phase(&self) -> BlockPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BlockPhase::Done
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn block_index(&self) -> usize {
        self.block_index
    }

    /// The in-flight trial's spec, for rendering.
    pub fn current_spec(&self) -> Option<&TrialSpec> {
        match self.phase {
            BlockPhase::Fixation | BlockPhase::Stimulus => self.trials.get(self.trial_cursor),
            _ => None,
        }
    }
}
