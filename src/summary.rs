use crate::trial::{Congruency, TrialResult};
use itertools::Itertools;

/// Debrief-screen aggregate for one congruency condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSummary {
    pub condition: Congruency,
    pub trials: usize,
    pub correct: usize,
    /// Percent of trials answered correctly; missed trials count against it.
    pub accuracy: f64,
    /// Mean RT over responded trials only.
    pub mean_rt_ms: Option<f64>,
    pub rt_std_dev_ms: Option<f64>,
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let count = data.len();
    match count {
        positive if positive > 0 => Some(data.iter().sum::<f64>() / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;
                    diff * diff
                })
                .sum::<f64>()
                / count as f64;
            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Per-congruency rollup of a session's results, congruent first. Conditions
/// with no trials are omitted.
pub fn summarize(results: &[TrialResult]) -> Vec<ConditionSummary> {
    results
        .iter()
        .map(|r| (r.condition, r))
        .into_group_map()
        .into_iter()
        .map(|(condition, group)| {
            let trials = group.len();
            let correct = group.iter().filter(|r| r.is_correct).count();
            let rts: Vec<f64> = group.iter().filter_map(|r| r.reaction_time_ms).collect();
            ConditionSummary {
                condition,
                trials,
                correct,
                accuracy: correct as f64 / trials as f64 * 100.0,
                mean_rt_ms: mean(&rts),
                rt_std_dev_ms: std_dev(&rts),
            }
        })
        .sorted_by_key(|s| s.condition != Congruency::Congruent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::Direction;

    fn result(condition: Congruency, rt: Option<f64>, is_correct: bool) -> TrialResult {
        TrialResult {
            block_index: 1,
            trial_index: 1,
            stimulus_onset_ms: 2000.0,
            trial_duration_ms: 4000.0,
            condition,
            response: rt.map(|_| Direction::Left),
            reaction_time_ms: rt,
            is_correct,
        }
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), Some(0.0));
        assert_eq!(std_dev(&[]), None);
        let sd = std_dev(&[100., 120., 90., 102., 94.]).unwrap();
        assert!((sd - 10.322790320451151).abs() < 1e-9);
    }

    #[test]
    fn test_summary_splits_by_congruency() {
        let results = vec![
            result(Congruency::Congruent, Some(300.0), true),
            result(Congruency::Congruent, Some(500.0), true),
            result(Congruency::Incongruent, Some(450.0), false),
            result(Congruency::Incongruent, None, false),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.len(), 2);

        let congruent = &summary[0];
        assert_eq!(congruent.condition, Congruency::Congruent);
        assert_eq!(congruent.trials, 2);
        assert_eq!(congruent.accuracy, 100.0);
        assert_eq!(congruent.mean_rt_ms, Some(400.0));

        let incongruent = &summary[1];
        assert_eq!(incongruent.trials, 2);
        assert_eq!(incongruent.correct, 0);
        assert_eq!(incongruent.accuracy, 0.0);
        // Missed trial contributes to accuracy but not to RT
        assert_eq!(incongruent.mean_rt_ms, Some(450.0));
    }

    #[test]
    fn test_missed_trials_have_no_rt_stats() {
        let results = vec![result(Congruency::Congruent, None, false)];
        let summary = summarize(&results);
        assert_eq!(summary[0].mean_rt_ms, None);
        assert_eq!(summary[0].rt_std_dev_ms, None);
        assert_eq!(summary[0].accuracy, 0.0);
    }

    #[test]
    fn test_empty_results_empty_summary() {
        assert!(summarize(&[]).is_empty());
    }
}
