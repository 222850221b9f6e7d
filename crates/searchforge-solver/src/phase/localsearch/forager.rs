//! Foragers for local search move selection
//!
//! Foragers watch the scored candidates of a step and pick the one to
//! commit. They only see candidate indices and scores; the phase owns the
//! moves themselves.

use std::cmp::Ordering;
use std::fmt::Debug;

use rand::{Rng, RngCore};
use searchforge_config::{FinalistPodiumType, PickEarlyType};
use searchforge_core::score::Score;
use searchforge_core::{Result, SolverError};

/// Trait for picking the winning candidate of a step.
///
/// Foragers are responsible for:
/// - Tracking the best accepted candidate of the step
/// - Deciding when to quit evaluating early
/// - Picking the candidate to commit
///
/// # Type Parameters
/// * `Sc` - The score type
pub trait LocalSearchForager<Sc: Score>: Send + Debug {
    /// Checks the forager's settings before the first step of a phase.
    fn phase_started(&mut self) -> Result<()> {
        Ok(())
    }

    /// Resets the forager for a new step.
    fn step_started(&mut self, last_step_score: Sc, best_score: Sc);

    /// Records an evaluated candidate and whether the acceptor accepted it.
    fn add_move_index(&mut self, move_index: usize, score: Sc, accepted: bool);

    /// Returns true if no further candidates need to be evaluated this step.
    fn is_quit_early(&self) -> bool;

    /// Picks the winning candidate, or `None` if nothing was accepted.
    fn pick_move_index(&mut self, rng: &mut dyn RngCore) -> Option<(usize, Sc)>;

    /// Highest score among the step's rejected candidates, for diagnostics.
    fn max_unaccepted_score(&self) -> Option<Sc> {
        None
    }
}

/// Picks the best accepted candidate of a step.
///
/// Evaluation stops once `accepted_count_limit` candidates were accepted,
/// or at the first candidate satisfying the pick-early rule. Rejected
/// candidates are never picked. "Best" is decided by the finalist podium:
/// plain score order by default, or strategic oscillation by level.
///
/// # Example
///
/// ```
/// use searchforge_config::PickEarlyType;
/// use searchforge_core::SimpleScore;
/// use searchforge_solver::phase::localsearch::{AcceptedForager, LocalSearchForager};
/// use rand::SeedableRng;
///
/// let mut forager = AcceptedForager::<SimpleScore>::new(usize::MAX, PickEarlyType::Never);
/// forager.step_started(SimpleScore::of(-5), SimpleScore::of(-5));
/// forager.add_move_index(0, SimpleScore::of(-4), true);
/// forager.add_move_index(1, SimpleScore::of(-3), false);
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
/// assert_eq!(forager.pick_move_index(&mut rng), Some((0, SimpleScore::of(-4))));
/// ```
#[derive(Debug, Clone)]
pub struct AcceptedForager<Sc: Score> {
    pick_early_type: PickEarlyType,
    accepted_count_limit: usize,
    break_tie_randomly: bool,
    podium: FinalistPodiumType,
    last_step_score: Option<Sc>,
    best_score: Option<Sc>,
    accepted_count: usize,
    // every accepted candidate sharing the finalist score so far
    winners: Vec<(usize, Sc)>,
    early_pick: Option<(usize, Sc)>,
    max_unaccepted: Option<(usize, Sc)>,
}

impl<Sc: Score> AcceptedForager<Sc> {
    /// Creates a forager.
    ///
    /// Ties are broken randomly by default only when `accepted_count_limit`
    /// is unbounded (`usize::MAX`).
    pub fn new(accepted_count_limit: usize, pick_early_type: PickEarlyType) -> Self {
        Self {
            pick_early_type,
            accepted_count_limit,
            break_tie_randomly: accepted_count_limit == usize::MAX,
            podium: FinalistPodiumType::HighestScore,
            last_step_score: None,
            best_score: None,
            accepted_count: 0,
            winners: Vec::new(),
            early_pick: None,
            max_unaccepted: None,
        }
    }

    pub fn with_break_tie_randomly(mut self, break_tie_randomly: bool) -> Self {
        self.break_tie_randomly = break_tie_randomly;
        self
    }

    pub fn with_finalist_podium(mut self, podium: FinalistPodiumType) -> Self {
        self.podium = podium;
        self
    }

    pub fn finalist_podium(&self) -> FinalistPodiumType {
        self.podium
    }

    pub fn accepted_count_limit(&self) -> usize {
        self.accepted_count_limit
    }

    pub fn pick_early_type(&self) -> PickEarlyType {
        self.pick_early_type
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted_count
    }

    /// Highest-scoring rejected candidate of the step. Never picked.
    pub fn max_unaccepted(&self) -> Option<(usize, Sc)> {
        self.max_unaccepted
    }

    fn oscillation_reference(&self) -> Option<Sc> {
        match self.podium {
            FinalistPodiumType::HighestScore => None,
            podium if podium.references_best_score() => self.best_score,
            _ => self.last_step_score,
        }
    }

    /// Orders a candidate against the current finalist.
    ///
    /// Oscillation only applies while neither has beaten the reference
    /// score. Scanning levels from the most significant, the first level
    /// where exactly one of the two rises above the reference decides in
    /// its favour; a level where both rise falls back to plain order.
    fn compare_to_finalist(&self, score: Sc, finalist: Sc) -> Ordering {
        if let Some(reference) = self.oscillation_reference() {
            if finalist <= reference && score < reference {
                let reference_levels = reference.to_level_doubles();
                let score_levels = score.to_level_doubles();
                let finalist_levels = finalist.to_level_doubles();
                for (level, reference_level) in reference_levels.iter().enumerate() {
                    let score_higher = score_levels[level] > *reference_level;
                    let finalist_higher = finalist_levels[level] > *reference_level;
                    match (score_higher, finalist_higher) {
                        (true, true) => break,
                        (true, false) => return Ordering::Greater,
                        (false, true) => return Ordering::Less,
                        (false, false) => {}
                    }
                }
            }
        }
        score.cmp(&finalist)
    }

    fn is_early_pick(&self, score: Sc) -> bool {
        match self.pick_early_type {
            PickEarlyType::Never => false,
            PickEarlyType::FirstBestScoreImproving => {
                self.best_score.is_some_and(|best| score > best)
            }
            PickEarlyType::FirstLastStepScoreImproving => {
                self.last_step_score.is_some_and(|last| score > last)
            }
        }
    }
}

impl<Sc: Score> LocalSearchForager<Sc> for AcceptedForager<Sc> {
    fn phase_started(&mut self) -> Result<()> {
        if self.accepted_count_limit == 0 {
            return Err(SolverError::config(
                "accepted_count_limit",
                "must be positive, got 0",
            ));
        }
        Ok(())
    }

    fn step_started(&mut self, last_step_score: Sc, best_score: Sc) {
        self.last_step_score = Some(last_step_score);
        self.best_score = Some(best_score);
        self.accepted_count = 0;
        self.winners.clear();
        self.early_pick = None;
        self.max_unaccepted = None;
    }

    fn add_move_index(&mut self, move_index: usize, score: Sc, accepted: bool) {
        if !accepted {
            if self.max_unaccepted.map_or(true, |(_, max)| score > max) {
                self.max_unaccepted = Some((move_index, score));
            }
            return;
        }

        self.accepted_count += 1;
        let ordering = self
            .winners
            .first()
            .map_or(Ordering::Greater, |(_, finalist)| {
                self.compare_to_finalist(score, *finalist)
            });
        match ordering {
            Ordering::Less => {}
            Ordering::Equal => self.winners.push((move_index, score)),
            Ordering::Greater => {
                self.winners.clear();
                self.winners.push((move_index, score));
            }
        }
        if self.early_pick.is_none() && self.is_early_pick(score) {
            self.early_pick = Some((move_index, score));
        }
    }

    fn is_quit_early(&self) -> bool {
        self.early_pick.is_some() || self.accepted_count >= self.accepted_count_limit
    }

    fn pick_move_index(&mut self, rng: &mut dyn RngCore) -> Option<(usize, Sc)> {
        if let Some(pick) = self.early_pick {
            return Some(pick);
        }
        match self.winners.len() {
            0 => None,
            1 => self.winners.first().copied(),
            n if self.break_tie_randomly => self.winners.get(rng.random_range(0..n)).copied(),
            _ => self.winners.first().copied(),
        }
    }

    fn max_unaccepted_score(&self) -> Option<Sc> {
        self.max_unaccepted.map(|(_, score)| score)
    }
}

#[cfg(test)]
mod tests {
    use searchforge_core::score::{HardMediumSoftScore, HardSoftScore, SimpleScore};

    use super::*;
    use crate::test_utils::ScriptedRng;

    fn started(limit: usize, pick_early_type: PickEarlyType) -> AcceptedForager<SimpleScore> {
        let mut forager = AcceptedForager::new(limit, pick_early_type);
        forager.step_started(SimpleScore::of(-10), SimpleScore::of(-5));
        forager
    }

    #[test]
    fn test_picks_highest_accepted_score() {
        let mut forager = started(usize::MAX, PickEarlyType::Never);
        forager.add_move_index(0, SimpleScore::of(-9), true);
        forager.add_move_index(1, SimpleScore::of(-7), true);
        forager.add_move_index(2, SimpleScore::of(-1), false);
        forager.add_move_index(3, SimpleScore::of(-8), true);

        assert!(!forager.is_quit_early());
        let mut rng = ScriptedRng::new(&[0.5]);
        assert_eq!(
            forager.pick_move_index(&mut rng),
            Some((1, SimpleScore::of(-7)))
        );
        assert_eq!(forager.max_unaccepted(), Some((2, SimpleScore::of(-1))));
    }

    #[test]
    fn test_no_accepted_moves_means_no_winner() {
        let mut forager = started(usize::MAX, PickEarlyType::Never);
        forager.add_move_index(0, SimpleScore::of(-12), false);
        forager.add_move_index(1, SimpleScore::of(-11), false);

        let mut rng = ScriptedRng::new(&[0.5]);
        assert_eq!(forager.pick_move_index(&mut rng), None);
        assert_eq!(forager.max_unaccepted(), Some((1, SimpleScore::of(-11))));
    }

    #[test]
    fn test_accepted_count_limit_quits_early() {
        let mut forager = started(2, PickEarlyType::Never);
        forager.add_move_index(0, SimpleScore::of(-9), true);
        assert!(!forager.is_quit_early());
        forager.add_move_index(1, SimpleScore::of(-12), false);
        assert!(!forager.is_quit_early());
        forager.add_move_index(2, SimpleScore::of(-9), true);
        assert!(forager.is_quit_early());

        // ties are not broken randomly with a bounded limit
        let mut rng = ScriptedRng::new(&[0.9]);
        assert_eq!(
            forager.pick_move_index(&mut rng),
            Some((0, SimpleScore::of(-9)))
        );
    }

    #[test]
    fn test_ties_broken_by_random_source() {
        let mut forager = started(usize::MAX, PickEarlyType::Never);
        for index in 0..4 {
            forager.add_move_index(index, SimpleScore::of(-6), true);
        }

        let mut rng = ScriptedRng::new(&[0.0]);
        let picked = forager.pick_move_index(&mut rng).map(|(index, _)| index);
        assert!(matches!(picked, Some(0..=3)));
        assert!(rng.draw_count() >= 1);
    }

    #[test]
    fn test_pick_early_on_last_step_improvement() {
        let mut forager = started(usize::MAX, PickEarlyType::FirstLastStepScoreImproving);
        forager.add_move_index(0, SimpleScore::of(-10), true);
        assert!(!forager.is_quit_early());
        forager.add_move_index(1, SimpleScore::of(-8), true);
        assert!(forager.is_quit_early());

        let mut rng = ScriptedRng::new(&[0.5]);
        assert_eq!(
            forager.pick_move_index(&mut rng),
            Some((1, SimpleScore::of(-8)))
        );
    }

    #[test]
    fn test_pick_early_on_best_improvement() {
        let mut forager = started(usize::MAX, PickEarlyType::FirstBestScoreImproving);
        forager.add_move_index(0, SimpleScore::of(-8), true);
        assert!(!forager.is_quit_early());
        forager.add_move_index(1, SimpleScore::of(-4), true);
        assert!(forager.is_quit_early());
    }

    #[test]
    fn test_step_started_resets_state() {
        let mut forager = started(1, PickEarlyType::Never);
        forager.add_move_index(0, SimpleScore::of(-9), true);
        assert!(forager.is_quit_early());

        forager.step_started(SimpleScore::of(-9), SimpleScore::of(-5));
        assert!(!forager.is_quit_early());
        assert_eq!(forager.accepted_count(), 0);
        let mut rng = ScriptedRng::new(&[0.5]);
        assert_eq!(forager.pick_move_index(&mut rng), None);
    }

    #[test]
    fn test_zero_accepted_count_limit_fails_at_phase_start() {
        let mut forager = AcceptedForager::<SimpleScore>::new(0, PickEarlyType::Never);
        let err = forager.phase_started().unwrap_err();
        assert!(matches!(
            err,
            SolverError::Config { ref parameter, .. } if parameter == "accepted_count_limit"
        ));

        let mut forager = AcceptedForager::<SimpleScore>::new(1, PickEarlyType::Never);
        assert!(forager.phase_started().is_ok());
    }

    fn oscillating(podium: FinalistPodiumType) -> AcceptedForager<HardSoftScore> {
        AcceptedForager::new(usize::MAX, PickEarlyType::Never)
            .with_break_tie_randomly(false)
            .with_finalist_podium(podium)
    }

    fn pick<Sc: Score>(forager: &mut AcceptedForager<Sc>, scores: &[Sc]) -> Option<Sc> {
        for (index, score) in scores.iter().enumerate() {
            forager.add_move_index(index, *score, true);
        }
        let mut rng = ScriptedRng::new(&[0.5]);
        forager.pick_move_index(&mut rng).map(|(_, score)| score)
    }

    #[test]
    fn test_oscillation_against_last_step_score() {
        let hs = HardSoftScore::of;
        let mut forager = oscillating(FinalistPodiumType::StrategicOscillationByLevel);

        forager.step_started(hs(-200, -5000), hs(-200, -5000));
        let step = [hs(-150, -2000), hs(-100, -7000), hs(-100, -7100), hs(-200, -1000)];
        assert_eq!(pick(&mut forager, &step), Some(hs(-100, -7000)));

        // nothing improves on -100hard/-7000soft, so the soft level oscillates
        forager.step_started(hs(-100, -7000), hs(-100, -7000));
        let step = [
            hs(-100, -8000),
            hs(-100, -7000),
            hs(-150, -3000),
            hs(-120, -4000),
            hs(-150, -2000),
            hs(-200, -1000),
        ];
        assert_eq!(pick(&mut forager, &step), Some(hs(-120, -4000)));

        forager.step_started(hs(-120, -4000), hs(-100, -7000));
        let step = [
            hs(-120, -4000),
            hs(-120, -5000),
            hs(-150, -3000),
            hs(-150, -1000),
            hs(-150, -2000),
            hs(-160, -500),
        ];
        assert_eq!(pick(&mut forager, &step), Some(hs(-150, -1000)));
    }

    #[test]
    fn test_oscillation_against_best_score() {
        let hs = HardSoftScore::of;
        let mut forager = oscillating(FinalistPodiumType::StrategicOscillationByLevelOnBestScore);

        // the last step score differs from the best; only the best counts
        forager.step_started(hs(-120, -4000), hs(-100, -7000));
        let step = [
            hs(-110, -8000),
            hs(-150, -3000),
            hs(-150, -1000),
            hs(-110, -6000),
            hs(-150, -2000),
            hs(-160, -500),
        ];
        assert_eq!(pick(&mut forager, &step), Some(hs(-110, -6000)));
    }

    #[test]
    fn test_highest_score_ignores_levels() {
        let hs = HardSoftScore::of;
        let mut forager = oscillating(FinalistPodiumType::HighestScore);
        forager.step_started(hs(-100, -7000), hs(-100, -7000));
        let step = [hs(-100, -8000), hs(-150, -3000), hs(-120, -4000)];
        assert_eq!(pick(&mut forager, &step), Some(hs(-100, -8000)));
    }

    #[test]
    fn test_oscillation_always_prefers_an_improving_move() {
        let hms = HardMediumSoftScore::of;
        let mut forager = AcceptedForager::new(usize::MAX, PickEarlyType::Never)
            .with_finalist_podium(FinalistPodiumType::StrategicOscillation);
        forager.step_started(hms(0, -2, -3), hms(0, -2, -3));
        let step = [hms(-1, -1, -3), hms(0, -2, -1)];
        assert_eq!(pick(&mut forager, &step), Some(hms(0, -2, -1)));
    }
}
