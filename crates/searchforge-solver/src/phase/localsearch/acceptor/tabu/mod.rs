//! Tabu search acceptor.

mod size;

use std::collections::{HashMap, VecDeque};
use std::fmt;

use rand::Rng;
use searchforge_core::domain::PlanningSolution;
use searchforge_core::{Result, SolverError};
use smallvec::smallvec;

use super::Acceptor;
use crate::heuristic::r#move::{hash_key, Move, TabuKeys};
use crate::scope::{MoveScope, PhaseScope, StepScope};

pub use size::TabuSizeStrategy;

/// What a tabu list remembers about each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabuScope {
    /// The entities the chosen move changed.
    Entity,

    /// The planning values the chosen move assigned.
    Value,

    /// The chosen move itself.
    Move,

    /// The move that would revert the chosen one.
    UndoMove,

    /// The solution the step arrived at.
    Solution,
}

impl TabuScope {
    fn size_parameter(&self) -> &'static str {
        match self {
            TabuScope::Entity => "entity_tabu_size",
            TabuScope::Value => "value_tabu_size",
            TabuScope::Move => "move_tabu_size",
            TabuScope::UndoMove => "undo_move_tabu_size",
            TabuScope::Solution => "solution_tabu_size",
        }
    }

    fn fading_size_parameter(&self) -> &'static str {
        match self {
            TabuScope::Entity => "fading_entity_tabu_size",
            TabuScope::Value => "fading_value_tabu_size",
            TabuScope::Move => "fading_move_tabu_size",
            TabuScope::UndoMove => "fading_undo_move_tabu_size",
            TabuScope::Solution => "fading_solution_tabu_size",
        }
    }
}

impl fmt::Display for TabuScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabuScope::Entity => write!(f, "entity"),
            TabuScope::Value => write!(f, "value"),
            TabuScope::Move => write!(f, "move"),
            TabuScope::UndoMove => write!(f, "undo move"),
            TabuScope::Solution => write!(f, "solution"),
        }
    }
}

/// Tabu acceptor - rejects worsening moves that touch recently used keys.
///
/// Each committed step taboos the keys of its scope. A key tabooed at step
/// `s` is tabu during steps `s + 1` through `s + tabu_size`. A candidate is
/// tabu if any of its keys is. Tabu candidates still pass when they are at
/// least as good as the last step, or, with aspiration enabled, when they
/// beat the best score.
///
/// With a fading size, a key then fades for `fading_tabu_size` more steps:
/// `k` steps into the fading window a candidate passes with probability
/// `k / (fading_tabu_size + 1)`. The most recently tabooed key of a
/// candidate decides.
///
/// # Example
///
/// ```
/// use searchforge_solver::phase::localsearch::{TabuAcceptor, TabuScope, TabuSizeStrategy};
///
/// let acceptor = TabuAcceptor::new(TabuScope::Entity, TabuSizeStrategy::Fixed(7))
///     .with_fading(TabuSizeStrategy::Fixed(3));
/// assert_eq!(acceptor.scope(), TabuScope::Entity);
/// ```
#[derive(Debug, Clone)]
pub struct TabuAcceptor {
    scope: TabuScope,
    size_strategy: Option<TabuSizeStrategy>,
    fading_size_strategy: Option<TabuSizeStrategy>,
    aspiration_enabled: bool,
    tabu_size: usize,
    fading_tabu_size: usize,
    // key -> step index at which it was last tabooed
    tabu_steps: HashMap<u64, u64>,
    tabu_sequence: VecDeque<u64>,
}

impl TabuAcceptor {
    pub fn new(scope: TabuScope, size_strategy: TabuSizeStrategy) -> Self {
        Self {
            scope,
            size_strategy: Some(size_strategy),
            fading_size_strategy: None,
            aspiration_enabled: true,
            tabu_size: 0,
            fading_tabu_size: 0,
            tabu_steps: HashMap::new(),
            tabu_sequence: VecDeque::new(),
        }
    }

    /// A tabu list whose keys only fade, with no strict tabu window.
    pub fn fading(scope: TabuScope, fading_size_strategy: TabuSizeStrategy) -> Self {
        Self {
            size_strategy: None,
            ..Self::new(scope, fading_size_strategy).with_fading(fading_size_strategy)
        }
    }

    pub fn with_fading(mut self, fading_size_strategy: TabuSizeStrategy) -> Self {
        self.fading_size_strategy = Some(fading_size_strategy);
        self
    }

    pub fn with_aspiration(mut self, enabled: bool) -> Self {
        self.aspiration_enabled = enabled;
        self
    }

    pub fn scope(&self) -> TabuScope {
        self.scope
    }

    pub fn size_strategy(&self) -> Option<TabuSizeStrategy> {
        self.size_strategy
    }

    pub fn fading_size_strategy(&self) -> Option<TabuSizeStrategy> {
        self.fading_size_strategy
    }

    /// Tabu size resolved for the current step.
    pub fn tabu_size(&self) -> usize {
        self.tabu_size
    }

    /// Fading tabu size resolved for the current step.
    pub fn fading_tabu_size(&self) -> usize {
        self.fading_tabu_size
    }

    /// Returns true if `key` is strictly tabu during `step_index`.
    pub fn is_tabu(&self, key: u64, step_index: u64) -> bool {
        self.tabu_age(key, step_index)
            .is_some_and(|age| age <= self.tabu_size as u64)
    }

    /// Steps since `key` was tabooed, while it is still tabu or fading.
    fn tabu_age(&self, key: u64, step_index: u64) -> Option<u64> {
        let window = (self.tabu_size + self.fading_tabu_size) as u64;
        self.tabu_steps
            .get(&key)
            .filter(|&&tabooed_at| tabooed_at < step_index)
            .map(|&tabooed_at| step_index - tabooed_at)
            .filter(|age| *age <= window)
    }

    /// Chance that a candidate `age` steps after its key was tabooed passes.
    fn fading_accept_chance(&self, age: u64) -> f64 {
        let fading_steps = age.saturating_sub(self.tabu_size as u64);
        fading_steps as f64 / (self.fading_tabu_size + 1) as f64
    }

    fn resolve_tabu_size(&mut self, entity_count: usize, value_count: usize) {
        let scope_total = match self.scope {
            TabuScope::Entity => Some(entity_count),
            TabuScope::Value => Some(value_count),
            TabuScope::Move | TabuScope::UndoMove | TabuScope::Solution => None,
        }
        .filter(|total| *total > 0);
        let resolve = |strategy: Option<TabuSizeStrategy>| {
            strategy.map_or(0, |strategy| {
                strategy.determine_tabu_size(entity_count, value_count, scope_total)
            })
        };
        self.tabu_size = resolve(self.size_strategy);
        self.fading_tabu_size = resolve(self.fading_size_strategy);
    }

    fn taboo(&mut self, key: u64, step_index: u64) {
        if self.tabu_steps.insert(key, step_index).is_some() {
            self.tabu_sequence.retain(|k| *k != key);
        }
        self.tabu_sequence.push_back(key);
    }

    fn evict_expired(&mut self, step_index: u64) {
        while let Some(&oldest) = self.tabu_sequence.front() {
            let expired = self
                .tabu_steps
                .get(&oldest)
                .map_or(true, |&tabooed_at| {
                    tabooed_at + (self.tabu_size + self.fading_tabu_size) as u64 <= step_index
                });
            if !expired {
                break;
            }
            self.tabu_sequence.pop_front();
            self.tabu_steps.remove(&oldest);
        }
    }
}

impl<S, M> Acceptor<S, M> for TabuAcceptor
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase_scope: &PhaseScope<S, M>) -> Result<()> {
        if self.size_strategy == Some(TabuSizeStrategy::Fixed(0)) {
            return Err(SolverError::config(
                self.scope.size_parameter(),
                "must be positive, got 0",
            ));
        }
        if self.fading_size_strategy == Some(TabuSizeStrategy::Fixed(0)) {
            return Err(SolverError::config(
                self.scope.fading_size_parameter(),
                "must be positive, got 0",
            ));
        }
        self.tabu_steps.clear();
        self.tabu_sequence.clear();
        self.resolve_tabu_size(phase_scope.entity_count(), phase_scope.value_count());
        Ok(())
    }

    fn step_started(&mut self, phase_scope: &PhaseScope<S, M>, _step_scope: &StepScope<S, M>) {
        self.resolve_tabu_size(phase_scope.entity_count(), phase_scope.value_count());
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        let score = move_scope.score();
        if score >= move_scope.last_step_score() {
            return true;
        }
        let keys: TabuKeys = match self.scope {
            TabuScope::Entity => move_scope.candidate().tabu_entities(),
            TabuScope::Value => move_scope.candidate().tabu_values(move_scope.solution()),
            TabuScope::Move | TabuScope::UndoMove => smallvec![move_scope.candidate().tabu_key()],
            TabuScope::Solution => {
                smallvec![move_scope.solution_key().unwrap_or_else(|| hash_key(&score))]
            }
        };
        let step_index = move_scope.step_index();
        let Some(age) = keys
            .iter()
            .filter_map(|key| self.tabu_age(*key, step_index))
            .min()
        else {
            return true;
        };
        if self.aspiration_enabled && score > move_scope.best_score() {
            return true;
        }
        if age <= self.tabu_size as u64 {
            return false;
        }
        let chance = self.fading_accept_chance(age);
        move_scope.rng().random::<f64>() < chance
    }

    fn step_ended(
        &mut self,
        _phase_scope: &PhaseScope<S, M>,
        step_scope: &StepScope<S, M>,
        solution: &S,
    ) {
        let Some(chosen) = step_scope.chosen_move() else {
            return;
        };
        let keys: TabuKeys = match self.scope {
            TabuScope::Entity => chosen.tabu_entities(),
            TabuScope::Value => chosen.tabu_values(solution),
            TabuScope::Move => smallvec![chosen.tabu_key()],
            TabuScope::UndoMove => match step_scope.undo_move() {
                Some(undo) => smallvec![undo.tabu_key()],
                None => TabuKeys::new(),
            },
            TabuScope::Solution => {
                let fallback = step_scope.score().map(|score| hash_key(&score));
                match solution.tabu_fingerprint().or(fallback) {
                    Some(key) => smallvec![key],
                    None => TabuKeys::new(),
                }
            }
        };
        let step_index = step_scope.step_index();
        for key in keys {
            self.taboo(key, step_index);
        }
        self.evict_expired(step_index);
    }

    fn needs_solution_key(&self) -> bool {
        self.scope == TabuScope::Solution
    }
}
