//! Builder module for constructing solver components from configuration
//!
//! This module provides the wiring between configuration types and
//! the actual solver implementation. Score-typed options are strings in
//! the configuration and are parsed here with the solution's score type.

use searchforge_config::{
    AcceptorConfig, ForagerConfig, GreatDelugeConfig, LocalSearchConfig, LocalSearchType,
    PickEarlyType, StepCountingHillClimbingType, TabuSearchConfig, TerminationConfig,
};
use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::{ParseableScore, Score};
use searchforge_core::{Result, SolverError};
use searchforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::phase::localsearch::{
    AcceptedForager, Acceptor, CompositeAcceptor, GreatDelugeAcceptor, HillClimbingAcceptor,
    LateAcceptanceAcceptor, LateSimulatedAnnealingAcceptor, SimulatedAnnealingAcceptor,
    StepCountingHillClimbingAcceptor, TabuAcceptor, TabuScope, TabuSizeStrategy,
};
use crate::termination::{
    BestScoreTermination, BoxedTerminations, OrTermination, StepCountTermination, Termination,
    TimeTermination, UnimprovedStepCountTermination, UnimprovedTimeTermination,
};

pub const DEFAULT_LATE_ACCEPTANCE_SIZE: usize = 400;
pub const DEFAULT_STEP_COUNTING_HILL_CLIMBING_SIZE: usize = 400;
pub const DEFAULT_ENTITY_TABU_RATIO: f64 = 0.1;

/// Accepted count limit of the tabu search shorthand.
pub const TABU_SEARCH_ACCEPTED_COUNT_LIMIT: usize = 1000;

fn parse_score<Sc: ParseableScore>(parameter: &str, text: &str) -> Result<Sc> {
    Sc::parse(text).map_err(|err| SolverError::config(parameter, format!("'{text}': {err}")))
}

/// Builder for constructing acceptors from configuration.
pub struct AcceptorBuilder;

impl AcceptorBuilder {
    /// Builds the acceptor of a local search phase.
    ///
    /// An explicit acceptor wins; otherwise the local search type (late
    /// acceptance by default) picks one. Configuring both is an error.
    pub fn for_phase<S, M>(config: &LocalSearchConfig) -> Result<Box<dyn Acceptor<S, M>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        M: Move<S>,
    {
        match (&config.acceptor, config.local_search_type) {
            (Some(_), Some(local_search_type)) => Err(SolverError::config(
                "local_search_type",
                format!("{local_search_type:?} cannot be combined with an explicit acceptor"),
            )),
            (Some(acceptor), None) => Self::build(acceptor),
            (None, local_search_type) => {
                Self::build(&Self::shorthand(local_search_type.unwrap_or_default()))
            }
        }
    }

    /// The acceptor configuration a local search type stands for.
    pub fn shorthand(local_search_type: LocalSearchType) -> AcceptorConfig {
        match local_search_type {
            LocalSearchType::HillClimbing => AcceptorConfig::HillClimbing,
            LocalSearchType::TabuSearch => AcceptorConfig::TabuSearch(TabuSearchConfig::default()),
            LocalSearchType::SimulatedAnnealing => {
                AcceptorConfig::SimulatedAnnealing(Default::default())
            }
            LocalSearchType::LateAcceptance => AcceptorConfig::LateAcceptance(Default::default()),
            LocalSearchType::GreatDeluge => AcceptorConfig::GreatDeluge(Default::default()),
            LocalSearchType::StepCountingHillClimbing => {
                AcceptorConfig::StepCountingHillClimbing(Default::default())
            }
        }
    }

    /// Builds an acceptor from configuration.
    pub fn build<S, M>(config: &AcceptorConfig) -> Result<Box<dyn Acceptor<S, M>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        M: Move<S>,
    {
        match config {
            AcceptorConfig::HillClimbing => Ok(Box::new(HillClimbingAcceptor::new())),

            AcceptorConfig::TabuSearch(tabu_config) => Self::tabu_search(tabu_config),

            AcceptorConfig::SimulatedAnnealing(sa_config) => {
                let text = sa_config.starting_temperature.as_deref().ok_or_else(|| {
                    SolverError::config(
                        "starting_temperature",
                        "simulated annealing requires a starting temperature",
                    )
                })?;
                let temperature: S::Score = parse_score("starting_temperature", text)?;
                Ok(Box::new(SimulatedAnnealingAcceptor::new(temperature)))
            }

            AcceptorConfig::LateAcceptance(la_config) => {
                let size = la_config
                    .late_acceptance_size
                    .unwrap_or(DEFAULT_LATE_ACCEPTANCE_SIZE);
                let hill_climbing = la_config.hill_climbing_enabled.unwrap_or(true);
                Ok(Box::new(
                    LateAcceptanceAcceptor::<S::Score>::new(size)
                        .with_hill_climbing(hill_climbing),
                ))
            }

            AcceptorConfig::LateSimulatedAnnealing(lsa_config) => {
                let size = lsa_config
                    .late_simulated_annealing_size
                    .unwrap_or(DEFAULT_LATE_ACCEPTANCE_SIZE);
                Ok(Box::new(LateSimulatedAnnealingAcceptor::<S::Score>::new(size)))
            }

            AcceptorConfig::GreatDeluge(gd_config) => Self::great_deluge(gd_config),

            AcceptorConfig::StepCountingHillClimbing(schc_config) => {
                let size = schc_config
                    .step_counting_hill_climbing_size
                    .unwrap_or(DEFAULT_STEP_COUNTING_HILL_CLIMBING_SIZE);
                let counting_type = schc_config
                    .step_counting_hill_climbing_type
                    .unwrap_or(StepCountingHillClimbingType::Step);
                Ok(Box::new(StepCountingHillClimbingAcceptor::<S::Score>::new(
                    size,
                    counting_type,
                )))
            }

            AcceptorConfig::Composite(composite) => {
                if composite.acceptors.is_empty() {
                    return Err(SolverError::config(
                        "acceptors",
                        "a composite acceptor needs at least one child",
                    ));
                }
                let children = composite
                    .acceptors
                    .iter()
                    .map(Self::build::<S, M>)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(CompositeAcceptor::new(children)))
            }
        }
    }

    fn great_deluge<S, M>(config: &GreatDelugeConfig) -> Result<Box<dyn Acceptor<S, M>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        M: Move<S>,
    {
        let mut acceptor = GreatDelugeAcceptor::<S::Score>::new();
        if let Some(text) = &config.initial_water_level {
            acceptor = acceptor.with_initial_water_level(parse_score("initial_water_level", text)?);
        }
        match (&config.water_level_increment_score, config.water_level_increment_ratio) {
            (Some(_), Some(_)) => {
                return Err(SolverError::config(
                    "water_level_increment_score",
                    "cannot be combined with water_level_increment_ratio",
                ));
            }
            (Some(text), None) => {
                let increment = parse_score("water_level_increment_score", text)?;
                acceptor = acceptor.with_water_level_increment_score(increment);
            }
            (None, Some(ratio)) => {
                if ratio.is_nan() || ratio <= 0.0 {
                    return Err(SolverError::config(
                        "water_level_increment_ratio",
                        format!("must be positive, got {ratio}"),
                    ));
                }
                acceptor = acceptor.with_water_level_increment_ratio(ratio);
            }
            (None, None) => {}
        }
        Ok(Box::new(acceptor))
    }

    /// One tabu acceptor per configured scope; several are combined.
    fn tabu_search<S, M>(config: &TabuSearchConfig) -> Result<Box<dyn Acceptor<S, M>>>
    where
        S: PlanningSolution,
        M: Move<S>,
    {
        let entity = sized_or_ratio(
            "entity_tabu",
            config.entity_tabu_size,
            config.entity_tabu_ratio,
            TabuSizeStrategy::entity_ratio,
        )?;
        let fading_entity = sized_or_ratio(
            "fading_entity_tabu",
            config.fading_entity_tabu_size,
            config.fading_entity_tabu_ratio,
            TabuSizeStrategy::entity_ratio,
        )?;
        let value = sized_or_ratio(
            "value_tabu",
            config.value_tabu_size,
            config.value_tabu_ratio,
            TabuSizeStrategy::value_ratio,
        )?;
        let fading_value = sized_or_ratio(
            "fading_value_tabu",
            config.fading_value_tabu_size,
            config.fading_value_tabu_ratio,
            TabuSizeStrategy::value_ratio,
        )?;
        let fixed = |size: Option<usize>| size.map(TabuSizeStrategy::Fixed);

        let mut lists: Vec<TabuAcceptor> = [
            tabu_list(TabuScope::Entity, entity, fading_entity),
            tabu_list(TabuScope::Value, value, fading_value),
            tabu_list(
                TabuScope::Move,
                fixed(config.move_tabu_size),
                fixed(config.fading_move_tabu_size),
            ),
            tabu_list(
                TabuScope::UndoMove,
                fixed(config.undo_move_tabu_size),
                fixed(config.fading_undo_move_tabu_size),
            ),
            tabu_list(TabuScope::Solution, fixed(config.solution_tabu_size), None),
        ]
        .into_iter()
        .flatten()
        .collect();
        if lists.is_empty() {
            lists.push(TabuAcceptor::new(
                TabuScope::Entity,
                TabuSizeStrategy::entity_ratio(DEFAULT_ENTITY_TABU_RATIO)?,
            ));
        }

        let aspiration = config.aspiration_enabled.unwrap_or(true);
        let mut acceptors: Vec<Box<dyn Acceptor<S, M>>> = lists
            .into_iter()
            .map(|list| Box::new(list.with_aspiration(aspiration)) as Box<dyn Acceptor<S, M>>)
            .collect();
        if acceptors.len() == 1 {
            if let Some(acceptor) = acceptors.pop() {
                return Ok(acceptor);
            }
        }
        Ok(Box::new(CompositeAcceptor::new(acceptors)))
    }
}

fn tabu_list(
    scope: TabuScope,
    size: Option<TabuSizeStrategy>,
    fading_size: Option<TabuSizeStrategy>,
) -> Option<TabuAcceptor> {
    match (size, fading_size) {
        (Some(size), Some(fading_size)) => Some(TabuAcceptor::new(scope, size).with_fading(fading_size)),
        (Some(size), None) => Some(TabuAcceptor::new(scope, size)),
        (None, Some(fading_size)) => Some(TabuAcceptor::fading(scope, fading_size)),
        (None, None) => None,
    }
}

fn sized_or_ratio(
    prefix: &str,
    size: Option<usize>,
    ratio: Option<f64>,
    from_ratio: fn(f64) -> Result<TabuSizeStrategy>,
) -> Result<Option<TabuSizeStrategy>> {
    match (size, ratio) {
        (Some(_), Some(_)) => Err(SolverError::config(
            format!("{prefix}_size"),
            format!("cannot be combined with {prefix}_ratio"),
        )),
        (Some(size), None) => Ok(Some(TabuSizeStrategy::Fixed(size))),
        (None, Some(ratio)) => from_ratio(ratio).map(Some),
        (None, None) => Ok(None),
    }
}

/// Builder for constructing foragers from configuration.
pub struct ForagerBuilder;

impl ForagerBuilder {
    /// Builds the forager of a local search phase.
    ///
    /// Without an explicit forager the local search type decides: tabu
    /// search samples up to 1000 accepted moves, every other type takes the
    /// first accepted move.
    pub fn for_phase<Sc: Score>(
        config: &LocalSearchConfig,
    ) -> Result<AcceptedForager<Sc>> {
        match (&config.forager, config.local_search_type) {
            (Some(_), Some(local_search_type)) => Err(SolverError::config(
                "local_search_type",
                format!("{local_search_type:?} cannot be combined with an explicit forager"),
            )),
            (Some(forager), None) => Self::build(forager),
            (None, local_search_type) => {
                let limit = match local_search_type.unwrap_or_default() {
                    LocalSearchType::TabuSearch => TABU_SEARCH_ACCEPTED_COUNT_LIMIT,
                    _ => 1,
                };
                Ok(AcceptedForager::new(limit, PickEarlyType::Never))
            }
        }
    }

    /// Builds a forager; an absent accepted count limit means unbounded.
    pub fn build<Sc: Score>(config: &ForagerConfig) -> Result<AcceptedForager<Sc>> {
        let limit = match config.accepted_count_limit {
            Some(0) => {
                return Err(SolverError::config(
                    "accepted_count_limit",
                    "must be positive, got 0",
                ))
            }
            Some(limit) => limit,
            None => usize::MAX,
        };
        let forager = AcceptedForager::new(limit, config.pick_early_type.unwrap_or_default())
            .with_finalist_podium(config.finalist_podium_type.unwrap_or_default());
        Ok(match config.break_tie_randomly {
            Some(break_tie_randomly) => forager.with_break_tie_randomly(break_tie_randomly),
            None => forager,
        })
    }
}

/// Builder for constructing terminations from configuration.
pub struct TerminationBuilder;

impl TerminationBuilder {
    /// Builds a termination that fires as soon as any configured limit is hit.
    ///
    /// An empty configuration never terminates.
    pub fn build<S, D>(config: &TerminationConfig) -> Result<OrTermination<BoxedTerminations<S, D>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
    {
        let mut terminations: BoxedTerminations<S, D> = Vec::new();
        if let Some(limit) = config.time_limit() {
            terminations.push(Box::new(TimeTermination::new(limit)));
        }
        if let Some(limit) = config.step_count_limit {
            terminations.push(Box::new(StepCountTermination::new(limit)));
        }
        if let Some(limit) = config.unimproved_step_count_limit {
            terminations.push(Box::new(UnimprovedStepCountTermination::new(limit)));
        }
        if let Some(limit) = config.unimproved_time_limit() {
            terminations.push(Box::new(UnimprovedTimeTermination::new(limit)));
        }
        if let Some(text) = &config.best_score_limit {
            let target: S::Score = parse_score("best_score_limit", text)?;
            terminations.push(Box::new(BestScoreTermination::new(target)));
        }
        Ok(OrTermination::new(terminations))
    }

    /// Like [`build`](Self::build), but `None` for an absent or empty configuration.
    pub fn build_optional<S, D>(
        config: Option<&TerminationConfig>,
    ) -> Result<Option<Box<dyn Termination<S, D>>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S> + 'static,
    {
        match config {
            Some(config) if !config.is_empty() => {
                Ok(Some(Box::new(Self::build::<S, D>(config)?)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
