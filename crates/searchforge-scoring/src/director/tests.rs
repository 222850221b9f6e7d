//! Tests for score directors.

use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::SimpleScore;

use super::{DirectorFactory, ScoreDirector, ScoreDirectorFactory, SimpleScoreDirector};

/// Slots holding small integers; every pair of equal slots costs one point.
#[derive(Clone, Debug)]
struct Slots {
    values: Vec<usize>,
    value_range: usize,
    score: Option<SimpleScore>,
}

impl Slots {
    fn new(values: &[usize], value_range: usize) -> Self {
        Self {
            values: values.to_vec(),
            value_range,
            score: None,
        }
    }
}

impl PlanningSolution for Slots {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn entity_count(&self) -> usize {
        self.values.len()
    }

    fn value_count(&self) -> usize {
        self.value_range
    }
}

type SlotsCalculator = fn(&Slots) -> SimpleScore;

fn clashes(slots: &Slots) -> SimpleScore {
    let mut clashes = 0;
    for (i, a) in slots.values.iter().enumerate() {
        clashes += slots.values[i + 1..].iter().filter(|b| *b == a).count() as i64;
    }
    SimpleScore::of(-clashes)
}

fn director(values: &[usize]) -> SimpleScoreDirector<Slots, SlotsCalculator> {
    SimpleScoreDirector::new(Slots::new(values, 4), clashes as SlotsCalculator)
}

#[test]
fn test_score_is_cached_until_change() {
    let mut director = director(&[0, 0, 0, 0]);

    assert_eq!(director.calculate_score(), SimpleScore::of(-6));
    assert_eq!(director.calculate_score(), SimpleScore::of(-6));
    assert_eq!(director.calculation_count(), 1);

    director.before_variable_changed(0, 1, "value");
    director.working_solution_mut().values[1] = 2;
    director.after_variable_changed(0, 1, "value");

    assert_eq!(director.calculate_score(), SimpleScore::of(-3));
    assert_eq!(director.calculation_count(), 2);
    assert_eq!(director.working_solution().score, Some(SimpleScore::of(-3)));
}

#[test]
fn test_from_scratch_always_recalculates() {
    let mut director = director(&[1, 3, 0, 2]);

    director.calculate_score();
    director.calculate_score_from_scratch();
    director.calculate_score_from_scratch();

    assert_eq!(director.calculation_count(), 3);
}

#[test]
fn test_clone_is_independent() {
    let mut director = director(&[0, 1]);
    let snapshot = director.clone_working_solution();

    director.working_solution_mut().values[0] = 1;

    assert_eq!(snapshot.values, vec![0, 1]);
    assert_eq!(director.working_solution().values, vec![1, 1]);
}

#[test]
fn test_set_working_solution_invalidates_cache() {
    let mut director = director(&[0, 0]);
    assert_eq!(director.calculate_score(), SimpleScore::of(-1));

    director.set_working_solution(Slots::new(&[0, 3], 4));
    assert_eq!(director.calculate_score(), SimpleScore::of(0));
}

#[test]
fn test_factory_builds_independent_directors() {
    let factory = ScoreDirectorFactory::new(clashes as SlotsCalculator);
    let mut a = factory.build_score_director(Slots::new(&[0, 0, 1], 3));
    let mut b = factory.build_score_director(Slots::new(&[0, 2, 1], 3));

    a.working_solution_mut().values[2] = 0;

    assert_eq!(a.calculate_score(), SimpleScore::of(-3));
    assert_eq!(b.calculate_score(), SimpleScore::of(0));
    assert_eq!(a.entity_count(), 3);
    assert_eq!(b.value_count(), 3);
}

#[test]
fn test_shared_factory_builds_directors() {
    let factory = std::sync::Arc::new(ScoreDirectorFactory::new(clashes as SlotsCalculator));
    let mut director = factory.build_score_director(Slots::new(&[2, 2], 3));

    assert_eq!(director.calculate_score(), SimpleScore::of(-1));
}
