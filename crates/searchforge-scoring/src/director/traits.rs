// Score director trait definition.

use searchforge_core::domain::PlanningSolution;

// The score director manages solution state and score calculation.
//
// It is responsible for:
// - Owning the working solution
// - Calculating scores on demand
// - Being notified around every planning variable change
// - Producing independent clones for best-solution snapshots and worker forks
pub trait ScoreDirector<S: PlanningSolution>: Send {
    // Returns a reference to the working solution.
    fn working_solution(&self) -> &S;

    // Returns a mutable reference to the working solution.
    fn working_solution_mut(&mut self) -> &mut S;

    // Calculates and returns the current score.
    fn calculate_score(&mut self) -> S::Score;

    // Recalculates the score ignoring any cached or incremental state.
    //
    // Used by the assert environment modes to detect score corruption.
    fn calculate_score_from_scratch(&mut self) -> S::Score {
        self.calculate_score()
    }

    // Clones the working solution.
    fn clone_working_solution(&self) -> S {
        self.working_solution().clone()
    }

    // Replaces the working solution, invalidating any cached score.
    fn set_working_solution(&mut self, solution: S);

    // Called before a planning variable is changed.
    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    // Called after a planning variable is changed.
    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    // Returns the number of planning entities in the working solution.
    fn entity_count(&self) -> usize {
        self.working_solution().entity_count()
    }

    // Returns the number of planning values in the working solution.
    fn value_count(&self) -> usize {
        self.working_solution().value_count()
    }

    // Number of score calculations performed so far.
    fn calculation_count(&self) -> u64 {
        0
    }
}
