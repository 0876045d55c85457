use prepro_model::Problem;

/// Drops effects (and blocking effects) on pruned variables, then drops operators left with
/// no effect at all. Returns `(kept, before)`.
pub fn strip_operators(problem: &mut Problem) -> (usize, usize) {
    let before = problem.operators.len();
    let Problem { vars, operators, .. } = problem;
    for op in operators.iter_mut() {
        op.strip_unimportant_effects(vars);
    }
    operators.retain(|op| !op.is_redundant());
    (operators.len(), before)
}

/// Drops axioms whose head variable was pruned. Returns `(kept, before)`.
pub fn strip_axioms(problem: &mut Problem) -> (usize, usize) {
    let before = problem.axioms.len();
    let Problem { vars, axioms, .. } = problem;
    axioms.retain(|axiom| !axiom.is_redundant(vars));
    (axioms.len(), before)
}
