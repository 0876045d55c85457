use crate::variable::VarIndex;

/// The conjunction of `(var, value)` facts that must hold at the end of the plan.
#[derive(Debug, Clone, Default)]
pub struct Goal {
    pub facts: Vec<(VarIndex, i32)>,
}

/// One fact that must additionally hold at a given absolute time.
#[derive(Debug, Clone, Copy)]
pub struct TimedFact {
    pub var: VarIndex,
    pub value: i32,
    pub time: f64,
}

/// A goal fact `(var, value)` with a set of deadline facts attached to it.
#[derive(Debug, Clone)]
pub struct TimedGoal {
    pub var: VarIndex,
    pub value: i32,
    pub facts: Vec<TimedFact>,
}
