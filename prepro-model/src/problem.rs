use crate::axiom::Axiom;
use crate::goal::{Goal, TimedGoal};
use crate::module::Module;
use crate::operator::Operator;
use crate::state::State;
use crate::variable::{VarArena, VarIndex};

/// The whole grounded planning task: variables, initial state, goal, operators, axioms, and
/// the handful of auxiliary sections (metric, shared variables, modules) that are carried
/// through unchanged by this tool.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub metric: Vec<String>,
    pub vars: VarArena,
    pub state: State,
    /// Variables declared shared in the input (each entry names a variable and its level).
    pub shared: Vec<VarIndex>,
    pub goal: Goal,
    pub timed_goals: Vec<TimedGoal>,
    pub modules: Vec<Module>,
    pub operators: Vec<Operator>,
    pub axioms: Vec<Axiom>,
}

impl Problem {
    pub fn new(name: String, vars: VarArena, state: State) -> Self {
        Problem {
            name,
            metric: Vec::new(),
            vars,
            state,
            shared: Vec::new(),
            goal: Goal::default(),
            timed_goals: Vec::new(),
            modules: Vec::new(),
            operators: Vec::new(),
            axioms: Vec::new(),
        }
    }
}
