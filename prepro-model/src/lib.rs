//! The entity model shared by every stage of the preprocessing pipeline: variables, state,
//! operators, axioms, goals, and the top-level [`Problem`] that ties them together.

mod axiom;
mod goal;
mod module;
mod operator;
mod precondition;
mod problem;
mod state;
mod variable;

pub use axiom::Axiom;
pub use goal::{Goal, TimedFact, TimedGoal};
pub use module::{Module, ModuleArg, ModuleFunction};
pub use operator::{EffCond, Operator, PrePost, Prevail};
pub use precondition::PreCondition;
pub use problem::Problem;
pub use state::State;
pub use variable::{VarArena, VarIndex, Variable, UNSET_LEVEL};
