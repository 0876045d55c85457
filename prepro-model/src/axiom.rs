use crate::operator::{EffCond, PrePost, Prevail};
use crate::variable::{VarArena, VarIndex};

/// A derivation rule: if every condition in `body` holds, `effect` fires.
///
/// Same shape as [`Operator`](crate::Operator) for the purposes of dependency analysis (a
/// body condition is just a [`Prevail`], the single derived value is a [`PrePost`]), but
/// without a cost: axioms are logical, not actions.
#[derive(Debug, Clone)]
pub struct Axiom {
    pub body: Vec<Prevail>,
    pub effect: PrePost,
}

impl Axiom {
    /// Every variable this axiom's dependency edges touch: the body conditions and the
    /// effect's own condition guards (if any), plus the head itself.
    pub fn referenced_variables(&self) -> impl Iterator<Item = VarIndex> + '_ {
        self.body
            .iter()
            .map(|p| p.var)
            .chain(self.effect.effect_conds.iter().map(|ec: &EffCond| ec.var))
            .chain(std::iter::once(self.effect.var))
    }

    /// An axiom whose head was pruned away by relevance analysis is dropped entirely: unlike
    /// an operator, it carries exactly one effect, so there's nothing left to partially strip.
    pub fn is_redundant(&self, vars: &VarArena) -> bool {
        !vars.get(self.effect.var).is_relevant()
    }
}
