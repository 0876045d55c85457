use crate::precondition::PreCondition;
use crate::variable::{VarArena, VarIndex};

/// A condition that must hold throughout the operator's application but that it never changes.
#[derive(Debug, Clone, Copy)]
pub struct Prevail {
    pub var: VarIndex,
    pub value: i32,
}

/// A condition guarding one effect of an operator (as opposed to the operator as a whole).
#[derive(Debug, Clone, Copy)]
pub struct EffCond {
    pub var: VarIndex,
    pub value: i32,
}

/// One effect of an [`Operator`]: a variable whose value may change from `pre` to `post`.
#[derive(Debug, Clone)]
pub struct PrePost {
    pub var: VarIndex,
    pub pre: PreCondition,
    pub post: i32,
    pub effect_conds: Vec<EffCond>,
    /// Meaningful only when `pre` is [`PreCondition::NumericOp`] and `runtime_cost_effect`
    /// is `None`: a plain numeric cost for the effect.
    pub cost: f64,
    /// Meaningful only when `pre` is [`PreCondition::NumericOp`]: a verbatim arithmetic
    /// expression (may reference other variables via `!i!` tokens) instead of a plain cost.
    pub runtime_cost_effect: Option<String>,
}

impl PrePost {
    pub fn is_conditional(&self) -> bool {
        !self.effect_conds.is_empty()
    }

    pub fn has_runtime_cost_effect(&self) -> bool {
        self.runtime_cost_effect.is_some()
    }
}

/// A grounded action: a name, a set of prevail conditions, effects that may change a variable
/// (`pre_post`), and blocking effects (`pre_block`) that never fire but still guard applicability.
#[derive(Debug, Clone)]
pub struct Operator {
    pub name: String,
    pub prevail: Vec<Prevail>,
    pub pre_post: Vec<PrePost>,
    pub pre_block: Vec<PrePost>,
    pub cost: f64,
    /// A verbatim arithmetic expression for the operator's own cost, if any (may reference
    /// other variables via `!i!` tokens), in place of the plain numeric `cost`.
    pub runtime_cost: Option<String>,
}

impl Operator {
    /// An operator with no real effects is useless to a search engine and is dropped by the
    /// stripper.
    pub fn is_redundant(&self) -> bool {
        self.pre_post.is_empty()
    }

    /// Drops effects on variables the causal graph pruned away.
    pub fn strip_unimportant_effects(&mut self, vars: &VarArena) {
        self.pre_post.retain(|pp| vars.get(pp.var).is_relevant());
        self.pre_block.retain(|pp| vars.get(pp.var).is_relevant());
    }

    /// Every variable referenced anywhere in this operator: prevails, effect targets, and
    /// effect conditions.
    pub fn referenced_variables(&self) -> impl Iterator<Item = VarIndex> + '_ {
        self.prevail
            .iter()
            .map(|p| p.var)
            .chain(self.pre_post.iter().map(|pp| pp.var))
            .chain(self.pre_post.iter().flat_map(|pp| pp.effect_conds.iter().map(|ec| ec.var)))
            .chain(self.pre_block.iter().map(|pp| pp.var))
            .chain(self.pre_block.iter().flat_map(|pp| pp.effect_conds.iter().map(|ec| ec.var)))
    }
}
