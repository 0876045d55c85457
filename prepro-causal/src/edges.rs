use prepro_model::{PreCondition, Problem, VarIndex};
use std::collections::BTreeSet;

/// Directed adjacency of the causal graph, indexed by [`VarIndex`].
pub struct Adjacency {
    pub out_edges: Vec<BTreeSet<VarIndex>>,
    pub in_edges: Vec<BTreeSet<VarIndex>>,
}

impl Adjacency {
    fn new(n: usize) -> Self {
        Adjacency {
            out_edges: vec![BTreeSet::new(); n],
            in_edges: vec![BTreeSet::new(); n],
        }
    }

    fn add_edge(&mut self, from: VarIndex, to: VarIndex) {
        if from == to {
            return; // self-loops never contribute to leveling or relevance
        }
        self.out_edges[from.index()].insert(to);
        self.in_edges[to.index()].insert(from);
    }
}

/// Derives the causal graph's edges from every operator and axiom: an edge `u -> v` exists
/// whenever some operator/axiom both mentions `u` in a condition (a prevail, the pre-value of
/// one of its own `PrePost`/`pre_block` effects, or an effect condition) and mentions `v` as
/// an effect target (the variable of one of its `pre_post`/`pre_block` entries, or an axiom's
/// head). A `PrePost`'s own pre-value contributes a self-loop to its own target, which is
/// dropped, but a real edge to every *other* effect target in the same operator: its pre-value
/// is just as much a precondition of the operator as an explicit prevail.
pub fn derive_edges(problem: &Problem) -> Adjacency {
    let mut adj = Adjacency::new(problem.vars.len());

    for op in &problem.operators {
        let mut condition_vars: BTreeSet<VarIndex> = op.prevail.iter().map(|p| p.var).collect();
        for pp in op.pre_post.iter().chain(op.pre_block.iter()) {
            if let PreCondition::Value(_) = pp.pre {
                condition_vars.insert(pp.var);
            }
            for ec in &pp.effect_conds {
                condition_vars.insert(ec.var);
            }
        }
        let effect_targets: BTreeSet<VarIndex> = op
            .pre_post
            .iter()
            .chain(op.pre_block.iter())
            .map(|pp| pp.var)
            .collect();
        for &u in &condition_vars {
            for &v in &effect_targets {
                adj.add_edge(u, v);
            }
        }
    }

    for axiom in &problem.axioms {
        let mut condition_vars: BTreeSet<VarIndex> = axiom.body.iter().map(|p| p.var).collect();
        for ec in &axiom.effect.effect_conds {
            condition_vars.insert(ec.var);
        }
        let head = axiom.effect.var;
        for &u in &condition_vars {
            adj.add_edge(u, head);
        }
    }

    adj
}
