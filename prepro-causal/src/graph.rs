use crate::edges::{derive_edges, Adjacency};
use crate::level::assign_levels;
use crate::relevance::compute_relevant;
use prepro_model::{Problem, VarIndex};

/// The causal graph of a [`Problem`]: which variables influence which, which ones are
/// relevant to the goal, and the deterministic level order among the relevant ones.
///
/// Building a `CausalGraph` mutates the `Problem`'s variables in place, assigning each
/// relevant variable its level (and leaving pruned variables unleveled) — the same
/// in-place-mutation-of-a-shared-problem shape as a chronicle preprocessing pass.
pub struct CausalGraph {
    adj: Adjacency,
    acyclic: bool,
    ordering: Vec<VarIndex>,
}

impl CausalGraph {
    /// Builds the causal graph for `problem`, pruning irrelevant variables and leveling the
    /// rest, unless `do_not_prune_variables` is set, in which case every variable is treated
    /// as relevant and leveled.
    pub fn build(problem: &mut Problem, do_not_prune_variables: bool) -> CausalGraph {
        let adj = derive_edges(problem);

        let relevant = if do_not_prune_variables {
            vec![true; problem.vars.len()]
        } else {
            compute_relevant(problem, &adj)
        };

        // By construction, goal marking is the very first relevance step, so no goal
        // variable can still be unmarked here.
        for &(v, _) in &problem.goal.facts {
            debug_assert!(
                do_not_prune_variables || relevant[v.index()],
                "goal references variable {v} that relevance analysis failed to mark"
            );
        }

        let leveling = assign_levels(&adj, &relevant);
        for (level, &v) in leveling.ordering.iter().enumerate() {
            problem.vars.get_mut(v).set_level(level as i32);
        }

        CausalGraph {
            adj,
            acyclic: leveling.acyclic,
            ordering: leveling.ordering,
        }
    }

    pub fn is_acyclic(&self) -> bool {
        self.acyclic
    }

    /// Relevant variables, in level order.
    pub fn variable_ordering(&self) -> &[VarIndex] {
        &self.ordering
    }

    pub fn successors(&self, v: VarIndex) -> impl Iterator<Item = VarIndex> + '_ {
        self.adj.out_edges[v.index()].iter().copied()
    }

    pub fn predecessors(&self, v: VarIndex) -> impl Iterator<Item = VarIndex> + '_ {
        self.adj.in_edges[v.index()].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepro_model::{PreCondition, PrePost, Prevail, State, VarArena, Variable};

    #[test]
    fn irrelevant_variable_is_pruned_and_excluded_from_ordering() {
        let mut vars = VarArena::new();
        let a = vars.push(Variable::new("a", 2, -1, false));
        let b = vars.push(Variable::new("b", 2, -1, false));
        let unrelated = vars.push(Variable::new("u", 2, -1, false));

        let op = prepro_model::Operator {
            name: "op".into(),
            prevail: vec![Prevail { var: a, value: 0 }],
            pre_post: vec![PrePost {
                var: b,
                pre: PreCondition::Any,
                post: 1,
                effect_conds: Vec::new(),
                cost: 0.0,
                runtime_cost_effect: None,
            }],
            pre_block: Vec::new(),
            cost: 1.0,
            runtime_cost: None,
        };

        let state = State::new(vars.len());
        let mut problem = Problem::new("t".into(), vars, state);
        problem.operators = vec![op];
        problem.goal.facts.push((b, 1));

        let cg = CausalGraph::build(&mut problem, false);
        assert!(problem.vars.get(a).is_relevant());
        assert!(problem.vars.get(b).is_relevant());
        assert!(!problem.vars.get(unrelated).is_relevant());
        assert_eq!(cg.variable_ordering().len(), 2);
    }

    #[test]
    fn do_not_prune_keeps_every_variable_relevant() {
        let mut vars = VarArena::new();
        let _a = vars.push(Variable::new("a", 2, -1, false));
        let _b = vars.push(Variable::new("b", 2, -1, false));
        let state = State::new(vars.len());
        let mut problem = Problem::new("t".into(), vars, state);

        let cg = CausalGraph::build(&mut problem, true);
        assert_eq!(cg.variable_ordering().len(), 2);
        assert!(problem.vars.indices().all(|v| problem.vars.get(v).is_relevant()));
    }
}
