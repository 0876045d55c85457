use crate::edges::Adjacency;
use prepro_model::{Problem, VarIndex};
use std::collections::VecDeque;

/// Backward-reachability pruning: a variable is relevant if it appears in the goal (including
/// timed goals), or if it has an edge into some already-relevant variable. Everything else is
/// dead weight for this task and is pruned.
pub fn compute_relevant(problem: &Problem, adj: &Adjacency) -> Vec<bool> {
    let n = problem.vars.len();
    let mut relevant = vec![false; n];
    let mut queue: VecDeque<VarIndex> = VecDeque::new();

    fn mark(v: VarIndex, relevant: &mut [bool], queue: &mut VecDeque<VarIndex>) {
        if !relevant[v.index()] {
            relevant[v.index()] = true;
            queue.push_back(v);
        }
    }

    for &(v, _) in &problem.goal.facts {
        mark(v, &mut relevant, &mut queue);
    }
    for tg in &problem.timed_goals {
        mark(tg.var, &mut relevant, &mut queue);
        for f in &tg.facts {
            mark(f.var, &mut relevant, &mut queue);
        }
    }

    while let Some(v) = queue.pop_front() {
        for &u in &adj.in_edges[v.index()] {
            mark(u, &mut relevant, &mut queue);
        }
    }

    relevant
}
