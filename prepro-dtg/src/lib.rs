//! Domain transition graphs and the tractability probe.

use prepro_model::{PreCondition, PrePost, Problem, VarArena, VarIndex};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// The single aggregate node used for numeric (non-enumerated) transitions.
pub const NUMERIC_NODE: i32 = -1;

/// One labeled transition of a [`Dtg`]: `from -> to`, guarded by the conditions of the
/// operator or axiom that contributed it (so the same operator touching several variables
/// shows up as one arc per variable, each carrying the full condition set).
#[derive(Debug, Clone)]
pub struct DtgArc {
    pub from: i32,
    pub to: i32,
    pub operator_name: String,
    pub conditions: Vec<(VarIndex, i32)>,
}

/// The domain transition graph of a single variable: nodes are its values (or the single
/// aggregate node [`NUMERIC_NODE`] for numeric variables), arcs are effects that change it.
#[derive(Debug, Clone)]
pub struct Dtg {
    pub var: VarIndex,
    pub arcs: Vec<DtgArc>,
}

/// Builds one [`Dtg`] per relevant variable, in `ordering`'s order, from every operator's and
/// axiom's effects that target it.
pub fn build_dtgs(problem: &Problem, ordering: &[VarIndex]) -> Vec<Dtg> {
    let index_of: HashMap<VarIndex, usize> = ordering.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let mut dtgs: Vec<Dtg> = ordering.iter().map(|&v| Dtg { var: v, arcs: Vec::new() }).collect();

    for op in &problem.operators {
        let base: Vec<(VarIndex, i32)> = op.prevail.iter().map(|p| (p.var, p.value)).collect();
        for pp in op.pre_post.iter().chain(op.pre_block.iter()) {
            add_effect(&mut dtgs, &index_of, &problem.vars, pp, &op.name, &base);
        }
    }
    for axiom in &problem.axioms {
        let base: Vec<(VarIndex, i32)> = axiom.body.iter().map(|p| (p.var, p.value)).collect();
        add_effect(&mut dtgs, &index_of, &problem.vars, &axiom.effect, "<axiom>", &base);
    }

    dtgs
}

fn add_effect(
    dtgs: &mut [Dtg],
    index_of: &HashMap<VarIndex, usize>,
    vars: &VarArena,
    pp: &PrePost,
    op_name: &str,
    base_conditions: &[(VarIndex, i32)],
) {
    let idx = match index_of.get(&pp.var) {
        Some(&i) => i,
        None => return, // effect on a pruned variable; strip_operators/strip_axioms remove these
    };
    let range = vars.get(pp.var).range();
    let mut conditions = base_conditions.to_vec();
    conditions.extend(pp.effect_conds.iter().map(|e| (e.var, e.value)));

    match pp.pre {
        PreCondition::Value(v) => {
            dtgs[idx].arcs.push(DtgArc {
                from: v,
                to: pp.post,
                operator_name: op_name.to_string(),
                conditions,
            });
        }
        PreCondition::Any if range > 0 => {
            for from in 0..range {
                dtgs[idx].arcs.push(DtgArc {
                    from,
                    to: pp.post,
                    operator_name: op_name.to_string(),
                    conditions: conditions.clone(),
                });
            }
        }
        PreCondition::Any | PreCondition::NumericOp(_) | PreCondition::Block(_) => {
            dtgs[idx].arcs.push(DtgArc {
                from: NUMERIC_NODE,
                to: pp.post,
                operator_name: op_name.to_string(),
                conditions,
            });
        }
    }
}

/// Whether a finite-range variable's DTG is strongly connected: every value reachable from
/// every other. Numeric variables (`range <= 0`) are excluded from this probe entirely.
pub fn is_strongly_connected(dtg: &Dtg, range: i32) -> bool {
    if range <= 1 {
        return true;
    }
    let n = range as usize;
    let mut adj: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for arc in &dtg.arcs {
        if arc.from < 0 || arc.to < 0 {
            continue;
        }
        let (from, to) = (arc.from as usize, arc.to as usize);
        if from < n && to < n {
            adj[from].insert(to);
        }
    }
    reaches_every_node(&adj, n) && reaches_every_node(&reverse(&adj, n), n)
}

fn reverse(adj: &[BTreeSet<usize>], n: usize) -> Vec<BTreeSet<usize>> {
    let mut radj: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for (u, neighbors) in adj.iter().enumerate() {
        for &v in neighbors {
            radj[v].insert(u);
        }
    }
    radj
}

fn reaches_every_node(adj: &[BTreeSet<usize>], n: usize) -> bool {
    let mut seen = vec![false; n];
    let mut queue = VecDeque::new();
    seen[0] = true;
    queue.push_back(0usize);
    while let Some(u) = queue.pop_front() {
        for &v in &adj[u] {
            if !seen[v] {
                seen[v] = true;
                queue.push_back(v);
            }
        }
    }
    seen.iter().all(|&s| s)
}

/// The overall tractability probe: a task is solvable in polynomial time only if the causal
/// graph is acyclic *and* every finite-range relevant variable's DTG is strongly connected.
pub fn tractable(causal_graph_acyclic: bool, dtgs: &[Dtg], vars: &VarArena) -> bool {
    causal_graph_acyclic
        && dtgs.iter().all(|dtg| {
            let range = vars.get(dtg.var).range();
            range <= 0 || is_strongly_connected(dtg, range)
        })
}
