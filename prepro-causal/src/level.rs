use crate::edges::Adjacency;
use prepro_model::VarIndex;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

pub struct Leveling {
    /// Relevant variables, in level order (the position in this vector *is* the level).
    pub ordering: Vec<VarIndex>,
    /// True iff every strongly connected component of the relevant-induced causal graph is
    /// trivial (a single variable, no self-loop — self-loops are never recorded as edges).
    pub acyclic: bool,
}

/// Computes a deterministic topological order (with cycles broken, never simply skipped) over
/// the relevant-induced causal graph.
///
/// Uses Tarjan's algorithm (iterative, to keep stack depth independent of task size) to find
/// strongly connected components, then walks the condensation DAG with Kahn's algorithm,
/// always picking the ready component whose smallest-input-index member is smallest; members
/// within a component are emitted in input-index order. This is the one tie-break rule that
/// makes the level assignment reproducible regardless of iteration order elsewhere.
pub fn assign_levels(adj: &Adjacency, relevant: &[bool]) -> Leveling {
    let sccs = tarjan_sccs(adj, relevant);
    let acyclic = sccs.iter().all(|scc| scc.len() == 1);
    let ordering = topo_order_sccs(adj, relevant, sccs);
    Leveling { ordering, acyclic }
}

fn tarjan_sccs(adj: &Adjacency, relevant: &[bool]) -> Vec<Vec<VarIndex>> {
    let n = relevant.len();
    let mut index: Vec<i64> = vec![-1; n];
    let mut low: Vec<i64> = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index: i64 = 0;
    let mut sccs = Vec::new();

    let neighbors: Vec<Vec<usize>> = (0..n)
        .map(|v| {
            if !relevant[v] {
                Vec::new()
            } else {
                adj.out_edges[v].iter().map(|w| w.index()).filter(|&w| relevant[w]).collect()
            }
        })
        .collect();

    struct WorkItem {
        v: usize,
        pos: usize,
    }
    let mut call_stack: Vec<WorkItem> = Vec::new();

    for start in 0..n {
        if !relevant[start] || index[start] != -1 {
            continue;
        }
        index[start] = next_index;
        low[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start] = true;
        call_stack.push(WorkItem { v: start, pos: 0 });

        while let Some(item) = call_stack.last_mut() {
            let v = item.v;
            if item.pos < neighbors[v].len() {
                let w = neighbors[v][item.pos];
                item.pos += 1;
                if index[w] == -1 {
                    index[w] = next_index;
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call_stack.push(WorkItem { v: w, pos: 0 });
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
            } else {
                call_stack.pop();
                if let Some(parent) = call_stack.last() {
                    let p = parent.v;
                    low[p] = low[p].min(low[v]);
                }
                if low[v] == index[v] {
                    let mut component = Vec::new();
                    loop {
                        let w = stack.pop().expect("Tarjan stack underflow");
                        on_stack[w] = false;
                        component.push(VarIndex::new(w));
                        if w == v {
                            break;
                        }
                    }
                    sccs.push(component);
                }
            }
        }
    }
    sccs
}

fn topo_order_sccs(adj: &Adjacency, relevant: &[bool], sccs: Vec<Vec<VarIndex>>) -> Vec<VarIndex> {
    let n = relevant.len();
    let mut comp_of: Vec<usize> = vec![usize::MAX; n];
    for (ci, comp) in sccs.iter().enumerate() {
        for &v in comp {
            comp_of[v.index()] = ci;
        }
    }
    let num_comps = sccs.len();
    let mut succs: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); num_comps];
    let mut indegree = vec![0usize; num_comps];
    for v in 0..n {
        if !relevant[v] {
            continue;
        }
        let cv = comp_of[v];
        for &w in &adj.out_edges[v] {
            if !relevant[w.index()] {
                continue;
            }
            let cw = comp_of[w.index()];
            if cv != cw && succs[cv].insert(cw) {
                indegree[cw] += 1;
            }
        }
    }
    let min_index: Vec<usize> = sccs.iter().map(|c| c.iter().map(|v| v.index()).min().unwrap()).collect();

    let mut heap: BinaryHeap<Reverse<(usize, usize)>> = BinaryHeap::new();
    for ci in 0..num_comps {
        if indegree[ci] == 0 {
            heap.push(Reverse((min_index[ci], ci)));
        }
    }

    let mut ordering = Vec::new();
    let mut processed = vec![false; num_comps];
    while let Some(Reverse((_, ci))) = heap.pop() {
        if processed[ci] {
            continue;
        }
        processed[ci] = true;
        let mut members: Vec<usize> = sccs[ci].iter().map(|v| v.index()).collect();
        members.sort_unstable();
        ordering.extend(members.into_iter().map(VarIndex::new));
        for &cw in &succs[ci] {
            indegree[cw] -= 1;
            if indegree[cw] == 0 {
                heap.push(Reverse((min_index[cw], cw)));
            }
        }
    }
    ordering
}
