//! The successor generator: a multi-level decision trie over operator preconditions.

use prepro_model::{Operator, PreCondition, State, VarArena, VarIndex};

/// A node of the successor-generator trie.
#[derive(Debug, Clone)]
pub enum Generator {
    /// No operator reaches this node.
    Empty,
    /// Every operator reaching this node is applicable regardless of the remaining variables.
    Leaf { operators: Vec<usize> },
    /// Branches on one variable's value; `immediate` holds operators whose conditions were
    /// already exhausted by the time this node was reached (applicable regardless of `var`).
    Switch {
        var: VarIndex,
        immediate: Vec<usize>,
        children: Vec<Generator>,
        default: Box<Generator>,
    },
}

/// Builds the trie from a level `ordering` and the operator list, indexing operators by their
/// position in `operators` (the indices returned by [`applicable_operators`] are into that
/// same slice).
///
/// Each operator's condition set is its prevails plus the pre-values of its `pre_post`
/// effects that carry a concrete value (sentinel pre-values never gate applicability); the
/// set is sorted by `(level, value)` before descent, so every operator appears on exactly one
/// path from the root to its insertion leaf.
pub fn build(vars: &VarArena, ordering: &[VarIndex], operators: &[Operator]) -> Generator {
    let conditions: Vec<Vec<(VarIndex, i32)>> = operators
        .iter()
        .map(|op| {
            let mut conds: Vec<(VarIndex, i32)> = op.prevail.iter().map(|p| (p.var, p.value)).collect();
            for pp in &op.pre_post {
                if let PreCondition::Value(v) = pp.pre {
                    conds.push((pp.var, v));
                }
            }
            conds.sort_by_key(|&(var, val)| (vars.get(var).level(), val));
            conds
        })
        .collect();

    let mut cursors = vec![0usize; operators.len()];
    let all_indices: Vec<usize> = (0..operators.len()).collect();
    construct_recursive(0, all_indices, vars, ordering, &conditions, &mut cursors)
}

fn construct_recursive(
    mut switch_pos: usize,
    mut op_indices: Vec<usize>,
    vars: &VarArena,
    ordering: &[VarIndex],
    conditions: &[Vec<(VarIndex, i32)>],
    cursors: &mut [usize],
) -> Generator {
    if op_indices.is_empty() {
        return Generator::Empty;
    }
    loop {
        if switch_pos == ordering.len() {
            return Generator::Leaf { operators: op_indices };
        }

        let switch_var = ordering[switch_pos];
        let range = vars.get(switch_var).range();
        let bucket_count = if range > 0 { range as usize } else { 0 };
        let mut per_value: Vec<Vec<usize>> = vec![Vec::new(); bucket_count];
        let mut default = Vec::new();
        let mut immediate = Vec::new();
        let mut interesting = false;

        for &op in &op_indices {
            let cursor = cursors[op];
            if cursor == conditions[op].len() {
                interesting = true;
                immediate.push(op);
                continue;
            }
            let (var, val) = conditions[op][cursor];
            if var == switch_var {
                interesting = true;
                cursors[op] += 1;
                debug_assert!(
                    (val as usize) < bucket_count,
                    "pre-value {val} out of range for variable in trie construction"
                );
                per_value[val as usize].push(op);
            } else {
                default.push(op);
            }
        }

        if immediate.len() == op_indices.len() {
            return Generator::Leaf { operators: immediate };
        } else if interesting {
            let children: Vec<Generator> = per_value
                .into_iter()
                .map(|bucket| construct_recursive(switch_pos + 1, bucket, vars, ordering, conditions, cursors))
                .collect();
            let default_gen = construct_recursive(switch_pos + 1, default, vars, ordering, conditions, cursors);
            return Generator::Switch {
                var: switch_var,
                immediate,
                children,
                default: Box::new(default_gen),
            };
        } else {
            // No live operator depends on this variable: skip it without emitting a node.
            switch_pos += 1;
            op_indices = default;
        }
    }
}

/// Evaluates the trie against a state, returning the (deduplicated) indices of every operator
/// whose conditions the state satisfies. Used to test the trie's soundness/completeness
/// against a brute-force reference, not part of the tool's on-the-wire output.
pub fn applicable_operators(generator: &Generator, state: &State) -> Vec<usize> {
    let mut out = Vec::new();
    collect(generator, state, &mut out);
    out.sort_unstable();
    out.dedup();
    out
}

fn collect(generator: &Generator, state: &State, out: &mut Vec<usize>) {
    match generator {
        Generator::Empty => {}
        Generator::Leaf { operators } => out.extend(operators.iter().copied()),
        Generator::Switch {
            var,
            immediate,
            children,
            default,
        } => {
            out.extend(immediate.iter().copied());
            let val = state.value(*var);
            if val >= 0 && (val as usize) < children.len() {
                collect(&children[val as usize], state, out);
            }
            collect(default, state, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepro_model::{PrePost, Prevail, Variable};

    fn pp_value(var: VarIndex, val: i32, post: i32) -> PrePost {
        PrePost {
            var,
            pre: PreCondition::Value(val),
            post,
            effect_conds: Vec::new(),
            cost: 0.0,
            runtime_cost_effect: None,
        }
    }

    fn brute_force(operators: &[Operator], state: &State) -> Vec<usize> {
        operators
            .iter()
            .enumerate()
            .filter(|(_, op)| {
                op.prevail.iter().all(|p| state.value(p.var) == p.value)
                    && op.pre_post.iter().all(|pp| match pp.pre {
                        PreCondition::Value(v) => state.value(pp.var) == v,
                        _ => true,
                    })
            })
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn trie_matches_brute_force_on_every_combination() {
        let mut vars = VarArena::new();
        let a = vars.push(Variable::new("a", 2, -1, false));
        let b = vars.push(Variable::new("b", 2, -1, false));
        vars.get_mut(a).set_level(0);
        vars.get_mut(b).set_level(1);
        let ordering = vec![a, b];

        let operators = vec![
            Operator {
                name: "op_a0".into(),
                prevail: vec![Prevail { var: a, value: 0 }],
                pre_post: vec![pp_value(b, 0, 1)],
                pre_block: Vec::new(),
                cost: 1.0,
                runtime_cost: None,
            },
            Operator {
                name: "op_b1".into(),
                prevail: Vec::new(),
                pre_post: vec![pp_value(b, 1, 0)],
                pre_block: Vec::new(),
                cost: 1.0,
                runtime_cost: None,
            },
            Operator {
                name: "op_unconditional".into(),
                prevail: Vec::new(),
                pre_post: vec![PrePost {
                    var: a,
                    pre: PreCondition::Any,
                    post: 1,
                    effect_conds: Vec::new(),
                    cost: 0.0,
                    runtime_cost_effect: None,
                }],
                pre_block: Vec::new(),
                cost: 1.0,
                runtime_cost: None,
            },
        ];

        let generator = build(&vars, &ordering, &operators);

        for av in 0..2 {
            for bv in 0..2 {
                let mut state = State::new(vars.len());
                state.set(a, av, None);
                state.set(b, bv, None);
                let mut expected = brute_force(&operators, &state);
                expected.sort_unstable();
                let mut actual = applicable_operators(&generator, &state);
                actual.sort_unstable();
                assert_eq!(actual, expected, "mismatch at a={av} b={bv}");
            }
        }
    }

    #[test]
    fn unconstrained_operator_appears_at_every_state() {
        let mut vars = VarArena::new();
        let a = vars.push(Variable::new("a", 2, -1, false));
        vars.get_mut(a).set_level(0);
        let ordering = vec![a];
        let operators = vec![Operator {
            name: "noop".into(),
            prevail: Vec::new(),
            pre_post: Vec::new(),
            pre_block: Vec::new(),
            cost: 0.0,
            runtime_cost: None,
        }];
        let generator = build(&vars, &ordering, &operators);
        let mut state = State::new(vars.len());
        state.set(a, 0, None);
        assert_eq!(applicable_operators(&generator, &state), vec![0]);
    }
}
