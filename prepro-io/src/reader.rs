use crate::error::ReaderError;
use crate::tokenizer::Tokenizer;
use prepro_model::{
    Axiom, EffCond, Goal, Module, ModuleArg, ModuleFunction, Operator, PreCondition, PrePost, Prevail, Problem,
    State, TimedFact, TimedGoal, VarArena, VarIndex, Variable,
};

/// Parses a complete grounded planning task from its wire-format text.
///
/// Stops once axioms have been read: the successor generator, DTG, and causal graph sections
/// a writer appends afterwards are analysis *output*, never part of the input grammar, so a
/// conformant reader never needs to look at them.
pub fn read_problem(src: &str) -> Result<Problem, ReaderError> {
    let mut tok = Tokenizer::new(src);

    let name_tok = tok.next_token()?;
    let name = if name_tok == "gen" { String::new() } else { name_tok.to_string() };

    let metric = read_metric(&mut tok)?;

    let mut vars = VarArena::new();
    read_variables(&mut tok, &mut vars)?;

    let mut state = State::new(vars.len());
    read_state(&mut tok, &vars, &mut state)?;

    let shared = read_shared(&mut tok)?;
    let goal = read_goal(&mut tok)?;
    let timed_goals = read_timed_goals(&mut tok)?;
    let modules = read_modules(&mut tok)?;
    let operators = read_operators(&mut tok)?;
    let axioms = read_axioms(&mut tok)?;

    let mut problem = Problem::new(name, vars, state);
    problem.metric = metric;
    problem.shared = shared;
    problem.goal = goal;
    problem.timed_goals = timed_goals;
    problem.modules = modules;
    problem.operators = operators;
    problem.axioms = axioms;
    Ok(problem)
}

fn read_metric(tok: &mut Tokenizer) -> Result<Vec<String>, ReaderError> {
    tok.magic("begin_metric")?;
    let mut tokens = Vec::new();
    loop {
        let t = tok.next_token()?;
        if t == "end" {
            break;
        }
        tokens.push(t.to_string());
    }
    tok.magic("end_metric")?;
    Ok(tokens)
}

fn read_variables(tok: &mut Tokenizer, vars: &mut VarArena) -> Result<(), ReaderError> {
    tok.magic("begin_variables")?;
    let n = tok.next_usize()?;
    for _ in 0..n {
        let name = tok.next_token()?.to_string();
        let range = tok.next_i32()?;
        let axiom_layer = tok.next_i32()?;
        let is_total_time = tok.next_i32()? != 0;
        vars.push(Variable::new(name, range, axiom_layer, is_total_time));
    }
    tok.magic("end_variables")?;
    Ok(())
}

fn read_state(tok: &mut Tokenizer, vars: &VarArena, state: &mut State) -> Result<(), ReaderError> {
    tok.magic("begin_state")?;
    for i in 0..vars.len() {
        let v = VarIndex::new(i);
        let discrete = tok.next_i32()?;
        let numeric = if discrete == -1 { Some(tok.next_f64()?) } else { None };
        state.set(v, discrete, numeric);
    }
    tok.magic("end_state")?;
    Ok(())
}

fn read_shared(tok: &mut Tokenizer) -> Result<Vec<VarIndex>, ReaderError> {
    tok.magic("begin_shared")?;
    let k = tok.next_usize()?;
    let mut shared = Vec::with_capacity(k);
    for _ in 0..k {
        let _name = tok.next_token()?;
        let level = tok.next_usize()?;
        shared.push(VarIndex::new(level));
    }
    tok.magic("end_shared")?;
    Ok(shared)
}

fn read_goal(tok: &mut Tokenizer) -> Result<Goal, ReaderError> {
    tok.magic("begin_goal")?;
    let g = tok.next_usize()?;
    let mut facts = Vec::with_capacity(g);
    for _ in 0..g {
        let var = VarIndex::new(tok.next_usize()?);
        let val = tok.next_i32()?;
        facts.push((var, val));
    }
    tok.magic("end_goal")?;
    Ok(Goal { facts })
}

fn read_timed_goals(tok: &mut Tokenizer) -> Result<Vec<TimedGoal>, ReaderError> {
    tok.magic("begin_timed_goal")?;
    let t = tok.next_usize()?;
    let mut goals = Vec::with_capacity(t);
    for _ in 0..t {
        let var = VarIndex::new(tok.next_usize()?);
        let value = tok.next_i32()?;
        let f = tok.next_usize()?;
        let mut facts = Vec::with_capacity(f);
        for _ in 0..f {
            let fvar = VarIndex::new(tok.next_usize()?);
            let fval = tok.next_i32()?;
            let ftime = tok.next_f64()?;
            facts.push(TimedFact {
                var: fvar,
                value: fval,
                time: ftime,
            });
        }
        goals.push(TimedGoal { var, value, facts });
    }
    tok.magic("end_timed_goal")?;
    Ok(goals)
}

fn read_modules(tok: &mut Tokenizer) -> Result<Vec<Module>, ReaderError> {
    tok.magic("begin_modules")?;
    let m = tok.next_usize()?;
    let mut modules = Vec::with_capacity(m);
    for _ in 0..m {
        let name = tok.next_token()?.to_string();
        let f = tok.next_usize()?;
        let mut functions = Vec::with_capacity(f);
        for _ in 0..f {
            let fname = tok.next_token()?.to_string();
            let a = tok.next_usize()?;
            let mut args = Vec::with_capacity(a);
            for _ in 0..a {
                let arg_name = tok.next_token()?.to_string();
                let arg_type = tok.next_token()?.to_string();
                args.push(ModuleArg {
                    name: arg_name,
                    type_name: arg_type,
                });
            }
            functions.push(ModuleFunction { name: fname, args });
        }
        modules.push(Module { name, functions });
    }
    tok.magic("end_modules")?;
    Ok(modules)
}

fn read_operators(tok: &mut Tokenizer) -> Result<Vec<Operator>, ReaderError> {
    let n = tok.next_usize()?;
    let mut ops = Vec::with_capacity(n);
    for _ in 0..n {
        ops.push(read_operator(tok)?);
    }
    Ok(ops)
}

fn read_operator(tok: &mut Tokenizer) -> Result<Operator, ReaderError> {
    tok.magic("begin_operator")?;
    let name = tok.next_line()?.to_string();
    let p = tok.next_usize()?;
    let mut prevail = Vec::with_capacity(p);
    for _ in 0..p {
        let var = VarIndex::new(tok.next_usize()?);
        let value = tok.next_i32()?;
        prevail.push(Prevail { var, value });
    }
    let e = tok.next_usize()?;
    let mut pre_post = Vec::new();
    let mut pre_block = Vec::new();
    for _ in 0..e {
        let (is_block, pp) = read_effect_record(tok)?;
        if is_block {
            pre_block.push(pp);
        } else {
            pre_post.push(pp);
        }
    }
    let cost = tok.next_f64()?;
    let runtime_cost = read_runtime_line(tok)?;
    tok.magic("end_operator")?;
    Ok(Operator {
        name,
        prevail,
        pre_post,
        pre_block,
        cost,
        runtime_cost,
    })
}

/// Reads one `(eff_cond_count, (cvar cval)*, var, pre, post[, cost_expr])` record, returning
/// whether it belongs in `pre_block` (its `pre` is a blocking sentinel) or `pre_post`.
fn read_effect_record(tok: &mut Tokenizer) -> Result<(bool, PrePost), ReaderError> {
    let c = tok.next_usize()?;
    let mut effect_conds = Vec::with_capacity(c);
    for _ in 0..c {
        let var = VarIndex::new(tok.next_usize()?);
        let value = tok.next_i32()?;
        effect_conds.push(EffCond { var, value });
    }
    let var = VarIndex::new(tok.next_usize()?);
    let pre = PreCondition::from_raw(tok.next_i32()?);
    let post = tok.next_i32()?;
    let (cost, runtime_cost_effect) = if pre.is_numeric_op() {
        let expr = tok.next_cost_expr()?;
        if expr.starts_with('(') {
            (0.0, Some(expr))
        } else {
            let cost = expr.parse().map_err(|_| ReaderError::MalformedNumber { token: expr.clone() })?;
            (cost, None)
        }
    } else {
        (0.0, None)
    };
    let is_block = pre.is_block();
    Ok((
        is_block,
        PrePost {
            var,
            pre,
            post,
            effect_conds,
            cost,
            runtime_cost_effect,
        },
    ))
}

fn read_runtime_line(tok: &mut Tokenizer) -> Result<Option<String>, ReaderError> {
    let tag = tok.next_token()?;
    match tag {
        "runtime" => Ok(Some(tok.next_cost_expr()?)),
        "no-run" => {
            let _dash = tok.next_token()?;
            Ok(None)
        }
        other => Err(ReaderError::MagicWord {
            expected: "runtime|no-run".to_string(),
            got: other.to_string(),
        }),
    }
}

fn read_axioms(tok: &mut Tokenizer) -> Result<Vec<Axiom>, ReaderError> {
    let n = tok.next_usize()?;
    let mut axioms = Vec::with_capacity(n);
    for _ in 0..n {
        axioms.push(read_axiom(tok)?);
    }
    Ok(axioms)
}

fn read_axiom(tok: &mut Tokenizer) -> Result<Axiom, ReaderError> {
    tok.magic("begin_rule")?;
    let c = tok.next_usize()?;
    let mut body = Vec::with_capacity(c);
    for _ in 0..c {
        let var = VarIndex::new(tok.next_usize()?);
        let value = tok.next_i32()?;
        body.push(Prevail { var, value });
    }
    let var = VarIndex::new(tok.next_usize()?);
    let pre = PreCondition::from_raw(tok.next_i32()?);
    let post = tok.next_i32()?;
    tok.magic("end_rule")?;
    Ok(Axiom {
        body,
        effect: PrePost {
            var,
            pre,
            post,
            effect_conds: Vec::new(),
            cost: 0.0,
            runtime_cost_effect: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
gen
begin_metric
end
end_metric
begin_variables
2
at-a 2 -1 0
holding 3 -1 0
end_variables
begin_state
0
-1
end_state
begin_shared
0
end_shared
begin_goal
1
1 2
end_goal
begin_timed_goal
0
end_timed_goal
begin_modules
0
end_modules
1
begin_operator
pick up a
1
0 0
1
0
1 -1 1
1.0
no-run -
end_operator
0
";

    #[test]
    fn parses_minimal_task() {
        let problem = read_problem(MINIMAL).unwrap();
        assert_eq!(problem.name, "");
        assert_eq!(problem.vars.len(), 2);
        assert_eq!(problem.vars.get(VarIndex::new(0)).name(), "at-a");
        assert_eq!(problem.state.value(VarIndex::new(0)), 0);
        assert_eq!(problem.state.value(VarIndex::new(1)), -1);
        assert_eq!(problem.goal.facts, vec![(VarIndex::new(1), 2)]);
        assert_eq!(problem.operators.len(), 1);
        let op = &problem.operators[0];
        assert_eq!(op.name, "pick up a");
        assert_eq!(op.prevail.len(), 1);
        assert_eq!(op.pre_post.len(), 1);
        assert_eq!(op.cost, 1.0);
        assert!(op.runtime_cost.is_none());
    }

    #[test]
    fn magic_word_mismatch_is_reported_precisely() {
        let broken = MINIMAL.replacen("begin_goal", "begin_goalXXX", 1);
        let err = read_problem(&broken).unwrap_err();
        assert!(matches!(err, ReaderError::MagicWord { .. }));
    }

    #[test]
    fn numeric_sentinel_effect_with_parenthesised_cost() {
        let src = "\
gen
begin_metric
end
end_metric
begin_variables
1
fuel -1 -1 0
end_variables
begin_state
-1 10.0
end_state
begin_shared
0
end_shared
begin_goal
0
end_goal
begin_timed_goal
0
end_timed_goal
begin_modules
0
end_modules
1
begin_operator
burn
0
1
0
0 -3 -1 (+ !0! 2)
2.0
no-run -
end_operator
0
";
        let problem = read_problem(src).unwrap();
        let op = &problem.operators[0];
        let pp = &op.pre_post[0];
        assert!(pp.pre.is_numeric_op());
        assert_eq!(pp.runtime_cost_effect.as_deref(), Some("(+ !0! 2)"));
    }
}
