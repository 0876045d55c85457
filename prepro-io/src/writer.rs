use crate::error::WriterError;
use prepro_causal::CausalGraph;
use prepro_dtg::{Dtg, NUMERIC_NODE};
use prepro_succgen::Generator;
use prepro_model::{Axiom, Operator, PrePost, Problem, VarArena, VarIndex};
use std::fmt::Write as _;

/// Writes the full output of a preprocessing run: the transformed problem, followed by the
/// successor generator, causal graph, and domain transition graphs that the original input
/// grammar never carries (they are this tool's analysis, not a planning task's description).
pub fn write_problem(
    out: &mut String,
    problem: &Problem,
    tractable: bool,
    causal_graph: &CausalGraph,
    generator: &Generator,
    dtgs: &[Dtg],
) -> Result<(), WriterError> {
    writeln!(out, "{}", if problem.name.is_empty() { "gen" } else { &problem.name })?;
    writeln!(out, "{}", if tractable { 1 } else { 0 })?;

    writeln!(out, "begin_metric")?;
    for tok in &problem.metric {
        writeln!(out, "{tok}")?;
    }
    writeln!(out, "end")?;
    writeln!(out, "end_metric")?;

    let ordering = causal_graph.variable_ordering();

    writeln!(out, "begin_variables")?;
    writeln!(out, "{}", ordering.len())?;
    for &v in ordering {
        let var = problem.vars.get(v);
        writeln!(out, "{} {} {} {}", var.name(), var.range(), var.axiom_layer(), if var.is_total_time() { 1 } else { 0 })?;
    }
    writeln!(out, "end_variables")?;

    writeln!(out, "begin_state")?;
    for &v in ordering {
        match problem.state.numeric_value(v) {
            Some(n) => writeln!(out, "-1 {n}")?,
            None => writeln!(out, "{}", problem.state.value(v))?,
        }
    }
    writeln!(out, "end_state")?;

    writeln!(out, "begin_shared")?;
    let shared: Vec<VarIndex> = problem.shared.iter().copied().filter(|&v| problem.vars.get(v).is_relevant()).collect();
    writeln!(out, "{}", shared.len())?;
    for &v in &shared {
        writeln!(out, "{} {}", problem.vars.get(v).name(), level(&problem.vars, v))?;
    }
    writeln!(out, "end_shared")?;

    writeln!(out, "begin_goal")?;
    writeln!(out, "{}", problem.goal.facts.len())?;
    for &(v, val) in &problem.goal.facts {
        writeln!(out, "{} {val}", level(&problem.vars, v))?;
    }
    writeln!(out, "end_goal")?;

    writeln!(out, "begin_timed_goal")?;
    writeln!(out, "{}", problem.timed_goals.len())?;
    for tg in &problem.timed_goals {
        writeln!(out, "{} {}", level(&problem.vars, tg.var), tg.value)?;
        writeln!(out, "{}", tg.facts.len())?;
        for f in &tg.facts {
            writeln!(out, "{} {} {}", level(&problem.vars, f.var), f.value, f.time)?;
        }
    }
    writeln!(out, "end_timed_goal")?;

    writeln!(out, "begin_modules")?;
    writeln!(out, "{}", problem.modules.len())?;
    for m in &problem.modules {
        writeln!(out, "{}", m.name)?;
        writeln!(out, "{}", m.functions.len())?;
        for f in &m.functions {
            writeln!(out, "{}", f.name)?;
            writeln!(out, "{}", f.args.len())?;
            for a in &f.args {
                writeln!(out, "{} {}", a.name, a.type_name)?;
            }
        }
    }
    writeln!(out, "end_modules")?;

    writeln!(out, "{}", problem.operators.len())?;
    for op in &problem.operators {
        write_operator(out, op, &problem.vars)?;
    }

    writeln!(out, "{}", problem.axioms.len())?;
    for axiom in &problem.axioms {
        write_axiom(out, axiom, &problem.vars)?;
    }

    write_successor_generator(out, generator, &problem.vars)?;
    write_causal_graph(out, causal_graph, &problem.vars)?;
    for dtg in dtgs {
        write_dtg(out, dtg, &problem.vars)?;
    }

    Ok(())
}

/// The level assigned to `v` by the causal graph — the form every condition/effect variable
/// reference takes in the output, never the raw input index (spec §6).
fn level(vars: &VarArena, v: VarIndex) -> i32 {
    vars.get(v).level()
}

fn write_operator(out: &mut String, op: &Operator, vars: &VarArena) -> Result<(), WriterError> {
    writeln!(out, "begin_operator")?;
    writeln!(out, "{}", op.name)?;
    writeln!(out, "{}", op.prevail.len())?;
    for p in &op.prevail {
        writeln!(out, "{} {}", level(vars, p.var), p.value)?;
    }
    writeln!(out, "{}", op.pre_post.len() + op.pre_block.len())?;
    for pp in op.pre_post.iter().chain(op.pre_block.iter()) {
        write_effect(out, pp, vars)?;
    }
    writeln!(out, "{}", op.cost)?;
    match &op.runtime_cost {
        Some(expr) => writeln!(out, "runtime {}", rewrite_runtime_expr(expr, vars))?,
        None => writeln!(out, "no-run -")?,
    }
    writeln!(out, "end_operator")?;
    Ok(())
}

fn write_effect(out: &mut String, pp: &PrePost, vars: &VarArena) -> Result<(), WriterError> {
    writeln!(out, "{}", pp.effect_conds.len())?;
    for ec in &pp.effect_conds {
        writeln!(out, "{} {}", level(vars, ec.var), ec.value)?;
    }
    write!(out, "{} {} {}", level(vars, pp.var), pp.pre.to_raw(), pp.post)?;
    if pp.pre.is_numeric_op() {
        match &pp.runtime_cost_effect {
            Some(expr) => writeln!(out, " {}", rewrite_runtime_expr(expr, vars))?,
            None => writeln!(out, " {}", pp.cost)?,
        }
    } else {
        writeln!(out)?;
    }
    Ok(())
}

fn write_axiom(out: &mut String, axiom: &Axiom, vars: &VarArena) -> Result<(), WriterError> {
    writeln!(out, "begin_rule")?;
    writeln!(out, "{}", axiom.body.len())?;
    for p in &axiom.body {
        writeln!(out, "{} {}", level(vars, p.var), p.value)?;
    }
    writeln!(out, "{} {} {}", level(vars, axiom.effect.var), axiom.effect.pre.to_raw(), axiom.effect.post)?;
    writeln!(out, "end_rule")?;
    Ok(())
}

/// Rewrites `!i!` input-index references in a runtime-cost expression to `:N:` level
/// references, where `N` is the level assigned to the `i`-th input variable. Anything that
/// isn't a well-formed `!digits!` token is left untouched, so a malformed expression round-trips
/// as-is rather than panicking the writer.
pub fn rewrite_runtime_expr(expr: &str, vars: &VarArena) -> String {
    let bytes = expr.as_bytes();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'!' {
            if let Some(end) = expr[i + 1..].find('!') {
                let digits = &expr[i + 1..i + 1 + end];
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(input_index) = digits.parse::<usize>() {
                        if let Some(var) = vars.indices().nth(input_index) {
                            write!(out, ":{}:", vars.get(var).level()).unwrap();
                            i = i + 1 + end + 1;
                            continue;
                        }
                    }
                }
            }
        }
        let ch = expr[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

fn write_successor_generator(out: &mut String, generator: &Generator, vars: &VarArena) -> Result<(), WriterError> {
    writeln!(out, "begin_SG")?;
    write_generator_node(out, generator, vars)?;
    writeln!(out, "end_SG")?;
    Ok(())
}

fn write_generator_node(out: &mut String, node: &Generator, vars: &VarArena) -> Result<(), WriterError> {
    match node {
        Generator::Empty => {
            writeln!(out, "check empty")?;
        }
        Generator::Leaf { operators } => {
            writeln!(out, "leaf {}", operators.len())?;
            for &op in operators {
                writeln!(out, "{op}")?;
            }
        }
        Generator::Switch {
            var,
            immediate,
            children,
            default,
        } => {
            writeln!(out, "switch {} {} {}", level(vars, *var), immediate.len(), children.len())?;
            for &op in immediate {
                writeln!(out, "{op}")?;
            }
            for (value, child) in children.iter().enumerate() {
                writeln!(out, "value {value}")?;
                write_generator_node(out, child, vars)?;
            }
            writeln!(out, "default")?;
            write_generator_node(out, default, vars)?;
        }
    }
    Ok(())
}

fn write_causal_graph(out: &mut String, causal_graph: &CausalGraph, vars: &VarArena) -> Result<(), WriterError> {
    writeln!(out, "begin_CG")?;
    let ordering = causal_graph.variable_ordering();
    writeln!(out, "{}", ordering.len())?;
    for &v in ordering {
        let successors: Vec<VarIndex> = causal_graph.successors(v).collect();
        write!(out, "{} {}", level(vars, v), successors.len())?;
        for s in successors {
            write!(out, " {}", level(vars, s))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "end_CG")?;
    Ok(())
}

fn write_dtg(out: &mut String, dtg: &Dtg, vars: &VarArena) -> Result<(), WriterError> {
    writeln!(out, "begin_DTG {}", level(vars, dtg.var))?;
    let range = vars.get(dtg.var).range();
    writeln!(out, "{} {}", if range > 0 { range } else { NUMERIC_NODE }, dtg.arcs.len())?;
    for arc in &dtg.arcs {
        write!(out, "{} {} {}", arc.from, arc.to, arc.operator_name)?;
        write!(out, " {}", arc.conditions.len())?;
        for &(cv, cval) in &arc.conditions {
            write!(out, " {} {cval}", level(vars, cv))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "end_DTG")?;
    Ok(())
}
