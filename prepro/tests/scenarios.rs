use prepro_causal::CausalGraph;
use prepro_model::VarIndex;
use prepro_succgen::Generator;

fn pipeline(src: &str) -> (prepro_model::Problem, CausalGraph, bool, Vec<prepro_dtg::Dtg>, Generator) {
    let mut problem = prepro_io::read_problem(src).unwrap();
    let causal_graph = CausalGraph::build(&mut problem, false);
    prepro_causal::strip::strip_operators(&mut problem);
    prepro_causal::strip::strip_axioms(&mut problem);
    let dtgs = prepro_dtg::build_dtgs(&problem, causal_graph.variable_ordering());
    let tractable = prepro_dtg::tractable(causal_graph.is_acyclic(), &dtgs, &problem.vars);
    let generator = prepro_succgen::build(&problem.vars, causal_graph.variable_ordering(), &problem.operators);
    (problem, causal_graph, tractable, dtgs, generator)
}

fn sections(body: &str) -> String {
    format!(
        "gen\nbegin_metric\nend\nend_metric\n{body}begin_shared\n0\nend_shared\n\
begin_timed_goal\n0\nend_timed_goal\nbegin_modules\n0\nend_modules\n"
    )
}

#[test]
fn s1_trivial_unit_task() {
    let body = "\
begin_variables
1
v 2 -1 0
end_variables
begin_state
0
end_state
";
    let goal_and_ops = "\
begin_goal
1
0 1
end_goal
1
begin_operator
flip
0
1
0
0 0 1
1.0
no-run -
end_operator
0
";
    let src = format!("{}{}", sections(body), goal_and_ops);
    let (problem, causal_graph, tractable, dtgs, generator) = pipeline(&src);

    let v = VarIndex::new(0);
    assert_eq!(problem.vars.get(v).level(), 0);
    assert!(causal_graph.is_acyclic());
    assert_eq!(causal_graph.successors(v).count(), 0);
    assert_eq!(dtgs.len(), 1);
    assert!(dtgs[0].arcs.iter().any(|a| a.from == 0 && a.to == 1));
    assert!(!prepro_dtg::is_strongly_connected(&dtgs[0], 2));
    assert!(!tractable);

    match &generator {
        Generator::Switch { var, children, default, .. } => {
            assert_eq!(*var, v);
            assert_eq!(children.len(), 2);
            assert!(matches!(children[0], Generator::Leaf { ref operators } if operators == &[0]));
            assert!(matches!(children[1], Generator::Empty));
            assert!(matches!(**default, Generator::Empty));
        }
        other => panic!("expected a Switch node, got {other:?}"),
    }
}

#[test]
fn s2_irrelevant_variable_pruning() {
    let body = "\
begin_variables
2
u 2 -1 0
v 2 -1 0
end_variables
begin_state
0
0
end_state
";
    let goal_and_ops = "\
begin_goal
1
1 1
end_goal
1
begin_operator
touch_v
0
1
0
1 0 1
1.0
no-run -
end_operator
0
";
    let src = format!("{}{}", sections(body), goal_and_ops);
    let (problem, _causal_graph, _tractable, dtgs, _generator) = pipeline(&src);

    let u = VarIndex::new(0);
    let v = VarIndex::new(1);
    assert_eq!(problem.vars.get(u).level(), -1);
    assert!(!problem.vars.get(u).is_relevant());
    assert_eq!(problem.vars.get(v).level(), 0);
    assert_eq!(problem.operators.len(), 1);
    assert_eq!(dtgs.len(), 1);
    assert_eq!(dtgs[0].var, v);
}

#[test]
fn s3_cyclic_causal_graph_is_not_tractable() {
    let body = "\
begin_variables
2
a 2 -1 0
b 2 -1 0
end_variables
begin_state
0
0
end_state
";
    let goal_and_ops = "\
begin_goal
2
0 0
1 0
end_goal
2
begin_operator
a_to_b
1
0 0
1
0
1 -1 1
1.0
no-run -
end_operator
begin_operator
b_to_a
1
1 1
1
0
0 -1 0
1.0
no-run -
end_operator
0
";
    let src = format!("{}{}", sections(body), goal_and_ops);
    let (_problem, causal_graph, tractable, _dtgs, _generator) = pipeline(&src);

    assert!(!causal_graph.is_acyclic());
    assert!(!tractable);
}

#[test]
fn s4_strongly_connected_dtg_is_tractable() {
    let body = "\
begin_variables
1
v 3 -1 0
end_variables
begin_state
0
end_state
";
    let goal_and_ops = "\
begin_goal
1
0 0
end_goal
3
begin_operator
zero_to_one
0
1
0
0 0 1
1.0
no-run -
end_operator
begin_operator
one_to_two
0
1
0
0 1 2
1.0
no-run -
end_operator
begin_operator
two_to_zero
0
1
0
0 2 0
1.0
no-run -
end_operator
0
";
    let src = format!("{}{}", sections(body), goal_and_ops);
    let (_problem, causal_graph, tractable, dtgs, _generator) = pipeline(&src);

    assert!(causal_graph.is_acyclic());
    assert!(prepro_dtg::is_strongly_connected(&dtgs[0], 3));
    assert!(tractable);
}

#[test]
fn s5_blocking_effect_is_kept_out_of_pre_post() {
    let body = "\
begin_variables
1
w 2 -1 0
end_variables
begin_state
0
end_state
";
    let goal_and_ops = "\
begin_goal
1
0 1
end_goal
1
begin_operator
guarded
0
1
0
0 -7 1
1.0
no-run -
end_operator
0
";
    let src = format!("{}{}", sections(body), goal_and_ops);
    let mut problem = prepro_io::read_problem(&src).unwrap();
    let _causal_graph = CausalGraph::build(&mut problem, false);

    let op = &problem.operators[0];
    assert!(op.pre_post.is_empty());
    assert_eq!(op.pre_block.len(), 1);
    assert_eq!(op.pre_block[0].post, 1);
    assert!(op.pre_block[0].pre.is_block());
}

#[test]
fn s7_write_then_read_round_trips_through_level_renumbering() {
    let body = "\
begin_variables
2
u 2 -1 0
v 2 -1 0
end_variables
begin_state
0
0
end_state
";
    let goal_and_ops = "\
begin_goal
1
1 1
end_goal
1
begin_operator
touch_v
0
1
0
1 0 1
1.0
no-run -
end_operator
0
";
    let src = format!("{}{}", sections(body), goal_and_ops);
    let (problem, causal_graph, tractable, dtgs, generator) = pipeline(&src);

    let mut out = String::new();
    prepro_io::write_problem(&mut out, &problem, tractable, &causal_graph, &generator, &dtgs).unwrap();

    // `u` is pruned; `v`'s level 0 becomes the re-read arena's index 0, not its old input index 1.
    assert!(out.contains("begin_goal\n1\n0 1\nend_goal"));

    let reread = prepro_io::read_problem(&out).unwrap();
    assert_eq!(reread.vars.len(), 1);
    assert_eq!(reread.vars.get(VarIndex::new(0)).name(), "v");
    assert_eq!(reread.goal.facts, vec![(VarIndex::new(0), 1)]);
    assert_eq!(reread.state.value(VarIndex::new(0)), 0);
    assert_eq!(reread.operators.len(), 1);
    assert_eq!(reread.operators[0].pre_post[0].var, VarIndex::new(0));
}

#[test]
fn s6_runtime_cost_rewrite_maps_input_index_to_level() {
    // input index 3 is assigned level 7, matching the scenario's "input index 3 maps to level 7".
    let mut vars = prepro_model::VarArena::new();
    for i in 0..8 {
        let idx = vars.push(prepro_model::Variable::new(format!("v{i}"), 2, -1, false));
        let level = if i == 3 { 7 } else { i as i32 };
        vars.get_mut(idx).set_level(level);
    }
    let rewritten = prepro_io::rewrite_runtime_expr("(+ !3! 2)", &vars);
    assert_eq!(rewritten, "(+ :7: 2)");
}
