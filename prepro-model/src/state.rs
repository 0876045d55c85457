use crate::variable::VarIndex;

/// An assignment of a value to every [`Variable`](crate::Variable), used for the initial state.
///
/// Finite-domain variables carry a discrete value; numeric variables carry both the
/// discrete sentinel `-1` and a separate floating-point value.
#[derive(Debug, Clone)]
pub struct State {
    discrete: Vec<i32>,
    numeric: Vec<Option<f64>>,
}

impl State {
    pub fn new(num_vars: usize) -> Self {
        State {
            discrete: vec![0; num_vars],
            numeric: vec![None; num_vars],
        }
    }

    pub fn set(&mut self, var: VarIndex, discrete: i32, numeric: Option<f64>) {
        self.discrete[var.index()] = discrete;
        self.numeric[var.index()] = numeric;
    }

    pub fn value(&self, var: VarIndex) -> i32 {
        self.discrete[var.index()]
    }

    pub fn numeric_value(&self, var: VarIndex) -> Option<f64> {
        self.numeric[var.index()]
    }

    pub fn len(&self) -> usize {
        self.discrete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discrete.is_empty()
    }
}
