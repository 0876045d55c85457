/// The `pre` field of a `PrePost`/effect record, as a tagged variant instead of a bare
/// sentinel integer.
///
/// The wire format encodes five different meanings in one `i32` (see the reader/writer in
/// `prepro-io`): a real value, "no precondition", one of five numeric-effect operators, or
/// one of two blocking-effect kinds. Keeping the raw sentinel around (rather than inventing
/// names for operators this tool never interprets) lets the writer reproduce it exactly
/// without the rest of the pipeline ever matching on magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreCondition {
    /// Sentinel `-1`: the effect fires regardless of the variable's current value.
    Any,
    /// A concrete precondition value (`>= 0`).
    Value(i32),
    /// Sentinels `-2..=-6`: a numeric (function) effect, carrying a cost expression.
    NumericOp(i32),
    /// Sentinels `-7` and `-8`: a blocking effect.
    Block(i32),
}

impl PreCondition {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            -1 => PreCondition::Any,
            -2..=-6 => PreCondition::NumericOp(raw),
            -7 | -8 => PreCondition::Block(raw),
            v if v >= 0 => PreCondition::Value(v),
            other => panic!("precondition sentinel out of range: {other}"),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            PreCondition::Any => -1,
            PreCondition::Value(v) => v,
            PreCondition::NumericOp(code) => code,
            PreCondition::Block(code) => code,
        }
    }

    pub fn is_numeric_op(self) -> bool {
        matches!(self, PreCondition::NumericOp(_))
    }

    pub fn is_block(self) -> bool {
        matches!(self, PreCondition::Block(_))
    }

    /// The concrete precondition value, if this is a plain (non-sentinel) value.
    pub fn as_value(self) -> Option<i32> {
        match self {
            PreCondition::Value(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_round_trip() {
        for raw in [-8, -7, -6, -5, -4, -3, -2, -1, 0, 1, 42] {
            assert_eq!(PreCondition::from_raw(raw).to_raw(), raw);
        }
    }

    #[test]
    fn classification() {
        assert_eq!(PreCondition::from_raw(-1), PreCondition::Any);
        assert!(PreCondition::from_raw(-3).is_numeric_op());
        assert!(PreCondition::from_raw(-7).is_block());
        assert_eq!(PreCondition::from_raw(3).as_value(), Some(3));
        assert_eq!(PreCondition::from_raw(-1).as_value(), None);
    }

    #[test]
    #[should_panic]
    fn out_of_range_sentinel_panics() {
        PreCondition::from_raw(-9);
    }
}
