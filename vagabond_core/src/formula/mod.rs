//! Bonus formula evaluation
//!
//! Bonus contributions are either literal numbers or strings. Strings may be
//! numeric (`"2"`) or formulas referencing the roll-data snapshot
//! (`"@might.total + 1"`). Evaluation is fail-soft: a contribution that cannot
//! be evaluated is logged and counts as 0.

mod parser;
mod roll_data;

pub use parser::{parse, Expr, Function};
pub use roll_data::RollData;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Formula evaluation error. Never surfaced to users.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("unresolved reference @{0}")]
    UnresolvedReference(String),
    #[error("dice terms are not allowed in bonus formulas: {0}")]
    DiceTerm(String),
    #[error("unknown function {0}")]
    UnknownFunction(String),
    #[error("function {0} called with {1} arguments")]
    Arity(String, usize),
    #[error("division by zero")]
    DivisionByZero,
}

/// A single bonus contribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bonus {
    Number(f64),
    Text(String),
    List(Vec<Bonus>),
    #[default]
    Empty,
}

impl From<f64> for Bonus {
    fn from(value: f64) -> Self {
        Bonus::Number(value)
    }
}

impl From<i32> for Bonus {
    fn from(value: i32) -> Self {
        Bonus::Number(value as f64)
    }
}

impl From<&str> for Bonus {
    fn from(value: &str) -> Self {
        Bonus::Text(value.to_string())
    }
}

impl From<String> for Bonus {
    fn from(value: String) -> Self {
        Bonus::Text(value)
    }
}

impl Bonus {
    /// Strict evaluation: returns the first error encountered
    pub fn try_evaluate(&self, data: &RollData) -> Result<f64, FormulaError> {
        match self {
            Bonus::Number(n) => Ok(*n),
            Bonus::Empty => Ok(0.0),
            Bonus::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(0.0);
                }
                if let Ok(n) = text.parse::<f64>() {
                    return Ok(n);
                }
                parse(text)?.eval(data)
            }
            Bonus::List(items) => items.iter().map(|b| b.try_evaluate(data)).sum(),
        }
    }

    /// Whether this contribution is a truthy value (non-zero after evaluation)
    pub fn is_truthy(&self, data: &RollData) -> bool {
        match self {
            Bonus::Text(text) if text.trim().eq_ignore_ascii_case("true") => true,
            Bonus::Text(text) if text.trim().eq_ignore_ascii_case("false") => false,
            other => evaluate_bonus(other, data) != 0.0,
        }
    }
}

/// Evaluate one contribution, substituting 0 on failure
pub fn evaluate_bonus(bonus: &Bonus, data: &RollData) -> f64 {
    match bonus {
        Bonus::List(items) => evaluate_bonuses(items, data),
        other => match other.try_evaluate(data) {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                tracing::warn!(?bonus, value, "bonus evaluated to a non-finite value, using 0");
                0.0
            }
            Err(error) => {
                tracing::warn!(?bonus, %error, "failed to evaluate bonus, using 0");
                0.0
            }
        },
    }
}

/// Sum a list of contributions, each evaluated independently
pub fn evaluate_bonuses(bonuses: &[Bonus], data: &RollData) -> f64 {
    bonuses.iter().map(|b| evaluate_bonus(b, data)).sum()
}

/// Evaluate an optional contribution; `None` is 0
pub fn evaluate(bonus: Option<&Bonus>, data: &RollData) -> f64 {
    bonus.map(|b| evaluate_bonus(b, data)).unwrap_or(0.0)
}

/// Fold an evaluated aggregate into an integer field (truncates toward zero)
pub fn to_int(value: f64) -> i32 {
    value.trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> RollData {
        RollData::new().with("might.total", 3.0).with("level", 2.0)
    }

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(evaluate_bonuses(&[], &data()), 0.0);
        assert_eq!(evaluate(None, &data()), 0.0);
        assert_eq!(evaluate_bonus(&Bonus::Empty, &data()), 0.0);
        assert_eq!(evaluate_bonus(&Bonus::from(""), &data()), 0.0);
        assert_eq!(evaluate_bonus(&Bonus::from("   "), &data()), 0.0);
    }

    #[test]
    fn test_list_of_number_and_reference() {
        let list = vec![Bonus::from("2"), Bonus::from("@might.total")];
        assert_eq!(evaluate_bonuses(&list, &data()), 5.0);
        assert_eq!(evaluate_bonus(&Bonus::List(list), &data()), 5.0);
    }

    #[test]
    fn test_failures_degrade_to_zero_and_continue() {
        let list = vec![
            Bonus::from(1),
            Bonus::from("@mana.max"),
            Bonus::from("2 +"),
            Bonus::from("1d6"),
            Bonus::from("@level * 2"),
        ];
        assert_eq!(evaluate_bonuses(&list, &data()), 5.0);
    }

    #[test]
    fn test_deserialize_mixed_list() {
        let list: Vec<Bonus> = serde_json::from_str(r#"[1, "2", "@level", null]"#).unwrap();
        assert_eq!(list[3], Bonus::Empty);
        assert_eq!(evaluate_bonuses(&list, &data()), 5.0);
    }

    #[test]
    fn test_truthy() {
        assert!(Bonus::from("true").is_truthy(&data()));
        assert!(!Bonus::from("false").is_truthy(&data()));
        assert!(Bonus::from(1).is_truthy(&data()));
        assert!(!Bonus::from(0).is_truthy(&data()));
    }

    #[test]
    fn test_to_int_truncates() {
        assert_eq!(to_int(2.9), 2);
        assert_eq!(to_int(-2.9), -2);
    }
}
