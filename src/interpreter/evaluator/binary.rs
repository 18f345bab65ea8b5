use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, Expr, Pos},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation.
    ///
    /// Both operands are always evaluated first, left to right — including
    /// for `and` and `or`, which do not short-circuit. Host-callback side
    /// effects in boolean contexts are therefore observable on both sides.
    ///
    /// # Parameters
    /// - `left`: Left operand expression.
    /// - `op`: The operator.
    /// - `right`: Right operand expression.
    /// - `pos`: Source position of the operator, for error reporting.
    ///
    /// # Returns
    /// The computed value.
    pub(crate) fn eval_binary(&mut self,
                              left: &Expr,
                              op: BinaryOperator,
                              right: &Expr,
                              pos: Pos)
                              -> EvalResult<Value> {
        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;

        match op {
            BinaryOperator::Add => Self::add_values(&lhs, &rhs, pos),
            BinaryOperator::Sub => Self::subtract_values(&lhs, &rhs, pos),
            BinaryOperator::Mul => Self::multiply_values(&lhs, &rhs, pos),
            BinaryOperator::Div => Self::divide_values(&lhs, &rhs, pos),

            BinaryOperator::Equal => Ok(Value::Bool(values_equal(&lhs, &rhs))),
            BinaryOperator::NotEqual => Ok(Value::Bool(!values_equal(&lhs, &rhs))),

            BinaryOperator::Less => {
                Ok(Value::Bool(compare_values(&lhs, &rhs) == Ordering::Less))
            },
            BinaryOperator::Greater => {
                Ok(Value::Bool(compare_values(&lhs, &rhs) == Ordering::Greater))
            },
            BinaryOperator::LessEqual => {
                Ok(Value::Bool(compare_values(&lhs, &rhs) != Ordering::Greater))
            },
            BinaryOperator::GreaterEqual => {
                Ok(Value::Bool(compare_values(&lhs, &rhs) != Ordering::Less))
            },

            BinaryOperator::And => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
            BinaryOperator::Or => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),
        }
    }

    /// Adds two values.
    ///
    /// When either operand is a string the operation is concatenation, with
    /// the non-string operand converted via its string representation.
    /// Otherwise both operands must be numeric: two integers stay an
    /// integer (wrapping), any float promotes to float.
    pub(crate) fn add_values(left: &Value, right: &Value, pos: Pos) -> EvalResult<Value> {
        if let Value::Str(s) = left {
            return Ok(Value::Str(format!("{s}{right}")));
        }
        if matches!(right, Value::Str(_)) {
            return Ok(Value::Str(format!("{left}{right}")));
        }

        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_add(*b))),
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Float(a + b)),
                _ => Err(RuntimeError::TypeError { details: format!("cannot add {} and {}",
                                                                    left.type_name(),
                                                                    right.type_name()),
                                                   pos }),
            },
        }
    }

    /// Subtracts the right value from the left. Numeric only.
    pub(crate) fn subtract_values(left: &Value, right: &Value, pos: Pos) -> EvalResult<Value> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_sub(*b))),
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Float(a - b)),
                _ => Err(RuntimeError::TypeError { details: format!("cannot subtract {} from {}",
                                                                    right.type_name(),
                                                                    left.type_name()),
                                                   pos }),
            },
        }
    }

    /// Multiplies two values. Numeric only.
    pub(crate) fn multiply_values(left: &Value, right: &Value, pos: Pos) -> EvalResult<Value> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_mul(*b))),
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Float(a * b)),
                _ => Err(RuntimeError::TypeError { details: format!("cannot multiply {} and {}",
                                                                    left.type_name(),
                                                                    right.type_name()),
                                                   pos }),
            },
        }
    }

    /// Divides the left value by the right. Numeric only; division by zero
    /// is an error for integers and floats alike. Integer division
    /// truncates toward zero.
    pub(crate) fn divide_values(left: &Value, right: &Value, pos: Pos) -> EvalResult<Value> {
        match (left.as_f64(), right.as_f64()) {
            (Some(_), Some(b)) if b == 0.0 => Err(RuntimeError::DivisionByZero { pos }),
            (Some(a), Some(b)) => match (left, right) {
                (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(x.wrapping_div(*y))),
                _ => Ok(Value::Float(a / b)),
            },
            _ => Err(RuntimeError::TypeError { details: format!("cannot divide {} by {}",
                                                                left.type_name(),
                                                                right.type_name()),
                                               pos }),
        }
    }
}

/// Checks type-aware equality between two values.
///
/// Matching pairs are int↔int, float↔float, int↔float (compared
/// numerically), string↔string and bool↔bool. Every other combination —
/// including two nulls — is not equal.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
            (*a as f64) == *b
        },
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => false,
    }
}

/// Orders two values for the relational operators.
///
/// When both operands are numeric they compare numerically; otherwise both
/// fall back to their string representations.
#[must_use]
pub(crate) fn compare_values(left: &Value, right: &Value) -> Ordering {
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }

    left.to_string().cmp(&right.to_string())
}
