use crate::{
    ast::{Expr, Pos, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operation.
    ///
    /// `-` negates an integer or float and rejects everything else. `not`
    /// returns the boolean negation of the operand's truthiness and accepts
    /// any value.
    pub(crate) fn eval_unary(&mut self,
                             op: UnaryOperator,
                             operand: &Expr,
                             pos: Pos)
                             -> EvalResult<Value> {
        let value = self.eval_expr(operand)?;

        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(i) => Ok(Value::Integer(i.wrapping_neg())),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => {
                    Err(RuntimeError::TypeError { details: format!("cannot negate {}",
                                                                   other.type_name()),
                                                  pos })
                },
            },
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }
}
