use crate::{
    ast::{Expr, Pos, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Executes a `for` loop.
    ///
    /// Both bound expressions are evaluated once, up front, and coerced to
    /// integers (floats truncate toward zero; anything else is an error).
    /// The loop variable lives in a scope of its own, pushed for the
    /// duration of the loop and popped on every exit path, so it is not
    /// observable afterwards. When the start exceeds the end the body runs
    /// zero times.
    ///
    /// Iteration steps by +1. A raised break flag exits the loop and is
    /// cleared; a raised return flag exits the loop and is left set so that
    /// enclosing blocks keep unwinding.
    pub(crate) fn execute_for(&mut self,
                              variable: &str,
                              start: &Expr,
                              end: &Expr,
                              body: &[Statement],
                              pos: Pos)
                              -> EvalResult<()> {
        let start_value = self.eval_expr(start)?;
        let end_value = self.eval_expr(end)?;

        let Some(start_int) = start_value.coerce_i64() else {
            return Err(RuntimeError::TypeError { details:
                                                     "FOR start value must be numeric".to_string(),
                                                 pos });
        };
        let Some(end_int) = end_value.coerce_i64() else {
            return Err(RuntimeError::TypeError { details:
                                                     "FOR end value must be numeric".to_string(),
                                                 pos });
        };

        self.push_scope();
        let outcome = self.run_iterations(&variable.to_lowercase(), start_int, end_int, body, pos);
        self.pop_scope();

        outcome
    }

    /// Drives the loop body from `start` through `end` inclusive.
    ///
    /// Every iteration of every loop counts against one shared budget per
    /// entry point; the check happens before the body runs, and exceeding
    /// the budget reports the offending loop's position.
    fn run_iterations(&mut self,
                      variable: &str,
                      start: i64,
                      end: i64,
                      body: &[Statement],
                      pos: Pos)
                      -> EvalResult<()> {
        let mut index = start;

        while index <= end {
            self.iteration_count += 1;
            if self.iteration_count > self.max_iterations {
                return Err(RuntimeError::IterationLimitExceeded { limit: self.max_iterations,
                                                                  pos });
            }

            if let Some(scope) = self.scope_stack.last_mut() {
                scope.insert(variable.to_string(), Value::Integer(index));
            }

            self.execute_block(body)?;

            if self.break_flag {
                self.break_flag = false;
                break;
            }
            if self.return_flag {
                break;
            }

            index = index.wrapping_add(1);
        }

        Ok(())
    }
}
