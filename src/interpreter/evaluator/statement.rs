use crate::{
    ast::{AssignOperator, ElseIfClause, Expr, Pos, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Executes a single statement.
    ///
    /// Control flow does not unwind through return values here: `break` and
    /// `return` set evaluator-owned flags which enclosing blocks and loops
    /// check after each statement.
    ///
    /// # Parameters
    /// - `statement`: Statement to execute.
    ///
    /// # Errors
    /// Propagates the first runtime error raised by the statement or any
    /// nested expression.
    pub fn execute_statement(&mut self, statement: &Statement) -> EvalResult<()> {
        match statement {
            Statement::Let { name, value, .. } => {
                let value = self.eval_expr(value)?;
                self.define_local(&name.to_lowercase(), value);
                Ok(())
            },
            Statement::Assign { name, op, value, pos } => {
                self.execute_assign(name, *op, value.as_ref(), *pos)
            },
            Statement::If { condition,
                            then_block,
                            else_ifs,
                            else_block,
                            .. } => {
                self.execute_if(condition, then_block, else_ifs, else_block.as_deref())
            },
            Statement::For { variable,
                             start,
                             end,
                             body,
                             pos, } => self.execute_for(variable, start, end, body, *pos),
            Statement::Break { .. } => {
                self.break_flag = true;
                Ok(())
            },
            // Collected into the function table before execution begins.
            Statement::Function(_) => Ok(()),
            Statement::Return { value, .. } => self.execute_return(value.as_ref()),
            Statement::Print { value, .. } => {
                let value = self.eval_expr(value)?;
                (self.print_sink)(&value);
                Ok(())
            },
            Statement::Expression { expr, .. } => {
                self.eval_expr(expr)?;
                Ok(())
            },
        }
    }

    /// Executes a sequence of statements in order.
    ///
    /// Execution stops early when the break or return flag is raised; the
    /// flags themselves are left for the enclosing loop or function call to
    /// consume.
    pub fn execute_block(&mut self, statements: &[Statement]) -> EvalResult<()> {
        for statement in statements {
            self.execute_statement(statement)?;
            if self.break_flag || self.return_flag {
                break;
            }
        }
        Ok(())
    }

    /// Executes an assignment statement.
    ///
    /// Plain `=` updates the nearest binding or creates one in the current
    /// scope. The compound forms `+=` and `-=` read the current value,
    /// evaluate the right-hand side once, and combine them with the binary
    /// arithmetic rules (so `+=` concatenates strings). `++` and `--`
    /// require a numeric current value and step it by one.
    fn execute_assign(&mut self,
                      name: &str,
                      op: AssignOperator,
                      value: Option<&Expr>,
                      pos: Pos)
                      -> EvalResult<()> {
        let lowered = name.to_lowercase();

        match (op, value) {
            (AssignOperator::Assign, Some(expr)) => {
                let value = self.eval_expr(expr)?;
                self.set_variable(&lowered, value);
            },

            (AssignOperator::AddAssign, Some(expr)) => {
                let current = self.eval_variable(name, pos)?;
                let rhs = self.eval_expr(expr)?;
                let combined = Self::add_values(&current, &rhs, pos)?;
                self.set_variable(&lowered, combined);
            },

            (AssignOperator::SubAssign, Some(expr)) => {
                let current = self.eval_variable(name, pos)?;
                let rhs = self.eval_expr(expr)?;
                let combined = Self::subtract_values(&current, &rhs, pos)?;
                self.set_variable(&lowered, combined);
            },

            (AssignOperator::Increment, _) => {
                let current = self.eval_variable(name, pos)?;
                let next = Self::step_numeric(&current, 1, "increment", pos)?;
                self.set_variable(&lowered, next);
            },

            (AssignOperator::Decrement, _) => {
                let current = self.eval_variable(name, pos)?;
                let next = Self::step_numeric(&current, -1, "decrement", pos)?;
                self.set_variable(&lowered, next);
            },

            // The parser never produces these forms.
            (_, None) => {
                return Err(RuntimeError::TypeError { details: format!("assignment '{op}' is missing its right-hand side"),
                                                     pos });
            },
        }

        Ok(())
    }

    /// Steps a numeric value by one in either direction. Used by `++` and
    /// `--`, which reject non-numeric operands.
    #[allow(clippy::cast_precision_loss)]
    fn step_numeric(current: &Value, delta: i64, verb: &str, pos: Pos) -> EvalResult<Value> {
        match current {
            Value::Integer(i) => Ok(Value::Integer(i.wrapping_add(delta))),
            Value::Float(n) => Ok(Value::Float(n + delta as f64)),
            other => Err(RuntimeError::TypeError { details: format!("cannot {verb} {}",
                                                                    other.type_name()),
                                                   pos }),
        }
    }

    /// Executes an `if` statement.
    ///
    /// The primary condition is evaluated first; if truthy, the then-block
    /// runs and the statement is done. Otherwise each `elseif` condition is
    /// tried in order, and finally the `else` block if present.
    fn execute_if(&mut self,
                  condition: &Expr,
                  then_block: &[Statement],
                  else_ifs: &[ElseIfClause],
                  else_block: Option<&[Statement]>)
                  -> EvalResult<()> {
        if self.eval_expr(condition)?.is_truthy() {
            return self.execute_block(then_block);
        }

        for clause in else_ifs {
            if self.eval_expr(&clause.condition)?.is_truthy() {
                return self.execute_block(&clause.block);
            }
        }

        if let Some(block) = else_block {
            return self.execute_block(block);
        }

        Ok(())
    }

    /// Executes a `return` statement: stores the optional value in the
    /// return slot and raises the return flag.
    fn execute_return(&mut self, value: Option<&Expr>) -> EvalResult<()> {
        if let Some(expr) = value {
            self.return_value = self.eval_expr(expr)?;
        }
        self.return_flag = true;
        Ok(())
    }
}
