use crate::{
    ast::{Expr, FunctionDef, Pos},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a function call expression.
    ///
    /// Arguments are evaluated left to right, then the lowercased name is
    /// resolved: host-registered callbacks take precedence over
    /// script-defined functions of the same name; an unresolved name is an
    /// error.
    ///
    /// # Parameters
    /// - `name`: Function name as written at the call site.
    /// - `args`: Argument expressions.
    /// - `pos`: Position of the call, for error reporting.
    ///
    /// # Returns
    /// The value the function produced, or `Null` for a script function
    /// whose `return` never executed.
    pub(crate) fn eval_call(&mut self, name: &str, args: &[Expr], pos: Pos) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        let lowered = name.to_lowercase();

        if let Some(callback) = self.native_mut(&lowered) {
            return callback(&values).map_err(|message| RuntimeError::HostFunction { message,
                                                                                    pos });
        }

        if let Some(function) = self.functions.get(&lowered).cloned() {
            return self.call_script_function(&function, values, pos);
        }

        Err(RuntimeError::UnknownFunction { name: name.to_string(),
                                            pos })
    }

    /// Executes a script-defined function.
    ///
    /// Checks arity, pushes a fresh scope containing only the lowercased
    /// parameters, saves and resets the return state, executes the body, and
    /// restores the caller's return state afterwards so that a `return`
    /// inside the callee does not unwind the caller.
    ///
    /// # Errors
    /// - Wrong number of arguments.
    /// - Any runtime error raised by the body.
    fn call_script_function(&mut self,
                            function: &FunctionDef,
                            args: Vec<Value>,
                            pos: Pos)
                            -> EvalResult<Value> {
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch { name:     function.name.clone(),
                                                     expected: function.params.len(),
                                                     found:    args.len(),
                                                     pos });
        }

        self.push_scope();
        for (param, value) in function.params.iter().zip(args) {
            self.define_local(&param.to_lowercase(), value);
        }

        let saved_flag = self.return_flag;
        let saved_value = std::mem::replace(&mut self.return_value, Value::Null);
        self.return_flag = false;

        let outcome = self.execute_block(&function.body);

        self.pop_scope();
        let result = std::mem::replace(&mut self.return_value, saved_value);
        self.return_flag = saved_flag;

        outcome?;

        Ok(result)
    }
}
