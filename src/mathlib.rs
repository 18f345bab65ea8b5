use rand::Rng;

use crate::interpreter::{evaluator::core::Context, value::core::Value};

/// Registers the built-in math functions on a context.
///
/// Each entry is an ordinary host callback going through the same extension
/// mechanism embedders use, so a host can overwrite any of them by
/// registering its own function under the same name.
pub fn install(context: &mut Context) {
    context.register_function("pow", Box::new(pow));
    context.register_function("abs", Box::new(abs));
    context.register_function("atn", Box::new(atn));
    context.register_function("cos", Box::new(cos));
    context.register_function("exp", Box::new(exp));
    context.register_function("int", Box::new(int));
    context.register_function("log", Box::new(log));
    context.register_function("rnd", Box::new(rnd));
    context.register_function("sin", Box::new(sin));
    context.register_function("tan", Box::new(tan));
    context.register_function("sqr", Box::new(sqr));
}

/// Checks that exactly `expected` arguments were supplied.
fn check_arity(function: &str, args: &[Value], expected: usize) -> Result<(), String> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(format!("{function} requires {expected} argument{}",
                    if expected == 1 { "" } else { "s" }))
    }
}

/// Coerces an argument to `f64`, rejecting non-numeric values with the
/// function's name in the message.
fn ensure_float(function: &str, value: &Value) -> Result<f64, String> {
    value.as_f64()
         .ok_or_else(|| format!("{function}: argument must be numeric"))
}

/// `pow(base, exponent)` returns base raised to the exponent.
fn pow(args: &[Value]) -> Result<Value, String> {
    check_arity("pow", args, 2)?;
    let base = ensure_float("pow", &args[0])?;
    let exponent = ensure_float("pow", &args[1])?;
    Ok(Value::Float(base.powf(exponent)))
}

/// `abs(x)` returns the absolute value of a number.
fn abs(args: &[Value]) -> Result<Value, String> {
    check_arity("abs", args, 1)?;
    Ok(Value::Float(ensure_float("abs", &args[0])?.abs()))
}

/// `atn(x)` returns the arctangent of a number, in radians.
fn atn(args: &[Value]) -> Result<Value, String> {
    check_arity("atn", args, 1)?;
    Ok(Value::Float(ensure_float("atn", &args[0])?.atan()))
}

/// `cos(x)` returns the cosine of an angle in radians.
fn cos(args: &[Value]) -> Result<Value, String> {
    check_arity("cos", args, 1)?;
    Ok(Value::Float(ensure_float("cos", &args[0])?.cos()))
}

/// `exp(x)` returns e raised to the power of the argument.
fn exp(args: &[Value]) -> Result<Value, String> {
    check_arity("exp", args, 1)?;
    Ok(Value::Float(ensure_float("exp", &args[0])?.exp()))
}

/// `int(x)` returns the integer part (floor) of a number.
#[allow(clippy::cast_possible_truncation)]
fn int(args: &[Value]) -> Result<Value, String> {
    check_arity("int", args, 1)?;
    let value = ensure_float("int", &args[0])?;
    Ok(Value::Integer(value.floor() as i64))
}

/// `log(x)` returns the natural logarithm of a positive number.
fn log(args: &[Value]) -> Result<Value, String> {
    check_arity("log", args, 1)?;
    let value = ensure_float("log", &args[0])?;
    if value <= 0.0 {
        return Err("log: argument must be positive".to_string());
    }
    Ok(Value::Float(value.ln()))
}

/// `rnd()` returns a random number in `[0, 1)`; `rnd(max)` scales it to
/// `[0, max)`.
fn rnd(args: &[Value]) -> Result<Value, String> {
    match args {
        [] => Ok(Value::Float(rand::thread_rng().gen_range(0.0..1.0))),
        [max] => {
            let max = ensure_float("rnd", max)?;
            Ok(Value::Float(rand::thread_rng().gen_range(0.0..1.0) * max))
        },
        _ => Err("rnd requires 0 or 1 argument".to_string()),
    }
}

/// `sin(x)` returns the sine of an angle in radians.
fn sin(args: &[Value]) -> Result<Value, String> {
    check_arity("sin", args, 1)?;
    Ok(Value::Float(ensure_float("sin", &args[0])?.sin()))
}

/// `tan(x)` returns the tangent of an angle in radians.
fn tan(args: &[Value]) -> Result<Value, String> {
    check_arity("tan", args, 1)?;
    Ok(Value::Float(ensure_float("tan", &args[0])?.tan()))
}

/// `sqr(x)` returns the square root of a non-negative number.
fn sqr(args: &[Value]) -> Result<Value, String> {
    check_arity("sqr", args, 1)?;
    let value = ensure_float("sqr", &args[0])?;
    if value < 0.0 {
        return Err("sqr: argument must be non-negative".to_string());
    }
    Ok(Value::Float(value.sqrt()))
}
