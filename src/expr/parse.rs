//! Parsing of infix expression strings into [`Expr`] trees.
//!
//! Tokenizing and operator precedence are delegated to `meval`, which yields the
//! expression in reverse polish notation. The RPN token stream is then folded on
//! a stack into the crate's own tree, resolving each symbol to either the
//! evaluation variable, a named constant or one of the declared parameters.

use meval::tokenizer::{Operation, Token};

use crate::precision::{Real, E, PI};

use super::ast::{BinaryOp, Expr, Function, UnaryOp, Variable};
use super::error::ExpressionError;

/// Parses an expression whose symbols must be variables, constants or one of
/// the given parameters.
///
/// # Arguments
///
/// * `source` - The infix expression, e.g. `k * exp(-k * t / eta)`
/// * `parameters` - Names that are resolved to [`Expr::Parameter`] leaves
///
/// # Returns
///
/// Returns the parsed tree or an [`ExpressionError`] describing the first problem found.
pub fn parse_expression(source: &str, parameters: &[String]) -> Result<Expr, ExpressionError> {
    let rpn: meval::Expr = source
        .parse()
        .map_err(|e: meval::Error| ExpressionError::Parse {
            expression: source.to_string(),
            message: e.to_string(),
        })?;

    let mut stack: Vec<Expr> = Vec::new();

    for token in rpn.iter() {
        let node = match token {
            Token::Number(value) => Expr::Constant(*value as Real),
            Token::Var(name) => resolve_symbol(name, parameters)?,
            Token::Binary(op) => {
                let rhs = pop(&mut stack)?;
                let lhs = pop(&mut stack)?;
                Expr::binary(binary_op(op), lhs, rhs)
            }
            Token::Unary(Operation::Plus) => pop(&mut stack)?,
            Token::Unary(Operation::Minus) => Expr::unary(UnaryOp::Neg, pop(&mut stack)?),
            Token::Unary(op) => return Err(ExpressionError::UnsupportedOperator(format!("{op:?}"))),
            Token::Func(name, Some(n)) => {
                let function = Function::from_name(name)
                    .ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))?;

                if !function.accepts(*n) {
                    return Err(ExpressionError::Arity {
                        function: name.clone(),
                        expected: function.arity().to_string(),
                        found: *n,
                    });
                }

                if stack.len() < *n {
                    return Err(ExpressionError::Malformed(format!(
                        "missing arguments for '{name}'"
                    )));
                }

                let args = stack.split_off(stack.len() - n);
                Expr::call(function, args)
            }
            other => {
                return Err(ExpressionError::Malformed(format!(
                    "unexpected token {other:?}"
                )))
            }
        };

        stack.push(node);
    }

    let expr = stack
        .pop()
        .ok_or_else(|| ExpressionError::Malformed("empty expression".to_string()))?;

    if !stack.is_empty() {
        return Err(ExpressionError::Malformed(format!(
            "'{source}' does not reduce to a single expression"
        )));
    }

    Ok(expr)
}

/// Checks that an expression only uses the given evaluation variable.
///
/// The Laplace variable `s` is accepted inside `invlaplace(...)` calls, which in
/// turn are only accepted in time-domain expressions.
pub fn check_variables(expr: &Expr, expected: Variable) -> Result<(), ExpressionError> {
    match expr {
        Expr::Variable(variable) if *variable != expected => {
            Err(ExpressionError::UnexpectedVariable {
                found: variable.symbol().to_string(),
                expected: format!("'{}'", expected.symbol()),
            })
        }
        Expr::Call {
            function: Function::InverseLaplace,
            args,
        } => {
            if expected != Variable::Time {
                return Err(ExpressionError::Malformed(
                    "invlaplace(...) can only be used in time-domain expressions".to_string(),
                ));
            }
            args.iter()
                .try_for_each(|arg| check_variables(arg, Variable::Laplace))
        }
        Expr::Call { args, .. } => args
            .iter()
            .try_for_each(|arg| check_variables(arg, expected)),
        Expr::Binary { lhs, rhs, .. } => {
            check_variables(lhs, expected)?;
            check_variables(rhs, expected)
        }
        Expr::Unary { operand, .. } => check_variables(operand, expected),
        Expr::Constant(_) | Expr::Variable(_) | Expr::Parameter(_) => Ok(()),
    }
}

/// Whether a name is taken by a variable, a constant or a function
pub fn is_reserved(name: &str) -> bool {
    Variable::from_symbol(name).is_some()
        || matches!(name, "pi" | "e")
        || Function::from_name(name).is_some()
}

fn resolve_symbol(name: &str, parameters: &[String]) -> Result<Expr, ExpressionError> {
    if let Some(variable) = Variable::from_symbol(name) {
        return Ok(Expr::Variable(variable));
    }

    match name {
        "pi" => Ok(Expr::Constant(PI)),
        "e" => Ok(Expr::Constant(E)),
        _ if parameters.iter().any(|p| p == name) => Ok(Expr::Parameter(name.to_string())),
        _ => Err(ExpressionError::UnknownSymbol(name.to_string())),
    }
}

fn binary_op(op: &Operation) -> BinaryOp {
    match op {
        Operation::Plus => BinaryOp::Add,
        Operation::Minus => BinaryOp::Sub,
        Operation::Times => BinaryOp::Mul,
        Operation::Div => BinaryOp::Div,
        Operation::Rem => BinaryOp::Rem,
        Operation::Pow => BinaryOp::Pow,
    }
}

fn pop(stack: &mut Vec<Expr>) -> Result<Expr, ExpressionError> {
    stack
        .pop()
        .ok_or_else(|| ExpressionError::Malformed("missing operand".to_string()))
}
