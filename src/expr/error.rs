use thiserror::Error;

/// Errors raised while turning an expression string into an [`Expr`](super::ast::Expr)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression '{expression}': {message}")]
    Parse { expression: String, message: String },
    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
    #[error("Function '{function}' expects {expected} argument(s), found {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },
    #[error("Variable '{found}' is not allowed here, expected {expected}")]
    UnexpectedVariable { found: String, expected: String },
    #[error("Operator '{0}' is not supported")]
    UnsupportedOperator(String),
    #[error("Malformed expression: {0}")]
    Malformed(String),
}
