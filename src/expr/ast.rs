//! Expression Tree for Symbolic Moduli
//!
//! Every modulus of a model class is stored as an [`Expr`] tree rather than as a
//! string or a pre-evaluated closure. Keeping the tree explicit allows the model
//! compiler to substitute parameter values by walking the tree, to print the
//! residual expression after a freeze, and to interpret it for any value of the
//! free variable.
//!
//! # Node Types
//!
//! - [`Expr::Constant`]: a literal number
//! - [`Expr::Variable`]: the evaluation variable (`t`, `w` or the Laplace variable `s`)
//! - [`Expr::Parameter`]: a named model parameter awaiting a value
//! - [`Expr::Binary`] / [`Expr::Unary`]: arithmetic
//! - [`Expr::Call`]: elementary and special functions

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::precision::Real;

/// Free variables an expression can be evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variable {
    /// Time `t`, used by relaxation and creep moduli
    Time,
    /// Angular frequency `w` (ω), used by storage and loss moduli
    Frequency,
    /// Laplace variable `s`, only valid inside `invlaplace(...)`
    Laplace,
}

impl Variable {
    /// Symbol used for this variable in expression strings
    pub fn symbol(&self) -> &'static str {
        match self {
            Variable::Time => "t",
            Variable::Frequency => "w",
            Variable::Laplace => "s",
        }
    }

    /// Resolves a symbol to a variable, if it names one
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "t" => Some(Variable::Time),
            "w" | "omega" => Some(Variable::Frequency),
            "s" => Some(Variable::Laplace),
            _ => None,
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
        }
    }

    /// Binding strength, matching the precedence used when parsing
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 2,
            BinaryOp::Pow => 4,
        }
    }

    pub(crate) fn is_right_associative(&self) -> bool {
        matches!(self, BinaryOp::Pow)
    }

    /// Applies the operator to two numbers
    pub fn apply(&self, lhs: Real, rhs: Real) -> Real {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Rem => lhs % rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Prefix negation `-x`
    Neg,
}

impl UnaryOp {
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            UnaryOp::Neg => 3,
        }
    }
}

/// Functions callable from expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tan,
    /// Gamma function Γ(x)
    Gamma,
    /// Mittag-Leffler function, `mittleff(a, z)` or `mittleff(a, b, z)`
    MittagLeffler,
    /// Numerical inverse Laplace transform of an expression in `s`
    InverseLaplace,
}

impl Function {
    pub const ALL: [Function; 11] = [
        Function::Exp,
        Function::Ln,
        Function::Log10,
        Function::Sqrt,
        Function::Abs,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Gamma,
        Function::MittagLeffler,
        Function::InverseLaplace,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Gamma => "gamma",
            Function::MittagLeffler => "mittleff",
            Function::InverseLaplace => "invlaplace",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "log" => Some(Function::Ln),
            _ => Function::ALL.iter().find(|f| f.name() == name).copied(),
        }
    }

    /// Whether the function accepts `n` arguments
    pub fn accepts(&self, n: usize) -> bool {
        match self {
            Function::MittagLeffler => n == 2 || n == 3,
            _ => n == 1,
        }
    }

    /// Human readable arity used in error messages
    pub(crate) fn arity(&self) -> &'static str {
        match self {
            Function::MittagLeffler => "2 or 3",
            _ => "1",
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A symbolic expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Real),
    Variable(Variable),
    Parameter(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn call(function: Function, args: Vec<Expr>) -> Self {
        Expr::Call { function, args }
    }

    /// Returns the constant value if this node is a literal
    pub fn as_constant(&self) -> Option<Real> {
        match self {
            Expr::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// Collects the names of all parameters referenced by the expression
    ///
    /// # Returns
    ///
    /// A sorted set of parameter names.
    pub fn parameters(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.visit(&mut |node| {
            if let Expr::Parameter(name) = node {
                names.insert(name.clone());
            }
        });
        names
    }

    /// Collects all variables referenced by the expression, including `s`
    /// occurring inside inverse Laplace transforms
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut variables = BTreeSet::new();
        self.visit(&mut |node| {
            if let Expr::Variable(variable) = node {
                variables.insert(*variable);
            }
        });
        variables
    }

    /// Whether the expression contains neither parameters nor variables
    pub fn is_closed(&self) -> bool {
        let mut closed = true;
        self.visit(&mut |node| {
            if matches!(node, Expr::Parameter(_) | Expr::Variable(_)) {
                closed = false;
            }
        });
        closed
    }

    /// Pre-order traversal over every node of the tree
    pub fn visit(&self, visitor: &mut impl FnMut(&Expr)) {
        visitor(self);
        match self {
            Expr::Binary { lhs, rhs, .. } => {
                lhs.visit(visitor);
                rhs.visit(visitor);
            }
            Expr::Unary { operand, .. } => operand.visit(visitor),
            Expr::Call { args, .. } => args.iter().for_each(|arg| arg.visit(visitor)),
            Expr::Constant(_) | Expr::Variable(_) | Expr::Parameter(_) => {}
        }
    }

    /// Writes the expression with the minimal parentheses needed to re-parse it
    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, parent: u8, right_operand: bool) -> fmt::Result {
        match self {
            Expr::Constant(value) => {
                let wrap = parent > UnaryOp::Neg.precedence() || (right_operand && parent > 0);
                if *value < 0.0 && wrap {
                    write!(f, "(")?;
                    write_number(f, *value)?;
                    write!(f, ")")
                } else {
                    write_number(f, *value)
                }
            }
            Expr::Variable(variable) => write!(f, "{}", variable),
            Expr::Parameter(name) => write!(f, "{}", name),
            Expr::Binary { op, lhs, rhs } => {
                let precedence = op.precedence();
                let wrap = precedence < parent
                    || (precedence == parent && right_operand != op.is_right_associative());
                if wrap {
                    write!(f, "(")?;
                }
                lhs.fmt_with(f, precedence, false)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_with(f, precedence, true)?;
                if wrap {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Expr::Unary { op, operand } => {
                let precedence = op.precedence();
                let wrap = precedence < parent;
                if wrap {
                    write!(f, "(")?;
                }
                match op {
                    UnaryOp::Neg => {
                        write!(f, "-")?;
                        operand.fmt_with(f, precedence, true)?;
                    }
                }
                if wrap {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Expr::Call { function, args } => {
                write!(f, "{}(", function)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    arg.fmt_with(f, 0, false)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Numbers are written so that the expression parser reads them back unchanged
fn write_number(f: &mut fmt::Formatter<'_>, value: Real) -> fmt::Result {
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e15).contains(&magnitude) {
        write!(f, "{}", value)
    } else {
        write!(f, "{:e}", value)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, 0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str) -> Expr {
        Expr::Parameter(name.to_string())
    }

    #[test]
    fn test_display_minimal_parentheses() {
        // k * exp(-k * t / eta)
        let expr = Expr::binary(
            BinaryOp::Mul,
            param("k"),
            Expr::call(
                Function::Exp,
                vec![Expr::binary(
                    BinaryOp::Div,
                    Expr::binary(
                        BinaryOp::Mul,
                        Expr::unary(UnaryOp::Neg, param("k")),
                        Expr::Variable(Variable::Time),
                    ),
                    param("eta"),
                )],
            ),
        );

        assert_eq!(expr.to_string(), "k * exp(-k * t / eta)");
    }

    #[test]
    fn test_display_keeps_grouping() {
        // (a - b) - (c - d)
        let expr = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Sub, param("a"), param("b")),
            Expr::binary(BinaryOp::Sub, param("c"), param("d")),
        );
        assert_eq!(expr.to_string(), "a - b - (c - d)");

        // t^(-b)
        let expr = Expr::binary(
            BinaryOp::Pow,
            Expr::Variable(Variable::Time),
            Expr::unary(UnaryOp::Neg, param("b")),
        );
        assert_eq!(expr.to_string(), "t ^ (-b)");
    }

    #[test]
    fn test_collect_symbols() {
        let expr = Expr::binary(
            BinaryOp::Add,
            param("k"),
            Expr::binary(BinaryOp::Div, Expr::Variable(Variable::Time), param("eta")),
        );

        assert_eq!(
            expr.parameters().into_iter().collect::<Vec<_>>(),
            vec!["eta".to_string(), "k".to_string()]
        );
        assert!(expr.variables().contains(&Variable::Time));
        assert!(!expr.is_closed());
        assert!(Expr::Constant(1.0).is_closed());
    }
}
