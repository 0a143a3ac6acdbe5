//! Parameter substitution and constant folding.
//!
//! Substitution walks the tree and replaces every [`Expr::Parameter`] leaf that
//! has a value with an [`Expr::Constant`], leaving variables, operators and calls
//! untouched. Folding then collapses closed subtrees into single constants so
//! that the residual expression interprets with fewer nodes.

use std::collections::HashMap;

use crate::kernel::numeric::NumericKernel;
use crate::precision::Real;

use super::ast::{Expr, Function};

impl Expr {
    /// Replaces parameters found in `values` by their numeric value.
    ///
    /// Parameters without an entry stay symbolic, which is what freezing relies on.
    pub fn substitute(&self, values: &HashMap<String, Real>) -> Expr {
        match self {
            Expr::Parameter(name) => match values.get(name) {
                Some(value) => Expr::Constant(*value),
                None => self.clone(),
            },
            Expr::Constant(_) | Expr::Variable(_) => self.clone(),
            Expr::Binary { op, lhs, rhs } => {
                Expr::binary(*op, lhs.substitute(values), rhs.substitute(values))
            }
            Expr::Unary { op, operand } => Expr::unary(*op, operand.substitute(values)),
            Expr::Call { function, args } => Expr::call(
                *function,
                args.iter().map(|arg| arg.substitute(values)).collect(),
            ),
        }
    }

    /// Collapses every closed subtree into a constant.
    ///
    /// Inverse Laplace calls are never collapsed since their argument depends on `s`.
    pub fn fold_constants(&self, kernel: &dyn NumericKernel) -> Expr {
        match self {
            Expr::Constant(_) | Expr::Variable(_) | Expr::Parameter(_) => self.clone(),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.fold_constants(kernel);
                let rhs = rhs.fold_constants(kernel);
                match (lhs.as_constant(), rhs.as_constant()) {
                    (Some(a), Some(b)) => Expr::Constant(op.apply(a, b)),
                    _ => Expr::binary(*op, lhs, rhs),
                }
            }
            Expr::Unary { op, operand } => {
                let folded = Expr::unary(*op, operand.fold_constants(kernel));
                if folded.is_closed() {
                    Expr::Constant(folded.eval_closed(kernel))
                } else {
                    folded
                }
            }
            Expr::Call { function, args } => {
                let args: Vec<Expr> = args.iter().map(|arg| arg.fold_constants(kernel)).collect();
                let folded = Expr::call(*function, args);
                if *function != Function::InverseLaplace && folded.is_closed() {
                    Expr::Constant(folded.eval_closed(kernel))
                } else {
                    folded
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse::parse_expression;
    use crate::kernel::numeric::StandardKernel;

    fn lookup(pairs: &[(&str, Real)]) -> HashMap<String, Real> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_partial_substitution_keeps_free_parameters() {
        let parameters = vec!["eta".to_string(), "k".to_string()];
        let expr = parse_expression("k * exp(-k * t / eta)", &parameters).unwrap();

        let partial = expr.substitute(&lookup(&[("k", 1.0)]));

        assert_eq!(partial.to_string(), "1 * exp(-1 * t / eta)");
        assert_eq!(
            partial.parameters().into_iter().collect::<Vec<_>>(),
            vec!["eta".to_string()]
        );
    }

    #[test]
    fn test_fold_constants() {
        let kernel = StandardKernel::default();
        let parameters = vec!["a".to_string(), "k".to_string()];
        let expr = parse_expression("k * t / gamma(1 + a)", &parameters).unwrap();

        let folded = expr
            .substitute(&lookup(&[("a", 1.0), ("k", 2.0)]))
            .fold_constants(&kernel);

        assert_eq!(folded.to_string(), "2 * t / 1");
    }
}
