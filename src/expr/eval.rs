//! Interpretation of expression trees.
//!
//! Evaluation is a plain recursive walk. Special functions are delegated to a
//! [`NumericKernel`], including the inverse Laplace transform whose argument is
//! re-evaluated for every abscissa `s` the kernel requests.

use crate::kernel::numeric::NumericKernel;
use crate::precision::Real;

use super::ast::{Expr, Function, UnaryOp, Variable};

/// Values bound to the free variables during one evaluation
#[derive(Debug, Clone, Copy)]
struct Scope {
    variable: Variable,
    value: Real,
    laplace: Option<Real>,
}

impl Expr {
    /// Evaluates the expression with `variable` bound to `value`.
    ///
    /// Parameters left in the tree and variables that are not bound evaluate to
    /// NaN. The model compiler rejects such trees before they are evaluated.
    pub fn eval(&self, variable: Variable, value: Real, kernel: &dyn NumericKernel) -> Real {
        let scope = Scope {
            variable,
            value,
            laplace: None,
        };
        self.eval_in(&scope, kernel)
    }

    /// Evaluates an expression that contains neither variables nor parameters
    pub fn eval_closed(&self, kernel: &dyn NumericKernel) -> Real {
        self.eval(Variable::Time, Real::NAN, kernel)
    }

    fn eval_in(&self, scope: &Scope, kernel: &dyn NumericKernel) -> Real {
        match self {
            Expr::Constant(value) => *value,
            Expr::Variable(Variable::Laplace) => scope.laplace.unwrap_or(Real::NAN),
            Expr::Variable(variable) if *variable == scope.variable => scope.value,
            Expr::Variable(_) | Expr::Parameter(_) => Real::NAN,
            Expr::Binary { op, lhs, rhs } => {
                op.apply(lhs.eval_in(scope, kernel), rhs.eval_in(scope, kernel))
            }
            Expr::Unary { op, operand } => {
                let x = operand.eval_in(scope, kernel);
                match op {
                    UnaryOp::Neg => -x,
                }
            }
            Expr::Call {
                function: Function::InverseLaplace,
                args,
            } => match (args.first(), scope.variable) {
                (Some(transform), Variable::Time) => {
                    let image = |s: Real| {
                        let inner = Scope {
                            laplace: Some(s),
                            ..*scope
                        };
                        transform.eval_in(&inner, kernel)
                    };
                    kernel.inverse_laplace(&image, scope.value)
                }
                _ => Real::NAN,
            },
            Expr::Call { function, args } => {
                let values: Vec<Real> = args.iter().map(|arg| arg.eval_in(scope, kernel)).collect();
                apply_function(*function, &values, kernel)
            }
        }
    }
}

fn apply_function(function: Function, args: &[Real], kernel: &dyn NumericKernel) -> Real {
    match (function, args) {
        (Function::Exp, [x]) => x.exp(),
        (Function::Ln, [x]) => x.ln(),
        (Function::Log10, [x]) => x.log10(),
        (Function::Sqrt, [x]) => x.sqrt(),
        (Function::Abs, [x]) => x.abs(),
        (Function::Sin, [x]) => x.sin(),
        (Function::Cos, [x]) => x.cos(),
        (Function::Tan, [x]) => x.tan(),
        (Function::Gamma, [x]) => kernel.gamma(*x),
        (Function::MittagLeffler, [alpha, z]) => kernel.mittag_leffler(*alpha, 1.0, *z),
        (Function::MittagLeffler, [alpha, beta, z]) => kernel.mittag_leffler(*alpha, *beta, *z),
        _ => Real::NAN,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::expr::parse::parse_expression;
    use crate::kernel::numeric::StandardKernel;

    #[test]
    fn test_eval_arithmetic() {
        let kernel = StandardKernel::default();
        let expr = parse_expression("2 * t^2 - 3 % 2 + abs(-4)", &[]).unwrap();

        assert_relative_eq!(expr.eval(Variable::Time, 3.0, &kernel), 21.0);
    }

    #[test]
    fn test_eval_wrong_variable_is_nan() {
        let kernel = StandardKernel::default();
        let expr = parse_expression("w * 2", &[]).unwrap();

        assert!(expr.eval(Variable::Time, 1.0, &kernel).is_nan());
    }

    #[test]
    fn test_eval_special_functions() {
        let kernel = StandardKernel::default();
        let ml = parse_expression("mittleff(1, -t)", &[]).unwrap();
        let shifted_gamma = parse_expression("gamma(t + 1)", &[]).unwrap();

        assert_relative_eq!(
            ml.eval(Variable::Time, 2.0, &kernel),
            (-2.0 as Real).exp(),
            max_relative = 1e-10
        );
        assert_eq!(shifted_gamma.eval(Variable::Time, 4.0, &kernel), 24.0);
    }

    #[test]
    fn test_eval_inverse_laplace() {
        // L^-1[1 / (s + 1)] = exp(-t)
        let kernel = StandardKernel::default();
        let expr = parse_expression("invlaplace(1 / (s + 1))", &[]).unwrap();

        assert_relative_eq!(
            expr.eval(Variable::Time, 1.0, &kernel),
            (-1.0 as Real).exp(),
            max_relative = 1e-3
        );
    }
}
