//! The four viscoelastic moduli a model can provide.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::expr::ast::Variable;

/// Material functions of a linear viscoelastic model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modulus {
    /// Relaxation modulus G(t)
    Relaxation,
    /// Creep compliance J(t)
    Creep,
    /// Storage modulus G'(ω)
    Storage,
    /// Loss modulus G''(ω)
    Loss,
}

impl Modulus {
    pub const ALL: [Modulus; 4] = [
        Modulus::Relaxation,
        Modulus::Creep,
        Modulus::Storage,
        Modulus::Loss,
    ];

    /// Short symbol, e.g. `Gp` for the storage modulus
    pub fn symbol(&self) -> &'static str {
        match self {
            Modulus::Relaxation => "G",
            Modulus::Creep => "J",
            Modulus::Storage => "Gp",
            Modulus::Loss => "Gpp",
        }
    }

    /// The variable the modulus is a function of
    pub fn variable(&self) -> Variable {
        match self {
            Modulus::Relaxation | Modulus::Creep => Variable::Time,
            Modulus::Storage | Modulus::Loss => Variable::Frequency,
        }
    }

    pub fn is_time_domain(&self) -> bool {
        self.variable() == Variable::Time
    }
}

impl Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Modulus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "relaxation" => Ok(Modulus::Relaxation),
            "j" | "creep" => Ok(Modulus::Creep),
            "gp" | "g'" | "storage" => Ok(Modulus::Storage),
            "gpp" | "g''" | "loss" => Ok(Modulus::Loss),
            other => Err(format!(
                "Unknown modulus '{other}', expected one of G, J, Gp, Gpp"
            )),
        }
    }
}

/// One value per modulus
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Moduli<T> {
    pub relaxation: T,
    pub creep: T,
    pub storage: T,
    pub loss: T,
}

impl<T> Moduli<T> {
    pub fn get(&self, modulus: Modulus) -> &T {
        match modulus {
            Modulus::Relaxation => &self.relaxation,
            Modulus::Creep => &self.creep,
            Modulus::Storage => &self.storage,
            Modulus::Loss => &self.loss,
        }
    }

    /// Applies `f` to every modulus, in [`Modulus::ALL`] order
    pub fn map<U>(&self, mut f: impl FnMut(Modulus, &T) -> U) -> Moduli<U> {
        Moduli {
            relaxation: f(Modulus::Relaxation, &self.relaxation),
            creep: f(Modulus::Creep, &self.creep),
            storage: f(Modulus::Storage, &self.storage),
            loss: f(Modulus::Loss, &self.loss),
        }
    }

    /// Like [`Moduli::map`] but stops at the first error
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(Modulus, &T) -> Result<U, E>,
    ) -> Result<Moduli<U>, E> {
        Ok(Moduli {
            relaxation: f(Modulus::Relaxation, &self.relaxation)?,
            creep: f(Modulus::Creep, &self.creep)?,
            storage: f(Modulus::Storage, &self.storage)?,
            loss: f(Modulus::Loss, &self.loss)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Modulus, &T)> {
        Modulus::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}
