//! Catalog of standard viscoelastic models
//!
//! The catalog is assembled on first access and is read-only afterwards.
//! Frequencies are written `w` and stand for the angular frequency ω.
//! Springpots are parametrized by a quasi-property `c_x` and an order `x`.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::class::{ModelClass, ModelDefinition};
use super::error::ModelError;

lazy_static! {
    static ref CATALOG: Vec<ModelClass> = {
        let classes: Vec<ModelClass> = definitions()
            .into_iter()
            .map(|definition| {
                ModelClass::define(definition).expect("catalog model definitions are valid")
            })
            .collect();
        log::debug!("Assembled model catalog with {} classes", classes.len());
        classes
    };
    static ref INDEX: HashMap<&'static str, usize> = CATALOG
        .iter()
        .enumerate()
        .map(|(i, class)| (class.name(), i))
        .collect();
}

/// All standard model classes in catalog order
pub fn catalog() -> &'static [ModelClass] {
    &CATALOG
}

/// Looks up a standard model class by name
///
/// # Errors
///
/// Returns [`ModelError::UnknownModel`] if no class has that name.
pub fn lookup(name: &str) -> Result<&'static ModelClass, ModelError> {
    INDEX
        .get(name.trim())
        .map(|&i| &CATALOG[i])
        .ok_or_else(|| ModelError::UnknownModel(name.to_string()))
}

struct Entry {
    name: &'static str,
    parameters: &'static [&'static str],
    relaxation: Option<&'static str>,
    creep: Option<&'static str>,
    storage: Option<&'static str>,
    loss: Option<&'static str>,
    constraint: &'static str,
    description: &'static str,
}

impl From<Entry> for ModelDefinition {
    fn from(entry: Entry) -> Self {
        ModelDefinition {
            name: entry.name.to_string(),
            parameters: entry.parameters.iter().map(|p| p.to_string()).collect(),
            relaxation: entry.relaxation.map(String::from),
            creep: entry.creep.map(String::from),
            storage: entry.storage.map(String::from),
            loss: entry.loss.map(String::from),
            constraint: Some(entry.constraint.to_string()),
            description: entry.description.to_string(),
            lineage: Vec::new(),
        }
    }
}

// Fractional Maxwell moduli with A = c_a w^a and B = c_b w^b:
//   G'  = A B (A cos(pi b / 2) + B cos(pi a / 2)) / D
//   G'' = A B (A sin(pi b / 2) + B sin(pi a / 2)) / D
//   D   = A^2 + B^2 + 2 A B cos(pi (a - b) / 2)
const FRACT_MAXWELL_STORAGE: &str = "c_a * w^a * c_b * w^b * (c_a * w^a * cos(pi * b / 2) + c_b * w^b * cos(pi * a / 2)) / ((c_a * w^a)^2 + (c_b * w^b)^2 + 2 * c_a * w^a * c_b * w^b * cos(pi * (a - b) / 2))";
const FRACT_MAXWELL_LOSS: &str = "c_a * w^a * c_b * w^b * (c_a * w^a * sin(pi * b / 2) + c_b * w^b * sin(pi * a / 2)) / ((c_a * w^a)^2 + (c_b * w^b)^2 + 2 * c_a * w^a * c_b * w^b * cos(pi * (a - b) / 2))";

fn definitions() -> Vec<ModelDefinition> {
    let entries = vec![
        Entry {
            name: "spring",
            parameters: &["k"],
            relaxation: Some("k"),
            creep: Some("1 / k"),
            storage: Some("k"),
            loss: Some("0"),
            constraint: "k > 0",
            description: "Hookean spring",
        },
        Entry {
            name: "dashpot",
            parameters: &["eta"],
            relaxation: None,
            creep: Some("t / eta"),
            storage: Some("0"),
            loss: Some("eta * w"),
            constraint: "eta > 0",
            description: "Newtonian dashpot, its relaxation modulus is a Dirac delta",
        },
        Entry {
            name: "springpot",
            parameters: &["c_b", "b"],
            relaxation: Some("c_b * t^(-b) / gamma(1 - b)"),
            creep: Some("t^b / (c_b * gamma(1 + b))"),
            storage: Some("c_b * w^b * cos(pi * b / 2)"),
            loss: Some("c_b * w^b * sin(pi * b / 2)"),
            constraint: "c_b > 0; b > 0; b < 1",
            description: "Scott-Blair element interpolating between spring and dashpot",
        },
        Entry {
            name: "maxwell",
            parameters: &["eta", "k"],
            relaxation: Some("k * exp(-k * t / eta)"),
            creep: Some("1 / k + t / eta"),
            storage: Some("eta^2 * w^2 * k / (k^2 + eta^2 * w^2)"),
            loss: Some("eta * w * k^2 / (k^2 + eta^2 * w^2)"),
            constraint: "eta > 0; k > 0",
            description: "Spring and dashpot in series",
        },
        Entry {
            name: "kelvin_voigt",
            parameters: &["eta", "k"],
            relaxation: Some("k"),
            creep: Some("(1 - exp(-k * t / eta)) / k"),
            storage: Some("k"),
            loss: Some("eta * w"),
            constraint: "eta > 0; k > 0",
            description: "Spring and dashpot in parallel, the relaxation modulus omits the delta at t = 0",
        },
        Entry {
            name: "sls_zener",
            parameters: &["eta", "k_b", "k_g"],
            relaxation: Some("k_g + k_b * exp(-k_b * t / eta)"),
            creep: Some("1 / k_g - k_b / (k_g * (k_g + k_b)) * exp(-k_b * k_g * t / (eta * (k_b + k_g)))"),
            storage: Some("k_g + k_b * eta^2 * w^2 / (k_b^2 + eta^2 * w^2)"),
            loss: Some("k_b^2 * eta * w / (k_b^2 + eta^2 * w^2)"),
            constraint: "eta > 0; k_b > 0; k_g > 0",
            description: "Standard linear solid: a Maxwell arm in parallel with a spring",
        },
        Entry {
            name: "burgers",
            parameters: &["eta_1", "k_1", "eta_2", "k_2"],
            relaxation: Some("invlaplace(1 / (s^2 * (1 / (k_1 * s) + 1 / (eta_1 * s^2) + 1 / (s * (k_2 + eta_2 * s)))))"),
            creep: Some("1 / k_1 + t / eta_1 + (1 - exp(-k_2 * t / eta_2)) / k_2"),
            storage: Some("(1 / k_1 + k_2 / (k_2^2 + eta_2^2 * w^2)) / ((1 / k_1 + k_2 / (k_2^2 + eta_2^2 * w^2))^2 + (1 / (eta_1 * w) + eta_2 * w / (k_2^2 + eta_2^2 * w^2))^2)"),
            loss: Some("(1 / (eta_1 * w) + eta_2 * w / (k_2^2 + eta_2^2 * w^2)) / ((1 / k_1 + k_2 / (k_2^2 + eta_2^2 * w^2))^2 + (1 / (eta_1 * w) + eta_2 * w / (k_2^2 + eta_2^2 * w^2))^2)"),
            constraint: "eta_1 > 0; k_1 > 0; eta_2 > 0; k_2 > 0",
            description: "Maxwell and Kelvin-Voigt elements in series",
        },
        Entry {
            name: "fract_maxwell",
            parameters: &["c_a", "a", "c_b", "b"],
            relaxation: Some("c_b * t^(-b) * mittleff(a - b, 1 - b, -(c_b / c_a) * t^(a - b))"),
            creep: Some("t^a / (c_a * gamma(1 + a)) + t^b / (c_b * gamma(1 + b))"),
            storage: Some(FRACT_MAXWELL_STORAGE),
            loss: Some(FRACT_MAXWELL_LOSS),
            constraint: "a > b; a <= 1; b >= 0; c_a > 0; c_b > 0",
            description: "Two springpots in series",
        },
        Entry {
            name: "fract_maxwell_spring",
            parameters: &["c_a", "a", "k"],
            relaxation: Some("k * mittleff(a, -(k / c_a) * t^a)"),
            creep: Some("t^a / (c_a * gamma(1 + a)) + 1 / k"),
            storage: Some("c_a * w^a * k * (c_a * w^a + k * cos(pi * a / 2)) / ((c_a * w^a)^2 + k^2 + 2 * c_a * w^a * k * cos(pi * a / 2))"),
            loss: Some("c_a * w^a * k^2 * sin(pi * a / 2) / ((c_a * w^a)^2 + k^2 + 2 * c_a * w^a * k * cos(pi * a / 2))"),
            constraint: "a > 0; a < 1; c_a > 0; k > 0",
            description: "Springpot and spring in series",
        },
        Entry {
            name: "fract_maxwell_dashpot",
            parameters: &["eta", "c_b", "b"],
            relaxation: Some("c_b * t^(-b) * mittleff(1 - b, 1 - b, -(c_b / eta) * t^(1 - b))"),
            creep: Some("t / eta + t^b / (c_b * gamma(1 + b))"),
            storage: Some("(eta * w)^2 * c_b * w^b * cos(pi * b / 2) / ((eta * w)^2 + (c_b * w^b)^2 + 2 * eta * w * c_b * w^b * cos(pi * (1 - b) / 2))"),
            loss: Some("eta * w * c_b * w^b * (eta * w * sin(pi * b / 2) + c_b * w^b) / ((eta * w)^2 + (c_b * w^b)^2 + 2 * eta * w * c_b * w^b * cos(pi * (1 - b) / 2))"),
            constraint: "b > 0; b < 1; eta > 0; c_b > 0",
            description: "Dashpot and springpot in series",
        },
        Entry {
            name: "fract_kelvin_voigt",
            parameters: &["c_a", "a", "c_b", "b"],
            relaxation: Some("c_a * t^(-a) / gamma(1 - a) + c_b * t^(-b) / gamma(1 - b)"),
            creep: Some("t^a / c_a * mittleff(a - b, 1 + a, -(c_b / c_a) * t^(a - b))"),
            storage: Some("c_a * w^a * cos(pi * a / 2) + c_b * w^b * cos(pi * b / 2)"),
            loss: Some("c_a * w^a * sin(pi * a / 2) + c_b * w^b * sin(pi * b / 2)"),
            constraint: "a > b; a < 1; b >= 0; c_a > 0; c_b > 0",
            description: "Two springpots in parallel",
        },
        Entry {
            name: "fract_sls_zener",
            parameters: &["c_a", "a", "k_b", "k_g"],
            relaxation: Some("k_g + k_b * mittleff(a, -(k_b / c_a) * t^a)"),
            creep: Some("invlaplace(1 / (s * (c_a * s^a * k_b / (c_a * s^a + k_b) + k_g)))"),
            storage: Some("k_g + c_a * w^a * k_b * (c_a * w^a + k_b * cos(pi * a / 2)) / ((c_a * w^a)^2 + k_b^2 + 2 * c_a * w^a * k_b * cos(pi * a / 2))"),
            loss: Some("c_a * w^a * k_b^2 * sin(pi * a / 2) / ((c_a * w^a)^2 + k_b^2 + 2 * c_a * w^a * k_b * cos(pi * a / 2))"),
            constraint: "a > 0; a < 1; c_a > 0; k_b > 0; k_g > 0",
            description: "Springpot-spring Maxwell arm in parallel with a spring",
        },
        Entry {
            name: "fract_zener",
            parameters: &["c_a", "a", "c_b", "b", "c_g", "g"],
            relaxation: Some("c_b * t^(-b) * mittleff(a - b, 1 - b, -(c_b / c_a) * t^(a - b)) + c_g * t^(-g) / gamma(1 - g)"),
            creep: Some("invlaplace(1 / (s * (c_a * s^a * c_b * s^b / (c_a * s^a + c_b * s^b) + c_g * s^g)))"),
            storage: Some("c_a * w^a * c_b * w^b * (c_a * w^a * cos(pi * b / 2) + c_b * w^b * cos(pi * a / 2)) / ((c_a * w^a)^2 + (c_b * w^b)^2 + 2 * c_a * w^a * c_b * w^b * cos(pi * (a - b) / 2)) + c_g * w^g * cos(pi * g / 2)"),
            loss: Some("c_a * w^a * c_b * w^b * (c_a * w^a * sin(pi * b / 2) + c_b * w^b * sin(pi * a / 2)) / ((c_a * w^a)^2 + (c_b * w^b)^2 + 2 * c_a * w^a * c_b * w^b * cos(pi * (a - b) / 2)) + c_g * w^g * sin(pi * g / 2)"),
            constraint: "a > b; a <= 1; b >= 0; g >= 0; g < 1; c_a > 0; c_b > 0; c_g > 0",
            description: "Fractional Maxwell model in parallel with a springpot",
        },
    ];

    entries.into_iter().map(ModelDefinition::from).collect()
}
