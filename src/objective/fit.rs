//! Cost of a parameter vector against measured data
//!
//! [`FitObjective`] is the seam between model classes and an external
//! optimizer. Parameters are passed positionally in the class's declaration
//! order. Vectors that violate the class constraint have no cost, so the
//! optimizer can reject them without evaluating the model.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::data::kind::TimeDataKind;
use crate::data::time::TimeSeriesRecord;
use crate::model::class::ModelClass;
use crate::model::compiler::positional_values;
use crate::model::modulus::Modulus;
use crate::precision::Real;
use crate::predict::{predict, PredictError};

use super::loss::LossFunction;

/// Which measured array drives the prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Strain is imposed, stress is predicted through G(t)
    #[default]
    Strain,
    /// Stress is imposed, strain is predicted through J(t)
    Stress,
}

impl Driver {
    fn modulus(&self) -> Modulus {
        match self {
            Driver::Strain => Modulus::Relaxation,
            Driver::Stress => Modulus::Creep,
        }
    }

    fn input_kind(&self) -> TimeDataKind {
        match self {
            Driver::Strain => TimeDataKind::StrainOnly,
            Driver::Stress => TimeDataKind::StressOnly,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FitObjective {
    class: ModelClass,
    input: TimeSeriesRecord,
    observed: Array1<Real>,
    driver: Driver,
    loss: LossFunction,
}

impl FitObjective {
    /// Prepares an objective for `class` against a record holding stress and strain.
    ///
    /// # Errors
    ///
    /// - [`PredictError::UnsupportedKind`] if the record lacks stress or strain
    /// - [`PredictError::ModulusUnavailable`] if the class cannot predict the
    ///   response to the driving array
    pub fn new(
        class: ModelClass,
        data: &TimeSeriesRecord,
        driver: Driver,
        loss: LossFunction,
    ) -> Result<Self, PredictError> {
        let observed = match (data.kind(), driver) {
            (TimeDataKind::StrainAndStress, Driver::Strain) => data.stress(),
            (TimeDataKind::StrainAndStress, Driver::Stress) => data.strain(),
            (kind, _) => return Err(PredictError::UnsupportedKind(kind)),
        }
        .ok_or(PredictError::UnsupportedKind(data.kind()))?;

        if !class.provides(driver.modulus()) {
            return Err(PredictError::ModulusUnavailable {
                model: class.name().to_string(),
                modulus: driver.modulus(),
            });
        }

        Ok(Self {
            observed: Array1::from(observed.to_vec()),
            input: data.extract(driver.input_kind())?,
            class,
            driver,
            loss,
        })
    }

    /// Cost of the positional parameter vector, `None` if the constraint fails.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::Model`] if the vector length does not match the
    /// class parameters.
    pub fn cost(&self, parameters: &[Real]) -> Result<Option<Real>, PredictError> {
        let values = positional_values(&self.class, parameters)?;
        if !self.class.constraint_holds(&values) {
            log::trace!("Rejected {} for '{}'", values, self.class.name());
            return Ok(None);
        }

        let instance = self.class.bind(&values)?;
        let predicted = predict(&instance, &self.input)?;
        let response = match self.driver {
            Driver::Strain => predicted.stress(),
            Driver::Stress => predicted.strain(),
        }
        .ok_or(PredictError::UnsupportedKind(predicted.kind()))?;

        let residuals = Array1::from(response.to_vec()) - &self.observed;
        Ok(Some(self.loss.cost(&residuals)))
    }

    pub fn parameters(&self) -> &[String] {
        self.class.parameters()
    }

    pub fn class(&self) -> &ModelClass {
        &self.class
    }

    pub fn loss(&self) -> LossFunction {
        self.loss
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::load::patterns::step_load;
    use crate::model::catalog::lookup;
    use crate::model::values::ParameterValues;

    fn measured() -> TimeSeriesRecord {
        let maxwell = lookup("maxwell")
            .unwrap()
            .bind(&ParameterValues::from([("eta", 2.0), ("k", 1.0)]))
            .unwrap();
        let strain = step_load(10.0, 0.0, 0.0)
            .unwrap()
            .extract(TimeDataKind::StrainOnly)
            .unwrap();
        predict(&maxwell, &strain).unwrap()
    }

    #[test]
    fn test_cost_vanishes_at_truth() {
        let objective = FitObjective::new(
            lookup("maxwell").unwrap().clone(),
            &measured(),
            Driver::Strain,
            LossFunction::SSE,
        )
        .unwrap();

        assert_relative_eq!(objective.cost(&[2.0, 1.0]).unwrap().unwrap(), 0.0);
        assert!(objective.cost(&[1.0, 1.0]).unwrap().unwrap() > 1e-3);
    }

    #[test]
    fn test_constraint_violation_has_no_cost() {
        let objective = FitObjective::new(
            lookup("maxwell").unwrap().clone(),
            &measured(),
            Driver::Strain,
            LossFunction::MSE,
        )
        .unwrap();

        assert_eq!(objective.cost(&[-2.0, 1.0]).unwrap(), None);
        assert!(objective.cost(&[2.0]).is_err());
    }

    #[test]
    fn test_requires_both_arrays() {
        let strain_only = step_load(5.0, 0.0, 0.0)
            .unwrap()
            .extract(TimeDataKind::StrainOnly)
            .unwrap();

        let result = FitObjective::new(
            lookup("maxwell").unwrap().clone(),
            &strain_only,
            Driver::Strain,
            LossFunction::MSE,
        );

        assert!(matches!(result, Err(PredictError::UnsupportedKind(_))));
    }
}
