#[cfg(test)]
mod test_predict {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rheos::prelude::*;

    fn bind(name: &str, values: &[(&str, f64)]) -> ModelInstance {
        let values: ParameterValues = values.iter().map(|(k, v)| (*k, *v)).collect();
        lookup(name).unwrap().bind(&values).unwrap()
    }

    fn strain_step(t_on: Real) -> TimeSeriesRecord {
        step_load(10.0, t_on, 0.0)
            .unwrap()
            .extract(TimeDataKind::StrainOnly)
            .unwrap()
    }

    #[test]
    fn test_maxwell_relaxation_after_step() {
        // ARRANGE
        let maxwell = bind("maxwell", &[("eta", 2.0), ("k", 1.0)]);

        // ACT
        let predicted = predict(&maxwell, &strain_step(5.0)).unwrap();

        // ASSERT
        let stress = predicted.stress().unwrap();
        for (t, sigma) in predicted.time().iter().zip(stress) {
            if *t < 5.0 {
                assert_eq!(*sigma, 0.0);
            } else {
                assert_relative_eq!(*sigma, (-(t - 5.0) / 2.0).exp(), max_relative = 1e-12);
            }
        }
        assert_eq!(predicted.strain(), strain_step(5.0).strain());
        assert_eq!(
            predicted.log().flatten(),
            vec!["step_load", "extract", "predict"]
        );
    }

    #[test]
    fn test_creep_after_stress_step() {
        let kelvin_voigt = bind("kelvin_voigt", &[("eta", 1.0), ("k", 4.0)]);
        let stress = step_load(10.0, 2.0, 0.0)
            .unwrap()
            .extract(TimeDataKind::StressOnly)
            .unwrap();

        let predicted = predict(&kelvin_voigt, &stress).unwrap();

        let strain = predicted.strain().unwrap();
        assert_eq!(strain[1], 0.0);
        for i in 2..=10 {
            let t = i as Real - 2.0;
            assert_relative_eq!(strain[i], (1.0 - (-4.0 * t).exp()) / 4.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_spring_is_proportional() {
        let spring = bind("spring", &[("k", 3.0)]);
        let strain = sinusoid_load(5.0, 1.3, 2.0, 0.1)
            .unwrap()
            .extract(TimeDataKind::StrainOnly)
            .unwrap();

        let predicted = predict(&spring, &strain).unwrap();

        for (sigma, epsilon) in predicted.stress().unwrap().iter().zip(strain.strain().unwrap()) {
            assert_relative_eq!(*sigma, 3.0 * epsilon, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_prediction_is_linear() {
        let zener = bind("sls_zener", &[("eta", 1.0), ("k_b", 2.0), ("k_g", 0.5)]);
        let strain = ramp_load(8.0, 1.0, 0.5)
            .unwrap()
            .extract(TimeDataKind::StrainOnly)
            .unwrap();

        let single = predict(&zener, &strain).unwrap();
        let double = predict(&zener, &(&strain * 2.0).unwrap()).unwrap();

        for (a, b) in single.stress().unwrap().iter().zip(double.stress().unwrap()) {
            assert_relative_eq!(2.0 * a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_non_uniform_grid() {
        let maxwell = bind("maxwell", &[("eta", 2.0), ("k", 1.0)]);
        let time = [0.0, 0.3, 1.0, 1.1, 2.5];
        let strain = TimeSeriesRecord::from_strain(&time, &[0.0, 1.0, 1.0, 3.0, 3.0]).unwrap();

        let predicted = predict(&maxwell, &strain).unwrap();

        let g = |t: Real| (-t / 2.0).exp();
        let expected = g(2.5 - 0.3) + 2.0 * g(2.5 - 1.1);
        assert_relative_eq!(predicted.stress().unwrap()[4], expected, max_relative = 1e-12);
    }

    #[test]
    fn test_singular_relaxation_at_origin() {
        // The springpot relaxation modulus diverges at t = 0
        let springpot = bind("springpot", &[("c_b", 1.0), ("b", 0.5)]);

        let predicted = predict(&springpot, &strain_step(0.0)).unwrap();

        let stress = predicted.stress().unwrap();
        assert!(stress.iter().all(|s| s.is_finite()));
        assert_relative_eq!(stress[0], springpot.g(0.5).unwrap(), max_relative = 1e-12);
        assert_relative_eq!(stress[4], springpot.g(4.0).unwrap(), max_relative = 1e-12);
    }

    #[test]
    fn test_frequency_prediction() {
        let maxwell = bind("maxwell", &[("eta", 2.0), ("k", 1.0)]);
        let grid = FrequencyGridBuilder::default()
            .start(0.01)
            .end(100.0)
            .points(9usize)
            .logarithmic(true)
            .build()
            .unwrap()
            .to_record()
            .unwrap();

        let predicted = predict_frequency(&maxwell, &grid).unwrap();

        assert_eq!(predicted.kind(), FreqDataKind::WithModulus);
        for ((w, gp), gpp) in predicted
            .frequency()
            .iter()
            .zip(predicted.storage_modulus().unwrap())
            .zip(predicted.loss_modulus().unwrap())
        {
            assert_relative_eq!(*gp, maxwell.gp(*w).unwrap(), max_relative = 1e-12);
            assert_relative_eq!(*gpp, maxwell.gpp(*w).unwrap(), max_relative = 1e-12);
        }
        assert_eq!(predicted.log().flatten(), vec!["frequency_grid", "predict"]);
    }

    #[test]
    fn test_fit_objective_prefers_truth() {
        let truth = bind("maxwell", &[("eta", 2.0), ("k", 1.0)]);
        let measured = predict(&truth, &strain_step(1.0)).unwrap();
        let objective = FitObjective::new(
            lookup("maxwell").unwrap().clone(),
            &measured,
            Driver::Strain,
            LossFunction::RMSE,
        )
        .unwrap();

        let at_truth = objective.cost(&[2.0, 1.0]).unwrap().unwrap();
        let nearby = objective.cost(&[2.2, 1.0]).unwrap().unwrap();

        assert!(at_truth < 1e-12);
        assert!(nearby > at_truth);
        assert_eq!(objective.cost(&[2.0, 0.0]).unwrap(), None);
    }
}
