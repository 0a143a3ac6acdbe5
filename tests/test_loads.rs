#[cfg(test)]
mod test_loads {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rheos::prelude::*;

    #[test]
    fn test_step_load_reference() {
        // ACT
        let record = step_load(10.0, 5.0, 0.0).unwrap();

        // ASSERT
        let expected_time: Vec<Real> = (0..=10).map(|i| i as Real).collect();
        let expected_values: Vec<Real> = (0..=10).map(|i| if i < 5 { 0.0 } else { 1.0 }).collect();

        assert_eq!(record.time(), expected_time.as_slice());
        assert_eq!(record.stress(), Some(expected_values.as_slice()));
        assert_eq!(record.strain(), Some(expected_values.as_slice()));
        assert_eq!(record.kind(), TimeDataKind::StrainAndStress);
    }

    #[test]
    fn test_generators_log_their_settings() {
        let record = StepLoadBuilder::default()
            .t_total(4.0)
            .t_on(1.0)
            .amplitude(2.5)
            .build()
            .unwrap()
            .generate()
            .unwrap();

        let entry = &record.log().entries()[0];

        assert_eq!(entry.action, "step_load");
        assert_eq!(entry.details["amplitude"], serde_json::json!(2.5));
        assert_eq!(record.stress().unwrap()[4], 2.5);
    }

    #[test]
    fn test_sinusoid_load() {
        let omega = std::f64::consts::PI as Real;
        let record = sinusoid_load(2.0, omega, 3.0, 0.25).unwrap();

        assert_eq!(record.len(), 9);
        let strain = record.strain().unwrap();
        assert_relative_eq!(strain[2], 3.0, max_relative = 1e-12);
        assert!(strain[4].abs() < 1e-12);
    }

    #[test]
    fn test_loads_combine_with_arithmetic() {
        // A step followed by its negative a few seconds later is a pulse
        let on = step_load(10.0, 2.0, 0.0).unwrap();
        let off = step_load(10.0, 6.0, 0.0).unwrap();

        let pulse = (&on - &off).unwrap();

        let strain = pulse.strain().unwrap();
        assert_eq!(strain[1], 0.0);
        assert_eq!(strain[3], 1.0);
        assert_eq!(strain[6], 0.0);
        assert_eq!(pulse.log().flatten(), vec!["step_load", "step_load", "subtract"]);
    }

    #[test]
    fn test_noise_is_bounded_and_seeded() {
        let a = noise_load(100.0, 0.1, 7).unwrap();
        let b = noise_load(100.0, 0.1, 7).unwrap();
        let c = noise_load(100.0, 0.1, 8).unwrap();

        assert_eq!(a.strain(), b.strain());
        assert_ne!(a.strain(), c.strain());
        assert!(a.strain().unwrap().iter().all(|x| x.abs() <= 0.1));
    }

    #[test]
    fn test_repeated_ramp_keeps_spacing() {
        let ramp = RampLoadBuilder::default()
            .t_total(1.0)
            .gradient(2.0)
            .stepsize(0.25)
            .build()
            .unwrap()
            .generate()
            .unwrap();

        let repeated = RepeatLoadBuilder::default()
            .repeats(4usize)
            .build()
            .unwrap()
            .apply(&ramp)
            .unwrap();

        assert_eq!(repeated.len(), 20);
        for pair in repeated.time().windows(2) {
            assert_relative_eq!(pair[1] - pair[0], 0.25, max_relative = 1e-9);
        }
        assert_eq!(repeated.stress().unwrap()[5], 0.0);
        assert_eq!(repeated.stress().unwrap()[9], 2.0);
    }

    #[test]
    fn test_smoothed_repeat_stays_close() {
        let ramp = ramp_load(19.0, 0.0, 0.5).unwrap();
        let jump = 9.5;

        let plain = repeat_load(&ramp, 3, None).unwrap();
        let smoothed = repeat_load(&ramp, 3, Some(4.0)).unwrap();

        let deviations: Vec<Real> = plain
            .strain()
            .unwrap()
            .iter()
            .zip(smoothed.strain().unwrap())
            .map(|(a, b)| (a - b).abs())
            .collect();

        assert!(deviations.iter().all(|d| *d <= jump / 2.0 + 1e-9));
        // Far from any join the raw values are kept
        assert!(deviations[10] < 1e-9);
        assert!(deviations[30] < 1e-9);
        assert_eq!(smoothed.log().last().unwrap().action, "repeat");
    }

    #[test]
    fn test_invalid_loads() {
        assert!(matches!(
            step_load(-1.0, 0.0, 0.0),
            Err(DataError::InvalidLoad(_))
        ));
        assert!(matches!(
            StepLoadBuilder::default().t_total(1.0).stepsize(0.0).build().unwrap().generate(),
            Err(DataError::InvalidLoad(_))
        ));
        assert!(matches!(
            repeat_load(&ramp_load(2.0, 0.0, 1.0).unwrap(), 2, Some(-1.0)),
            Err(DataError::InvalidLoad(_))
        ));
        assert!(matches!(
            step_load(Real::INFINITY, 0.0, 0.0),
            Err(DataError::InvalidLoad(_))
        ));
        assert!(matches!(
            noise_load(3.0, Real::NAN, 1),
            Err(DataError::InvalidLoad(_))
        ));
    }

    #[test]
    fn test_grids() {
        let grid = TimeGridBuilder::default()
            .t_start(1.0)
            .t_end(2.0)
            .stepsize(0.5)
            .build()
            .unwrap();
        let frequencies = FrequencyGridBuilder::default()
            .start(1.0)
            .end(3.0)
            .points(3usize)
            .build()
            .unwrap();

        assert_eq!(grid.points().unwrap(), vec![1.0, 1.5, 2.0]);
        assert_eq!(grid.to_record().unwrap().kind(), TimeDataKind::TimeOnly);
        assert_eq!(frequencies.frequencies().unwrap(), vec![1.0, 2.0, 3.0]);
    }
}
