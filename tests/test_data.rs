#[cfg(test)]
mod test_data {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rheos::prelude::*;

    fn record(stress: &[f64], strain: &[f64]) -> TimeSeriesRecord {
        TimeSeriesRecord::new(&[0.0, 0.5, 1.0, 1.5], stress, strain).unwrap()
    }

    #[test]
    fn test_addition_is_commutative() {
        let a = record(&[1.0, 2.0, 3.0, 4.0], &[0.1, 0.2, 0.3, 0.4]);
        let b = record(&[0.5, -1.0, 2.5, 0.0], &[1.0, 1.0, 2.0, 3.0]);

        let ab = (&a + &b).unwrap();
        let ba = (&b + &a).unwrap();

        assert_eq!(ab.stress(), ba.stress());
        assert_eq!(ab.strain(), ba.strain());
        assert_eq!(ab.kind(), TimeDataKind::StrainAndStress);
    }

    #[test]
    fn test_subtraction_undoes_addition() {
        let a = record(&[1.0, 2.0, 3.0, 4.0], &[0.1, 0.2, 0.3, 0.4]);
        let b = record(&[0.7, -1.3, 2.9, 1e3], &[1.1, 1.0, 2.0, -3.0]);

        let restored = ((&a + &b).unwrap() - b).unwrap();

        for (x, y) in restored.stress().unwrap().iter().zip(a.stress().unwrap()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-12);
        }
        for (x, y) in restored.strain().unwrap().iter().zip(a.strain().unwrap()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_scalar_multiplication_and_negation() {
        let a = record(&[1.0, 2.0, 3.0, 4.0], &[0.5, 0.5, 0.5, 0.5]);

        let doubled = (&a * 2.0).unwrap();
        let also_doubled = (2.0 * &a).unwrap();
        let negated = (-&a).unwrap();

        assert_eq!(doubled.stress(), Some(&[2.0, 4.0, 6.0, 8.0][..]));
        assert_eq!(doubled.stress(), also_doubled.stress());
        assert_eq!(negated.strain(), Some(&[-0.5, -0.5, -0.5, -0.5][..]));
        assert_eq!(doubled.log().last().unwrap().details["factor"], serde_json::json!(2.0));
    }

    #[test]
    fn test_log_chains_both_operands() {
        let a = TimeSeriesRecord::from_strain(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let b = step_load(1.0, 0.0, 0.0)
            .unwrap()
            .extract(TimeDataKind::StrainOnly)
            .unwrap();

        let sum = (&a + &b).unwrap();
        let scaled = (&sum * 3.0).unwrap();

        assert_eq!(
            scaled.log().flatten(),
            vec!["create", "step_load", "extract", "add", "scale"]
        );
        assert_eq!(scaled.log().entries()[0].operands.len(), 2);
        assert_eq!(
            scaled.log().to_string(),
            "create -> step_load -> extract -> add -> scale"
        );
    }

    #[test]
    fn test_mismatched_records_are_rejected() {
        let strain = TimeSeriesRecord::from_strain(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let stress = TimeSeriesRecord::from_stress(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let shifted = TimeSeriesRecord::from_strain(&[0.0, 1.5], &[0.0, 1.0]).unwrap();
        let longer = TimeSeriesRecord::from_strain(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap();
        let time_only = TimeSeriesRecord::time_only(&[0.0, 1.0]).unwrap();

        assert_eq!(
            (&strain + &stress).unwrap_err(),
            DataError::TimelineMismatch(TimelineMismatch::Kind {
                left: TimeDataKind::StrainOnly,
                right: TimeDataKind::StressOnly,
            })
        );
        assert_eq!(
            (&strain - &shifted).unwrap_err(),
            DataError::TimelineMismatch(TimelineMismatch::Values { index: 1 })
        );
        assert_eq!(
            (&strain + &longer).unwrap_err(),
            DataError::TimelineMismatch(TimelineMismatch::Length { left: 2, right: 3 })
        );
        assert_eq!(
            (&time_only + &time_only).unwrap_err(),
            DataError::TimelineMismatch(TimelineMismatch::TimeOnly)
        );
        assert!((&time_only * 2.0).is_err());
    }

    #[test]
    fn test_inconsistent_construction() {
        assert!(matches!(
            TimeSeriesRecord::new(&[0.0, 1.0], &[1.0], &[]),
            Err(DataError::DataConsistency(_))
        ));
        assert!(matches!(
            TimeSeriesRecord::time_only(&[0.0, 0.0]),
            Err(DataError::DataConsistency(_))
        ));
        assert!(matches!(
            TimeSeriesRecord::time_only::<f64>(&[]),
            Err(DataError::DataConsistency(_))
        ));
    }

    #[test]
    fn test_integer_input_is_coerced() {
        let record = TimeSeriesRecord::from_strain(&[0i32, 1, 2], &[0, 5, 10]).unwrap();

        assert_eq!(record.time(), &[0.0, 1.0, 2.0]);
        assert_eq!(record.strain(), Some(&[0.0, 5.0, 10.0][..]));
    }

    #[test]
    fn test_extract() {
        let both = record(&[1.0, 2.0, 3.0, 4.0], &[0.1, 0.2, 0.3, 0.4]);

        let stress = both.extract(TimeDataKind::StressOnly).unwrap();
        let time = stress.extract(TimeDataKind::TimeOnly).unwrap();

        assert_eq!(stress.kind(), TimeDataKind::StressOnly);
        assert_eq!(stress.strain(), None);
        assert_eq!(time.kind(), TimeDataKind::TimeOnly);
        assert_eq!(
            stress.extract(TimeDataKind::StrainOnly).unwrap_err(),
            DataError::UnavailableKind {
                requested: TimeDataKind::StrainOnly,
                available: TimeDataKind::StressOnly,
            }
        );
    }

    #[test]
    fn test_records_validate_on_deserialization() {
        let valid = r#"{"time": [0.0, 1.0], "stress": [2.0, 3.0]}"#;
        let unsorted = r#"{"time": [1.0, 0.0], "stress": [2.0, 3.0]}"#;
        let half_moduli = r#"{"frequency": [1.0, 2.0], "storage_modulus": [2.0, 3.0]}"#;

        let record: TimeSeriesRecord = serde_json::from_str(valid).unwrap();

        assert_eq!(record.kind(), TimeDataKind::StressOnly);
        assert!(record.log().is_empty());
        assert!(serde_json::from_str::<TimeSeriesRecord>(unsorted).is_err());
        assert!(serde_json::from_str::<FrequencySeriesRecord>(half_moduli).is_err());
    }

    #[test]
    fn test_serialized_record_keeps_log() {
        let record = (&step_load(2.0, 1.0, 0.0).unwrap() * 2.0).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let restored: TimeSeriesRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, record);
        assert_eq!(restored.log().flatten(), vec!["step_load", "scale"]);
    }
}
