//! Tests for FeatureVector construction and layout lookups

#[cfg(test)]
mod vector_tests {
    use crate::error::CoreError;
    use crate::logic::features::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};

    fn ramp() -> Vec<f64> {
        (0..FEATURE_COUNT).map(|i| i as f64).collect()
    }

    #[test]
    fn test_from_slice_exact_length() {
        let vector = FeatureVector::from_slice(&ramp()).unwrap();
        assert_eq!(vector.as_slice().len(), FEATURE_COUNT);
        assert_eq!(vector.as_array()[19], 19.0);
    }

    #[test]
    fn test_from_slice_too_short() {
        let values = vec![1.0; FEATURE_COUNT - 1];
        match FeatureVector::from_slice(&values) {
            Err(CoreError::FeatureCount { expected, actual }) => {
                assert_eq!(expected, 20);
                assert_eq!(actual, 19);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_slice_too_long() {
        let values = vec![1.0; FEATURE_COUNT + 1];
        let err = FeatureVector::from_slice(&values).unwrap_err();
        assert_eq!(err.to_string(), "expected 20 features, got 21");
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut values = ramp();
        values[6] = f64::NAN;
        match FeatureVector::from_slice(&values) {
            Err(CoreError::NonFiniteFeature { name }) => assert_eq!(name, "sleep_quality"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_named_access_follows_layout() {
        let vector = FeatureVector::from_slice(&ramp()).unwrap();
        assert_eq!(vector.get_by_name("anxiety_level"), Some(0.0));
        assert_eq!(vector.get_by_name("study_load"), Some(13.0));
        assert_eq!(vector.get_by_name("stress_level"), None);

        let names: Vec<&str> = vector.named().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_COLUMNS.to_vec());
    }

    #[test]
    fn test_log_entry_has_every_feature() {
        let vector = FeatureVector::from_slice(&ramp()).unwrap();
        let entry = vector.to_log_entry();
        let object = entry.as_object().unwrap();
        assert_eq!(object.len(), FEATURE_COUNT);
        assert_eq!(object["bullying"], 19.0);
    }
}
