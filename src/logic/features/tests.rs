//! Integration Tests for the feature pipeline
//!
//! Schema, normalizer and builder working together on full profiles.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{
        build, normalize, EmployeeProfile, FeatureKey, FeatureSchema, ModelLayout, QuickProfile,
    };

    /// Default form values end up in the right columns
    #[test]
    fn test_default_profile_end_to_end() {
        let layout = ModelLayout::default_layout();
        let profile = FeatureSchema::global().default_profile();
        let vector = build(&normalize(&profile), &layout);

        assert_eq!(vector.len(), 19);
        assert_eq!(vector.get_by_name(&layout, "Age"), Some(32.0));
        assert_eq!(vector.get_by_name(&layout, "JobLevel"), Some(3.0));
        assert_eq!(vector.get_by_name(&layout, "MonthlyIncome"), Some(5000.0));
        assert_eq!(vector.get_by_name(&layout, "Gender_Male"), Some(1.0));
        assert_eq!(vector.get_by_name(&layout, "MaritalStatus_Married"), Some(1.0));
        assert_eq!(vector.get_by_name(&layout, "MaritalStatus_Single"), Some(0.0));
        assert_eq!(vector.get_by_name(&layout, "OverTime_Yes"), Some(0.0));
        assert_eq!(vector.get_by_name(&layout, "BusinessTravel_Travel_Rarely"), Some(1.0));
        assert_eq!(vector.get_by_name(&layout, "BusinessTravel_Travel_Frequently"), Some(0.0));
    }

    /// Partial profile: only present fields are written, indicators included
    #[test]
    fn test_partial_profile_leaves_rest_zero() {
        let layout = ModelLayout::default_layout();
        let profile = EmployeeProfile::new().with("OverTime", "Ya");
        let vector = build(&normalize(&profile), &layout);

        let non_zero: Vec<&String> = layout
            .columns()
            .iter()
            .zip(vector.values.iter())
            .filter(|(_, v)| **v != 0.0)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(non_zero, vec!["OverTime_Yes"]);
    }

    /// Trained feature list with extra columns: sourceless columns stay zero
    #[test]
    fn test_trained_layout_with_unsourced_columns() {
        let layout = ModelLayout::new(
            ["TotalWorkingYears", "OverTime_Yes", "Age", "Department_Sales", "NumCompaniesWorked"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let profile = QuickProfile::AtRisk.profile();
        let vector = build(&normalize(&profile), &layout);
        assert_eq!(vector.values, vec![0.0, 1.0, 28.0, 0.0, 0.0]);
    }

    /// Divorced: both marital indicators are zero
    #[test]
    fn test_divorced_has_no_marital_indicator() {
        let layout = ModelLayout::default_layout();
        let normalized = normalize(&EmployeeProfile::new().with("MaritalStatus", "Bercerai"));
        assert_eq!(normalized.get(FeatureKey::MaritalStatus), Some(2.0));

        let vector = build(&normalized, &layout);
        assert_eq!(vector.get_by_name(&layout, "MaritalStatus_Married"), Some(0.0));
        assert_eq!(vector.get_by_name(&layout, "MaritalStatus_Single"), Some(0.0));
    }

    /// Same content, different insertion order: same vector and same cache key
    #[test]
    fn test_insertion_order_does_not_matter() {
        let layout = ModelLayout::default_layout();
        let a = EmployeeProfile::new()
            .with("Age", 30.0)
            .with("OverTime", "Ya")
            .with("JobSatisfaction", "Rendah");
        let b = EmployeeProfile::new()
            .with("JobSatisfaction", "Rendah")
            .with("OverTime", "Ya")
            .with("Age", 30.0);

        assert_eq!(build(&normalize(&a), &layout), build(&normalize(&b), &layout));
        assert_eq!(normalize(&a).cache_key(), normalize(&b).cache_key());
    }
}
