
use serde::{Deserialize, Serialize};

/// Drug risk category for a phenotype
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize, strum_macros::Display, strum_macros::EnumIter)]
pub enum RiskLabel {
    Safe,
    #[serde(rename = "Adjust Dosage")]
    #[strum(to_string = "Adjust Dosage")]
    AdjustDosage,
    Toxic,
    Ineffective,
    /// The drug or gene is outside what this analysis covers
    #[serde(rename = "Not Applicable")]
    #[strum(to_string = "Not Applicable")]
    NotApplicable,
    /// No rule was found; also catches any unrecognized label in a table file, so it must stay last
    #[default]
    #[serde(other)]
    Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_order() {
        use strum::IntoEnumIterator;
        let labels: Vec<String> = RiskLabel::iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["Safe", "Adjust Dosage", "Toxic", "Ineffective", "Not Applicable", "Unknown"]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(RiskLabel::AdjustDosage.to_string(), "Adjust Dosage");
        assert_eq!(RiskLabel::NotApplicable.to_string(), "Not Applicable");
        assert_eq!(RiskLabel::Toxic.to_string(), "Toxic");
        assert_eq!(serde_json::to_string(&RiskLabel::AdjustDosage).unwrap(), "\"Adjust Dosage\"");
    }

    #[test]
    fn test_deserialize() {
        let label: RiskLabel = serde_json::from_str("\"Ineffective\"").unwrap();
        assert_eq!(label, RiskLabel::Ineffective);
        let label: RiskLabel = serde_json::from_str("\"Not Applicable\"").unwrap();
        assert_eq!(label, RiskLabel::NotApplicable);
        let label: RiskLabel = serde_json::from_str("\"Somewhat Risky\"").unwrap();
        assert_eq!(label, RiskLabel::Unknown);
    }

    #[test]
    fn test_unknown_labels_in_table() {
        let row: std::collections::BTreeMap<String, RiskLabel> = serde_json::from_str(
            r#"{"PM": "Toxic", "IM": "Maybe", "NM": "Not Applicable"}"#
        ).unwrap();
        assert_eq!(row["PM"], RiskLabel::Toxic);
        assert_eq!(row["IM"], RiskLabel::Unknown);
        assert_eq!(row["NM"], RiskLabel::NotApplicable);
        assert_eq!(serde_json::to_string(&RiskLabel::Unknown).unwrap(), "\"Unknown\"");
        assert_eq!(RiskLabel::default(), RiskLabel::Unknown);
    }
}
