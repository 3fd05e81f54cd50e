use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payload of `GET clinic/config/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicConfig {
    #[serde(default)]
    pub clinic_id: Option<i64>,
    #[serde(default, alias = "name")]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Status key -> clinic label. Keys outside the workflow are kept.
    #[serde(default)]
    pub workflow_labels: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clinic_config_accepts_name_alias() {
        let config: ClinicConfig = serde_json::from_value(json!({
            "name": "Lakeside ASC",
            "workflow_labels": {"roomed": "In Room"}
        }))
        .unwrap();

        assert_eq!(config.clinic_name.as_deref(), Some("Lakeside ASC"));
        assert_eq!(config.workflow_labels.get("roomed").map(String::as_str), Some("In Room"));
    }

    #[test]
    fn test_clinic_config_without_labels() {
        let config: ClinicConfig = serde_json::from_value(json!({"clinic_id": 3})).unwrap();
        assert!(config.workflow_labels.is_empty());
    }
}
