//! # Clinic Workflow Labels
//!
//! Status keys are rendered through a fallback chain: clinic override, then
//! built-in default, then a titleized version of the raw key. Every status
//! therefore has some label.
//!
//! [`ClinicConfigProvider`] loads the clinic overrides once per session. A
//! failed load is logged and the session continues with built-in defaults;
//! labelling never blocks the board.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::client::ClinicApi;
use crate::constants::EMPTY_DISPLAY;

/// Built-in labels for check-in and appointment statuses
pub const DEFAULT_STATUS_LABELS: [(&str, &str); 8] = [
    ("scheduled", "Scheduled"),
    ("checked_in", "Checked In"),
    ("roomed", "Roomed"),
    ("ready", "Ready"),
    ("in_progress", "In Progress"),
    ("completed", "Completed"),
    ("cancelled", "Cancelled"),
    ("no_show", "No Show"),
];

/// Turn `in_progress` into `In Progress`. Blank input renders as the empty
/// placeholder.
pub fn titleize(raw: &str) -> String {
    let words: Vec<String> = raw
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        EMPTY_DISPLAY.to_string()
    } else {
        words.join(" ")
    }
}

fn default_label(status: &str) -> Option<&'static str> {
    DEFAULT_STATUS_LABELS
        .iter()
        .find(|(key, _)| *key == status)
        .map(|(_, label)| *label)
}

/// Session-scoped status labels for one clinic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowLabels {
    overrides: HashMap<String, String>,
}

impl WorkflowLabels {
    /// Labels with no clinic overrides
    pub fn defaults() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        let overrides = overrides
            .into_iter()
            .filter(|(_, label)| !label.trim().is_empty())
            .collect();
        Self { overrides }
    }

    /// Label for a raw status key
    pub fn label(&self, status: &str) -> String {
        if status.trim().is_empty() {
            return EMPTY_DISPLAY.to_string();
        }
        if let Some(label) = self.overrides.get(status) {
            return label.clone();
        }
        default_label(status)
            .map(str::to_string)
            .unwrap_or_else(|| titleize(status))
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }
}

/// Single-flight, session-scoped loader of clinic label overrides
pub struct ClinicConfigProvider {
    api: Arc<dyn ClinicApi>,
    labels: OnceCell<Arc<WorkflowLabels>>,
}

impl std::fmt::Debug for ClinicConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClinicConfigProvider")
            .field("loaded", &self.labels.initialized())
            .finish()
    }
}

impl ClinicConfigProvider {
    pub fn new(api: Arc<dyn ClinicApi>) -> Self {
        Self {
            api,
            labels: OnceCell::new(),
        }
    }

    /// Labels for this session. Concurrent callers share one request; the
    /// first outcome (overrides or defaults) is kept for the session.
    pub async fn load(&self) -> Arc<WorkflowLabels> {
        self.labels
            .get_or_init(|| async {
                match self.api.clinic_config().await {
                    Ok(config) => {
                        debug!(
                            clinic = config.clinic_name.as_deref().unwrap_or(EMPTY_DISPLAY),
                            overrides = config.workflow_labels.len(),
                            "Loaded clinic workflow labels"
                        );
                        Arc::new(WorkflowLabels::with_overrides(config.workflow_labels))
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load clinic config, using default labels");
                        Arc::new(WorkflowLabels::defaults())
                    }
                }
            })
            .await
            .clone()
    }

    /// Labels if already loaded, otherwise built-in defaults
    pub fn current(&self) -> Arc<WorkflowLabels> {
        self.labels
            .get()
            .cloned()
            .unwrap_or_else(|| Arc::new(WorkflowLabels::defaults()))
    }
}
