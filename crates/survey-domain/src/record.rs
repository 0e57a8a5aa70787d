//! Registro de resultado de un paso dentro del libro mayor del recorrido.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::step_id::StepId;
use crate::verdict::Verdict;

/// Cómo quedó resuelto el paso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Captured,
    Skipped,
    ManuallyEntered,
}

/// Última palabra registrada para un paso: se crea en la primera entrega y se
/// reemplaza completo en cada retoma (nunca se fusiona campo a campo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_id: StepId,
    pub action: StepAction,
    /// Clave del artefacto almacenado, si hubo foto (ausente en skip y en
    /// entradas manuales sin captura propia).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_key: Option<String>,
    pub verdict: Verdict,
    pub recorded_at: DateTime<Utc>,
}

impl StepRecord {
    pub fn captured(step_id: StepId, artifact_key: impl Into<String>, verdict: Verdict) -> Self {
        Self { step_id,
               action: StepAction::Captured,
               artifact_key: Some(artifact_key.into()),
               verdict,
               recorded_at: Utc::now() }
    }

    pub fn skipped(step_id: StepId) -> Self {
        Self { step_id,
               action: StepAction::Skipped,
               artifact_key: None,
               verdict: Verdict::skipped(),
               recorded_at: Utc::now() }
    }

    pub fn manually_entered(step_id: StepId, value: impl Into<String>) -> Self {
        Self { step_id,
               action: StepAction::ManuallyEntered,
               artifact_key: None,
               verdict: Verdict::manual_entry(value),
               recorded_at: Utc::now() }
    }

    pub fn was_skipped(&self) -> bool {
        self.action == StepAction::Skipped
    }
}
