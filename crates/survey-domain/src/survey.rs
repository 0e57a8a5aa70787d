//! Agregado `Survey`: una sesión guiada de punta a punta.
//!
//! Rol en el recorrido:
//! - Hay un agregado por sesión de usuario, identificado por un token de
//!   sesión opaco (Uuid) que llega del exterior.
//! - El libro mayor (`ledger`) asocia a cada `StepId` su último registro;
//!   una escritura posterior con el mismo id reemplaza a la anterior, nunca
//!   acumula.
//! - El ciclo de vida es unidireccional: `InProgress -> UnderReview ->
//!   Completed`. `Completed` es terminal: el libro mayor queda congelado y
//!   las escrituras posteriores se aceptan como no-op (la finalización debe
//!   ser idempotente, no un error).
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::record::StepRecord;
use crate::step_id::StepId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyStatus {
    InProgress,
    UnderReview,
    Completed,
}

impl SurveyStatus {
    /// Sólo se permite avanzar en el ciclo de vida; el mismo estado es un
    /// no-op válido y retroceder es un error.
    pub fn can_transition_to(self, target: SurveyStatus) -> bool {
        target >= self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub id: Uuid,
    pub status: SurveyStatus,
    /// Última posición reconocida por el servidor. La navegación se actualiza
    /// por separado del libro mayor para que no se pisen entre sí.
    pub current_step: StepId,
    /// En JSON el libro mayor viaja como arreglo ordenado por id de paso (los
    /// ids decimales no sirven como claves de objeto JSON).
    #[serde(with = "ledger_serde")]
    pub ledger: BTreeMap<StepId, StepRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Survey {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self { id,
               status: SurveyStatus::InProgress,
               current_step: StepId::WELCOME,
               ledger: BTreeMap::new(),
               created_at: now,
               updated_at: now,
               completed_at: None }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SurveyStatus::Completed
    }

    pub fn record(&self, step_id: StepId) -> Option<&StepRecord> {
        self.ledger.get(&step_id)
    }

    /// Reemplaza (o crea) el registro del paso. Devuelve `false` sin tocar
    /// nada si el recorrido ya está completado: la escritura tardía se acepta
    /// como no-op para mantener idempotente la finalización.
    pub fn upsert_step(&mut self, record: StepRecord) -> bool {
        if self.is_completed() {
            return false;
        }
        self.ledger.insert(record.step_id, record);
        self.updated_at = Utc::now();
        true
    }

    /// Actualiza únicamente la posición de navegación.
    pub fn advance_to(&mut self, step_id: StepId) {
        self.current_step = step_id;
        self.updated_at = Utc::now();
    }

    /// Aplica una transición de estado. `Ok(true)` si cambió algo, `Ok(false)`
    /// si el estado pedido ya estaba vigente (incluida una re-finalización,
    /// que conserva el `completed_at` original), y error si retrocede.
    pub fn transition_to(&mut self, target: SurveyStatus) -> Result<bool, DomainError> {
        if self.status == target {
            return Ok(false);
        }
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidTransition { from: self.status, to: target });
        }
        self.status = target;
        self.updated_at = Utc::now();
        if target == SurveyStatus::Completed {
            self.completed_at = Some(self.updated_at);
        }
        Ok(true)
    }
}

mod ledger_serde {
    use std::collections::BTreeMap;

    use serde::de::Deserializer;
    use serde::ser::Serializer;
    use serde::{Deserialize, Serialize};

    use crate::record::StepRecord;
    use crate::step_id::StepId;

    pub fn serialize<S: Serializer>(ledger: &BTreeMap<StepId, StepRecord>,
                                    serializer: S)
                                    -> Result<S::Ok, S::Error> {
        let records: Vec<&StepRecord> = ledger.values().collect();
        records.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D)
                                                  -> Result<BTreeMap<StepId, StepRecord>, D::Error> {
        let records = Vec::<StepRecord>::deserialize(deserializer)?;
        Ok(records.into_iter().map(|r| (r.step_id, r)).collect())
    }
}
