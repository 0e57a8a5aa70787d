//! Tabla ordenada de pasos.
//!
//! La tabla puede declararse en cualquier orden: la construcción ordena por
//! id numérico y valida los invariantes (ids únicos y positivos, referencias
//! de entrada manual apuntando a pasos de captura existentes). El orden
//! ascendente resultante define el recorrido canónico.
use serde::{Deserialize, Serialize};

use survey_domain::StepId;

use super::definition::StepDefinition;
use crate::errors::CatalogError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCatalog {
    steps: Vec<StepDefinition>,
}

/// Avance dentro del recorrido, contando sólo pasos reales (las guías y las
/// posiciones sintéticas de bienvenida/revisión quedan fuera del total).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percent: u8,
}

impl StepCatalog {
    pub fn new(mut steps: Vec<StepDefinition>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }
        steps.sort_by_key(|s| s.id());
        for pair in steps.windows(2) {
            if pair[0].id() == pair[1].id() {
                return Err(CatalogError::DuplicateId(pair[0].id()));
            }
        }
        for step in &steps {
            if step.id() <= StepId::WELCOME {
                return Err(CatalogError::NonPositiveId(step.id()));
            }
            if let Some(related) = step.related_step() {
                let target = steps.iter().find(|s| s.id() == related);
                let ok = matches!(target, Some(StepDefinition::Capture { .. }));
                if !ok {
                    return Err(CatalogError::BadRelatedStep { step: step.id(), related });
                }
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn get(&self, id: StepId) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id() == id)
    }

    /// Ids del catálogo en orden ascendente. No incluye la posición sintética
    /// de revisión.
    pub fn sequence_ids(&self) -> Vec<StepId> {
        self.steps.iter().map(|s| s.id()).collect()
    }

    pub fn first_id(&self) -> StepId {
        self.steps[0].id()
    }

    pub fn last_id(&self) -> StepId {
        self.steps[self.steps.len() - 1].id()
    }

    /// Posición sintética de revisión: `max(ids) + 1`, fija mientras viva el
    /// catálogo.
    pub fn review_id(&self) -> StepId {
        self.last_id().plus_one()
    }

    /// Posición sintética de bienvenida, anterior al primer paso.
    pub fn welcome_id(&self) -> StepId {
        StepId::WELCOME
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Progreso en `current`, contando sólo pasos que suman (sin guías).
    pub fn progress_at(&self, current: StepId) -> Progress {
        let total = self.steps.iter().filter(|s| s.is_counted()).count();
        let counted_now = self.get(current).map(|s| s.is_counted()).unwrap_or(false);
        let current_number = if counted_now {
            self.steps
                .iter()
                .filter(|s| s.is_counted() && s.id() <= current)
                .count()
        } else {
            0
        };
        let percent = if total == 0 {
            0
        } else {
            ((current_number as f64 / total as f64) * 100.0).round() as u8
        };
        Progress { current: current_number, total, percent }
    }
}
