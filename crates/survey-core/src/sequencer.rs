//! Secuenciador de pasos: funciones puras sobre el catálogo y la posición.
//!
//! Rol en el recorrido:
//! - `next`/`previous` deciden el salto a partir del orden numérico de ids,
//!   con dos posiciones sintéticas en los bordes: bienvenida (antes del
//!   primer paso) y revisión (`max(ids) + 1`).
//! - El modo retoma ("editar desde revisión") corto-circuita `next`: la
//!   edición de un paso nunca arrastra al usuario hacia adelante, siempre
//!   vuelve al punto de retorno.
//! - No hay efectos: con un id desconocido se cae al borde sano más cercano
//!   en vez de fallar.
use serde::{Deserialize, Serialize};

use survey_domain::StepId;

use crate::catalog::StepCatalog;

/// Contexto transitorio de retoma. Vive en el llamador (nunca se persiste):
/// se activa al editar un paso desde la pantalla de revisión y se consume en
/// el primer avance posterior a esa entrega.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetakeContext {
    pub active: bool,
    pub return_target: StepId,
}

impl RetakeContext {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn returning_to(target: StepId) -> Self {
        Self { active: true, return_target: target }
    }
}

/// Vista de navegación sobre un catálogo inmutable.
pub struct Sequencer<'a> {
    catalog: &'a StepCatalog,
}

impl<'a> Sequencer<'a> {
    pub fn new(catalog: &'a StepCatalog) -> Self {
        Self { catalog }
    }

    pub fn sequence_ids(&self) -> Vec<StepId> {
        self.catalog.sequence_ids()
    }

    /// Siguiente posición desde `current`. Con retoma activa devuelve el
    /// punto de retorno sin mirar el catálogo. En modo normal: el primer id
    /// estrictamente mayor que `current`, o la posición de revisión si ya no
    /// queda ninguno. Esa única regla cubre todos los casos: posición de
    /// bienvenida, paso intermedio, último paso e ids desconocidos.
    pub fn next(&self, current: StepId, retake: RetakeContext) -> StepId {
        if retake.active {
            return retake.return_target;
        }
        self.catalog
            .steps()
            .iter()
            .map(|s| s.id())
            .find(|id| *id > current)
            .unwrap_or_else(|| self.catalog.review_id())
    }

    /// Posición anterior: el último id estrictamente menor que `current`, o
    /// la posición de bienvenida si `current` ya es el primero.
    pub fn previous(&self, current: StepId) -> StepId {
        self.catalog
            .steps()
            .iter()
            .rev()
            .map(|s| s.id())
            .find(|id| *id < current)
            .unwrap_or_else(|| self.catalog.welcome_id())
    }

    pub fn is_review(&self, position: StepId) -> bool {
        position >= self.catalog.review_id()
    }
}
