//! Identificador ordenado de paso.
//!
//! Rol en el recorrido:
//! - Los pasos del catálogo se recorren en orden ascendente de `StepId`; los
//!   pasos informativos ("guías") ocupan posiciones fraccionarias (0.5, 6.5)
//!   intercaladas entre los pasos numerados de captura.
//! - La comparación es numérica, nunca por orden de declaración de la tabla.
//! - Internamente se representa en décimas enteras para que `Ord`/`Eq`/`Hash`
//!   sean exactos (un `f64` no ofrece orden total).
use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Posición de un paso dentro del catálogo, en décimas internas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StepId(i64);

impl StepId {
    /// Posición sintética de bienvenida, anterior a todo paso del catálogo.
    /// Los ids del catálogo deben ser estrictamente positivos.
    pub const WELCOME: StepId = StepId(0);

    /// Construye desde un valor entero de paso (`3` → posición 3).
    pub const fn whole(n: i64) -> Self {
        StepId(n * 10)
    }

    /// Construye desde décimas internas (`65` → posición 6.5).
    pub const fn from_tenths(tenths: i64) -> Self {
        StepId(tenths)
    }

    /// Conversión desde el número decimal externo (`6.5`). Redondea a la
    /// décima más cercana; el catálogo nunca usa granularidad más fina.
    pub fn from_f64(value: f64) -> Self {
        StepId((value * 10.0).round() as i64)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }

    pub const fn tenths(self) -> i64 {
        self.0
    }

    pub const fn is_welcome(self) -> bool {
        self.0 == Self::WELCOME.0
    }

    /// Posición desplazada una unidad entera hacia adelante. Se usa para
    /// derivar la posición sintética de revisión (`max(catálogo) + 1`).
    pub const fn plus_one(self) -> Self {
        StepId(self.0 + 10)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 10 == 0 {
            write!(f, "{}", self.0 / 10)
        } else {
            write!(f, "{}.{}", self.0 / 10, (self.0 % 10).abs())
        }
    }
}

// En JSON el id viaja como número decimal (`0.5`, `7`), igual que lo consume
// la capa de presentación.
impl Serialize for StepId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for StepId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(StepId::from_f64(value))
    }
}
