// Archivo: domain.rs
// Propósito: DTOs de cable compartidos entre el motor y las
// implementaciones de `LearningApi`. Los nombres de campo siguen el
// contrato del servidor.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Instantánea autoritativa del pool de corazones tal como la devuelve el
/// servidor. Toda mutación de corazones responde con esta misma forma y el
/// cliente la reemplaza al completo: nunca aplica deltas locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartsSnapshot {
    /// Corazones disponibles, `0 <= hearts <= max_hearts`.
    pub hearts: u32,
    /// Tope del pool, controlado por el servidor.
    pub max_hearts: u32,
    /// Segundos hasta el próximo corazón regenerado; `None` cuando el pool
    /// está lleno o la regeneración está deshabilitada.
    pub next_heart_in_seconds: Option<i64>,
}

/// Posición guardada de un curso tal como la reporta el servidor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub current_index: usize,
}

/// Par (curso, índice) pendiente de persistir. Sólo la petición más
/// reciente por curso llega a enviarse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaveRequest {
    pub course_id: Uuid,
    pub current_index: usize,
}

impl SaveRequest {
    pub fn new(course_id: Uuid, current_index: usize) -> Self {
        Self { course_id, current_index }
    }
}
