// Archivo: api.rs
// Propósito: definir el trait `LearningApi`, el contrato que deben
// implementar los transportes concretos (HTTP, in-memory, etc.). El motor
// consume únicamente este contrato; autenticación y transporte son
// responsabilidad del implementador.
use crate::domain::{HeartsSnapshot, SavedPosition};
use crate::errors::Result;
use async_trait::async_trait;
use learn_domain::Lesson;
use uuid::Uuid;

/// Contrato mínimo con el servidor para el motor de flujo de lecciones.
///
/// Las operaciones sobre corazones devuelven siempre la instantánea
/// completa (`HeartsSnapshot`): el motor la aplica por reemplazo total, no
/// campo a campo, porque `max_hearts` y `next_heart_in_seconds` pueden
/// cambiar en la misma respuesta.
#[async_trait]
pub trait LearningApi: Send + Sync {
    /// Obtiene la instantánea actual del pool de corazones.
    async fn fetch_hearts(&self) -> Result<HeartsSnapshot>;

    /// Descuenta `amount` corazones (intento de ejercicio fallido).
    /// El servidor acota el resultado en `[0, max_hearts]`.
    async fn decrement_hearts(&self, amount: u32) -> Result<HeartsSnapshot>;

    /// Otorga `amount` corazones (recompensa por una acción de práctica).
    async fn grant_hearts(&self, amount: u32) -> Result<HeartsSnapshot>;

    /// Restaura el pool a `max_hearts` (vía de recuperación de pago).
    async fn refill_hearts(&self) -> Result<HeartsSnapshot>;

    /// Lee la posición guardada del curso, si existe.
    async fn fetch_position(&self, course_id: &Uuid) -> Result<Option<SavedPosition>>;

    /// Persiste la posición actual del curso. El valor `current_index`
    /// igual a la longitud del flujo denota curso completado.
    async fn save_position(&self, course_id: &Uuid, current_index: usize) -> Result<()>;

    /// Marca una sección como completada.
    async fn complete_section(&self, section_id: &Uuid) -> Result<()>;

    /// Marca una lección legada (sin secciones) como completada.
    async fn complete_lesson(&self, lesson_id: &Uuid) -> Result<()>;

    /// Obtiene el árbol de lecciones del curso con el avance por elemento.
    async fn fetch_lessons(&self, course_id: &Uuid) -> Result<Vec<Lesson>>;
}
