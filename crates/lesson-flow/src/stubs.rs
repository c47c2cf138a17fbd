// Archivo: stubs.rs
// Propósito: implementación en memoria de `LearningApi` para pruebas y
// wiring rápido.
//
// El stub hace de servidor: la aritmética de regeneración y el acotado de
// corazones viven aquí, nunca en el motor. No es durable y se usa para
// demos o pruebas locales.
use crate::api::LearningApi;
use crate::domain::{HeartsSnapshot, SavedPosition};
use crate::errors::{FlowError, Result};
use async_trait::async_trait;
use learn_domain::Lesson;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Estado de corazones del lado "servidor" del stub.
#[derive(Debug, Clone)]
struct HeartsState {
    hearts: u32,
    max_hearts: u32,
    /// Segundos de regeneración que el stub reporta mientras el pool no
    /// está lleno.
    regen_seconds: i64,
}

/// Implementación en memoria de `LearningApi`.
///
/// Además del estado, lleva contadores de llamadas y banderas de fallo
/// simulado para ejercitar las rutas de error del motor.
pub struct InMemoryLearningApi {
    hearts: Mutex<HeartsState>,
    positions: Mutex<HashMap<Uuid, usize>>,
    lessons: Mutex<HashMap<Uuid, Vec<Lesson>>>,
    completed_sections: Mutex<Vec<Uuid>>,
    completed_lessons: Mutex<Vec<Uuid>>,
    save_calls: Mutex<u32>,
    fetch_hearts_calls: Mutex<u32>,
    heart_mutation_calls: Mutex<u32>,
    fail_saves: Mutex<bool>,
    fail_mutations: Mutex<bool>,
}

impl InMemoryLearningApi {
    /// Crea el stub con el pool lleno (5/5) y regeneración de 300 s.
    pub fn new() -> Self {
        Self::with_hearts(5, 5, 300)
    }

    /// Crea el stub con un estado de corazones concreto.
    pub fn with_hearts(hearts: u32, max_hearts: u32, regen_seconds: i64) -> Self {
        Self { hearts: Mutex::new(HeartsState { hearts: hearts.min(max_hearts),
                                                max_hearts,
                                                regen_seconds }),
               positions: Mutex::new(HashMap::new()),
               lessons: Mutex::new(HashMap::new()),
               completed_sections: Mutex::new(Vec::new()),
               completed_lessons: Mutex::new(Vec::new()),
               save_calls: Mutex::new(0),
               fetch_hearts_calls: Mutex::new(0),
               heart_mutation_calls: Mutex::new(0),
               fail_saves: Mutex::new(false),
               fail_mutations: Mutex::new(false) }
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `FlowError::Api`.
    fn lock<'a, T>(&'a self, m: &'a Mutex<T>) -> std::result::Result<MutexGuard<'a, T>, FlowError> {
        m.lock().map_err(|e| FlowError::Api(format!("mutex poisoned: {:?}", e)))
    }

    fn snapshot_of(state: &HeartsState) -> HeartsSnapshot {
        let next = if state.hearts < state.max_hearts { Some(state.regen_seconds) } else { None };
        HeartsSnapshot { hearts: state.hearts,
                         max_hearts: state.max_hearts,
                         next_heart_in_seconds: next }
    }

    /// Siembra el árbol de lecciones de un curso.
    pub fn seed_lessons(&self, course_id: Uuid, lessons: Vec<Lesson>) {
        self.lessons.lock().unwrap_or_else(|e| e.into_inner()).insert(course_id, lessons);
    }

    /// Siembra una posición guardada para un curso.
    pub fn seed_position(&self, course_id: Uuid, current_index: usize) {
        self.positions.lock().unwrap_or_else(|e| e.into_inner()).insert(course_id, current_index);
    }

    /// Activa o desactiva el fallo simulado de `save_position`.
    pub fn set_fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Activa o desactiva el fallo simulado de las mutaciones de corazones.
    pub fn set_fail_mutations(&self, fail: bool) {
        *self.fail_mutations.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Número de llamadas (intentos) a `save_position` observadas.
    pub fn save_call_count(&self) -> u32 {
        *self.save_calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Número de llamadas a `fetch_hearts` observadas.
    pub fn fetch_hearts_count(&self) -> u32 {
        *self.fetch_hearts_calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Número de mutaciones de corazones (decrement/grant/refill)
    /// intentadas.
    pub fn heart_mutation_count(&self) -> u32 {
        *self.heart_mutation_calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Posición guardada actualmente para el curso, si la hay.
    pub fn saved_position(&self, course_id: &Uuid) -> Option<usize> {
        self.positions.lock().unwrap_or_else(|e| e.into_inner()).get(course_id).copied()
    }

    /// Secciones marcadas como completadas, en orden de llegada.
    pub fn completed_sections(&self) -> Vec<Uuid> {
        self.completed_sections.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Lecciones legadas marcadas como completadas, en orden de llegada.
    pub fn completed_lessons(&self) -> Vec<Uuid> {
        self.completed_lessons.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for InMemoryLearningApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LearningApi for InMemoryLearningApi {
    async fn fetch_hearts(&self) -> Result<HeartsSnapshot> {
        *self.lock(&self.fetch_hearts_calls)? += 1;
        let state = self.lock(&self.hearts)?;
        Ok(Self::snapshot_of(&state))
    }

    /// Descuenta corazones acotando en cero, como haría el servidor.
    async fn decrement_hearts(&self, amount: u32) -> Result<HeartsSnapshot> {
        *self.lock(&self.heart_mutation_calls)? += 1;
        if *self.lock(&self.fail_mutations)? {
            return Err(FlowError::Api("fallo simulado de mutación".into()));
        }
        let mut state = self.lock(&self.hearts)?;
        state.hearts = state.hearts.saturating_sub(amount);
        Ok(Self::snapshot_of(&state))
    }

    /// Otorga corazones acotando en `max_hearts`.
    async fn grant_hearts(&self, amount: u32) -> Result<HeartsSnapshot> {
        *self.lock(&self.heart_mutation_calls)? += 1;
        if *self.lock(&self.fail_mutations)? {
            return Err(FlowError::Api("fallo simulado de mutación".into()));
        }
        let mut state = self.lock(&self.hearts)?;
        state.hearts = (state.hearts + amount).min(state.max_hearts);
        Ok(Self::snapshot_of(&state))
    }

    async fn refill_hearts(&self) -> Result<HeartsSnapshot> {
        *self.lock(&self.heart_mutation_calls)? += 1;
        if *self.lock(&self.fail_mutations)? {
            return Err(FlowError::Api("fallo simulado de mutación".into()));
        }
        let mut state = self.lock(&self.hearts)?;
        state.hearts = state.max_hearts;
        Ok(Self::snapshot_of(&state))
    }

    async fn fetch_position(&self, course_id: &Uuid) -> Result<Option<SavedPosition>> {
        let positions = self.lock(&self.positions)?;
        Ok(positions.get(course_id).map(|&current_index| SavedPosition { current_index }))
    }

    /// Cuenta el intento antes de decidir si falla: la propiedad de
    /// deduplicación del sincronizador se mide en intentos de red.
    async fn save_position(&self, course_id: &Uuid, current_index: usize) -> Result<()> {
        *self.lock(&self.save_calls)? += 1;
        if *self.lock(&self.fail_saves)? {
            return Err(FlowError::Api("fallo simulado de guardado".into()));
        }
        self.lock(&self.positions)?.insert(*course_id, current_index);
        Ok(())
    }

    async fn complete_section(&self, section_id: &Uuid) -> Result<()> {
        self.lock(&self.completed_sections)?.push(*section_id);
        Ok(())
    }

    async fn complete_lesson(&self, lesson_id: &Uuid) -> Result<()> {
        self.lock(&self.completed_lessons)?.push(*lesson_id);
        Ok(())
    }

    async fn fetch_lessons(&self, course_id: &Uuid) -> Result<Vec<Lesson>> {
        let lessons = self.lock(&self.lessons)?;
        lessons.get(course_id)
               .cloned()
               .ok_or(FlowError::NotFound(format!("curso {}", course_id)))
    }
}
