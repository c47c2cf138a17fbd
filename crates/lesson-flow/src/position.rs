// Archivo: position.rs
// Propósito: implementar el rastreador de posición (`PositionTracker`),
// la máquina de estados explícita que sostiene el índice actual del
// estudiante dentro del flujo aplanado.
//
// Nota: el estado terminal se registra como `Complete`, nunca como un
// índice fuera de rango, para evitar off-by-one en el código de UI.
use crate::errors::{FlowError, Result};
use indexmap::IndexSet;
use tracing::debug;

/// Estado de progresión dentro de un flujo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    /// Aún sin inicializar (esperando contenido y posición guardada).
    Idle,
    /// En curso: `index` es siempre menor que la longitud del flujo.
    InProgress { index: usize },
    /// Curso completado (bandera terminal).
    Complete,
}

/// Máquina de estados de la posición del estudiante.
///
/// Transiciones:
/// - `initialize` corre exactamente una vez por apertura de curso; las
///   llamadas posteriores son no-ops (los re-fetch de contenido en segundo
///   plano no deben re-ejecutar la heurística de reanudación).
/// - `advance` incrementa el índice exactamente en 1, o pasa a `Complete`
///   si el paso completado era el último. Nunca salta ni retrocede.
/// - `rebind` re-acota el índice tras una edición de contenido detectada
///   en un refresh de fondo; no re-ejecuta la heurística.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    state: PositionState,
    len: usize,
    /// Claves de pasos completados en esta sesión, en orden de inserción.
    /// Sirven para pintar los avances en la UI; el progreso autoritativo
    /// vive en el servidor.
    completed_keys: IndexSet<String>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self { state: PositionState::Idle,
               len: 0,
               completed_keys: IndexSet::new() }
    }

    /// Inicializa el rastreador una única vez. Regla de arranque:
    /// - índice guardado `>= len` (o flujo vacío): entrar en `Complete`;
    /// - índice guardado en rango: reanudar ahí;
    /// - sin índice guardado: primer paso con bandera de completado falsa,
    ///   o `0` si no hay ninguno o todos están completos.
    ///
    /// Devuelve `false` (no-op) si ya estaba inicializado.
    pub fn initialize(&mut self, len: usize, saved: Option<usize>, completed_flags: &[bool]) -> bool {
        if self.state != PositionState::Idle {
            debug!(len, "inicialización repetida ignorada");
            return false;
        }
        self.len = len;
        self.state = if len == 0 {
            PositionState::Complete
        } else {
            match saved {
                Some(index) if index >= len => PositionState::Complete,
                Some(index) => PositionState::InProgress { index },
                None => {
                    let first_pending = completed_flags.iter().position(|done| !done).unwrap_or(0);
                    PositionState::InProgress { index: first_pending }
                }
            }
        };
        true
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != PositionState::Idle
    }

    pub fn is_complete(&self) -> bool {
        self.state == PositionState::Complete
    }

    /// Índice del paso actual; `None` en `Idle` o `Complete`.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            PositionState::InProgress { index } => Some(index),
            _ => None,
        }
    }

    /// Avanza tras completar el paso actual. El último paso transiciona a
    /// `Complete`; cualquier otro incrementa el índice exactamente en 1.
    pub fn advance(&mut self) -> Result<PositionState> {
        match self.state {
            PositionState::InProgress { index } => {
                self.state = if index + 1 >= self.len {
                    PositionState::Complete
                } else {
                    PositionState::InProgress { index: index + 1 }
                };
                Ok(self.state)
            }
            PositionState::Idle => Err(FlowError::Other("el flujo no está inicializado".into())),
            PositionState::Complete => Err(FlowError::Other("el flujo ya está completado".into())),
        }
    }

    /// Registra la clave de un paso completado en esta sesión.
    pub fn mark_completed(&mut self, key: &str) {
        self.completed_keys.insert(key.to_string());
    }

    pub fn is_step_completed(&self, key: &str) -> bool {
        self.completed_keys.contains(key)
    }

    pub fn completed_keys(&self) -> &IndexSet<String> {
        &self.completed_keys
    }

    /// Valor a persistir: el índice actual, o la longitud del flujo como
    /// marca de curso completado. `None` en `Idle`.
    pub fn save_index(&self) -> Option<usize> {
        match self.state {
            PositionState::Idle => None,
            PositionState::InProgress { index } => Some(index),
            PositionState::Complete => Some(self.len),
        }
    }

    /// Porcentaje de avance derivado, para presentación.
    pub fn progress_percent(&self) -> u8 {
        match self.state {
            PositionState::Idle => 0,
            PositionState::Complete => 100,
            PositionState::InProgress { index } => ((index * 100) / self.len) as u8,
        }
    }

    /// Par `(hechos, total)` para presentación.
    pub fn progress(&self) -> (usize, usize) {
        match self.state {
            PositionState::Idle => (0, self.len),
            PositionState::InProgress { index } => (index, self.len),
            PositionState::Complete => (self.len, self.len),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Re-acota el estado contra una nueva longitud tras una edición de
    /// contenido: un índice fuera de rango pasa a `Complete`. No re-ejecuta
    /// la heurística de reanudación.
    pub fn rebind(&mut self, new_len: usize) {
        self.len = new_len;
        if let PositionState::InProgress { index } = self.state {
            if index >= new_len {
                debug!(index, new_len, "índice fuera de rango tras edición de contenido");
                self.state = PositionState::Complete;
            }
        }
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}
