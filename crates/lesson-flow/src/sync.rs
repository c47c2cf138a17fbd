// Archivo: sync.rs
// Propósito: implementar el sincronizador de posición (`PositionSync`),
// responsable de persistir el índice actual sin inundar el servidor en
// navegación rápida y sin perder el último valor al salir del curso.
//
// Todo el estado de planificación (última clave guardada, clave encolada)
// vive como campos de esta instancia, con ciclo de vida acotado a una
// sesión de curso: nunca estado global compartido.
use crate::domain::SaveRequest;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct QueuedSave {
    request: SaveRequest,
    deadline: DateTime<Utc>,
}

/// Sincronizador con debounce y deduplicación de guardados de posición.
///
/// Diseño de ranura única: como mucho hay un guardado encolado o en vuelo
/// por sesión. El marcador encolado sólo se limpia si ninguna petición más
/// nueva lo reemplazó entre tanto (guarda de carrera: un guardado viejo en
/// vuelo no puede pisar el valor más reciente).
#[derive(Debug, Clone)]
pub struct PositionSync {
    debounce: Duration,
    last_saved: Option<SaveRequest>,
    queued: Option<QueuedSave>,
    in_flight: Option<SaveRequest>,
}

impl PositionSync {
    /// Crea el sincronizador con la ventana de debounce en milisegundos.
    pub fn new(debounce_ms: i64) -> Self {
        Self { debounce: Duration::milliseconds(debounce_ms.max(0)),
               last_saved: None,
               queued: None,
               in_flight: None }
    }

    /// Registra un cambio de posición. Reglas, en orden:
    /// 1. igual a la última guardada con éxito: no-op (idempotente);
    /// 2. igual a la ya encolada: no-op (no se reinicia el temporizador);
    /// 3. distinta: reemplaza lo encolado y arma un plazo fresco.
    pub fn note_change(&mut self, request: SaveRequest, now: DateTime<Utc>) {
        if self.last_saved == Some(request) {
            return;
        }
        if let Some(q) = &self.queued {
            if q.request == request {
                return;
            }
        }
        debug!(course = %request.course_id, index = request.current_index, "guardado encolado");
        self.queued = Some(QueuedSave { request,
                                        deadline: now + self.debounce });
    }

    /// Entrega la petición encolada cuyo plazo venció, marcándola en vuelo.
    /// El marcador encolado se conserva hasta `settle_saved`/`settle_failed`
    /// para que una petición más nueva llegada durante el vuelo gane.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<SaveRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        let queued = self.queued.as_ref()?;
        if now < queued.deadline {
            return None;
        }
        self.in_flight = Some(queued.request);
        self.in_flight
    }

    /// Registra el éxito de un guardado. Limpia el marcador encolado sólo
    /// si ninguna petición más nueva lo reemplazó durante el vuelo.
    pub fn settle_saved(&mut self, request: SaveRequest) {
        if self.in_flight == Some(request) {
            self.in_flight = None;
        }
        self.last_saved = Some(request);
        if let Some(q) = &self.queued {
            if q.request == request {
                self.queued = None;
            }
        }
    }

    /// Registra el fallo de un guardado: se traga sin reintento automático.
    /// El siguiente cambio de posición (o el flush de salida) volverá a
    /// disparar la persistencia de forma natural.
    pub fn settle_failed(&mut self, request: SaveRequest) {
        if self.in_flight == Some(request) {
            self.in_flight = None;
        }
        if let Some(q) = &self.queued {
            if q.request == request {
                self.queued = None;
            }
        }
    }

    /// Candidato a guardado inmediato (sin debounce) para las acciones de
    /// salir/terminar. `None` si el valor actual ya está persistido.
    /// Descarta cualquier cosa encolada: el flush la reemplaza.
    pub fn flush_request(&mut self, current: SaveRequest) -> Option<SaveRequest> {
        self.queued = None;
        if self.last_saved == Some(current) {
            return None;
        }
        Some(current)
    }

    /// Última petición persistida con éxito, si la hay.
    pub fn last_saved(&self) -> Option<SaveRequest> {
        self.last_saved
    }

    /// `true` si hay un guardado encolado o en vuelo.
    pub fn has_pending(&self) -> bool {
        self.queued.is_some() || self.in_flight.is_some()
    }
}
