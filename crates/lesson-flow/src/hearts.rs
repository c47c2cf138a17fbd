// Archivo: hearts.rs
// Propósito: implementar el libro mayor de corazones (`HeartLedger`).
//
// El libro mayor espeja el estado del servidor y proyecta localmente la
// cuenta atrás hasta la próxima regeneración. Nunca decide el valor de
// `hearts` por su cuenta: toda mutación pasa por el servidor y la
// respuesta reemplaza la instantánea al completo.
use crate::domain::HeartsSnapshot;
use chrono::{DateTime, Utc};

/// Tope por defecto cuando el servidor aún no ha reportado `max_hearts`.
pub const DEFAULT_MAX_HEARTS: u32 = 5;

/// Estado local del pool de corazones.
///
/// Campos relevantes:
/// - `snapshot`: última instantánea autoritativa observada, si la hay.
/// - `fetched_at`: reloj de cliente en el momento de observarla; ancla la
///   cuenta atrás local.
/// - `refresh_requested`: pestillo que garantiza un único re-fetch cuando
///   la proyección llega a cero (no un sondeo indefinido). Se limpia al
///   aplicar la siguiente instantánea.
#[derive(Debug, Clone, Default)]
pub struct HeartLedger {
    snapshot: Option<HeartsSnapshot>,
    fetched_at: Option<DateTime<Utc>>,
    refresh_requested: bool,
}

impl HeartLedger {
    /// Crea un libro mayor vacío (aún sin instantánea del servidor).
    pub fn new() -> Self {
        Self::default()
    }

    /// Reemplaza la instantánea al completo con la respuesta del servidor
    /// y re-ancla la cuenta atrás en `now`.
    pub fn apply(&mut self, snapshot: HeartsSnapshot, now: DateTime<Utc>) {
        self.snapshot = Some(snapshot);
        self.fetched_at = Some(now);
        self.refresh_requested = false;
    }

    /// Corazones disponibles. Antes de la primera instantánea se asume el
    /// pool lleno para no bloquear la UI sin datos.
    pub fn hearts(&self) -> u32 {
        match &self.snapshot {
            Some(s) => s.hearts,
            None => self.max_hearts(),
        }
    }

    /// Tope del pool; por defecto `DEFAULT_MAX_HEARTS` y nunca menor que 1.
    pub fn max_hearts(&self) -> u32 {
        match &self.snapshot {
            Some(s) => s.max_hearts.max(1),
            None => DEFAULT_MAX_HEARTS,
        }
    }

    pub fn is_full(&self) -> bool {
        self.hearts() >= self.max_hearts()
    }

    /// Proyección pura de presentación: segundos restantes hasta el próximo
    /// corazón, acotados a >= 0. `None` con el pool lleno, sin regeneración
    /// activa o sin instantánea previa.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        let snapshot = self.snapshot.as_ref()?;
        let fetched_at = self.fetched_at?;
        if snapshot.hearts >= snapshot.max_hearts {
            return None;
        }
        let next = snapshot.next_heart_in_seconds?;
        if next < 0 {
            return None;
        }
        let elapsed = (now - fetched_at).num_seconds();
        Some((next - elapsed).max(0))
    }

    /// Etiqueta `mm:ss` (o `h:mm:ss` a partir de una hora) para la cuenta
    /// atrás mostrada en la UI.
    pub fn countdown_label(&self, now: DateTime<Utc>) -> Option<String> {
        let remaining = self.remaining_seconds(now)?;
        let hours = remaining / 3600;
        let minutes = (remaining % 3600) / 60;
        let seconds = remaining % 60;
        if hours > 0 {
            Some(format!("{}:{:02}:{:02}", hours, minutes, seconds))
        } else {
            Some(format!("{:02}:{:02}", minutes, seconds))
        }
    }

    /// Devuelve `true` exactamente una vez cuando la proyección llega a
    /// cero con el pool por debajo del tope: señal para pedir al servidor
    /// la instantánea regenerada. El pestillo se rearma con `apply`.
    pub fn take_refresh_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.refresh_requested {
            return false;
        }
        match self.remaining_seconds(now) {
            Some(0) => {
                self.refresh_requested = true;
                true
            }
            _ => false,
        }
    }

    /// Última instantánea observada, si la hay.
    pub fn snapshot(&self) -> Option<&HeartsSnapshot> {
        self.snapshot.as_ref()
    }
}
