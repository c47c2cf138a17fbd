use serde::{Deserialize, Serialize};

/// Opciones de recuperación ofrecidas mientras la puerta está cerrada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryOption {
    /// Esperar a la regeneración; `countdown` es la etiqueta proyectada.
    Wait { countdown: Option<String> },
    /// Completar una acción de práctica que otorga corazones.
    Practice,
    /// Rellenar el pool por la vía de pago.
    Refill,
}

/// Controlador de la puerta de corazones.
///
/// Deriva `blocked = hearts_enabled && hearts == 0` de cada observación
/// del libro mayor. La superficie de recuperación se muestra mientras la
/// puerta está cerrada y se descarta sola en cuanto se observa
/// `hearts > 0`.
#[derive(Debug, Clone)]
pub struct GateController {
    hearts_enabled: bool,
    blocked: bool,
    recovery_visible: bool,
}

impl GateController {
    pub fn new(hearts_enabled: bool) -> Self {
        Self { hearts_enabled,
               blocked: false,
               recovery_visible: false }
    }

    /// Re-evalúa la puerta con el último valor autoritativo de corazones.
    pub fn observe(&mut self, hearts: u32) {
        self.blocked = self.hearts_enabled && hearts == 0;
        self.recovery_visible = self.blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn hearts_enabled(&self) -> bool {
        self.hearts_enabled
    }

    /// `true` mientras la superficie de recuperación debe mostrarse.
    pub fn recovery_visible(&self) -> bool {
        self.recovery_visible
    }

    /// Opciones a ofrecer en la superficie de recuperación; vacío si la
    /// puerta está abierta.
    pub fn recovery_options(&self, countdown: Option<String>) -> Vec<RecoveryOption> {
        if !self.recovery_visible {
            return Vec::new();
        }
        vec![RecoveryOption::Wait { countdown }, RecoveryOption::Practice, RecoveryOption::Refill]
    }
}
