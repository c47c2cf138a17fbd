use serde::{Deserialize, Serialize};

/// Configuracion de una sesión de lecciones.
///
/// `decrement_while_blocked` resuelve de forma explícita si un intento
/// fallido estando ya bloqueado se reporta igualmente al servidor (el
/// servidor acota en cero); el avance queda suprimido en ambos casos.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
  /// Si la puerta de corazones está activa para esta sesión.
  pub hearts_enabled: bool,
  /// Ventana de debounce para los guardados de posición, en milisegundos.
  pub debounce_ms: i64,
  /// Intervalo del sondeo de seguridad de corazones, en segundos.
  pub poll_interval_secs: i64,
  /// Corazones otorgados por una acción de práctica completada.
  pub practice_reward: u32,
  /// Si un fallo estando bloqueado envía igualmente el decremento.
  pub decrement_while_blocked: bool,
}

impl Default for SessionConfig {
  fn default() -> Self {
    SessionConfig { hearts_enabled: true,
                    debounce_ms: 2000,
                    poll_interval_secs: 60,
                    practice_reward: 1,
                    decrement_while_blocked: false }
  }
}

impl SessionConfig {
  /// Construye la configuración desde variables de entorno `LEARNFLOW_*`,
  /// con los valores por defecto como fallback. El binario carga `.env`
  /// antes de llamar aquí.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    SessionConfig { hearts_enabled: env_bool("LEARNFLOW_HEARTS_ENABLED", defaults.hearts_enabled),
                    debounce_ms: env_i64("LEARNFLOW_DEBOUNCE_MS", defaults.debounce_ms),
                    poll_interval_secs: env_i64("LEARNFLOW_POLL_SECS", defaults.poll_interval_secs),
                    practice_reward: env_u32("LEARNFLOW_PRACTICE_REWARD", defaults.practice_reward),
                    decrement_while_blocked:
                      env_bool("LEARNFLOW_DECREMENT_WHILE_BLOCKED", defaults.decrement_while_blocked) }
  }
}

fn env_bool(key: &str, fallback: bool) -> bool {
  match std::env::var(key) {
    Ok(v) => matches!(v.trim(), "1" | "true" | "TRUE" | "True"),
    Err(_) => fallback,
  }
}

fn env_i64(key: &str, fallback: i64) -> i64 {
  std::env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
}

fn env_u32(key: &str, fallback: u32) -> u32 {
  std::env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
}
