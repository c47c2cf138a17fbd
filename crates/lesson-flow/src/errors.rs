// Archivo: errors.rs
// Propósito: definir los errores del motor de flujo y el alias Result<T>
// usado por las APIs del crate.
use thiserror::Error;
/// Errores comunes del motor de flujo de lecciones.
///
/// - `NotFound`: entidad no encontrada (curso, posición, etc.).
/// - `Api`: fallo de una llamada al servidor (transitorio o no).
/// - `Blocked`: avance suprimido por la puerta de corazones.
/// - `Other`: cualquier otro error.
#[derive(Error, Debug)]
pub enum FlowError {
  /// Entidad no encontrada (por ejemplo, curso o lección).
  #[error("No encontrado: {0}")]
  NotFound(String),
  /// Fallo en una llamada a la API remota.
  #[error("Error de API: {0}")]
  Api(String),
  /// Operación rechazada porque el estudiante está sin corazones.
  #[error("Bloqueado: {0}")]
  Blocked(String),
  /// Otro tipo de error.
  #[error("Otro: {0}")]
  Other(String),
}
/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, FlowError>;
