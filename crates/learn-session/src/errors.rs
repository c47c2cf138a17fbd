use thiserror::Error;

// Errores comunes de la sesión de lecciones.
//
// Este enum centraliza los errores que pueden ocurrir durante una sesión:
// errores del motor (`FlowError`), errores del dominio de contenido
// (`DomainError`) y validaciones locales del protocolo de completado.
#[derive(Error, Debug)]
pub enum SessionError {
  /// Errores originados por el motor o la API remota.
  #[error("Error de flujo: {0}")]
  Flow(#[from] lesson_flow::errors::FlowError),

  /// Errores originados por el dominio de contenido.
  #[error("Error de dominio: {0}")]
  Domain(#[from] learn_domain::DomainError),

  /// Errores de validacion local del protocolo (por ejemplo responder un
  /// ejercicio en un paso de texto).
  #[error("Error de validacion: {0}")]
  Validation(String),

  /// Error generico: captura otros tipos de errores no tipados.
  #[error("Otro error: {0}")]
  Other(String),
}

impl SessionError {
  /// `true` si el error proviene de la puerta de corazones.
  pub fn is_blocked(&self) -> bool {
    matches!(self, SessionError::Flow(lesson_flow::errors::FlowError::Blocked(_)))
  }
}
