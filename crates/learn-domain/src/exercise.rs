// exercise.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Definición de un ejercicio de opción múltiple asociado a una sección o
/// a una lección legada. La respuesta correcta se referencia por índice
/// dentro de `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDef {
  id: Uuid,
  prompt: String,
  options: Vec<String>,
  answer_index: usize,
}

impl ExerciseDef {
  fn new(id: Uuid, prompt: &str, options: Vec<String>, answer_index: usize) -> Result<Self, DomainError> {
    if prompt.trim().is_empty() {
      return Err(DomainError::ValidationError("El enunciado del ejercicio no puede estar vacío".to_string()));
    }
    if options.len() < 2 {
      return Err(DomainError::ValidationError("El ejercicio debe tener al menos dos opciones".to_string()));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
      return Err(DomainError::ValidationError("Las opciones del ejercicio no pueden estar vacías".to_string()));
    }
    if answer_index >= options.len() {
      return Err(DomainError::ValidationError(format!("Índice de respuesta fuera de rango: {} de {} opciones",
                                                      answer_index,
                                                      options.len())));
    }
    Ok(Self { id, prompt: prompt.to_string(), options, answer_index })
  }

  pub fn from_parts(id: Uuid, prompt: &str, options: Vec<String>, answer_index: usize) -> Result<Self, DomainError> {
    Self::new(id, prompt, options, answer_index)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn prompt(&self) -> &str {
    &self.prompt
  }

  pub fn options(&self) -> &[String] {
    &self.options
  }

  /// Comprueba una respuesta enviada (índice de la opción elegida).
  pub fn check(&self, answer: usize) -> bool {
    answer == self.answer_index
  }
}

impl fmt::Display for ExerciseDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Exercise({}, {} opciones)", self.prompt, self.options.len())
  }
}
