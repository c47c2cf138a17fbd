// lesson.rs
use crate::{DomainError, ExerciseDef};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Sección publicable dentro de una lección. El campo `order` define el
/// orden explícito dentro de la lección; las secciones no publicadas se
/// excluyen al aplanar el flujo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
  id: Uuid,
  title: String,
  order: i64,
  published: bool,
  body: Option<String>,
  video_url: Option<String>,
  exercise: Option<ExerciseDef>,
  is_completed: bool,
}

impl Section {
  #[allow(clippy::too_many_arguments)]
  fn new(id: Uuid,
         title: &str,
         order: i64,
         published: bool,
         body: Option<String>,
         video_url: Option<String>,
         exercise: Option<ExerciseDef>,
         is_completed: bool)
         -> Result<Self, DomainError> {
    if title.trim().is_empty() {
      return Err(DomainError::ValidationError("El título de la sección no puede estar vacío".to_string()));
    }
    Ok(Self { id,
              title: title.to_string(),
              order,
              published,
              body,
              video_url,
              exercise,
              is_completed })
  }

  #[allow(clippy::too_many_arguments)]
  pub fn from_parts(id: Uuid,
                    title: &str,
                    order: i64,
                    published: bool,
                    body: Option<String>,
                    video_url: Option<String>,
                    exercise: Option<ExerciseDef>,
                    is_completed: bool)
                    -> Result<Self, DomainError> {
    Self::new(id, title, order, published, body, video_url, exercise, is_completed)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn order(&self) -> i64 {
    self.order
  }

  pub fn is_published(&self) -> bool {
    self.published
  }

  pub fn body(&self) -> Option<&str> {
    self.body.as_deref()
  }

  pub fn video_url(&self) -> Option<&str> {
    self.video_url.as_deref()
  }

  pub fn exercise(&self) -> Option<&ExerciseDef> {
    self.exercise.as_ref()
  }

  pub fn is_completed(&self) -> bool {
    self.is_completed
  }
}

/// Lección tal como la reporta el servidor, con sus secciones ordenadas y
/// el avance (`is_completed`) por elemento. Las lecciones legadas pueden
/// no tener secciones: en ese caso el contenido propio de la lección es el
/// que se presenta al estudiante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
  id: Uuid,
  title: String,
  body: Option<String>,
  video_url: Option<String>,
  exercise: Option<ExerciseDef>,
  sections: Vec<Section>,
  is_completed: bool,
}

impl Lesson {
  fn new(id: Uuid,
         title: &str,
         body: Option<String>,
         video_url: Option<String>,
         exercise: Option<ExerciseDef>,
         sections: Vec<Section>,
         is_completed: bool)
         -> Result<Self, DomainError> {
    if title.trim().is_empty() {
      return Err(DomainError::ValidationError("El título de la lección no puede estar vacío".to_string()));
    }
    Ok(Self { id,
              title: title.to_string(),
              body,
              video_url,
              exercise,
              sections,
              is_completed })
  }

  pub fn from_parts(id: Uuid,
                    title: &str,
                    body: Option<String>,
                    video_url: Option<String>,
                    exercise: Option<ExerciseDef>,
                    sections: Vec<Section>,
                    is_completed: bool)
                    -> Result<Self, DomainError> {
    Self::new(id, title, body, video_url, exercise, sections, is_completed)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn body(&self) -> Option<&str> {
    self.body.as_deref()
  }

  pub fn video_url(&self) -> Option<&str> {
    self.video_url.as_deref()
  }

  pub fn exercise(&self) -> Option<&ExerciseDef> {
    self.exercise.as_ref()
  }

  pub fn sections(&self) -> &[Section] {
    &self.sections
  }

  pub fn is_completed(&self) -> bool {
    self.is_completed
  }
}

impl fmt::Display for Lesson {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Lesson({}, {} secciones)", self.title, self.sections.len())
  }
}
