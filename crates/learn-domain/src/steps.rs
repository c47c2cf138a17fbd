// steps.rs
use crate::{ExerciseDef, Lesson};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Tipo de paso dentro del flujo aplanado.
///
/// - `Section`: paso generado a partir de una sección publicada.
/// - `LessonText`: fallback para lecciones legadas sin secciones y sin
///   ejercicio propio.
/// - `LessonExercise`: fallback para lecciones legadas sin secciones que
///   traen un ejercicio propio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
  Section,
  LessonText,
  LessonExercise,
}

/// Contenido atómico de un paso. Inmutable una vez aplanado el flujo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepContent {
  Text(String),
  Video(String),
  Exercise(ExerciseDef),
}

impl StepContent {
  /// Selecciona el contenido a presentar con la preferencia
  /// ejercicio > vídeo > texto. Contenido vacío degrada a texto vacío en
  /// lugar de descartar el paso.
  fn choose(exercise: Option<&ExerciseDef>, video_url: Option<&str>, body: Option<&str>) -> Self {
    if let Some(ex) = exercise {
      return StepContent::Exercise(ex.clone());
    }
    if let Some(url) = video_url {
      return StepContent::Video(url.to_string());
    }
    StepContent::Text(body.unwrap_or_default().to_string())
  }

  pub fn is_exercise(&self) -> bool {
    matches!(self, StepContent::Exercise(_))
  }
}

/// Unidad atómica de progresión que el estudiante recorre en secuencia.
///
/// `key` es estable y única dentro de una instancia de flujo; el índice
/// guardado en servidor es un offset dentro del array que produce
/// `flatten`, por lo que el orden debe ser idéntico entre recargas mientras
/// el contenido no cambie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
  key: String,
  kind: StepKind,
  lesson_id: Uuid,
  lesson_index: usize,
  section_id: Option<Uuid>,
  content: StepContent,
  is_completed: bool,
}

impl FlowStep {
  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn kind(&self) -> StepKind {
    self.kind
  }

  pub fn lesson_id(&self) -> Uuid {
    self.lesson_id
  }

  pub fn lesson_index(&self) -> usize {
    self.lesson_index
  }

  pub fn section_id(&self) -> Option<Uuid> {
    self.section_id
  }

  pub fn content(&self) -> &StepContent {
    &self.content
  }

  pub fn is_completed(&self) -> bool {
    self.is_completed
  }
}

/// Aplana la lista de lecciones en la secuencia ordenada de pasos.
///
/// Contrato:
/// - Excluye secciones no publicadas.
/// - Para lecciones con una o más secciones publicadas emite un paso por
///   sección, ordenado por `order` dentro de la lección y respetando el
///   orden de las lecciones tal como llegan.
/// - Para lecciones sin secciones publicadas emite exactamente un paso
///   fallback con el contenido propio de la lección: ninguna lección se
///   omite en silencio.
/// - Es una función pura: la misma entrada produce siempre el mismo array.
pub fn flatten(lessons: &[Lesson]) -> Vec<FlowStep> {
  let mut steps = Vec::new();
  for (lesson_index, lesson) in lessons.iter().enumerate() {
    let mut published: Vec<_> = lesson.sections().iter().filter(|s| s.is_published()).collect();
    published.sort_by_key(|s| s.order());

    if published.is_empty() {
      let kind = if lesson.exercise().is_some() { StepKind::LessonExercise } else { StepKind::LessonText };
      steps.push(FlowStep { key: format!("les-{}", lesson.id()),
                            kind,
                            lesson_id: lesson.id(),
                            lesson_index,
                            section_id: None,
                            content: StepContent::choose(lesson.exercise(), lesson.video_url(), lesson.body()),
                            is_completed: lesson.is_completed() });
      continue;
    }

    for section in published {
      steps.push(FlowStep { key: format!("sec-{}", section.id()),
                            kind: StepKind::Section,
                            lesson_id: lesson.id(),
                            lesson_index,
                            section_id: Some(section.id()),
                            content: StepContent::choose(section.exercise(), section.video_url(), section.body()),
                            is_completed: section.is_completed() });
    }
  }
  steps
}

/// Huella del flujo: digest sobre las claves ordenadas de los pasos.
///
/// Dos aplanados del mismo contenido producen la misma huella; una edición
/// de contenido (sección añadida, quitada o reordenada) la cambia. Sirve
/// para detectar en recargas de fondo que un índice guardado puede haber
/// quedado fuera de rango.
pub fn flow_fingerprint(steps: &[FlowStep]) -> String {
  let mut hasher = Sha256::new();
  for step in steps {
    hasher.update(step.key().as_bytes());
    hasher.update(b"\n");
  }
  format!("{:x}", hasher.finalize())
}
