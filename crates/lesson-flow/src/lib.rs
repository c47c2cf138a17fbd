//! Crate `lesson-flow` — maquinaria del motor secuencial de lecciones
//!
//! Este crate define los DTOs de cable (`HeartsSnapshot`, `SavedPosition`,
//! `SaveRequest`), el contrato con el servidor `LearningApi` y una
//! implementación en memoria útil para pruebas (`InMemoryLearningApi`).
//! También expone las tres piezas de estado del motor: el libro mayor de
//! corazones (`HeartLedger`), la máquina de estados de posición
//! (`PositionTracker`) y el sincronizador de guardados (`PositionSync`).
//!
//! Diseño resumido:
//! - Estado autoritativo en servidor: cada mutación de corazones responde
//!   con la instantánea completa y el libro mayor la aplica por reemplazo,
//!   nunca por aritmética local.
//! - Cuenta atrás como proyección: los segundos restantes se calculan a
//!   partir de la última instantánea más el reloj de pared; jamás
//!   retroalimentan el valor de `hearts`.
//! - Guardados con debounce y ranura única: sólo la petición más reciente
//!   por curso llega a enviarse, con guarda de carrera frente a respuestas
//!   lentas.
//!
//! Ejemplo rápido:
//! ```rust
//! use lesson_flow::stubs::InMemoryLearningApi;
//! use std::sync::Arc;
//! let api = Arc::new(InMemoryLearningApi::new());
//! ```
pub mod api;
pub mod domain;
pub mod errors;
pub mod hearts;
pub mod position;
pub mod stubs;
pub mod sync;

pub use api::*;
pub use domain::*;
pub use errors::*;
pub use hearts::*;
pub use position::*;
pub use stubs::*;
pub use sync::*;
