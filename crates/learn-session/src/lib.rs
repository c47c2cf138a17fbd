//! learn-session: orquestación del flujo de lecciones
//!
//! Crate que ata la maquinaria de `lesson-flow` al contenido de
//! `learn-domain`: el protocolo de completado por paso, la puerta de
//! corazones con su superficie de recuperación y el tick cooperativo que
//! sirve la cuenta atrás, el sondeo de seguridad y los guardados con
//! debounce. Una `LessonSession` vive exactamente lo que dura una
//! apertura de curso.

pub mod config;
pub mod errors;
pub mod gate;
pub mod session;

pub use config::SessionConfig;
pub use errors::SessionError;
pub use gate::{GateController, RecoveryOption};
pub use session::{AttemptOutcome, LessonSession, TickReport};
