use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::gate::{GateController, RecoveryOption};
use chrono::{DateTime, Utc};
use learn_domain::{flatten, flow_fingerprint, FlowStep, Lesson, StepContent, StepKind};
use lesson_flow::api::LearningApi;
use lesson_flow::domain::SaveRequest;
use lesson_flow::errors::FlowError;
use lesson_flow::hearts::HeartLedger;
use lesson_flow::position::{PositionState, PositionTracker};
use lesson_flow::sync::PositionSync;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ventana en la que un sondeo reciente hace redundante el re-fetch por
/// proyección a cero.
const POLL_DEDUP_SECS: i64 = 5;

/// Resultado de enviar una respuesta de ejercicio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Respuesta correcta: el paso se completó y la posición avanzó.
    Correct { state: PositionState },
    /// Respuesta incorrecta: sin avance; se reporta el estado del pool
    /// tras el descuento.
    Incorrect { hearts_left: u32, blocked: bool },
}

/// Resumen de lo ocurrido en un tick cooperativo de un segundo.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Etiqueta de cuenta atrás a mostrar, si procede.
    pub countdown: Option<String>,
    /// Si este tick trajo una instantánea fresca de corazones.
    pub hearts_refreshed: bool,
    /// Si este tick envió un guardado de posición con éxito.
    pub position_saved: bool,
}

/// Sesión de flujo de un curso: una instancia por apertura de curso.
///
/// Orquesta el protocolo de completado sobre las piezas del motor: el
/// flujo aplanado, el rastreador de posición, el libro mayor de corazones,
/// el sincronizador de guardados y la puerta. Se construye con `open` y se
/// consume con `leave`; descartarla cancela implícitamente el debounce y
/// la cuenta atrás pendientes, y el resultado de una petición todavía en
/// vuelo se descarta con ella (guarda frente a respuestas obsoletas).
pub struct LessonSession<A>
    where A: LearningApi
{
    api: Arc<A>,
    config: SessionConfig,
    course_id: Uuid,
    steps: Vec<FlowStep>,
    fingerprint: String,
    tracker: PositionTracker,
    ledger: HeartLedger,
    sync: PositionSync,
    gate: GateController,
    last_poll_at: DateTime<Utc>,
}

impl<A> LessonSession<A> where A: LearningApi
{
    /// Abre la sesión: descarga el árbol de lecciones, lo aplana, lee la
    /// posición guardada y la instantánea de corazones, e inicializa el
    /// rastreador exactamente una vez.
    pub async fn open(api: Arc<A>, config: SessionConfig, course_id: Uuid, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let lessons = api.fetch_lessons(&course_id).await?;
        let steps = flatten(&lessons);
        let fingerprint = flow_fingerprint(&steps);

        let saved = api.fetch_position(&course_id).await?.map(|p| p.current_index);

        let mut ledger = HeartLedger::new();
        ledger.apply(api.fetch_hearts().await?, now);

        let mut tracker = PositionTracker::new();
        let completed_flags: Vec<bool> = steps.iter().map(|s| s.is_completed()).collect();
        tracker.initialize(steps.len(), saved, &completed_flags);

        let mut gate = GateController::new(config.hearts_enabled);
        gate.observe(ledger.hearts());

        info!(course = %course_id,
              steps = steps.len(),
              resumed_at = ?tracker.current_index(),
              "sesión de curso abierta");

        let sync = PositionSync::new(config.debounce_ms);
        Ok(Self { api,
                  config,
                  course_id,
                  steps,
                  fingerprint,
                  tracker,
                  ledger,
                  sync,
                  gate,
                  last_poll_at: now })
    }

    /// Paso actual; `None` cuando el curso está completado.
    pub fn current_step(&self) -> Option<&FlowStep> {
        self.tracker.current_index().and_then(|i| self.steps.get(i))
    }

    /// Confirmación explícita ("Continuar") de un paso de texto o vídeo.
    /// Emite la llamada de completado que corresponda al tipo de paso y
    /// avanza la posición.
    pub async fn acknowledge(&mut self, now: DateTime<Utc>) -> Result<PositionState, SessionError> {
        if self.gate.is_blocked() {
            return Err(FlowError::Blocked("sin corazones: el avance está suspendido".into()).into());
        }
        let step = self.current_step()
                       .ok_or_else(|| SessionError::Other("no hay paso actual que confirmar".into()))?;
        if step.content().is_exercise() {
            return Err(SessionError::Validation("el paso actual requiere resolver el ejercicio".into()));
        }
        self.complete_current(now).await
    }

    /// Envía la respuesta a un paso de ejercicio. Una respuesta correcta
    /// sigue la misma ruta de completado que `acknowledge`; una incorrecta
    /// descuenta un corazón vía servidor y no avanza. Con la puerta
    /// cerrada el avance queda siempre suprimido; el descuento del intento
    /// fallido sólo se envía si la configuración lo pide.
    pub async fn submit_exercise(&mut self, answer: usize, now: DateTime<Utc>) -> Result<AttemptOutcome, SessionError> {
        let correct = {
            let step = self.current_step()
                           .ok_or_else(|| SessionError::Other("no hay paso actual".into()))?;
            match step.content() {
                StepContent::Exercise(def) => def.check(answer),
                _ => return Err(SessionError::Validation("el paso actual no es un ejercicio".into())),
            }
        };

        if correct {
            if self.gate.is_blocked() {
                return Err(FlowError::Blocked("sin corazones: el avance está suspendido".into()).into());
            }
            let state = self.complete_current(now).await?;
            return Ok(AttemptOutcome::Correct { state });
        }

        // intento fallido: el descuento es del servidor, nunca aritmética
        // local; la respuesta reemplaza el libro mayor al completo
        if self.config.hearts_enabled && (!self.gate.is_blocked() || self.config.decrement_while_blocked) {
            let snapshot = self.api.decrement_hearts(1).await?;
            self.ledger.apply(snapshot, now);
            self.gate.observe(self.ledger.hearts());
        }
        Ok(AttemptOutcome::Incorrect { hearts_left: self.ledger.hearts(),
                                       blocked: self.gate.is_blocked() })
    }

    /// Acción de práctica completada: otorga la recompensa configurada.
    /// Error visible para el usuario si la mutación falla (acción
    /// explícita, a diferencia del sondeo de fondo).
    pub async fn practice(&mut self, now: DateTime<Utc>) -> Result<u32, SessionError> {
        let snapshot = self.api.grant_hearts(self.config.practice_reward).await?;
        self.ledger.apply(snapshot, now);
        self.gate.observe(self.ledger.hearts());
        info!(hearts = self.ledger.hearts(), "práctica completada");
        Ok(self.ledger.hearts())
    }

    /// Relleno completo del pool (vía de pago).
    pub async fn refill(&mut self, now: DateTime<Utc>) -> Result<u32, SessionError> {
        let snapshot = self.api.refill_hearts().await?;
        self.ledger.apply(snapshot, now);
        self.gate.observe(self.ledger.hearts());
        info!(hearts = self.ledger.hearts(), "pool rellenado");
        Ok(self.ledger.hearts())
    }

    /// Tick cooperativo de un segundo: proyecta la cuenta atrás, dispara
    /// el re-fetch único al llegar a cero (deduplicado frente a un sondeo
    /// reciente), ejecuta el sondeo de seguridad a intervalo fijo y envía
    /// el guardado con debounce vencido. Los fallos de fondo se tragan
    /// con un aviso en el log, nunca interrumpen al estudiante.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();

        if self.ledger.take_refresh_due(now) && !self.recently_polled(now) {
            report.hearts_refreshed = self.refresh_hearts(now).await;
        }

        if (now - self.last_poll_at).num_seconds() >= self.config.poll_interval_secs {
            report.hearts_refreshed = self.refresh_hearts(now).await || report.hearts_refreshed;
        }

        if let Some(request) = self.sync.take_due(now) {
            match self.api.save_position(&request.course_id, request.current_index).await {
                Ok(()) => {
                    self.sync.settle_saved(request);
                    report.position_saved = true;
                }
                Err(e) => {
                    self.sync.settle_failed(request);
                    warn!(error = %e, "guardado de posición fallido; el próximo cambio lo reintenta");
                }
            }
        }

        report.countdown = self.ledger.countdown_label(now);
        report
    }

    /// Refresh de contenido en segundo plano. Con la misma huella sólo se
    /// actualizan las banderas de completado; con una huella distinta el
    /// flujo se reemplaza y el índice se re-acota. La heurística de
    /// reanudación no se re-ejecuta jamás desde aquí.
    pub fn refresh_content(&mut self, lessons: &[Lesson], now: DateTime<Utc>) {
        let steps = flatten(lessons);
        let fingerprint = flow_fingerprint(&steps);
        if fingerprint == self.fingerprint {
            self.steps = steps;
            return;
        }
        info!(old_len = self.steps.len(), new_len = steps.len(), "contenido editado detectado en refresh");
        self.steps = steps;
        self.fingerprint = fingerprint;
        self.tracker.rebind(self.steps.len());
        self.schedule_save(now);
    }

    /// Cierra la sesión con un guardado inmediato (sin debounce) de mejor
    /// esfuerzo: el fallo se traga y una sesión futura reconcilia.
    pub async fn leave(mut self, now: DateTime<Utc>) {
        if let Some(index) = self.tracker.save_index() {
            if let Some(request) = self.sync.flush_request(SaveRequest::new(self.course_id, index)) {
                if let Err(e) = self.api.save_position(&request.course_id, request.current_index).await {
                    warn!(error = %e, "flush de salida fallido");
                }
            }
        }
        info!(course = %self.course_id, "sesión de curso cerrada");
    }

    /// Opciones de recuperación a ofrecer mientras la puerta está cerrada.
    pub fn recovery_options(&self, now: DateTime<Utc>) -> Vec<RecoveryOption> {
        self.gate.recovery_options(self.ledger.countdown_label(now))
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    pub fn is_complete(&self) -> bool {
        self.tracker.is_complete()
    }

    pub fn is_blocked(&self) -> bool {
        self.gate.is_blocked()
    }

    pub fn hearts(&self) -> u32 {
        self.ledger.hearts()
    }

    pub fn max_hearts(&self) -> u32 {
        self.ledger.max_hearts()
    }

    /// Par `(hechos, total)` y porcentaje derivado, para presentación.
    pub fn progress(&self) -> (usize, usize, u8) {
        let (done, total) = self.tracker.progress();
        (done, total, self.tracker.progress_percent())
    }

    pub fn ledger(&self) -> &HeartLedger {
        &self.ledger
    }

    pub fn gate(&self) -> &GateController {
        &self.gate
    }

    pub fn has_pending_save(&self) -> bool {
        self.sync.has_pending()
    }

    /// Completa el paso actual: llamada de completado según el tipo de
    /// paso (sección vs. lección legada), marca de la clave, avance y
    /// guardado programado.
    async fn complete_current(&mut self, now: DateTime<Utc>) -> Result<PositionState, SessionError> {
        let (key, kind, lesson_id, section_id) = {
            let step = self.current_step()
                           .ok_or_else(|| SessionError::Other("no hay paso actual".into()))?;
            (step.key().to_string(), step.kind(), step.lesson_id(), step.section_id())
        };

        match kind {
            StepKind::Section => {
                let section_id =
                    section_id.ok_or_else(|| SessionError::Other("paso de sección sin id de sección".into()))?;
                self.api.complete_section(&section_id).await?;
            }
            StepKind::LessonText | StepKind::LessonExercise => {
                self.api.complete_lesson(&lesson_id).await?;
            }
        }

        self.tracker.mark_completed(&key);
        let state = self.tracker.advance()?;
        self.schedule_save(now);
        debug!(key = %key, state = ?state, "paso completado");
        Ok(state)
    }

    fn schedule_save(&mut self, now: DateTime<Utc>) {
        if let Some(index) = self.tracker.save_index() {
            self.sync.note_change(SaveRequest::new(self.course_id, index), now);
        }
    }

    /// Trae y aplica una instantánea fresca de corazones; los fallos de
    /// fondo sólo se registran en el log.
    async fn refresh_hearts(&mut self, now: DateTime<Utc>) -> bool {
        self.last_poll_at = now;
        match self.api.fetch_hearts().await {
            Ok(snapshot) => {
                self.ledger.apply(snapshot, now);
                self.gate.observe(self.ledger.hearts());
                true
            }
            Err(e) => {
                warn!(error = %e, "refresh de corazones fallido");
                false
            }
        }
    }

    fn recently_polled(&self, now: DateTime<Utc>) -> bool {
        (now - self.last_poll_at).num_seconds() < POLL_DEDUP_SECS
    }
}
