use chrono::{Duration, Utc};
use lesson_flow::api::LearningApi;
use lesson_flow::domain::SaveRequest;
use lesson_flow::errors::FlowError;
use lesson_flow::hearts::HeartLedger;
use lesson_flow::position::PositionTracker;
use lesson_flow::stubs::InMemoryLearningApi;
use lesson_flow::sync::PositionSync;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), FlowError> {
    // Api en memoria haciendo de servidor
    let api = Arc::new(InMemoryLearningApi::with_hearts(2, 5, 120));
    let course_id = Uuid::new_v4();
    let now = Utc::now();

    // Libro mayor: la instantánea del servidor manda
    let mut ledger = HeartLedger::new();
    ledger.apply(api.fetch_hearts().await?, now);
    println!("hearts: {}/{}", ledger.hearts(), ledger.max_hearts());
    if let Some(label) = ledger.countdown_label(now) {
        println!("próximo corazón en {}", label);
    }

    // Un fallo de ejercicio: decrement y reemplazo total
    ledger.apply(api.decrement_hearts(1).await?, now);
    println!("tras el fallo: {}/{}", ledger.hearts(), ledger.max_hearts());

    // Rastreador de posición sobre un flujo de 4 pasos, sin índice guardado
    let mut tracker = PositionTracker::new();
    tracker.initialize(4, None, &[true, false, false, false]);
    println!("arranque en el paso {:?}", tracker.current_index());

    // Avanzar dos pasos y encolar los guardados con debounce
    let mut sync = PositionSync::new(2000);
    for _ in 0..2 {
        let state = tracker.advance()?;
        println!("avance -> {:?}", state);
        if let Some(index) = tracker.save_index() {
            sync.note_change(SaveRequest::new(course_id, index), Utc::now());
        }
    }

    // Pasada la ventana de debounce sólo se envía el valor más reciente
    let later = Utc::now() + Duration::seconds(3);
    if let Some(request) = sync.take_due(later) {
        api.save_position(&request.course_id, request.current_index).await?;
        sync.settle_saved(request);
        println!("guardado índice {} ({} llamadas de red)",
                 request.current_index,
                 api.save_call_count());
    }

    Ok(())
}
