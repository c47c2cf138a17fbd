use chrono::Utc;
use learn_domain::{ExerciseDef, FlowStep, Lesson, Section, StepContent};
use learn_session::{AttemptOutcome, LessonSession, SessionConfig};
use lesson_flow::stubs::InMemoryLearningApi;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use uuid::Uuid;

/// Pequeño menú interactivo para recorrer una sesión de lecciones usando
/// el stub en memoria de `LearningApi`.
///
/// Opciones soportadas:
/// 1) Ver estado (paso actual, progreso, corazones)
/// 2) Continuar (confirmar paso de texto/vídeo)
/// 3) Responder el ejercicio del paso actual
/// 4) Práctica (otorga corazones)
/// 5) Rellenar corazones
/// 6) Tick (cuenta atrás, sondeo y guardados pendientes)
/// 7) Salir (flush final y cierre)
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env()
                             .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .init();

    let config = SessionConfig::from_env();
    let practice_reward = config.practice_reward;
    let api = Arc::new(InMemoryLearningApi::with_hearts(3, 5, 120));
    let course_id = Uuid::new_v4();
    api.seed_lessons(course_id, demo_course()?);

    let mut session = LessonSession::open(api.clone(), config, course_id, Utc::now()).await?;
    println!("Curso demo abierto: {} pasos", session.steps().len());

    loop {
        println!("\n== Lesson flow menu ==");
        println!("1) Ver estado");
        println!("2) Continuar (paso de texto/vídeo)");
        println!("3) Responder ejercicio");
        println!("4) Práctica (+{} corazón/es)", practice_reward);
        println!("5) Rellenar corazones");
        println!("6) Tick");
        println!("7) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                let (done, total, percent) = session.progress();
                println!("Progreso: {}/{} ({}%)", done, total, percent);
                println!("Corazones: {}/{}", session.hearts(), session.max_hearts());
                if let Some(label) = session.ledger().countdown_label(Utc::now()) {
                    println!("Próximo corazón en {}", label);
                }
                if session.is_blocked() {
                    println!("Bloqueado. Opciones de recuperación: {:?}",
                             session.recovery_options(Utc::now()));
                }
                match session.current_step() {
                    Some(step) => println!("Paso actual [{:?}]: {}", step.kind(), describe(step)),
                    None => println!("Curso completado."),
                }
            }
            "2" => match session.acknowledge(Utc::now()).await {
                Ok(state) => println!("Avance -> {:?}", state),
                Err(e) => eprintln!("No se pudo avanzar: {}", e),
            },
            "3" => {
                let options = match session.current_step().map(|s| s.content().clone()) {
                    Some(StepContent::Exercise(def)) => {
                        println!("{}", def.prompt());
                        for (i, option) in def.options().iter().enumerate() {
                            println!("  {}) {}", i, option);
                        }
                        def.options().len()
                    }
                    _ => {
                        eprintln!("El paso actual no es un ejercicio");
                        continue;
                    }
                };
                let answer_s = prompt("Respuesta (índice): ")?;
                let answer: usize = match answer_s.trim().parse() {
                    Ok(n) if n < options => n,
                    _ => { eprintln!("Índice inválido"); continue; }
                };
                match session.submit_exercise(answer, Utc::now()).await {
                    Ok(AttemptOutcome::Correct { state }) => println!("¡Correcto! Avance -> {:?}", state),
                    Ok(AttemptOutcome::Incorrect { hearts_left, blocked }) => {
                        println!("Incorrecto. Corazones: {} (bloqueado: {})", hearts_left, blocked);
                    }
                    Err(e) => eprintln!("Error al responder: {}", e),
                }
            }
            "4" => match session.practice(Utc::now()).await {
                Ok(hearts) => println!("Práctica completada. Corazones: {}", hearts),
                Err(e) => eprintln!("Error en la práctica: {}", e),
            },
            "5" => match session.refill(Utc::now()).await {
                Ok(hearts) => println!("Pool rellenado. Corazones: {}", hearts),
                Err(e) => eprintln!("Error al rellenar: {}", e),
            },
            "6" => {
                let report = session.tick(Utc::now()).await;
                println!("Tick: guardado={} refresh={} cuenta atrás={:?}",
                         report.position_saved,
                         report.hearts_refreshed,
                         report.countdown);
            }
            "7" => {
                println!("Cerrando sesión...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    session.leave(Utc::now()).await;
    println!("Posición guardada: {:?}", api.saved_position(&course_id));
    Ok(())
}

/// Curso demo de educación financiera: una lección con secciones (texto y
/// ejercicio) y una lección legada sin secciones.
fn demo_course() -> Result<Vec<Lesson>, Box<dyn Error>> {
    let intro = Section::from_parts(Uuid::new_v4(),
                                    "¿Qué es un presupuesto?",
                                    1,
                                    true,
                                    Some("Un presupuesto reparte tus ingresos entre gastos y ahorro.".into()),
                                    None,
                                    None,
                                    false)?;
    let quiz = ExerciseDef::from_parts(Uuid::new_v4(),
                                       "Si ganas 1000 y gastas 800, ¿cuánto puedes ahorrar?",
                                       vec!["100".into(), "200".into(), "300".into()],
                                       1)?;
    let practica = Section::from_parts(Uuid::new_v4(),
                                       "Ponlo a prueba",
                                       2,
                                       true,
                                       None,
                                       None,
                                       Some(quiz),
                                       false)?;
    let presupuesto = Lesson::from_parts(Uuid::new_v4(),
                                         "Presupuesto básico",
                                         None,
                                         None,
                                         None,
                                         vec![intro, practica],
                                         false)?;
    let ahorro = Lesson::from_parts(Uuid::new_v4(),
                                    "El hábito de ahorrar",
                                    Some("Separa el ahorro en cuanto cobres, no al final del mes.".into()),
                                    None,
                                    None,
                                    vec![],
                                    false)?;
    Ok(vec![presupuesto, ahorro])
}

fn describe(step: &FlowStep) -> String {
    match step.content() {
        StepContent::Text(text) => text.clone(),
        StepContent::Video(url) => format!("[vídeo] {}", url),
        StepContent::Exercise(def) => format!("[ejercicio] {}", def.prompt()),
    }
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
