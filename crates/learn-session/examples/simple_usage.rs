// Clean example: uses the in-memory api stub so the session runs locally
use chrono::{Duration, Utc};
use learn_domain::{Lesson, Section};
use learn_session::{LessonSession, SessionConfig};
use lesson_flow::stubs::InMemoryLearningApi;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let api = Arc::new(InMemoryLearningApi::with_hearts(3, 5, 120));
    let course_id = Uuid::new_v4();

    // two text sections and a legacy sectionless lesson -> 3 steps
    let s1 = Section::from_parts(Uuid::new_v4(), "intro", 1, true, Some("hola".into()), None, None, false)
        .expect("section");
    let s2 = Section::from_parts(Uuid::new_v4(), "repaso", 2, true, Some("más".into()), None, None, false)
        .expect("section");
    let a = Lesson::from_parts(Uuid::new_v4(), "lección A", None, None, None, vec![s1, s2], false).expect("lesson");
    let b = Lesson::from_parts(Uuid::new_v4(), "lección B", Some("legada".into()), None, None, vec![], false)
        .expect("lesson");
    api.seed_lessons(course_id, vec![a, b]);

    let now = Utc::now();
    let mut session = LessonSession::open(api.clone(), SessionConfig::default(), course_id, now)
        .await
        .expect("open session");
    println!("Starting session: {} steps, hearts {}/{}",
             session.steps().len(),
             session.hearts(),
             session.max_hearts());

    // walk the whole flow acknowledging each step
    while !session.is_complete() {
        let state = session.acknowledge(Utc::now()).await.expect("acknowledge");
        let (done, total, percent) = session.progress();
        println!("advanced -> {:?} ({}/{} = {}%)", state, done, total, percent);
    }

    // past the debounce window the tick persists the final position
    let report = session.tick(Utc::now() + Duration::seconds(3)).await;
    println!("tick: saved={} ({} network calls)", report.position_saved, api.save_call_count());

    session.leave(Utc::now() + Duration::seconds(3)).await;
    println!("saved position: {:?}", api.saved_position(&course_id));
}
