use greenland::ai::{AiError, DisabledGenerator, Part};
use greenland::app::{AppIntent, AppState, Language, PageView};
use greenland::assistant::{AssistantChat, Persona};
use greenland::intake::{IntakeError, IntakeSink};
use greenland::laws;
use greenland::map::MapIntent;
use greenland::markup::{Span, to_html, to_spans};
use greenland::registration::{CitizenRole, PROCESSING_DELAY, Registration, RegistrationStep, write_card};
use greenland::statics;
use greenland::store::LocalStore;
use greenland::table::TableSet;
use greenland::treasury;
use greenland::worker::{Job, JobOutcome, Worker};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct NoIntake;

impl IntakeSink for NoIntake {
    fn submit(&self, _url: &str, _payload: &Value) -> Result<(), IntakeError> {
        Ok(())
    }
}

fn seeded() -> TableSet {
    TableSet::seeded().expect("seed parses")
}

#[test]
fn reply_markup_cannot_inject_tags() {
    let html = to_html("<script>alert(1)</script> **важно**\n[docs](javascript:alert(1))");
    assert_eq!(
        html,
        "&lt;script&gt;alert(1)&lt;/script&gt; <strong>важно</strong><br />[docs](javascript:alert(1))"
    );

    let spans = to_spans("<b>x</b> **y**");
    assert_eq!(
        spans,
        vec![Span::Text("<b>x</b> ".to_string()), Span::Bold("y".to_string())]
    );
}

#[test]
fn assistant_turn_carries_matching_laws_as_context() {
    let tables = seeded();
    let mut chat = AssistantChat::new(Persona::Official);
    chat.input = "Как стать Резидентом?".to_string();

    let (id, request) = chat.begin_send(&tables, None).expect("send starts");
    assert!(chat.input.is_empty());
    assert!(chat.is_loading());
    assert!(chat.begin_send(&tables, Some("ещё")).is_none());
    let Part::Text(prompt) = &request.parts[0] else {
        panic!("prompt is text");
    };
    assert!(prompt.contains("гринкарту"));
    assert_eq!(
        request.system_instruction.as_deref(),
        Some(statics::RU_ASSISTANT_SYSTEM_PROMPT)
    );

    assert!(chat.complete(id, Ok("Заполните анкету. ##INLINE:Иммиграция;Казна##".to_string())));
    assert_eq!(chat.quick_replies(), vec!["Иммиграция", "Казна"]);

    let (id, _) = chat.begin_send(&tables, Some("Казна")).unwrap();
    assert!(chat.complete(id, Err(AiError::NotConfigured)));
    assert_eq!(
        chat.messages().last().map(|m| m.text.as_str()),
        Some(statics::RU_ASSISTANT_APOLOGY)
    );
}

#[test]
fn language_toggle_switches_texts_and_persona() {
    let mut app = AppState::new(seeded(), None);
    assert_eq!(app.t("nav_home"), "Главная");
    app.dispatch(AppIntent::ToggleLanguage);
    assert_eq!(app.language(), Language::Olbanian);
    assert_eq!(app.persona(), Persona::Slang);
    assert_eq!(app.t("nav_home"), "ГЛАГНЕ");

    app.dispatch(AppIntent::Navigate(PageView::Constitution));
    let hits = laws::search(app.tables(), "архитектор");
    assert_eq!(hits.len(), 1);
    assert_eq!(laws::question(hits[0], app.language()), "КТО ТАКОЙ АРХИТЕКТОР?");
    assert_eq!(laws::search(app.tables(), "  ").len(), 3);
}

#[test]
fn map_edits_survive_a_restart_and_bad_state_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    let mut app = AppState::new(seeded(), Some(store.clone()));

    let moved = app.cities()[0].id.clone();
    app.dispatch(AppIntent::Map(MapIntent::Move {
        id: moved.clone(),
        x: 250.0,
        y: -10.0,
    }));
    let placed = app
        .dispatch(AppIntent::Map(MapIntent::Place { x: 12.34, y: 56.78 }))
        .expect("placing returns the new id");

    let restarted = AppState::new(seeded(), Some(store.clone()));
    let city = restarted.cities().iter().find(|c| c.id == moved).unwrap();
    assert_eq!((city.left.as_str(), city.top.as_str()), ("100.0%", "0.0%"));
    let new = restarted.cities().iter().find(|c| c.id == placed).unwrap();
    assert_eq!((new.left.as_str(), new.top.as_str()), ("12.3%", "56.8%"));

    store.set(statics::KEY_CITIES, "{ not json").unwrap();
    let recovered = AppState::new(seeded(), Some(store));
    assert_eq!(recovered.cities().len(), 5);
    assert_eq!(recovered.cities()[0].id, "city-0");
}

#[test]
fn registration_issues_card_after_processing_and_exports_svg() {
    let mut reg = Registration::default();
    reg.form.role = CitizenRole::Architect;
    reg.form.fio = "Белова Анна".to_string();
    reg.form.name = "Ice".to_string();
    let mut rng = StdRng::seed_from_u64(1);
    let start = Instant::now();
    assert!(!reg.submit(start, &mut rng), "architects need experience");

    reg.form.tools = "n8n".to_string();
    reg.form.spheres = "ритейл".to_string();
    reg.form.cases = "бот продаж".to_string();
    reg.form.own_promo = "anna99".to_string();
    assert!(reg.submit(start, &mut rng));
    assert!(matches!(reg.step(), RegistrationStep::Processing { .. }));

    reg.tick(start);
    assert!(reg.card().is_none());
    reg.tick(start + PROCESSING_DELAY);
    let card = reg.card().cloned().expect("card issued");
    assert_eq!(card.code, "ANNA99");
    assert_eq!(card.display_name, "Dr. Ice");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(card.file_name());
    let exported = reg.begin_export().expect("card ready for export");
    assert!(reg.is_exporting());
    write_card(&path, &exported).unwrap();
    reg.finish_export();
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("ANNA99"));
    assert!(svg.contains("АРХИТЕКТОР"));
    assert!(!reg.is_exporting());
    assert!(!dir.path().join(format!("{}.part", card.file_name())).exists());
}

#[test]
fn card_export_runs_on_the_worker_and_reports_back() {
    let mut reg = Registration::default();
    reg.form.fio = "Петров Пётр".to_string();
    reg.form.name = "Piter".to_string();
    let start = Instant::now();
    assert!(reg.submit(start, &mut StdRng::seed_from_u64(9)));
    reg.tick(start + PROCESSING_DELAY);

    let worker = Worker::new(Arc::new(DisabledGenerator), Arc::new(NoIntake));
    let dir = tempfile::tempdir().unwrap();
    let card = reg.begin_export().unwrap();
    let path = dir.path().join(card.file_name());
    worker.submit(Job::ExportCard {
        path: path.clone(),
        card,
    });
    assert!(reg.is_exporting());

    match worker.recv_timeout(Duration::from_secs(5)) {
        Some(JobOutcome::Exported { path: saved, result }) => {
            assert!(result.is_ok());
            assert_eq!(saved, path);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    reg.finish_export();
    assert!(std::fs::read_to_string(&path).unwrap().contains("Piter"));

    let missing = dir.path().join("no-such-dir").join("card.svg");
    worker.submit(Job::ExportCard {
        path: missing.clone(),
        card: reg.begin_export().unwrap(),
    });
    match worker.recv_timeout(Duration::from_secs(5)) {
        Some(JobOutcome::Exported { result, .. }) => assert!(result.is_err()),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(!missing.exists());
}

#[test]
fn treasury_totals_for_the_signed_in_partner() {
    let tables = seeded();
    let app = AppState::new(tables, None);
    let leads = treasury::partner_leads(app.tables(), &app.profile().promo);
    assert_eq!(leads.len(), 3);

    let summary = treasury::summarize(&leads);
    assert_eq!(summary.referrals, 3);
    assert_eq!(summary.paid, 1);
    assert_eq!(summary.pending, 2);
    assert_eq!(treasury::format_amount(summary.paid_total), "45 000");
    assert_eq!(treasury::format_amount(summary.pending_total), "55 000");
}
