use chrono::NaiveDate;
use greenland::ai::{AiError, GenerateRequest, ModelKind, Part, TextGenerator};
use greenland::contract::{Attachment, ContractWizard, WizardStage, contract_type};
use greenland::intake::{IntakeError, IntakeSink};
use greenland::statics;
use greenland::worker::{Job, JobOutcome, Widget, Worker};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

struct CannedGenerator(&'static str);

impl TextGenerator for CannedGenerator {
    fn generate(&self, _request: &GenerateRequest) -> Result<String, AiError> {
        Ok(self.0.to_string())
    }
}

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<(String, Value)>>,
    fail: bool,
}

impl IntakeSink for RecordingSink {
    fn submit(&self, url: &str, payload: &Value) -> Result<(), IntakeError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        if self.fail {
            Err(IntakeError::Request("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

const REPLY: &str = "```json\n{\"IPREFFullName\": \"Иванов Иван Иванович\", \"IPREFINN\": \"770000000000\", \"IPREFCode\": \"-\"}\n```";

#[test]
fn partner_ip_flows_from_text_to_dispatched_webhook() {
    let sink = Arc::new(RecordingSink::default());
    let worker = Worker::new(Arc::new(CannedGenerator(REPLY)), sink.clone());

    let mut wizard = ContractWizard::default();
    wizard.partner_code = Some("IVAN24".to_string());
    assert!(wizard.select("partner_ip", today()));
    assert_eq!(wizard.stage(), WizardStage::Conversing);
    assert_eq!(wizard.messages().len(), 1);

    wizard.input = "ИП Иванов Иван Иванович, ИНН 770000000000".to_string();
    let (id, request) = wizard.begin_turn(today()).expect("turn starts");
    assert_eq!(request.model, ModelKind::Text);
    assert!(
        request
            .system_instruction
            .as_deref()
            .is_some_and(|s| s.contains("IVAN24"))
    );
    assert!(wizard.is_loading());
    assert!(!wizard.can_send());

    worker.submit(Job::Generate {
        widget: Widget::Wizard,
        id,
        request,
    });
    let Some(JobOutcome::Generated { widget, id, result }) = worker.recv_timeout(WAIT) else {
        panic!("expected a generation outcome");
    };
    assert_eq!(widget, Widget::Wizard);
    assert!(wizard.complete_turn(id, result, today()));
    assert_eq!(wizard.stage(), WizardStage::Confirming);

    let last = wizard.messages().len() - 1;
    let extracted = wizard.messages()[last]
        .extracted
        .clone()
        .expect("reply carries extracted fields");
    assert_eq!(extracted.fields["IPREFFullName"], "Иванов Иван Иванович");
    assert_eq!(extracted.fields["IPREFCode"], "IVAN24");
    assert_eq!(extracted.fields["IPREFDate_now"], "15 октября 2026 г.");
    assert_eq!(extracted.fields["IPREFBank"], statics::MISSING_VALUE);

    let dispatch = wizard.confirm(last).expect("card can be confirmed");
    worker.submit(Job::Intake {
        id: dispatch.id,
        url: dispatch.url,
        payload: dispatch.payload,
    });
    let Some(JobOutcome::Dispatched { id, result }) = worker.recv_timeout(WAIT) else {
        panic!("expected a dispatch outcome");
    };
    assert!(wizard.complete_dispatch(id, result));
    assert_eq!(wizard.stage(), WizardStage::Dispatched);
    assert_eq!(
        wizard.messages().last().map(|m| m.text.as_str()),
        Some(statics::RU_WIZARD_DISPATCH_OK)
    );

    let ct = contract_type("partner_ip").unwrap();
    let calls = sink.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ct.script_url);
    assert_eq!(calls[0].1["formUrl"], ct.form_url.as_str());
    assert_eq!(calls[0].1["IPREFCode"], "IVAN24");
}

#[test]
fn failed_webhook_keeps_card_confirmable() {
    let sink = Arc::new(RecordingSink {
        fail: true,
        ..Default::default()
    });
    let worker = Worker::new(Arc::new(CannedGenerator(REPLY)), sink);

    let mut wizard = ContractWizard::default();
    wizard.select("partner_ip", today());
    wizard.input = "реквизиты".to_string();
    let (id, _) = wizard.begin_turn(today()).unwrap();
    assert!(wizard.complete_turn(id, Ok(REPLY.to_string()), today()));

    let last = wizard.messages().len() - 1;
    let dispatch = wizard.confirm(last).unwrap();
    worker.submit(Job::Intake {
        id: dispatch.id,
        url: dispatch.url,
        payload: dispatch.payload,
    });
    let Some(JobOutcome::Dispatched { id, result }) = worker.recv_timeout(WAIT) else {
        panic!("expected a dispatch outcome");
    };
    assert!(result.is_err());
    assert!(wizard.complete_dispatch(id, result));
    assert_eq!(
        wizard.messages().last().map(|m| m.text.as_str()),
        Some(statics::RU_WIZARD_DISPATCH_FAILED)
    );
    assert!(wizard.confirm(last).is_some());
}

#[test]
fn reply_for_an_abandoned_conversation_is_dropped() {
    let mut wizard = ContractWizard::default();
    wizard.select("partner_ip", today());
    wizard.input = "ФИО: Петров".to_string();
    let (stale, _) = wizard.begin_turn(today()).unwrap();

    wizard.back();
    wizard.select("expert_ip", today());
    assert!(!wizard.complete_turn(stale, Ok(REPLY.to_string()), today()));
    assert_eq!(wizard.messages().len(), 1);
    assert_eq!(wizard.stage(), WizardStage::Conversing);
}

#[test]
fn image_turn_uses_vision_model_with_inline_data_first() {
    let mut wizard = ContractWizard::default();
    wizard.select("partner_smz", today());
    wizard.attach(Attachment {
        name: "passport.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    });
    assert_eq!(wizard.input, statics::RU_WIZARD_FILE_PROMPT);

    let (_, request) = wizard.begin_turn(today()).unwrap();
    assert_eq!(request.model, ModelKind::Vision);
    assert!(request.has_image());
    assert!(matches!(&request.parts[0], Part::InlineData { mime_type, .. } if mime_type == "image/png"));
    assert!(matches!(&request.parts[1], Part::Text(t) if t == statics::RU_WIZARD_FILE_PROMPT));
    assert_eq!(
        wizard.messages().last().and_then(|m| m.attachment.as_deref()),
        Some("passport.png")
    );
    assert!(wizard.attachment.is_none());
}

#[test]
fn analysis_error_is_reported_in_the_transcript() {
    let mut wizard = ContractWizard::default();
    wizard.select("expert_ooo", today());
    wizard.input = "привет".to_string();
    let (id, _) = wizard.begin_turn(today()).unwrap();
    assert!(wizard.complete_turn(id, Err(AiError::Request("timeout".to_string())), today()));
    assert_eq!(
        wizard.messages().last().map(|m| m.text.as_str()),
        Some(statics::RU_WIZARD_ANALYSIS_ERROR)
    );
    assert!(!wizard.is_loading());
}
