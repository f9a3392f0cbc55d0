//! Contract catalogue and the contract wizard.
//!
//! The wizard walks Selecting -> Conversing -> Confirming -> Dispatched. Each
//! user turn goes to the AI service with a contract-specific extraction
//! prompt; a JSON object in the reply becomes a confirmation card, anything
//! else is shown as a plain reply.

use crate::ai::{AiError, GenerateRequest, ModelKind, Part};
use crate::chat::{ChatMessage, Role};
use crate::intake::IntakeError;
use crate::statics;
use crate::worker::{RequestId, RequestSlot};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::{error, info};

pub const EXTRACTION_TEMPERATURE: f32 = 0.1;
pub const EXTRACTION_MAX_TOKENS: u32 = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    CurrentDate,
    UserChatId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractField {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub default: Option<FieldDefault>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractType {
    pub id: String,
    pub label: String,
    /// Intake endpoint receiving the confirmed payload.
    pub script_url: String,
    pub form_url: String,
    pub view_url: String,
    pub required_info: Vec<String>,
    pub fields: Vec<ContractField>,
}

impl ContractType {
    pub fn field(&self, key: &str) -> Option<&ContractField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// The six contract types, loaded once from the bundled catalogue.
pub fn catalogue() -> &'static [ContractType] {
    static CATALOGUE: OnceLock<Vec<ContractType>> = OnceLock::new();
    CATALOGUE.get_or_init(|| {
        json5::from_str(include_str!("../data/contracts.json5")).unwrap_or_else(|e| {
            error!(error = %e, "contract catalogue is malformed");
            Vec::new()
        })
    })
}

pub fn contract_type(id: &str) -> Option<&'static ContractType> {
    catalogue().iter().find(|c| c.id == id)
}

const MONTHS_GENITIVE: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября",
    "октября", "ноября", "декабря",
];

/// `05 января 2026 г.`
pub fn format_contract_date(date: NaiveDate) -> String {
    let month = MONTHS_GENITIVE[date.month0() as usize];
    format!("{:02} {} {} г.", date.day(), month, date.year())
}

pub fn welcome_message(ct: &ContractType, today: NaiveDate) -> String {
    format!(
        "Для составления договора и счета мне понадобится Код Партнера (из профиля).\n\
         Для договора я буду использовать текущую дату.\n\
         Сегодня {date}\n\n\
         Вы можете ознакомиться с условиями договора перед его созданием по ссылке:\n\
         [{label}]({view})\n\n\
         Для заполнения реквизитов в договор мне необходимы сведения. Как удобнее Вам прислать информацию?\n\
         1. В формате текста ✍️\n\
         2. В виде картинки, фото или скриншота 🖼",
        date = format_contract_date(today),
        label = ct.label,
        view = ct.view_url,
    )
}

pub fn system_prompt(ct: &ContractType, today: NaiveDate, partner_code: Option<&str>) -> String {
    let field_list = ct
        .fields
        .iter()
        .map(|f| format!("{} ({})", f.key, f.label))
        .collect::<Vec<_>>()
        .join("\n");
    let required = ct
        .required_info
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    let code = partner_code.filter(|c| !c.trim().is_empty()).unwrap_or("-");

    format!(
        "You are a Contract Assistant for AI-GreenLand.\n\
         Current Contract Type: {label}.\n\
         Today is {date}. Partner code from the user's profile: {code}.\n\n\
         REQUIRED FIELDS TO EXTRACT FOR THIS CONTRACT:\n\
         {field_list}\n\n\
         INSTRUCTIONS:\n\
         1. If the user asks what info is needed, reply with this list:\n\
         {required}\n\
         2. If the user provides requisites (text or image), extract them into a JSON object.\n\
         3. \"Date_now\" fields: Use today's date in format \"DD month YYYY г.\".\n\
         4. \"Code\": If provided in context, use it. Else \"-\".\n\
         5. If a field is missing, put \"-\" (dash). Do NOT invent data.\n\
         6. Return ONLY valid JSON in your response if you extracted data.\n\
         7. If you extracted data, do not add conversational text outside the JSON.\n\
         8. If you cannot extract data (e.g. user is just chatting), reply conversationally in Russian.",
        label = ct.label,
        date = format_contract_date(today),
    )
}

/// The span from the first `{` to the last `}`, parsed leniently. Code fences
/// and chatter around the object are ignored. Anything that is not an object
/// yields `None`.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match json5::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Field data ready for the confirmation card and the intake payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContract {
    pub contract_id: String,
    pub fields: IndexMap<String, String>,
    pub form_url: String,
}

impl ExtractedContract {
    pub fn payload(&self) -> Value {
        let mut map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        map.insert("formUrl".to_string(), Value::String(self.form_url.clone()));
        Value::Object(map)
    }
}

/// Keep exactly the configured fields, in catalogue order. Date fields are
/// always today's date; the code field falls back to the profile code; any
/// other missing value becomes `-`.
pub fn apply_defaults(
    ct: &ContractType,
    raw: &Map<String, Value>,
    today: NaiveDate,
    partner_code: Option<&str>,
) -> ExtractedContract {
    let partner_code = partner_code.map(str::trim).filter(|c| !c.is_empty());
    let fields = ct
        .fields
        .iter()
        .map(|field| {
            let extracted = raw.get(&field.key).map(value_text).unwrap_or_default();
            let missing = extracted.is_empty() || extracted == statics::MISSING_VALUE;
            let value = match field.default {
                Some(FieldDefault::CurrentDate) => format_contract_date(today),
                Some(FieldDefault::UserChatId) if missing => partner_code
                    .map(str::to_string)
                    .unwrap_or_else(|| statics::MISSING_VALUE.to_string()),
                _ if missing => statics::MISSING_VALUE.to_string(),
                _ => extracted,
            };
            (field.key.clone(), value)
        })
        .collect();

    ExtractedContract {
        contract_id: ct.id.clone(),
        fields,
        form_url: ct.form_url.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    Selecting,
    Conversing,
    Confirming,
    Dispatched,
}

/// An image picked for the next turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Intake call requested by a confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub id: RequestId,
    pub url: String,
    pub payload: Value,
}

#[derive(Debug, Default)]
pub struct ContractWizard {
    selected: Option<&'static ContractType>,
    messages: Vec<ChatMessage>,
    pub input: String,
    pub attachment: Option<Attachment>,
    /// Profile code used for the `Code` field.
    pub partner_code: Option<String>,
    slot: RequestSlot,
    dispatched: bool,
}

impl ContractWizard {
    pub fn selected(&self) -> Option<&'static ContractType> {
        self.selected
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn stage(&self) -> WizardStage {
        if self.selected.is_none() {
            return WizardStage::Selecting;
        }
        if self.dispatched {
            return WizardStage::Dispatched;
        }
        match self.messages.last() {
            Some(m) if m.extracted.is_some() => WizardStage::Confirming,
            _ => WizardStage::Conversing,
        }
    }

    /// Start a conversation for a contract type. Unknown ids are ignored.
    pub fn select(&mut self, id: &str, today: NaiveDate) -> bool {
        let Some(ct) = contract_type(id) else {
            return false;
        };
        self.slot.cancel();
        self.selected = Some(ct);
        self.messages = vec![ChatMessage::system(welcome_message(ct, today))];
        self.input.clear();
        self.attachment = None;
        self.dispatched = false;
        info!(contract = %ct.id, "contract wizard started");
        true
    }

    /// Back to the catalogue. A pending request is abandoned.
    pub fn back(&mut self) {
        self.slot.cancel();
        self.selected = None;
        self.messages.clear();
        self.input.clear();
        self.attachment = None;
        self.dispatched = false;
    }

    pub fn attach(&mut self, attachment: Attachment) {
        if self.input.trim().is_empty() {
            self.input = statics::RU_WIZARD_FILE_PROMPT.to_string();
        }
        self.attachment = Some(attachment);
    }

    pub fn can_send(&self) -> bool {
        self.selected.is_some()
            && !self.slot.is_busy()
            && (!self.input.trim().is_empty() || self.attachment.is_some())
    }

    /// Move the typed text and attachment into the transcript and build the
    /// AI request for them.
    pub fn begin_turn(&mut self, today: NaiveDate) -> Option<(RequestId, GenerateRequest)> {
        if !self.can_send() {
            return None;
        }
        let ct = self.selected?;
        let text = std::mem::take(&mut self.input).trim_end().to_string();
        let attachment = self.attachment.take();

        let mut message = ChatMessage::user(text.clone());
        let mut parts = Vec::new();
        if let Some(file) = &attachment {
            message = message.with_attachment(file.name.clone());
            parts.push(Part::image(&file.mime_type, &file.bytes));
        }
        parts.push(Part::Text(text));
        self.messages.push(message);
        self.dispatched = false;

        let request = GenerateRequest {
            model: if attachment.is_some() {
                ModelKind::Vision
            } else {
                ModelKind::Text
            },
            parts,
            system_instruction: Some(system_prompt(ct, today, self.partner_code.as_deref())),
            temperature: Some(EXTRACTION_TEMPERATURE),
            max_output_tokens: Some(EXTRACTION_MAX_TOKENS),
        };
        Some((self.slot.begin(), request))
    }

    /// Apply an AI reply. Returns false if the reply was stale and dropped.
    pub fn complete_turn(
        &mut self,
        id: RequestId,
        result: Result<String, AiError>,
        today: NaiveDate,
    ) -> bool {
        if !self.slot.accept(id) {
            return false;
        }
        let Some(ct) = self.selected else {
            return false;
        };

        let message = match result {
            Ok(text) => match extract_json_object(&text) {
                Some(raw) => {
                    let extracted = apply_defaults(ct, &raw, today, self.partner_code.as_deref());
                    info!(contract = %ct.id, fields = extracted.fields.len(), "contract fields extracted");
                    ChatMessage::model(format!(
                        "{} \"{}\":",
                        statics::RU_WIZARD_EXTRACTED,
                        ct.label
                    ))
                    .with_extracted(extracted)
                }
                None => ChatMessage::model(text),
            },
            Err(AiError::EmptyResponse) => ChatMessage::model(statics::RU_WIZARD_EMPTY_REPLY),
            Err(_) => ChatMessage::model(statics::RU_WIZARD_ANALYSIS_ERROR),
        };
        self.messages.push(message);
        true
    }

    /// "Fix" on a confirmation card: prefill a redo request.
    pub fn request_fix(&mut self) {
        self.input = statics::RU_WIZARD_FIX_PROMPT.to_string();
    }

    /// "Confirm and send" on the card of message `index`.
    pub fn confirm(&mut self, index: usize) -> Option<Dispatch> {
        if self.slot.is_busy() {
            return None;
        }
        let ct = self.selected?;
        let message = self.messages.get(index)?;
        if message.role != Role::Model {
            return None;
        }
        let extracted = message.extracted.as_ref()?;
        Some(Dispatch {
            id: self.slot.begin(),
            url: ct.script_url.clone(),
            payload: extracted.payload(),
        })
    }

    pub fn complete_dispatch(&mut self, id: RequestId, result: Result<(), IntakeError>) -> bool {
        if !self.slot.accept(id) {
            return false;
        }
        match result {
            Ok(()) => {
                self.messages
                    .push(ChatMessage::action(statics::RU_WIZARD_DISPATCH_OK));
                self.dispatched = true;
            }
            Err(_) => {
                self.messages
                    .push(ChatMessage::model(statics::RU_WIZARD_DISPATCH_FAILED));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ContractWizard, FieldDefault, apply_defaults, catalogue, contract_type,
        extract_json_object, format_contract_date,
    };
    use crate::ai::Part;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn catalogue_has_six_types_with_defaulted_first_fields() {
        let all = catalogue();
        assert_eq!(all.len(), 6);
        for ct in all {
            assert_eq!(ct.fields[0].default, Some(FieldDefault::CurrentDate));
            assert_eq!(ct.fields[1].default, Some(FieldDefault::UserChatId));
            assert!(ct.fields[2..].iter().all(|f| f.default.is_none()));
        }
        assert_eq!(contract_type("partner_ip").unwrap().fields.len(), 18);
        assert_eq!(contract_type("expert_ooo").unwrap().fields.len(), 16);
    }

    #[test]
    fn contract_date_uses_genitive_month_once() {
        assert_eq!(format_contract_date(date(2026, 1, 5)), "05 января 2026 г.");
        assert_eq!(format_contract_date(date(2025, 12, 31)), "31 декабря 2025 г.");
    }

    #[test]
    fn json_is_found_inside_code_fences() {
        let map = extract_json_object("Вот:\n```json\n{\"a\": \"1\", b: 2,}\n```").unwrap();
        assert_eq!(map["a"], "1");
        assert_eq!(map["b"], 2);
        assert!(extract_json_object("нет данных").is_none());
        assert!(extract_json_object("} {").is_none());
    }

    #[test]
    fn defaults_fill_date_code_and_dashes() {
        let ct = contract_type("partner_ip").unwrap();
        let raw = extract_json_object(
            r#"{"IPREFDate_now": "вчера", "IPREFCode": "-", "IPREFFullName": "Иванов И.И.", "IPREFINN": 7700, "Extra": "x"}"#,
        )
        .unwrap();
        let out = apply_defaults(ct, &raw, date(2026, 10, 15), Some("IVAN24"));
        assert_eq!(out.fields.len(), 18);
        assert_eq!(out.fields["IPREFDate_now"], "15 октября 2026 г.");
        assert_eq!(out.fields["IPREFCode"], "IVAN24");
        assert_eq!(out.fields["IPREFFullName"], "Иванов И.И.");
        assert_eq!(out.fields["IPREFINN"], "7700");
        assert_eq!(out.fields["IPREFEmail"], "-");
        assert!(!out.fields.contains_key("Extra"));
        assert_eq!(out.payload()["formUrl"], ct.form_url.as_str());
    }

    #[test]
    fn trailing_newline_is_not_sent() {
        let mut wizard = ContractWizard::default();
        assert!(wizard.select("partner_ip", date(2026, 10, 15)));
        wizard.input = "ИП Иванов, ИНН 770000000000\n".to_string();
        let (_, request) = wizard.begin_turn(date(2026, 10, 15)).unwrap();
        assert_eq!(wizard.messages().last().unwrap().text, "ИП Иванов, ИНН 770000000000");
        assert!(matches!(
            request.parts.last(),
            Some(Part::Text(t)) if t == "ИП Иванов, ИНН 770000000000"
        ));
    }
}
