//! The assistant chat widget: a floating press-secretary bot answering from
//! the static knowledge tables.

use crate::ai::{AiError, GenerateRequest};
use crate::chat::{ChatMessage, Role};
use crate::statics;
use crate::table::TableSet;
use crate::worker::{RequestId, RequestSlot};
use regex::Regex;
use std::sync::OnceLock;

pub const CONTEXT_LIMIT: usize = 5000;
pub const CHAT_MAX_TOKENS: u32 = 4000;

/// Voice of the assistant. Starts from the display language but can be
/// switched on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persona {
    #[default]
    Official,
    Slang,
}

impl Persona {
    pub fn from_language(language: crate::app::Language) -> Self {
        match language {
            crate::app::Language::Ru => Persona::Official,
            crate::app::Language::Olbanian => Persona::Slang,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Persona::Official => Persona::Slang,
            Persona::Slang => Persona::Official,
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            Persona::Official => statics::RU_ASSISTANT_GREETING,
            Persona::Slang => statics::OLB_ASSISTANT_GREETING,
        }
    }

    /// Shorter greeting used when the persona changes before any exchange.
    pub fn reset_greeting(self) -> &'static str {
        match self {
            Persona::Official => statics::RU_ASSISTANT_GREETING_SHORT,
            Persona::Slang => statics::OLB_ASSISTANT_GREETING_SHORT,
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Persona::Official => statics::RU_ASSISTANT_SYSTEM_PROMPT,
            Persona::Slang => statics::OLB_ASSISTANT_SYSTEM_PROMPT,
        }
    }

    pub fn apology(self) -> &'static str {
        match self {
            Persona::Official => statics::RU_ASSISTANT_APOLOGY,
            Persona::Slang => statics::OLB_ASSISTANT_APOLOGY,
        }
    }

    pub fn empty_reply(self) -> &'static str {
        match self {
            Persona::Official => statics::RU_ASSISTANT_EMPTY_REPLY,
            Persona::Slang => statics::OLB_ASSISTANT_EMPTY_REPLY,
        }
    }
}

fn truncate_chars(text: &mut String, limit: usize) {
    if let Some((idx, _)) = text.char_indices().nth(limit) {
        text.truncate(idx);
    }
}

/// Every knowledge row mentioning the query, as prompt context, cut to
/// [`CONTEXT_LIMIT`] characters.
pub fn build_context(tables: &TableSet, query: &str) -> String {
    let needle = query.to_lowercase();
    let hit = |text: String| !text.is_empty() && text.to_lowercase().contains(&needle);
    let mut context = String::new();

    for law in tables.rows(statics::TBL_LAWS) {
        if hit(law.text("q")) || hit(law.text("a")) || hit(law.text("q_olbanian")) {
            context.push_str(&format!("Q: {}\nA: {}\n\n", law.text("q"), law.text("a")));
        }
    }
    for file in tables.rows(statics::TBL_KNOWLEDGE_FILES) {
        if hit(file.text("filename")) || hit(file.text("description")) {
            context.push_str(&format!(
                "Document: {}\nDescription: {}\n\n",
                file.text("filename"),
                file.text("description")
            ));
        }
    }
    for item in tables.rows(statics::TBL_SITE_TEXT) {
        if hit(item.text("ru")) || hit(item.text("olbanian")) {
            context.push_str(&format!(
                "Term: {} (Olbanian: {})\n",
                item.text("ru"),
                item.text("olbanian")
            ));
        }
    }

    truncate_chars(&mut context, CONTEXT_LIMIT);
    context
}

pub fn build_prompt(context: &str, question: &str) -> String {
    let context = if context.is_empty() {
        "No specific database match found."
    } else {
        context
    };
    format!("Context from Knowledge Base:\n{context}\n\nUser Question: \"{question}\"")
}

fn inline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"##INLINE:(.*?)##").expect("static regex"))
}

/// Split the first `##INLINE:A;B##` directive out of a reply. Returns the
/// remaining text and the quick-reply labels.
pub fn split_inline_buttons(text: &str) -> (String, Vec<String>) {
    let Some(caps) = inline_re().captures(text) else {
        return (text.to_string(), Vec::new());
    };
    let buttons = caps[1]
        .split(';')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect();
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let mut rest = String::with_capacity(text.len());
    rest.push_str(&text[..whole.start]);
    rest.push_str(&text[whole.end..]);
    (rest.trim().to_string(), buttons)
}

#[derive(Debug)]
pub struct AssistantChat {
    pub open: bool,
    pub input: String,
    messages: Vec<ChatMessage>,
    persona: Persona,
    slot: RequestSlot,
}

impl AssistantChat {
    pub fn new(persona: Persona) -> Self {
        Self {
            open: false,
            input: String::new(),
            messages: vec![ChatMessage::model(persona.greeting())],
            persona,
            slot: RequestSlot::default(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_busy()
    }

    /// Switch voice. An untouched transcript gets the new persona's greeting.
    pub fn set_persona(&mut self, persona: Persona) {
        if persona == self.persona {
            return;
        }
        self.persona = persona;
        if self.messages.len() == 1 {
            self.messages = vec![ChatMessage::model(persona.reset_greeting())];
        }
    }

    /// Send the typed input, or `text_override` (a quick-reply label) without
    /// touching the input box.
    pub fn begin_send(
        &mut self,
        tables: &TableSet,
        text_override: Option<&str>,
    ) -> Option<(RequestId, GenerateRequest)> {
        if self.slot.is_busy() {
            return None;
        }
        let question = match text_override {
            Some(text) => text.to_string(),
            None => self.input.clone(),
        };
        if question.trim().is_empty() {
            return None;
        }
        if text_override.is_none() {
            self.input.clear();
        }
        self.messages.push(ChatMessage::user(question.clone()));

        let context = build_context(tables, &question);
        let mut request = GenerateRequest::text(build_prompt(&context, &question));
        request.system_instruction = Some(self.persona.system_prompt().to_string());
        request.max_output_tokens = Some(CHAT_MAX_TOKENS);
        Some((self.slot.begin(), request))
    }

    /// Apply a reply. Returns false if it was stale and dropped.
    pub fn complete(&mut self, id: RequestId, result: Result<String, AiError>) -> bool {
        if !self.slot.accept(id) {
            return false;
        }
        let text = match result {
            Ok(text) => text,
            Err(AiError::EmptyResponse) => self.persona.empty_reply().to_string(),
            Err(_) => self.persona.apology().to_string(),
        };
        self.messages.push(ChatMessage::model(text));
        true
    }

    /// Quick replies offered under the latest model message only.
    pub fn quick_replies(&self) -> Vec<String> {
        match self.messages.last() {
            Some(m) if m.role == Role::Model => split_inline_buttons(&m.text).1,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AssistantChat, CONTEXT_LIMIT, Persona, build_context, build_prompt, split_inline_buttons};
    use crate::ai::AiError;
    use crate::table::TableSet;

    #[test]
    fn inline_directive_is_split_out() {
        let (rest, buttons) = split_inline_buttons("Выберите:\n##INLINE: Да ; Нет;;##");
        assert_eq!(rest, "Выберите:");
        assert_eq!(buttons, vec!["Да", "Нет"]);
        let (rest, buttons) = split_inline_buttons("без кнопок");
        assert_eq!(rest, "без кнопок");
        assert!(buttons.is_empty());
    }

    #[test]
    fn context_collects_matches_from_three_tables() {
        let tables = TableSet::from_json5(
            "{
                LAWS: [ { q: 'Как стать резидентом?', a: 'Через иммиграцию' }, { q: 'Налоги', a: 'Нет' } ],
                KNOWLEDGE_FILES: [ { filename: 'резидент.pdf', description: 'Памятка' } ],
                SITE_TEXT: [ { key: 'k', ru: 'Резидент', olbanian: 'КРАБЕ' } ],
            }",
        )
        .unwrap();
        let ctx = build_context(&tables, "РЕЗИДЕНТ");
        assert_eq!(
            ctx,
            "Q: Как стать резидентом?\nA: Через иммиграцию\n\n\
             Document: резидент.pdf\nDescription: Памятка\n\n\
             Term: Резидент (Olbanian: КРАБЕ)\n"
        );
    }

    #[test]
    fn context_is_bounded() {
        let rows: Vec<String> = (0..400)
            .map(|i| format!("{{ q: 'вопрос {i} про визу', a: 'ответ' }}"))
            .collect();
        let tables = TableSet::from_json5(&format!("{{ LAWS: [ {} ] }}", rows.join(","))).unwrap();
        assert_eq!(build_context(&tables, "визу").chars().count(), CONTEXT_LIMIT);
    }

    #[test]
    fn empty_context_has_placeholder() {
        assert!(build_prompt("", "Привет").contains("No specific database match found."));
    }

    #[test]
    fn failure_becomes_persona_apology() {
        let tables = TableSet::empty();
        let mut chat = AssistantChat::new(Persona::Slang);
        chat.input = "чо как".into();
        let (id, _) = chat.begin_send(&tables, None).unwrap();
        assert!(chat.is_loading());
        assert!(chat.complete(id, Err(AiError::Request("timeout".into()))));
        assert_eq!(chat.messages().last().unwrap().text, Persona::Slang.apology());
        assert!(!chat.is_loading());
    }

    #[test]
    fn persona_switch_resets_only_untouched_greeting() {
        let mut chat = AssistantChat::new(Persona::Official);
        chat.set_persona(Persona::Slang);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].text, Persona::Slang.reset_greeting());

        chat.input = "q".into();
        chat.begin_send(&TableSet::empty(), None).unwrap();
        chat.set_persona(Persona::Official);
        assert_eq!(chat.messages()[0].text, Persona::Slang.reset_greeting());
    }
}
