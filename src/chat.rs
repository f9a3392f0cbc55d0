use crate::contract::ExtractedContract;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// One transcript entry. Transcripts are linear and append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Confirmation card shown under a model message.
    pub extracted: Option<ExtractedContract>,
    /// Greeting or other fixed text, not produced by the model.
    pub is_system: bool,
    /// Outcome of a confirmed dispatch.
    pub is_action: bool,
    /// Name of an image sent with a user turn.
    pub attachment: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            extracted: None,
            is_system: false,
            is_action: false,
            attachment: None,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            ..Self::user(text)
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            is_system: true,
            ..Self::model(text)
        }
    }

    pub fn action(text: impl Into<String>) -> Self {
        Self {
            is_action: true,
            ..Self::model(text)
        }
    }

    pub fn with_attachment(mut self, name: impl Into<String>) -> Self {
        self.attachment = Some(name.into());
        self
    }

    pub fn with_extracted(mut self, extracted: ExtractedContract) -> Self {
        self.extracted = Some(extracted);
        self
    }
}
