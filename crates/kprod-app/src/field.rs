//! Form fields and the two views that host them.
//!
//! Every editable input in the application is a [`TextField`] addressed by a
//! [`FieldId`]. A [`View`] owns an ordered list of field ids; focus is an
//! index into that list.

use kprod_core::ConnectionSettings;

use crate::KeyInput;

/// Screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Connection settings form (initial).
    #[default]
    Config,
    /// Message composer and send history.
    Message,
}

impl View {
    /// Fields of this view in focus order.
    pub fn fields(self) -> &'static [FieldId] {
        match self {
            Self::Config => &FieldId::CONFIG,
            Self::Message => &FieldId::MESSAGE,
        }
    }

    /// Slot for per-view state such as remembered focus.
    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Config => 0,
            Self::Message => 1,
        }
    }
}

/// Identity of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// Comma-separated bootstrap brokers.
    Brokers,
    /// Destination topic.
    Topic,
    /// Client certificate path.
    CertFile,
    /// Client private key path.
    KeyFile,
    /// CA certificate path.
    CaFile,
    /// Serde name for keys.
    KeySerde,
    /// Serde name for values.
    ValueSerde,
    /// Message key (optional).
    MessageKey,
    /// Message value (multi-line).
    MessageValue,
}

impl FieldId {
    /// Config view fields in focus order.
    pub const CONFIG: [Self; 7] = [
        Self::Brokers,
        Self::Topic,
        Self::CertFile,
        Self::KeyFile,
        Self::CaFile,
        Self::KeySerde,
        Self::ValueSerde,
    ];

    /// Message view fields in focus order.
    pub const MESSAGE: [Self; 2] = [Self::MessageKey, Self::MessageValue];

    const ALL: [Self; 9] = [
        Self::Brokers,
        Self::Topic,
        Self::CertFile,
        Self::KeyFile,
        Self::CaFile,
        Self::KeySerde,
        Self::ValueSerde,
        Self::MessageKey,
        Self::MessageValue,
    ];

    /// Label shown next to the field.
    pub fn label(self) -> &'static str {
        match self {
            Self::Brokers => "Brokers (comma-separated)",
            Self::Topic => "Topic",
            Self::CertFile => "Client Certificate Path",
            Self::KeyFile => "Client Key Path",
            Self::CaFile => "CA Certificate Path",
            Self::KeySerde => "Key Serde",
            Self::ValueSerde => "Value Serde",
            Self::MessageKey => "Message Key (optional)",
            Self::MessageValue => "Message Value (JSON)",
        }
    }

    /// Hint shown while the field is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Brokers => "localhost:9092",
            Self::Topic => "my-topic",
            Self::CertFile => "/path/to/cert.pem",
            Self::KeyFile => "/path/to/key.pem",
            Self::CaFile => "/path/to/ca.pem",
            Self::KeySerde | Self::ValueSerde => "string, json, bytearray",
            Self::MessageKey => "optional-key",
            Self::MessageValue => r#"{"example": "json"}"#,
        }
    }

    /// Whether the field accepts newlines.
    pub fn is_multiline(self) -> bool {
        matches!(self, Self::MessageValue)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Single editable text input.
///
/// The cursor counts characters, not bytes, so editing never splits a UTF-8
/// sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
    multiline: bool,
}

impl TextField {
    /// Empty field.
    pub fn new(multiline: bool) -> Self {
        Self { value: String::new(), cursor: 0, multiline }
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the text and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        if !self.multiline {
            self.value.retain(|c| c != '\n' && c != '\r');
        }
        self.cursor = self.char_count();
    }

    /// Clear the text.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Insert text at the cursor. Single-line fields drop line breaks.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            if (c == '\n' || c == '\r') && !self.multiline {
                continue;
            }
            self.insert_char(c);
        }
    }

    /// Apply an editing key. Returns `false` for keys that do not edit text.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => self.insert_char(c),
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.value.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    let at = self.byte_offset(self.cursor);
                    self.value.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_count(),
            _ => return false,
        }
        true
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value.char_indices().nth(chars).map_or(self.value.len(), |(i, _)| i)
    }
}

/// All fields of both views.
#[derive(Debug, Clone)]
pub struct Form {
    fields: [TextField; 9],
}

impl Form {
    /// Form populated from `settings`, with empty message fields.
    pub fn from_settings(settings: &ConnectionSettings) -> Self {
        let mut form = Self { fields: FieldId::ALL.map(|id| TextField::new(id.is_multiline())) };
        form.field_mut(FieldId::Brokers).set_value(settings.brokers_field());
        form.field_mut(FieldId::Topic).set_value(settings.topic.as_str());
        form.field_mut(FieldId::CertFile).set_value(settings.cert_path.as_str());
        form.field_mut(FieldId::KeyFile).set_value(settings.key_path.as_str());
        form.field_mut(FieldId::CaFile).set_value(settings.ca_path.as_str());
        form.field_mut(FieldId::KeySerde).set_value(settings.key_serde.as_str());
        form.field_mut(FieldId::ValueSerde).set_value(settings.value_serde.as_str());
        form
    }

    /// Field by id.
    pub fn field(&self, id: FieldId) -> &TextField {
        &self.fields[id.index()]
    }

    /// Mutable field by id.
    pub fn field_mut(&mut self, id: FieldId) -> &mut TextField {
        &mut self.fields[id.index()]
    }

    /// Snapshot the config fields into settings, recomputing `use_auth`.
    pub fn snapshot_settings(&self) -> ConnectionSettings {
        let text = |id| self.field(id).value().to_string();
        let mut settings = ConnectionSettings {
            brokers: ConnectionSettings::parse_brokers(self.field(FieldId::Brokers).value()),
            topic: text(FieldId::Topic),
            cert_path: text(FieldId::CertFile),
            key_path: text(FieldId::KeyFile),
            ca_path: text(FieldId::CaFile),
            key_serde: text(FieldId::KeySerde),
            value_serde: text(FieldId::ValueSerde),
            use_auth: false,
        };
        settings.recompute_auth();
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextField {
        let mut field = TextField::new(false);
        for c in text.chars() {
            field.handle_key(KeyInput::Char(c));
        }
        field
    }

    #[test]
    fn editing_is_char_based() {
        let mut field = typed("héllo");
        field.handle_key(KeyInput::Left);
        field.handle_key(KeyInput::Left);
        field.handle_key(KeyInput::Left);
        field.handle_key(KeyInput::Backspace);
        assert_eq!(field.value(), "hllo");
        assert_eq!(field.cursor(), 1);

        field.handle_key(KeyInput::Delete);
        assert_eq!(field.value(), "hlo");
    }

    #[test]
    fn cursor_is_clamped() {
        let mut field = typed("ab");
        field.handle_key(KeyInput::Right);
        assert_eq!(field.cursor(), 2);
        field.handle_key(KeyInput::Home);
        field.handle_key(KeyInput::Left);
        field.handle_key(KeyInput::Backspace);
        assert_eq!(field.cursor(), 0);
        assert_eq!(field.value(), "ab");
        field.handle_key(KeyInput::End);
        field.handle_key(KeyInput::Delete);
        assert_eq!(field.value(), "ab");
    }

    #[test]
    fn non_editing_keys_are_not_consumed() {
        let mut field = TextField::new(true);
        assert!(!field.handle_key(KeyInput::Tab));
        assert!(!field.handle_key(KeyInput::F(5)));
        assert!(field.is_empty());
    }

    #[test]
    fn single_line_fields_drop_newlines() {
        let mut single = TextField::new(false);
        single.insert_str("a\nb\r\nc");
        assert_eq!(single.value(), "abc");

        let mut multi = TextField::new(true);
        multi.insert_str("{\n  \"a\": 1\n}");
        assert_eq!(multi.value(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn snapshot_parses_brokers_and_derives_auth() {
        let mut form = Form::from_settings(&ConnectionSettings::default());
        form.field_mut(FieldId::Brokers).set_value(" k1:9092 , k2:9092,");
        form.field_mut(FieldId::CertFile).set_value("/c.pem");
        form.field_mut(FieldId::KeyFile).set_value("/k.pem");

        let settings = form.snapshot_settings();
        assert_eq!(settings.brokers, vec!["k1:9092", "k2:9092"]);
        assert!(!settings.use_auth);

        form.field_mut(FieldId::CaFile).set_value("/ca.pem");
        assert!(form.snapshot_settings().use_auth);
    }

    #[test]
    fn form_round_trips_settings() {
        let settings = ConnectionSettings {
            brokers: vec!["a:1".into(), "b:2".into()],
            topic: "orders".into(),
            key_serde: "string".into(),
            ..Default::default()
        };
        assert_eq!(Form::from_settings(&settings).snapshot_settings(), settings);
    }
}
