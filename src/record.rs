//! Task records: ordered field maps as read from the database.

use std::fmt;

/// Field holding the task identifier.
pub const UUID: &str = "uuid";
/// Field holding the tag list.
pub const TAGS: &str = "tags";
/// Field holding the start timestamp of an active task.
pub const START: &str = "start";
/// Field holding the urgency merged from the export.
pub const URGENCY: &str = "urgency";

/// A field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain text, as stored in the database.
    Text(String),
    /// The exploded `tags` field.
    Tags(Vec<String>),
    /// A number computed by the task tool.
    Number(f64),
}

impl Value {
    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Tags(_) => "tag list",
            Self::Number(_) => "number",
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Tags(tags) => f.write_str(&tags.join(",")),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// An ordered mapping of field names to values.
///
/// Fields keep the order they were read in. Unknown fields are kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a text field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    /// The task identifier, if any.
    pub fn uuid(&self) -> Option<&str> {
        self.text(UUID).filter(|uuid| !uuid.is_empty())
    }

    /// The tag list; empty when the record has no tags.
    pub fn tags(&self) -> &[String] {
        match self.get(TAGS) {
            Some(Value::Tags(tags)) => tags,
            _ => &[],
        }
    }

    /// The merged urgency, if any.
    pub fn urgency(&self) -> Option<f64> {
        match self.get(URGENCY) {
            Some(Value::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Whether the field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a field, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Iterate over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<String>> for Value {
    fn from(tags: Vec<String>) -> Self {
        Self::Tags(tags)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields() {
        let record = Record::new();
        assert_eq!(record.get("project"), None);
        assert_eq!(record.uuid(), None);
        assert!(record.tags().is_empty());
        assert_eq!(record.urgency(), None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record: Record = [("uuid", "a"), ("status", "pending")].into_iter().collect();
        record.insert("uuid", "b");
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["uuid", "status"]);
        assert_eq!(record.uuid(), Some("b"));
    }

    #[test]
    fn test_empty_uuid_is_absent() {
        let record: Record = [("uuid", "")].into_iter().collect();
        assert_eq!(record.uuid(), None);
    }

    #[test]
    fn test_typed_accessors() {
        let mut record = Record::new();
        record.insert(TAGS, vec!["a".to_string(), "b".to_string()]);
        record.insert(URGENCY, 4.5);
        assert_eq!(record.tags(), ["a", "b"]);
        assert_eq!(record.urgency(), Some(4.5));
        assert_eq!(record.text(TAGS), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::Tags(vec!["a".into(), "b".into()]).to_string(), "a,b");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
    }
}
