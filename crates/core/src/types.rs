use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Key under which the derived subscriber count is serialized.
pub const SUBSCRIBER_COUNT_KEY: &str = "subscriberCount";

/// Store-assigned identifier. Serialized exactly as the store returned it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId::Int(value.into())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: RecordId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Channel {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }
}

/// A channel plus its subscriber count. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedChannel {
    #[serde(flatten)]
    pub channel: Channel,
    #[serde(rename = "subscriberCount")]
    pub subscriber_count: u64,
}

impl EnrichedChannel {
    pub fn new(mut channel: Channel, subscriber_count: u64) -> Self {
        // the derived count wins over any stored column of the same name
        channel.attributes.retain(|key, _| key != SUBSCRIBER_COUNT_KEY);
        Self {
            channel,
            subscriber_count,
        }
    }
}

/// A published article as stored. `created_at` stays in `attributes` in
/// whatever form the store returned it; ordering is done by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: RecordId,
    pub published: bool,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Article {
    pub fn created_at(&self) -> Option<&Value> {
        self.attributes.get("created_at")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_keeps_store_attributes() {
        let channel: Channel = serde_json::from_value(json!({
            "id": 7,
            "name": "Rust Weekly",
            "description": null
        }))
        .unwrap();

        assert_eq!(channel.id, RecordId::Int(7));
        assert_eq!(channel.attributes["name"], "Rust Weekly");
        assert!(channel.attributes["description"].is_null());
    }

    #[test]
    fn test_channel_with_text_id() {
        let channel: Channel = serde_json::from_value(json!({
            "id": "0b6f7a8e-5c1d-4d8e-9a55-0c9f0f3b2a11",
            "name": "Ops"
        }))
        .unwrap();

        assert_eq!(
            channel.id,
            RecordId::Text("0b6f7a8e-5c1d-4d8e-9a55-0c9f0f3b2a11".to_string())
        );
        assert_eq!(channel.id.to_string(), "0b6f7a8e-5c1d-4d8e-9a55-0c9f0f3b2a11");
    }

    #[test]
    fn test_channel_without_id_is_rejected() {
        let result = serde_json::from_value::<Channel>(json!({ "name": "orphan" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_enriched_channel_flattens_attributes() {
        let mut channel = Channel::new(1);
        channel
            .attributes
            .insert("name".to_string(), json!("General"));

        let value = serde_json::to_value(EnrichedChannel::new(channel, 5)).unwrap();

        assert_eq!(value, json!({ "id": 1, "name": "General", "subscriberCount": 5 }));
    }

    #[test]
    fn test_enriched_channel_overrides_stored_count() {
        let mut channel = Channel::new(3);
        channel
            .attributes
            .insert(SUBSCRIBER_COUNT_KEY.to_string(), json!(999));

        let json = serde_json::to_string(&EnrichedChannel::new(channel, 2)).unwrap();

        assert_eq!(json.matches("subscriberCount").count(), 1);
        assert!(json.contains("\"subscriberCount\":2"));
    }

    #[test]
    fn test_article_deserialization() {
        let article: Article = serde_json::from_value(json!({
            "id": 10,
            "title": "Launch notes",
            "published": true,
            "created_at": "2024-03-01T12:30:00.000+00:00"
        }))
        .unwrap();

        assert!(article.published);
        assert_eq!(
            article.created_at(),
            Some(&json!("2024-03-01T12:30:00.000+00:00"))
        );
        assert_eq!(article.attributes["title"], "Launch notes");
        assert!(!article.attributes.contains_key("published"));
    }

    #[test]
    fn test_article_timestamp_passes_through_unchanged() {
        for created_at in [
            json!("2024-03-01T12:30:00"),
            json!("2024-03-01T12:30:00.123456+00:00"),
            Value::Null,
        ] {
            let row = json!({ "id": 4, "published": true, "created_at": created_at });

            let article: Article = serde_json::from_value(row.clone()).unwrap();

            assert_eq!(serde_json::to_value(&article).unwrap(), row);
        }
    }

    #[test]
    fn test_attributes_keep_store_column_order() {
        let channel: Channel = serde_json::from_str(
            r#"{"id":1,"slug":"general","name":"General","archived":false}"#,
        )
        .unwrap();

        let json = serde_json::to_string(&EnrichedChannel::new(channel, 2)).unwrap();

        assert_eq!(
            json,
            r#"{"id":1,"slug":"general","name":"General","archived":false,"subscriberCount":2}"#
        );
    }
}
