//! Wire protocol between [`WsStore`](super::WsStore) and `sitecms-server`.
//!
//! Messages are JSON text frames tagged by `type`. Field names use camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StorePath;

/// Messages sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Start receiving snapshots for a path. The server answers with the
    /// current value right away.
    Subscribe { path: StorePath },
    Unsubscribe { path: StorePath },
    /// Replace the value at a path.
    Write {
        #[serde(rename = "requestId")]
        request_id: u64,
        path: StorePath,
        value: Value,
        token: String,
    },
}

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full value at a path; `null` when nothing has been written.
    Snapshot { path: StorePath, value: Option<Value> },
    WriteAck {
        #[serde(rename = "requestId")]
        request_id: u64,
    },
    WriteError {
        #[serde(rename = "requestId")]
        request_id: u64,
        message: String,
    },
    SubscriptionError { path: StorePath, message: String },
}

impl ClientMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl ServerMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> StorePath {
        StorePath::parse(p).unwrap()
    }

    #[test]
    fn test_write_message_shape() {
        let msg = ClientMessage::Write {
            request_id: 7,
            path: path("site/theme"),
            value: json!({"font": "serif"}),
            token: "key".to_string(),
        };
        let encoded: Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(
            encoded,
            json!({
                "type": "write",
                "requestId": 7,
                "path": "site/theme",
                "value": {"font": "serif"},
                "token": "key"
            })
        );
    }

    #[test]
    fn test_decode_server_messages() {
        let msg = ServerMessage::decode(r#"{"type":"writeAck","requestId":3}"#).unwrap();
        assert_eq!(msg, ServerMessage::WriteAck { request_id: 3 });

        let msg =
            ServerMessage::decode(r#"{"type":"snapshot","path":"site/content","value":null}"#)
                .unwrap();
        assert_eq!(
            msg,
            ServerMessage::Snapshot {
                path: path("site/content"),
                value: None
            }
        );

        let msg = ServerMessage::decode(
            r#"{"type":"subscriptionError","path":"site/content","message":"nope"}"#,
        )
        .unwrap();
        assert!(matches!(msg, ServerMessage::SubscriptionError { .. }));
    }

    #[test]
    fn test_decode_rejects_invalid_path() {
        assert!(ClientMessage::decode(r#"{"type":"subscribe","path":"../etc"}"#).is_err());
    }
}
