//! Wire types for the HTTP API.

use bondly_turns::{CoupleId, Sender, TurnError};
use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request for submitting a message.
///
/// `sender` accepts any JSON value, or none, so every unrecognized role
/// surfaces as `InvalidSender` instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Conversation to post into.
    pub couple_id: CoupleId,
    /// `"player1"` or `"player2"`.
    #[serde(default)]
    pub sender: Option<Value>,
    /// Message content.
    pub text: String,
}

impl SubmitRequest {
    /// Returns the sender role as a string.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::InvalidSender`] if `sender` is missing or not a string.
    pub fn sender_role(&self) -> Result<&str, TurnError> {
        match &self.sender {
            Some(Value::String(role)) => Ok(role.as_str()),
            Some(other) => Err(TurnError::InvalidSender(other.to_string())),
            None => Err(TurnError::InvalidSender("missing".to_string())),
        }
    }
}

/// Query parameters for listing a couple's log.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Skip this many messages from the start of the log.
    pub since: Option<usize>,
}

/// Request naming a couple, for game master connect/disconnect.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct CoupleRequest {
    /// Couple to observe.
    pub couple_id: CoupleId,
}

/// Acknowledgement of a connect/disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    /// Couple the request named.
    pub couple_id: CoupleId,
    /// Whether an observer is now attached.
    pub connected: bool,
}

/// Whose turn it is for a couple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    /// Couple queried.
    pub couple_id: CoupleId,
    /// Role allowed to send next.
    pub next: Sender,
}

/// Error payload returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct ErrorBody {
    /// Error tag, e.g. `OutOfTurn`.
    pub kind: String,
    /// Human-readable detail.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> SubmitRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_string_sender_passes_through() {
        let req = request(json!({ "coupleId": "C1", "sender": "player3", "text": "hi" }));
        assert_eq!(req.sender_role().unwrap(), "player3");
    }

    #[test]
    fn test_missing_sender_is_invalid() {
        let req = request(json!({ "coupleId": "C1", "text": "hi" }));
        assert!(matches!(req.sender_role(), Err(TurnError::InvalidSender(ref s)) if s == "missing"));
    }

    #[test]
    fn test_non_string_sender_is_invalid() {
        for sender in [json!(null), json!(3), json!(["player1"])] {
            let req = request(json!({ "coupleId": "C1", "sender": sender, "text": "hi" }));
            assert!(matches!(req.sender_role(), Err(TurnError::InvalidSender(_))));
        }
    }
}
