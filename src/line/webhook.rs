use serde::Deserialize;

use crate::error::{BotError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub reply_token: Option<String>,
    pub source: Option<Source>,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
}

/// A message event with the fields the bot needs pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage<'a> {
    pub user_id: &'a str,
    pub reply_token: &'a str,
    /// `None` for stickers, images and other non-text messages.
    pub text: Option<&'a str>,
}

impl Event {
    pub fn is_message(&self) -> bool {
        self.kind == "message"
    }

    /// Fails when a message event lacks its sender or reply token.
    pub fn incoming_message(&self) -> Result<IncomingMessage<'_>> {
        let user_id = self
            .source
            .as_ref()
            .and_then(|source| source.user_id.as_deref())
            .ok_or_else(|| BotError::InvalidFormat("message event without source.userId".into()))?;
        let reply_token = self
            .reply_token
            .as_deref()
            .ok_or_else(|| BotError::InvalidFormat("message event without replyToken".into()))?;
        let message = self
            .message
            .as_ref()
            .ok_or_else(|| BotError::InvalidFormat("message event without message".into()))?;

        let text = match message.kind.as_deref() {
            Some("text") | None => message.text.as_deref(),
            Some(_) => None,
        };

        Ok(IncomingMessage {
            user_id,
            reply_token,
            text,
        })
    }
}

pub fn parse_body(body: &[u8]) -> Result<WebhookBody> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_message_event() {
        let body = br#"{
            "destination": "Uabc",
            "events": [{
                "type": "message",
                "replyToken": "r1",
                "source": { "type": "user", "userId": "u1" },
                "message": { "type": "text", "id": "1", "text": "hello" }
            }]
        }"#;

        let parsed = parse_body(body).unwrap();
        let message = parsed.events[0].incoming_message().unwrap();
        assert_eq!(
            message,
            IncomingMessage {
                user_id: "u1",
                reply_token: "r1",
                text: Some("hello"),
            }
        );
    }

    #[test]
    fn sticker_has_no_text() {
        let body = br#"{"events": [{
            "type": "message",
            "replyToken": "r1",
            "source": { "userId": "u1" },
            "message": { "type": "sticker", "packageId": "1", "stickerId": "2" }
        }]}"#;

        let parsed = parse_body(body).unwrap();
        assert_eq!(parsed.events[0].incoming_message().unwrap().text, None);
    }

    #[test]
    fn missing_sender_is_an_error() {
        let body = br#"{"events": [{
            "type": "message",
            "replyToken": "r1",
            "source": { "type": "group", "groupId": "g1" },
            "message": { "type": "text", "text": "hi" }
        }]}"#;

        let parsed = parse_body(body).unwrap();
        assert!(matches!(
            parsed.events[0].incoming_message(),
            Err(BotError::InvalidFormat(_))
        ));
    }

    #[test]
    fn body_without_events_is_rejected() {
        assert!(parse_body(b"{}").is_err());
        assert!(parse_body(b"not json").is_err());
    }
}
