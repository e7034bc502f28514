use url::Url;

use crate::ImageHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message_id: String,
    pub sender: Sender,
    pub sent_at_ms: u64,
    pub data: MessageData,
}

/// Payload carried by a message. The image-text cell only renders the two image variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageData {
    /// Plain text, rendered by other cell kinds.
    Text(String),
    /// Caption plus an image that is already decoded locally.
    ImageText { text: String, image: ImageHandle },
    /// Caption plus a remotely hosted image that has to be fetched.
    ShareImage {
        text: String,
        thumbnail: Option<ImageHandle>,
        image_url: Url,
    },
    /// Anything else the conversation may carry.
    Other,
}

impl Message {
    pub fn new(message_id: impl Into<String>, sender: Sender, data: MessageData) -> Self {
        Self {
            message_id: message_id.into(),
            sender,
            sent_at_ms: 0,
            data,
        }
    }
}
