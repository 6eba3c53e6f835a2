//! Chat platform REST client implementation
//!
//! Implements the message gateway against a Discord-compatible REST API.
//! Pages are translated into one embed plus component rows; navigation
//! links become link-style buttons whose URLs are message permalinks.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ButtonStyle, ChannelId, Control, MessageId, Page};
use crate::domain::ports::{MessageGateway, SentMessage};
use crate::error::MessagingError;

/// Buttons per component row
const ROW_CAPACITY: usize = 5;

/// Implementation of the chat platform REST client
pub struct ChatClientImpl {
    http: Client,
    base_url: String,
    link_base: String,
    bot_token: String,
}

impl ChatClientImpl {
    pub fn new(base_url: String, link_base: String, bot_token: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            link_base: link_base.trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    /// Permalink to a message, used for navigation buttons
    fn message_url(&self, channel: &ChannelId, id: &MessageId) -> String {
        format!("{}/{}/{}", self.link_base, channel, id)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, MessagingError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| MessagingError::Deserialization(e.to_string()))
        } else if status.as_u16() == 401 {
            Err(MessagingError::Unauthorized)
        } else if status.as_u16() == 429 {
            Err(MessagingError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(MessagingError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn handle_empty_response(
        &self,
        response: reqwest::Response,
    ) -> Result<(), MessagingError> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 401 {
            Err(MessagingError::Unauthorized)
        } else if status.as_u16() == 429 {
            Err(MessagingError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(MessagingError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn payload(&self, channel: &ChannelId, page: &Page) -> MessagePayload {
        let embed = Embed {
            title: page.title.clone(),
            description: page.description.clone(),
            fields: page
                .fields
                .iter()
                .map(|f| EmbedField {
                    name: f.name.clone(),
                    value: f.value.clone(),
                    inline: f.inline,
                })
                .collect(),
        };

        let mut rows: Vec<ComponentRow> = Vec::new();
        let mut buttons: Vec<Component> = Vec::new();
        for control in &page.controls {
            match control {
                Control::Button {
                    custom_id,
                    label,
                    style,
                } => buttons.push(Component::button(custom_id, label, *style)),
                Control::NavLink { label, target } => {
                    buttons.push(Component::link(label, self.message_url(channel, target)))
                }
                Control::Select {
                    custom_id,
                    placeholder,
                    options,
                    min_values,
                    max_values,
                    disabled,
                } => {
                    // selects occupy a whole row of their own
                    rows.push(ComponentRow::single(Component::Select {
                        kind: 3,
                        custom_id: custom_id.clone(),
                        placeholder: placeholder.clone(),
                        min_values: *min_values,
                        max_values: *max_values,
                        disabled: *disabled,
                        options: options
                            .iter()
                            .map(|o| SelectOptionPayload {
                                label: o.label.clone(),
                                value: o.value.clone(),
                                description: o.description.clone(),
                            })
                            .collect(),
                    }));
                }
            }
        }
        for chunk in buttons.chunks(ROW_CAPACITY) {
            rows.push(ComponentRow {
                kind: 1,
                components: chunk.to_vec(),
            });
        }

        MessagePayload {
            embeds: vec![embed],
            components: rows,
        }
    }
}

/// Wire types for the chat REST API

#[derive(Debug, Clone, Serialize)]
struct MessagePayload {
    embeds: Vec<Embed>,
    components: Vec<ComponentRow>,
}

#[derive(Debug, Clone, Serialize)]
struct Embed {
    title: String,
    description: String,
    fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Debug, Clone, Serialize)]
struct ComponentRow {
    #[serde(rename = "type")]
    kind: u8,
    components: Vec<Component>,
}

impl ComponentRow {
    fn single(component: Component) -> Self {
        Self {
            kind: 1,
            components: vec![component],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum Component {
    Button {
        #[serde(rename = "type")]
        kind: u8,
        style: u8,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        custom_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Select {
        #[serde(rename = "type")]
        kind: u8,
        custom_id: String,
        placeholder: String,
        min_values: u8,
        max_values: u8,
        disabled: bool,
        options: Vec<SelectOptionPayload>,
    },
}

#[derive(Debug, Clone, Serialize)]
struct SelectOptionPayload {
    label: String,
    value: String,
    description: String,
}

impl Component {
    fn button(custom_id: &str, label: &str, style: ButtonStyle) -> Self {
        let style = match style {
            ButtonStyle::Primary => 1,
            ButtonStyle::Secondary => 2,
            ButtonStyle::Danger => 4,
        };
        Component::Button {
            kind: 2,
            style,
            label: label.to_string(),
            custom_id: Some(custom_id.to_string()),
            url: None,
        }
    }

    fn link(label: &str, url: String) -> Self {
        Component::Button {
            kind: 2,
            style: 5,
            label: label.to_string(),
            custom_id: None,
            url: Some(url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    id: String,
}

fn map_message_not_found<T>(
    result: Result<T, MessagingError>,
    id: &MessageId,
) -> Result<T, MessagingError> {
    match result {
        Err(MessagingError::Api { status: 404, .. }) => {
            Err(MessagingError::MessageNotFound(id.to_string()))
        }
        other => other,
    }
}

#[async_trait]
impl MessageGateway for ChatClientImpl {
    async fn resolve_channel(&self, channel: &ChannelId) -> Result<ChannelId, MessagingError> {
        let response = self
            .http
            .get(self.api_url(&format!("/channels/{}", channel)))
            .header("Authorization", self.auth())
            .send()
            .await?;

        match self.handle_response::<ChannelResponse>(response).await {
            Ok(resolved) => Ok(ChannelId(resolved.id)),
            Err(MessagingError::Api { status: 404, .. }) => {
                Err(MessagingError::ChannelNotFound(channel.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn create_message(
        &self,
        channel: &ChannelId,
        page: &Page,
    ) -> Result<MessageId, MessagingError> {
        let response = self
            .http
            .post(self.api_url(&format!("/channels/{}/messages", channel)))
            .header("Authorization", self.auth())
            .json(&self.payload(channel, page))
            .send()
            .await?;

        let message: MessageResponse = self.handle_response(response).await?;
        Ok(MessageId(message.id))
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        id: &MessageId,
        page: &Page,
    ) -> Result<(), MessagingError> {
        let response = self
            .http
            .patch(self.api_url(&format!("/channels/{}/messages/{}", channel, id)))
            .header("Authorization", self.auth())
            .json(&self.payload(channel, page))
            .send()
            .await?;

        map_message_not_found(self.handle_empty_response(response).await, id)
    }

    async fn delete_message(
        &self,
        channel: &ChannelId,
        id: &MessageId,
    ) -> Result<(), MessagingError> {
        let response = self
            .http
            .delete(self.api_url(&format!("/channels/{}/messages/{}", channel, id)))
            .header("Authorization", self.auth())
            .send()
            .await?;

        map_message_not_found(self.handle_empty_response(response).await, id)
    }

    async fn fetch_message(
        &self,
        channel: &ChannelId,
        id: &MessageId,
    ) -> Result<SentMessage, MessagingError> {
        let response = self
            .http
            .get(self.api_url(&format!("/channels/{}/messages/{}", channel, id)))
            .header("Authorization", self.auth())
            .send()
            .await?;

        let message: MessageResponse =
            map_message_not_found(self.handle_response(response).await, id)?;
        Ok(SentMessage {
            id: MessageId(message.id),
            channel: ChannelId(message.channel_id),
        })
    }

    async fn pin_message(&self, channel: &ChannelId, id: &MessageId) -> Result<(), MessagingError> {
        let response = self
            .http
            .put(self.api_url(&format!("/channels/{}/pins/{}", channel, id)))
            .header("Authorization", self.auth())
            .send()
            .await?;

        map_message_not_found(self.handle_empty_response(response).await, id)
    }
}
