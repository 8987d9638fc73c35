//! Twilight HTTP implementation of the engine [`Transport`].

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    channel::message::MessageFlags,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
};
use twilight_util::builder::InteractionResponseDataBuilder;

use crate::transport::{
    InteractionRef, MessagePayload, MessageRef, Modal, ResponseTarget, Transport,
};

/// [`Transport`] backed by a shared twilight HTTP client.
#[derive(Clone)]
pub struct HttpTransport {
    http: Arc<Client>,
}

impl HttpTransport {
    pub fn new(http: Arc<Client>) -> Self {
        Self { http }
    }

    async fn create_response(
        &self,
        interaction: &InteractionRef,
        response: &InteractionResponse,
    ) -> anyhow::Result<()> {
        self.http
            .interaction(interaction.application_id)
            .create_response(interaction.interaction_id, &interaction.token, response)
            .await?;

        Ok(())
    }
}

fn response_data(payload: &MessagePayload) -> InteractionResponseData {
    let mut builder = InteractionResponseDataBuilder::new()
        .embeds(payload.embeds.clone())
        .components(payload.components.clone());

    if let Some(content) = payload.content.as_deref() {
        builder = builder.content(content);
    }

    builder.build()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        target: &ResponseTarget,
        payload: &MessagePayload,
    ) -> anyhow::Result<Option<MessageRef>> {
        match target {
            ResponseTarget::Channel(channel_id) => {
                let mut request = self
                    .http
                    .create_message(*channel_id)
                    .embeds(&payload.embeds)
                    .components(&payload.components);

                if let Some(content) = payload.content.as_deref() {
                    request = request.content(content);
                }

                let message = request.await?.model().await?;

                Ok(Some(MessageRef {
                    channel_id: message.channel_id,
                    message_id: message.id,
                }))
            }
            ResponseTarget::Interaction(interaction) => {
                let response = InteractionResponse {
                    kind: InteractionResponseType::ChannelMessageWithSource,
                    data: Some(response_data(payload)),
                };
                self.create_response(interaction, &response).await?;

                // The original response is only needed for later cleanup; a
                // failed lookup must not fail the send itself.
                let message = match self
                    .http
                    .interaction(interaction.application_id)
                    .response(&interaction.token)
                    .await
                {
                    Ok(response) => response.model().await.ok(),
                    Err(_) => None,
                };

                Ok(message.map(|message| MessageRef {
                    channel_id: message.channel_id,
                    message_id: message.id,
                }))
            }
            ResponseTarget::Message(_) | ResponseTarget::Original(_) => {
                anyhow::bail!("initial responses cannot target an existing message")
            }
        }
    }

    async fn update(
        &self,
        target: &ResponseTarget,
        payload: &MessagePayload,
    ) -> anyhow::Result<()> {
        match target {
            ResponseTarget::Interaction(interaction) => {
                let response = InteractionResponse {
                    kind: InteractionResponseType::UpdateMessage,
                    data: Some(response_data(payload)),
                };
                self.create_response(interaction, &response).await
            }
            ResponseTarget::Message(message) => {
                let mut request = self
                    .http
                    .update_message(message.channel_id, message.message_id)
                    .embeds(Some(&payload.embeds))
                    .components(Some(&payload.components));

                if let Some(content) = payload.content.as_deref() {
                    request = request.content(Some(content));
                }

                request.await?;
                Ok(())
            }
            ResponseTarget::Original(interaction) => {
                let client = self.http.interaction(interaction.application_id);
                let mut request = client
                    .update_response(&interaction.token)
                    .embeds(Some(&payload.embeds))
                    .components(Some(&payload.components));

                if let Some(content) = payload.content.as_deref() {
                    request = request.content(Some(content));
                }

                request.await?;
                Ok(())
            }
            ResponseTarget::Channel(_) => {
                anyhow::bail!("updates must target a message or an interaction")
            }
        }
    }

    async fn acknowledge(&self, interaction: &InteractionRef) -> anyhow::Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::DeferredUpdateMessage,
            data: None,
        };

        self.create_response(interaction, &response).await
    }

    async fn notify(&self, interaction: &InteractionRef, content: &str) -> anyhow::Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(
                InteractionResponseDataBuilder::new()
                    .content(content)
                    .flags(MessageFlags::EPHEMERAL)
                    .build(),
            ),
        };

        self.create_response(interaction, &response).await
    }

    async fn open_modal(&self, interaction: &InteractionRef, modal: &Modal) -> anyhow::Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::Modal,
            data: Some(InteractionResponseData {
                components: Some(modal.components.clone()),
                custom_id: Some(modal.custom_id.clone()),
                title: Some(modal.title.clone()),
                ..InteractionResponseData::default()
            }),
        };

        self.create_response(interaction, &response).await
    }
}
