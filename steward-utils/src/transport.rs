//! Outbound boundary of the session engine.
//!
//! The engine renders payloads and hands them to a [`Transport`]; it never
//! talks to Discord directly.

use async_trait::async_trait;
use twilight_model::{
    channel::message::{component::Component, embed::Embed},
    id::{
        Id,
        marker::{ApplicationMarker, ChannelMarker, InteractionMarker, MessageMarker},
    },
};

/// Location of an already-sent message.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MessageRef {
    pub channel_id: Id<ChannelMarker>,
    pub message_id: Id<MessageMarker>,
}

/// Handle for answering a single interaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InteractionRef {
    pub application_id: Id<ApplicationMarker>,
    pub interaction_id: Id<InteractionMarker>,
    pub token: String,
}

/// Where a payload is delivered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponseTarget {
    /// Post a new message in a channel.
    Channel(Id<ChannelMarker>),
    /// Edit an existing message outside of any interaction.
    Message(MessageRef),
    /// Answer an interaction (new message on send, in-place edit on update).
    Interaction(InteractionRef),
    /// Edit the original response of an interaction that was already
    /// acknowledged.
    Original(InteractionRef),
}

/// Renderable message body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessagePayload {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub components: Vec<Component>,
}

impl MessagePayload {
    /// Plain text payload without embeds or components.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Same body with its interactive components removed.
    pub fn without_components(mut self) -> Self {
        self.components.clear();
        self
    }
}

/// A modal dialog opened in response to a component interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Modal {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<Component>,
}

/// Capability to deliver rendered payloads.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver the first render of a session. Returns the created message
    /// when its location is known.
    async fn send(
        &self,
        target: &ResponseTarget,
        payload: &MessagePayload,
    ) -> anyhow::Result<Option<MessageRef>>;

    /// Replace a previously delivered message in place.
    async fn update(&self, target: &ResponseTarget, payload: &MessagePayload)
    -> anyhow::Result<()>;

    /// Acknowledge a component interaction without changing its message yet;
    /// the message is edited later through [`ResponseTarget::Original`].
    async fn acknowledge(&self, interaction: &InteractionRef) -> anyhow::Result<()>;

    /// Answer an interaction with an ephemeral text notice.
    async fn notify(&self, interaction: &InteractionRef, content: &str) -> anyhow::Result<()>;

    /// Answer an interaction by opening a modal.
    async fn open_modal(&self, interaction: &InteractionRef, modal: &Modal) -> anyhow::Result<()>;
}
