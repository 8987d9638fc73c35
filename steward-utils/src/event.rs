//! Inbound component and modal interactions, reduced to what the session
//! engine needs.

use twilight_model::{
    application::interaction::{InteractionData, modal::ModalInteractionComponent},
    gateway::payload::incoming::InteractionCreate,
};

use crate::transport::{InteractionRef, MessageRef};

/// What kind of component interaction arrived.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ComponentKind {
    /// A message component (button) was clicked.
    Button,
    /// A modal was submitted; holds `(custom_id, value)` of each text input.
    ModalSubmit { fields: Vec<(String, String)> },
}

/// A button click or modal submission addressed by custom id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentEvent {
    pub interaction: InteractionRef,
    pub custom_id: String,
    /// Acting user; `None` when Discord did not attach one.
    pub user_id: Option<u64>,
    pub guild_id: Option<u64>,
    /// Message the component belongs to, when known.
    pub message: Option<MessageRef>,
    pub kind: ComponentKind,
}

impl ComponentEvent {
    /// Extract a component event from a gateway interaction.
    ///
    /// Returns `None` for interactions that are neither component clicks nor
    /// modal submissions.
    pub fn from_interaction(interaction: &InteractionCreate) -> Option<Self> {
        let (custom_id, kind) = match interaction.data.as_ref()? {
            InteractionData::MessageComponent(data) => {
                (data.custom_id.clone(), ComponentKind::Button)
            }
            InteractionData::ModalSubmit(data) => {
                let mut fields = Vec::new();
                collect_text_inputs(&data.components, &mut fields);
                (data.custom_id.clone(), ComponentKind::ModalSubmit { fields })
            }
            _ => return None,
        };

        Some(Self {
            interaction: InteractionRef {
                application_id: interaction.application_id,
                interaction_id: interaction.id,
                token: interaction.token.clone(),
            },
            custom_id,
            user_id: interaction.author_id().map(|id| id.get()),
            guild_id: interaction.guild_id.map(|id| id.get()),
            message: interaction.message.as_ref().map(|message| MessageRef {
                channel_id: message.channel_id,
                message_id: message.id,
            }),
            kind,
        })
    }

    /// Value of a submitted modal text input.
    pub fn field(&self, custom_id: &str) -> Option<&str> {
        let ComponentKind::ModalSubmit { fields } = &self.kind else {
            return None;
        };

        fields
            .iter()
            .find(|(id, _)| id == custom_id)
            .map(|(_, value)| value.as_str())
    }

    pub const fn is_modal_submit(&self) -> bool {
        matches!(self.kind, ComponentKind::ModalSubmit { .. })
    }
}

fn collect_text_inputs(components: &[ModalInteractionComponent], out: &mut Vec<(String, String)>) {
    for component in components {
        match component {
            ModalInteractionComponent::ActionRow(row) => collect_text_inputs(&row.components, out),
            ModalInteractionComponent::TextInput(text_input) => {
                out.push((text_input.custom_id.clone(), text_input.value.clone()));
            }
            _ => {}
        }
    }
}
