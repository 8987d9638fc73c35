use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

use crate::custom_id::{ConfirmAction, CustomId};

/// Build the confirm/cancel row; both buttons carry the same confirmation id.
pub fn build_confirmation_components(confirmation_id: &str) -> Vec<Component> {
    vec![Component::ActionRow(ActionRow {
        id: None,
        components: vec![
            Component::Button(Button {
                id: None,
                custom_id: Some(CustomId::confirm(confirmation_id, ConfirmAction::Confirm).encode()),
                disabled: false,
                emoji: None,
                label: Some("Confirm".to_owned()),
                style: ButtonStyle::Danger,
                url: None,
                sku_id: None,
            }),
            Component::Button(Button {
                id: None,
                custom_id: Some(CustomId::confirm(confirmation_id, ConfirmAction::Cancel).encode()),
                disabled: false,
                emoji: None,
                label: Some("Cancel".to_owned()),
                style: ButtonStyle::Secondary,
                url: None,
                sku_id: None,
            }),
        ],
    })]
}
