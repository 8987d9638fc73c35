//! Pagination UI component builders (previous/label/next buttons, jump modal).

use twilight_model::channel::message::component::{
    ActionRow, Button, ButtonStyle, Component, TextInput, TextInputStyle,
};

use super::view::NavState;
use crate::{
    custom_id::{CustomId, PageAction},
    transport::Modal,
};

/// Custom id of the page-number text input inside the jump modal.
pub const JUMP_INPUT_ID: &str = "page";

fn nav_button(
    session_id: &str,
    action: PageAction,
    label: String,
    disabled: bool,
) -> Component {
    Component::Button(Button {
        id: None,
        custom_id: Some(CustomId::page(session_id, action).encode()),
        disabled,
        emoji: None,
        label: Some(label),
        style: ButtonStyle::Secondary,
        url: None,
        sku_id: None,
    })
}

/// Build the single navigation row for a paginated message.
///
/// Boundary buttons are disabled rather than omitted so the layout never
/// shifts between pages.
pub fn build_nav_components(session_id: &str, nav: &NavState) -> Vec<Component> {
    vec![Component::ActionRow(ActionRow {
        id: None,
        components: vec![
            nav_button(session_id, PageAction::Prev, "◀ Prev".to_owned(), !nav.has_prev),
            nav_button(session_id, PageAction::Page, nav.label.clone(), !nav.can_jump),
            nav_button(session_id, PageAction::Next, "Next ▶".to_owned(), !nav.has_next),
        ],
    })]
}

/// Build the jump-to-page modal; its submission routes back as `jump`.
#[allow(deprecated)]
pub fn build_jump_modal(session_id: &str, total_pages: usize) -> Modal {
    let page_input = Component::TextInput(TextInput {
        id: None,
        custom_id: JUMP_INPUT_ID.to_owned(),
        label: Some("Page Number".to_owned()),
        max_length: Some(6),
        min_length: Some(1),
        placeholder: Some(format!("Enter a page from 1 to {total_pages}")),
        required: Some(true),
        style: TextInputStyle::Short,
        value: None,
    });

    Modal {
        custom_id: CustomId::page(session_id, PageAction::Jump).encode(),
        title: "Jump to Page".to_owned(),
        components: vec![Component::ActionRow(ActionRow {
            id: None,
            components: vec![page_input],
        })],
    }
}
