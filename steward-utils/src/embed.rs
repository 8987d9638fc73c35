use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

use crate::pagination::PageInfo;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_54_30;

/// Build one page of a paginated listing with consistent styling.
///
/// The footer shows `Page x/y` only when there is more than one page, with
/// `footer_note` appended after a bullet.
pub fn build_page_embed(
    title: &str,
    description: impl Into<String>,
    page: PageInfo,
    footer_note: Option<&str>,
) -> anyhow::Result<Embed> {
    let footer_text = page_footer(page.index + 1, page.total_pages, footer_note);

    let builder = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    let embed = if footer_text.is_empty() {
        builder.validate()?.build()
    } else {
        let footer = EmbedFooterBuilder::new(footer_text).build();
        builder.footer(footer).validate()?.build()
    };

    Ok(embed)
}

fn page_footer(page: usize, total_pages: usize, footer_note: Option<&str>) -> String {
    let note = footer_note.filter(|note| !note.is_empty());

    match (total_pages > 1, note) {
        (true, Some(note)) => format!("Page {page}/{total_pages} • {note}"),
        (true, None) => format!("Page {page}/{total_pages}"),
        (false, Some(note)) => note.to_owned(),
        (false, None) => String::new(),
    }
}
