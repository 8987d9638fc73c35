//! Pure pagination math, page building and jump-target validation.

use super::session::PageContent;

/// Position of a page while it is being rendered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageInfo {
    /// Zero-based page index.
    pub index: usize,
    pub total_pages: usize,
    /// Index of the page's first item within the full list.
    pub offset: usize,
}

/// Invalid jump-to-page input. The display text is shown to the user.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum JumpError {
    #[error("Please enter a valid page number.")]
    NotANumber,
    #[error("Page {requested} does not exist. Available pages: 1-{total}.")]
    OutOfRange { requested: u64, total: usize },
}

/// Compute the number of pages for a list; never less than one.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1)).max(1)
}

/// Return start/end item indices for a zero-based page.
pub fn page_window(total_items: usize, per_page: usize, index: usize) -> (usize, usize) {
    let safe_per_page = per_page.max(1);
    let start = index.saturating_mul(safe_per_page).min(total_items);
    let end = start.saturating_add(safe_per_page).min(total_items);
    (start, end)
}

/// Split `items` into pages and render each one.
///
/// An empty list yields exactly one page produced by `empty`.
pub fn build_pages<T>(
    items: &[T],
    per_page: usize,
    mut render: impl FnMut(&[T], PageInfo) -> PageContent,
    empty: impl FnOnce() -> PageContent,
) -> Vec<PageContent> {
    if items.is_empty() {
        return vec![empty()];
    }

    let total = total_pages(items.len(), per_page);

    (0..total)
        .map(|index| {
            let (start, end) = page_window(items.len(), per_page, index);
            render(
                &items[start..end],
                PageInfo {
                    index,
                    total_pages: total,
                    offset: start,
                },
            )
        })
        .collect()
}

/// Validate a one-based page number typed into the jump modal.
///
/// Returns the zero-based page index.
pub fn parse_jump_target(raw: &str, total_pages: usize) -> Result<usize, JumpError> {
    let requested = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| JumpError::NotANumber)?;

    let out_of_range = JumpError::OutOfRange {
        requested,
        total: total_pages,
    };

    let page = usize::try_from(requested).map_err(|_| out_of_range.clone())?;
    if page == 0 || page > total_pages {
        return Err(out_of_range);
    }

    Ok(page - 1)
}

/// Bullet-list description for a slice of display lines.
pub fn bulleted(lines: &[String]) -> String {
    format!("- {}", lines.join("\n- "))
}
