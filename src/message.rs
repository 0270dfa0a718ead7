//! Rendering a feed item as chat message text.

use crate::feed::FeedItem;
use crate::telegram::MAX_MESSAGE_LEN;
use crate::util::{clean_text, truncate_chars};

/// Presentation options for posted items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFormat {
    /// Put the item title on its own line after the category tag.
    pub include_title: bool,
}

/// Builds the message text for one item.
///
/// Lines, each only when present: `#category`, title (if enabled),
/// description, link. The description is cleaned of HTML and is the part
/// that gets shortened when the text would exceed Telegram's 4096-character
/// limit. The link is never cut.
pub fn format_message(item: &FeedItem, format: &MessageFormat) -> String {
    let mut head: Vec<String> = Vec::with_capacity(2);
    if let Some(tag) = item.category.as_deref().and_then(hashtag) {
        head.push(tag);
    }
    if format.include_title {
        if let Some(title) = item.title.as_deref().map(clean_text).filter(|t| !t.is_empty()) {
            head.push(title);
        }
    }

    let description = item
        .description
        .as_deref()
        .map(clean_text)
        .filter(|d| !d.is_empty());

    let fixed_len: usize = head.iter().map(|l| l.chars().count() + 1).sum::<usize>()
        + item.link.chars().count();

    let mut lines = head;
    if let Some(description) = description {
        // One newline separates the description from the link
        let budget = MAX_MESSAGE_LEN.saturating_sub(fixed_len + 1);
        if budget > 0 {
            lines.push(truncate_chars(&description, budget).into_owned());
        }
    }
    lines.push(item.link.clone());

    let text = lines.join("\n");
    truncate_chars(&text, MAX_MESSAGE_LEN).into_owned()
}

/// `#Category` as a single Telegram hashtag.
///
/// A hashtag ends at the first character that is not a letter, digit or `_`,
/// so every run of such characters inside the category becomes one `_`.
/// Leading `#` is dropped so an already-tagged category is not doubled.
fn hashtag(category: &str) -> Option<String> {
    let mut tag = String::with_capacity(category.len());
    for c in category.trim().trim_start_matches('#').chars() {
        if c.is_alphanumeric() || c == '_' {
            tag.push(c);
        } else if !tag.is_empty() && !tag.ends_with('_') {
            tag.push('_');
        }
    }
    let tag = tag.trim_end_matches('_');
    if tag.is_empty() {
        return None;
    }
    Some(format!("#{tag}"))
}
