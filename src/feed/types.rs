/// A single news item taken from the feed.
///
/// The link is the item's identity: it is what gets stored as the marker
/// and compared on the next run. Everything else is presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub link: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl FeedItem {
    /// Creates an item with only a link, as used by tests and the diff logic.
    pub fn with_link(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
            description: None,
            category: None,
        }
    }
}

/// Items of one feed document, newest first as the source delivered them.
///
/// Source order is assumed to be newest-first; nothing here checks dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub(crate) items: Vec<FeedItem>,
}

impl Feed {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.link.as_str())
    }
}
