//! Marker codec for the chat description.
//!
//! The bot has no database. The link of the last item it started posting is
//! written into the chat description and read back at the start of the next
//! run. Telegram caps descriptions at 255 characters, so longer links are
//! stored as a SHA-256 digest and matched by hashing candidates.

use sha2::{Digest, Sha256};

/// Maximum length of a Telegram chat description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

const HASH_PREFIX: &str = "sha256:";

/// The last posted (or attempted) item, as recovered from the chat description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// No usable description: every item in the feed is new.
    Empty,
    /// The description holds a link verbatim.
    Link(String),
    /// The description holds the hex digest of a link that was too long.
    Digest(String),
}

impl Marker {
    /// Decodes a chat description.
    ///
    /// Empty or whitespace-only descriptions mean no marker has been set.
    pub fn decode(description: &str) -> Self {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Marker::Empty;
        }
        match trimmed.strip_prefix(HASH_PREFIX) {
            Some(hex) if is_sha256_hex(hex) => Marker::Digest(hex.to_ascii_lowercase()),
            _ => Marker::Link(trimmed.to_string()),
        }
    }

    /// Encodes a link into a description that fits Telegram's limit.
    pub fn encode(link: &str) -> String {
        if link.chars().count() <= MAX_DESCRIPTION_LEN {
            link.to_string()
        } else {
            format!("{}{}", HASH_PREFIX, digest_hex(link))
        }
    }

    /// Returns true if `link` is the item this marker points at.
    pub fn matches(&self, link: &str) -> bool {
        match self {
            Marker::Empty => false,
            Marker::Link(stored) => stored == link,
            Marker::Digest(hex) => {
                link.chars().count() > MAX_DESCRIPTION_LEN && *hex == digest_hex(link)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Marker::Empty)
    }
}

fn digest_hex(link: &str) -> String {
    format!("{:x}", Sha256::digest(link.as_bytes()))
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}
