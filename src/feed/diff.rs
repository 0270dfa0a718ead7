//! Working out which feed items are new since the last run.

use crate::feed::types::{Feed, FeedItem};
use crate::state::Marker;

impl Feed {
    /// Drops the item whose link equals `marker_link` and everything after it.
    ///
    /// The feed is newest-first, so what remains is the items published after
    /// the marker. If no item matches, the feed is left unchanged and every
    /// item counts as new. Stops scanning at the first match.
    pub fn remove_older_than(&mut self, marker_link: &str) {
        self.truncate_at(|link| link == marker_link);
    }

    /// Same as [`Feed::remove_older_than`], for a decoded marker.
    ///
    /// An empty marker matches nothing.
    pub fn remove_seen(&mut self, marker: &Marker) {
        self.truncate_at(|link| marker.matches(link));
    }

    /// Reverses the items in place so they can be posted oldest first.
    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    /// Items newer than `marker`, in posting order (oldest first).
    pub fn pending_since(mut self, marker: &Marker) -> Vec<FeedItem> {
        self.remove_seen(marker);
        self.reverse();
        self.items
    }

    fn truncate_at(&mut self, is_marker: impl Fn(&str) -> bool) {
        if let Some(pos) = self.items.iter().position(|item| is_marker(&item.link)) {
            self.items.truncate(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn feed(links: &[&str]) -> Feed {
        Feed::new(links.iter().map(|l| FeedItem::with_link(*l)).collect())
    }

    fn links(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.link.as_str()).collect()
    }

    #[test]
    fn test_remove_older_than_truncates_at_marker() {
        let mut f = feed(&["example.com/1", "example.com/2", "example.com/3"]);
        f.remove_older_than("example.com/3");
        assert_eq!(f, feed(&["example.com/1", "example.com/2"]));
    }

    #[test]
    fn test_remove_older_than_marker_first_leaves_nothing() {
        let mut f = feed(&["a", "b", "c"]);
        f.remove_older_than("a");
        assert!(f.is_empty());
    }

    #[test]
    fn test_remove_older_than_missing_marker_keeps_all() {
        let mut f = feed(&["a", "b", "c"]);
        f.remove_older_than("zzz");
        assert_eq!(f, feed(&["a", "b", "c"]));
    }

    #[test]
    fn test_remove_older_than_stops_at_first_match() {
        let mut f = feed(&["a", "b", "a", "c"]);
        f.remove_older_than("a");
        assert!(f.is_empty());

        let mut f = feed(&["x", "b", "y", "b"]);
        f.remove_older_than("b");
        assert_eq!(f, feed(&["x"]));
    }

    #[test]
    fn test_reverse() {
        let mut f = feed(&["example.com/1", "example.com/2", "example.com/3"]);
        f.reverse();
        assert_eq!(f, feed(&["example.com/3", "example.com/2", "example.com/1"]));
    }

    #[test]
    fn test_reverse_empty_and_single() {
        let mut f = feed(&[]);
        f.reverse();
        assert!(f.is_empty());

        let mut f = feed(&["only"]);
        f.reverse();
        assert_eq!(f, feed(&["only"]));
    }

    #[test]
    fn test_pending_since_marker() {
        let pending = feed(&["A", "B", "C"]).pending_since(&Marker::decode("C"));
        assert_eq!(links(&pending), vec!["B", "A"]);
    }

    #[test]
    fn test_pending_since_no_marker_is_everything_oldest_first() {
        let pending = feed(&["A", "B", "C"]).pending_since(&Marker::decode(""));
        assert_eq!(links(&pending), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_pending_since_newest_marker_is_nothing() {
        let pending = feed(&["A", "B", "C"]).pending_since(&Marker::decode("A"));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_pending_since_digest_marker() {
        let long = format!("https://example.com/{}", "x".repeat(400));
        let f = feed(&["new", long.as_str(), "old"]);
        let marker = Marker::decode(&Marker::encode(&long));
        assert_eq!(links(&f.pending_since(&marker)), vec!["new"]);
    }

    fn distinct_links() -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set("[a-z]{1,8}", 0..24).prop_map(|s| s.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_marker_at_index_gives_prefix(links in distinct_links(), idx in any::<prop::sample::Index>()) {
            prop_assume!(!links.is_empty());
            let i = idx.index(links.len());
            let mut f = Feed::new(links.iter().map(FeedItem::with_link).collect());
            f.remove_older_than(&links[i]);
            prop_assert_eq!(f.len(), i);
            prop_assert!(f.links().eq(links[..i].iter().map(String::as_str)));
        }

        #[test]
        fn prop_absent_marker_is_identity(links in distinct_links()) {
            let original = Feed::new(links.iter().map(FeedItem::with_link).collect());
            let mut f = original.clone();
            // Generated links are lowercase letters only
            f.remove_older_than("NOT-PRESENT");
            prop_assert_eq!(f, original);
        }

        #[test]
        fn prop_reverse_twice_is_identity(links in prop::collection::vec("[a-z]{0,6}", 0..32)) {
            let original = Feed::new(links.iter().map(FeedItem::with_link).collect());
            let mut f = original.clone();
            f.reverse();
            f.reverse();
            prop_assert_eq!(f, original);
        }

        #[test]
        fn prop_reverse_keeps_odd_middle(links in prop::collection::vec("[a-z]{0,6}", 0..16)) {
            let mut links = links;
            if links.len() % 2 == 0 {
                links.push("mid".to_string());
            }
            let mid = links.len() / 2;
            let mut f = Feed::new(links.iter().map(FeedItem::with_link).collect());
            f.reverse();
            prop_assert_eq!(&f.items()[mid].link, &links[mid]);
        }
    }
}
