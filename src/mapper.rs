//! Mapping parsed feeds to records.
//!
//! Field extraction and record construction are separate steps:
//! [`extract_fields`] knows the shape of an RSS `<item>`, the construction
//! function passed to [`map_items`] only ever sees [`ItemFields`].

use crate::models::{Article, ItemFields};
use crate::parser::{XmlDocument, XmlElement};

/// A direct child wins over a deeper element of the same local name, so
/// `<media:content><media:title>` never shadows the item's own `<title>`.
fn first_text(item: &XmlElement, name: &str) -> String {
    item.child(name)
        .or_else(|| item.find(name))
        .map(XmlElement::text)
        .unwrap_or_default()
}

/// Pull the text of the `title`, `description`, `pubDate` and `link` elements
/// out of an item: the first direct child with that name, else the first
/// descendant. Missing elements give empty strings.
pub fn extract_fields(item: &XmlElement) -> ItemFields {
    ItemFields {
        title: first_text(item, "title"),
        description: first_text(item, "description"),
        pub_date: first_text(item, "pubDate"),
        link: first_text(item, "link"),
    }
}

/// Build one record per `item` element of `doc`, in document order.
pub fn map_items<T, F>(doc: &XmlDocument, mut build: F) -> Vec<T>
where
    F: FnMut(ItemFields) -> T,
{
    doc.descendants("item")
        .map(|item| build(extract_fields(item)))
        .collect()
}

/// [`map_items`] with the default [`Article`] record.
pub fn articles(doc: &XmlDocument) -> Vec<Article> {
    map_items(doc, Article::from)
}
