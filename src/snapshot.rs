//! Rendered output of a single render call

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[cfg(feature = "query")]
use crate::{Error, Result};

/// A queryable snapshot of a rendered tree
///
/// Returned by [`crate::render`]. Holds two projections of the same tree:
/// the concatenated literal text in document order, and the serialized HTML.
/// A snapshot owns its data and has no link back to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// All literal text, unescaped, in document order
    pub text: String,
    /// Serialized markup of the whole tree
    pub markup: String,
    /// Inner markup of the single root element (or the whole markup)
    pub html: String,
}

impl RenderSnapshot {
    pub(crate) fn new(text: String, markup: String, html: String) -> Self {
        Self { text, markup, html }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Outer markup, root element included
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Markup inside the root element
    ///
    /// When the tree renders to a single element this drops the root's own
    /// tag, matching what a wrapper around the root reports as its HTML.
    /// Otherwise it is the full markup.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// SHA-256 of the markup, hex encoded. Stable across runs for golden tests.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.markup.as_bytes()))
    }

    /// Outer HTML of every element matching the CSS `selector`
    #[cfg(feature = "query")]
    pub fn find(&self, selector: &str) -> Result<Vec<String>> {
        use scraper::{Html, Selector};

        let sel = Selector::parse(selector)
            .map_err(|e| Error::QueryError(format!("invalid selector `{}`: {:?}", selector, e)))?;
        let fragment = Html::parse_fragment(&self.markup);
        Ok(fragment.select(&sel).map(|el| el.html()).collect())
    }

    /// Text content of every element matching the CSS `selector`
    #[cfg(feature = "query")]
    pub fn find_text(&self, selector: &str) -> Result<Vec<String>> {
        use scraper::{Html, Selector};

        let sel = Selector::parse(selector)
            .map_err(|e| Error::QueryError(format!("invalid selector `{}`: {:?}", selector, e)))?;
        let fragment = Html::parse_fragment(&self.markup);
        Ok(fragment
            .select(&sel)
            .map(|el| el.text().collect::<String>())
            .collect())
    }

    #[cfg(feature = "query")]
    pub fn contains_element(&self, selector: &str) -> Result<bool> {
        Ok(!self.find(selector)?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RenderSnapshot {
        RenderSnapshot::new(
            "footestbutton".into(),
            "<div><div>foo</div><h1 class=\"t\">test</h1><button>button</button></div>".into(),
            "<div>foo</div><h1 class=\"t\">test</h1><button>button</button>".into(),
        )
    }

    #[test]
    fn digest_is_stable_hex() {
        let a = sample();
        let b = sample();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[cfg(feature = "query")]
    #[test]
    fn find_returns_outer_html_in_document_order() {
        let snap = sample();
        let divs = snap.find("div").unwrap();
        assert_eq!(divs.len(), 2);
        assert_eq!(divs[1], "<div>foo</div>");
        assert_eq!(snap.find_text("h1.t").unwrap(), vec!["test".to_string()]);
        assert!(snap.contains_element("button").unwrap());
        assert!(!snap.contains_element("span").unwrap());
    }

    #[cfg(feature = "query")]
    #[test]
    fn bad_selector_is_a_query_error() {
        let snap = sample();
        assert!(matches!(snap.find("div[["), Err(Error::QueryError(_))));
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let js = serde_json::to_string(&sample()).unwrap();
        assert!(js.contains("\"text\":\"footestbutton\""));
    }
}
