//! Building a [`Document`] from an HTML snapshot.

use scraper::Html;

use super::document::{element_node, Document};

impl Document {
    /// Parse a full HTML document. Malformed markup is repaired the way a
    /// browser would; missing `<html>`/`<body>` elements are synthesised.
    pub fn parse_html(html: &str) -> Self {
        let mut parsed = Html::parse_document(html);
        let body = parsed
            .tree
            .root()
            .descendants()
            .find(|node| node.value().as_element().is_some_and(|el| el.name() == "body"))
            .map(|node| node.id());
        let body = match body {
            Some(body) => body,
            None => {
                tracing::debug!("Parsed page has no body; appending one to the root");
                parsed.tree.root_mut().append(element_node("body")).id()
            }
        };
        Document::from_html(parsed, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structure_and_attributes() {
        let doc = Document::parse_html(
            r#"<html><body><div role="main" class="x y"><p>Hi</p></div></body></html>"#,
        );
        let main = doc.query_selector("[role=main]").unwrap().unwrap();
        assert!(doc.has_class(main, "y"));
        assert_eq!(doc.parent(main), Some(doc.body()));
        assert_eq!(doc.text_content(main), "Hi");
    }

    #[test]
    fn fragment_gets_a_body() {
        let doc = Document::parse_html("<div>loose</div>");
        assert_eq!(doc.tag(doc.body()), Some("body"));
        assert_eq!(doc.inner_text(doc.body()), "loose");
    }

    #[test]
    fn markup_in_text_stays_text() {
        let doc = Document::parse_html("<body><p>&lt;script&gt;alert(1)&lt;/script&gt;</p></body>");
        assert_eq!(doc.inner_text(doc.body()), "<script>alert(1)</script>");
        assert!(doc.query_selector("script").unwrap().is_none());
    }
}
