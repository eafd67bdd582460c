//! Visible-text rendering of a subtree (the `innerText` approximation).

use scraper::Node;

use super::document::{Document, NodeId};

const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "template", "noscript", "title"];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "thead", "tr",
    "ul",
];

impl Document {
    /// Text a user would see when looking at `id`.
    ///
    /// Hidden elements are skipped, block boundaries and `<br>` become line
    /// breaks, whitespace inside lines is collapsed, and runs of blank lines
    /// are reduced to one.
    pub fn inner_text(&self, id: NodeId) -> String {
        self.inner_text_excluding(id, &[])
    }

    /// [`Self::inner_text`] without any element carrying one of the
    /// `markers` attributes, or anything below it.
    pub fn inner_text_excluding(&self, id: NodeId, markers: &[&str]) -> String {
        let mut out = String::new();
        self.collect_visible(id, markers, false, &mut out);
        normalize_lines(&out)
    }

    fn collect_visible(&self, id: NodeId, markers: &[&str], preformatted: bool, out: &mut String) {
        match self.node(id) {
            Some(Node::Text(text)) => push_text(out, text, preformatted),
            Some(Node::Document | Node::Fragment) => {
                for child in self.children(id) {
                    self.collect_visible(child, markers, preformatted, out);
                }
            }
            Some(Node::Element(el)) => {
                let tag = el.name();
                if SKIPPED_TAGS.contains(&tag)
                    || self.is_hidden(id)
                    || markers.iter().any(|marker| el.attr(marker).is_some())
                {
                    return;
                }
                if tag == "br" {
                    out.push('\n');
                    return;
                }
                let block = BLOCK_TAGS.contains(&tag);
                let preformatted = preformatted || tag == "pre";
                if block {
                    break_line(out);
                }
                for child in self.children(id) {
                    self.collect_visible(child, markers, preformatted, out);
                }
                if block {
                    break_line(out);
                }
                if tag == "p" {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn push_text(out: &mut String, text: &str, preformatted: bool) {
    if preformatted {
        out.push_str(text);
        return;
    }
    for (index, word) in text.split_whitespace().enumerate() {
        let needs_space = index > 0 || text.starts_with(char::is_whitespace);
        if needs_space && !out.is_empty() && !out.ends_with(|c: char| c == ' ' || c == '\n') {
            out.push(' ');
        }
        out.push_str(word);
    }
    if text.ends_with(char::is_whitespace) && !text.trim().is_empty() {
        out.push(' ');
    }
}

fn normalize_lines(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = false;
    for line in raw.lines().map(|l| l.trim_end()) {
        if line.trim().is_empty() {
            if !blank_run && !lines.is_empty() {
                lines.push("");
            }
            blank_run = true;
            continue;
        }
        blank_run = false;
        lines.push(line);
    }
    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_and_breaks_become_lines() {
        let doc = Document::parse_html(
            "<body><div>Hello <b>there</b>,</div><p>Second<br>Third</p><div>Fourth</div></body>",
        );
        assert_eq!(
            doc.inner_text(doc.body()),
            "Hello there,\nSecond\nThird\n\nFourth"
        );
    }

    #[test]
    fn hidden_content_is_skipped() {
        let doc = Document::parse_html(
            r#"<body><div>Visible</div><div style="display:none">Hidden</div>
            <span hidden>Also hidden</span><script>var x = 1;</script></body>"#,
        );
        assert_eq!(doc.inner_text(doc.body()), "Visible");
    }

    #[test]
    fn whitespace_is_collapsed() {
        let doc = Document::parse_html("<body><div>  lots   of\n\n   space  </div></body>");
        assert_eq!(doc.inner_text(doc.body()), "lots of space");
    }

    #[test]
    fn marked_subtrees_are_excluded() {
        let doc = Document::parse_html(
            r#"<body><div><span data-skip="1">Button <b>label</b></span> Kept</div></body>"#,
        );
        assert_eq!(doc.inner_text_excluding(doc.body(), &["data-skip"]), "Kept");
        assert_eq!(doc.inner_text(doc.body()), "Button label Kept");
    }

    #[test]
    fn preformatted_keeps_spacing() {
        let doc = Document::parse_html("<body><pre>a  b\n  c</pre></body>");
        assert_eq!(doc.inner_text(doc.body()), "a  b\n  c");
    }
}
