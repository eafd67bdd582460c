//! Restricted renderer for model output.
//!
//! Model output is attacker-influenceable data. It is never parsed as
//! markup: the only convention recognised is a `**bold**` run, which becomes
//! a block-displayed header. Everything else lands in text nodes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::page::{Document, NodeId};

static BOLD_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+?)\*\*").expect("bold run pattern is valid"));

/// One piece of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Header(&'a str),
    LineBreak,
}

/// Split `text` into plain and header runs, line by line.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push(Segment::LineBreak);
        }
        let mut last = 0;
        for caps in BOLD_RUN.captures_iter(line) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                out.push(Segment::Text(&line[last..whole.start()]));
            }
            out.push(Segment::Header(inner.as_str()));
            last = whole.end();
        }
        if last < line.len() {
            out.push(Segment::Text(&line[last..]));
        }
    }
    out
}

/// Replace the content of `target` with the rendered form of `text`.
///
/// Each source line becomes a `<span>`; lines are separated by `"\n"` text
/// nodes so copying the result yields the original line structure.
pub fn render(doc: &mut Document, target: NodeId, text: &str) {
    doc.clear_children(target);
    let mut line = doc.create_element("span");
    for segment in segments(text) {
        match segment {
            Segment::Text(run) => {
                let node = doc.create_text(run);
                doc.append_child(line, node);
            }
            Segment::Header(run) => {
                let strong = header(doc, run);
                doc.append_child(line, strong);
            }
            Segment::LineBreak => {
                doc.append_child(target, line);
                let newline = doc.create_text("\n");
                doc.append_child(target, newline);
                line = doc.create_element("span");
            }
        }
    }
    doc.append_child(target, line);
}

fn header(doc: &mut Document, text: &str) -> NodeId {
    let strong = doc.create_element("strong");
    doc.set_style(strong, "font-weight", "700");
    doc.set_style(strong, "display", "block");
    doc.set_style(strong, "margin-top", "12px");
    doc.set_style(strong, "margin-bottom", "4px");
    doc.set_style(strong, "font-size", "15px");
    doc.set_text(strong, text);
    strong
}
