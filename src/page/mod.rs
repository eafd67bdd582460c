//! Host page model.
//!
//! The page agent is embedded in a third-party document whose structure it
//! does not own. This module models that document on top of the tree
//! `scraper` parses into, with enough of the platform surface for the
//! agent: selector lookups, visible text, element creation, mutation
//! observation and a select-and-copy command.

mod document;
mod parse;
mod text;

pub use document::{
    parse_selector, Document, MutationRecord, MutationWatch, NodeId, SelectorError,
};
pub use scraper::Selector;
