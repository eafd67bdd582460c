//! Page-embedded email summarizer.
//!
//! The page agent (`agent`) extracts the open email from a webmail page,
//! keeps a summarize affordance on it and shows the result in a modal. The
//! background collaborator (`background`) owns the API key and the single
//! outbound call; the two talk over `ipc`.

pub mod agent;
pub mod background;
pub mod clipboard;
pub mod config;
pub mod ipc;
pub mod logging;
pub mod mvi;
pub mod page;
