//! Known webmail hosts and the page structure we look for on each.

use std::fmt;

use once_cell::sync::Lazy;
use scraper::Selector;

/// Which webmail product the page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Gmail,
    Outlook,
    /// Anything else: generic main-region extraction, fixed placement.
    Generic,
}

static GMAIL_BODY: Lazy<Vec<Locator>> = Lazy::new(|| {
    compile(&[
        ".a3s.aiL",
        ".gs",
        r#"[role="listitem"] .a3s"#,
        r#"[role="main"]"#,
    ])
});

static OUTLOOK_BODY: Lazy<Vec<Locator>> = Lazy::new(|| {
    compile(&[
        r#"div[aria-label="Message body"]"#,
        r#"[role="main"] .ReadMsgBody"#,
        r#"[role="main"] .RichTextB"#,
        r#"[role="main"]"#,
    ])
});

static GMAIL_TOOLBAR: Lazy<Vec<Locator>> = Lazy::new(|| {
    compile(&[r#"[gh="mtb"]"#, ".G-atb", r#"[role="main"] [gh="tm"]"#])
});

static OUTLOOK_TOOLBAR: Lazy<Vec<Locator>> = Lazy::new(|| {
    compile(&[
        r#"[role="main"] [role="toolbar"]"#,
        r#"[aria-label="Reading Pane"] [role="toolbar"]"#,
    ])
});

static MAIN_REGION: Lazy<Vec<Locator>> = Lazy::new(|| compile(&[r#"[role="main"]"#]));

/// A compiled selector together with the source it was built from.
#[derive(Debug, Clone)]
pub struct Locator {
    source: &'static str,
    selector: Selector,
}

impl Locator {
    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}

fn compile(sources: &[&'static str]) -> Vec<Locator> {
    sources
        .iter()
        .filter_map(|&source| match Selector::parse(source) {
            Ok(selector) => Some(Locator { source, selector }),
            Err(err) => {
                tracing::error!(selector = source, error = %err, "Invalid built-in selector");
                None
            }
        })
        .collect()
}

impl HostKind {
    /// Classify a page by its hostname.
    pub fn from_hostname(hostname: &str) -> Self {
        let hostname = hostname.to_ascii_lowercase();
        if hostname.contains("mail.google.com") {
            HostKind::Gmail
        } else if hostname.contains("outlook.live.com") || hostname.contains("outlook.office.com")
        {
            HostKind::Outlook
        } else {
            HostKind::Generic
        }
    }

    /// Body locators, most specific first. Empty for generic hosts.
    pub fn body_locators(self) -> &'static [Locator] {
        match self {
            HostKind::Gmail => &GMAIL_BODY,
            HostKind::Outlook => &OUTLOOK_BODY,
            HostKind::Generic => &[],
        }
    }

    /// Toolbar locators for contextual placement. Empty when unsupported.
    pub fn toolbar_locators(self) -> &'static [Locator] {
        match self {
            HostKind::Gmail => &GMAIL_TOOLBAR,
            HostKind::Outlook => &OUTLOOK_TOOLBAR,
            HostKind::Generic => &[],
        }
    }
}

/// Locator for the page's primary content region.
pub fn main_region() -> &'static [Locator] {
    &MAIN_REGION
}
