//! Finding conversation turns on a page.
//!
//! Each supported site renders a conversation differently:
//!
//! - **Bubble list** (Grok): every turn is a `div.message-bubble`.
//! - **Paired containers** (Gemini): prompts and answers are separate
//!   element collections that get zipped back together.
//! - **Generic** (ChatGPT and anything else): message containers carry one
//!   of a few marker attributes or classes.
//!
//! None of the layouts mark who spoke, so roles alternate by position.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::config::SelectorConfig;
use crate::dom::{NodeId, SelectorSet};
use crate::error::Result;
use crate::page::Page;

/// Known page-structure conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    BubbleList,
    PairedContainers,
    Generic,
}

impl Layout {
    /// Pick the layout for a page URL by its host.
    pub fn detect(url: &Url) -> Self {
        let host = url.host_str().unwrap_or_default();
        if host_matches(host, "grok.com") {
            Layout::BubbleList
        } else if host_matches(host, "gemini.google.com") {
            Layout::PairedContainers
        } else {
            Layout::Generic
        }
    }

    /// Name of the site this layout belongs to.
    pub fn platform(self) -> &'static str {
        match self {
            Layout::BubbleList => "grok",
            Layout::PairedContainers => "gemini",
            Layout::Generic => "chatGPT",
        }
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grok" | "bubble" => Ok(Layout::BubbleList),
            "gemini" | "paired" => Ok(Layout::PairedContainers),
            "chatgpt" | "generic" => Ok(Layout::Generic),
            other => Err(format!(
                "unknown layout `{other}` (expected grok, gemini or generic)"
            )),
        }
    }
}

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role of the turn at `index`: users on even positions.
    pub fn at(index: usize) -> Self {
        if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One conversation turn: its role and the element holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub node: NodeId,
}

/// Result of locating a conversation.
#[derive(Debug, Clone)]
pub struct Located {
    pub platform: &'static str,
    pub title: String,
    pub turns: Vec<Turn>,
}

impl Located {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Compiled turn selectors for every layout.
#[derive(Debug, Clone)]
pub struct Locator {
    bubble: SelectorSet,
    user_query: SelectorSet,
    model_response: SelectorSet,
    generic: Option<SelectorSet>,
    active_title: SelectorSet,
}

impl Locator {
    /// Compile the configured selectors.
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        let generic = if config.generic.is_empty() {
            None
        } else {
            Some(SelectorSet::parse(&config.generic.join(", "))?)
        };

        Ok(Self {
            bubble: SelectorSet::parse(&config.bubble)?,
            user_query: SelectorSet::parse(&config.user_query)?,
            model_response: SelectorSet::parse(&config.model_response)?,
            generic,
            active_title: SelectorSet::parse(&config.active_title)?,
        })
    }

    /// Find the turns of the conversation on `page`, in page order.
    ///
    /// An empty result means there is nothing to export; it is not an error.
    pub fn locate(&self, page: &Page, layout: Layout) -> Located {
        let dom = page.dom();
        let root = dom.document();

        let nodes = match layout {
            Layout::BubbleList => self.bubble.select_all(dom, root),
            Layout::PairedContainers => {
                let queries = self.user_query.select_all(dom, root);
                let responses = self.model_response.select_all(dom, root);
                interleave(&queries, &responses)
            }
            Layout::Generic => self
                .generic
                .as_ref()
                .map(|set| set.select_all(dom, root))
                .unwrap_or_default(),
        };

        let title = match layout {
            Layout::Generic => self.active_title(page).unwrap_or_else(|| page.title()),
            _ => page.title(),
        };

        let turns: Vec<Turn> = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| Turn {
                role: Role::at(i),
                node,
            })
            .collect();

        tracing::debug!(
            platform = layout.platform(),
            turns = turns.len(),
            title = %title,
            "located conversation"
        );

        Located {
            platform: layout.platform(),
            title,
            turns,
        }
    }

    /// Text of the highlighted conversation in the history sidebar.
    fn active_title(&self, page: &Page) -> Option<String> {
        let dom = page.dom();
        let link = self.active_title.select_first(dom, dom.document())?;
        let text = dom.text_content(link);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Zip two collections index by index: `a[0], b[0], a[1], b[1], …`,
/// skipping whichever side has run out.
fn interleave(a: &[NodeId], b: &[NodeId]) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    for i in 0..a.len().max(b.len()) {
        out.extend(a.get(i));
        out.extend(b.get(i));
    }
    out
}
