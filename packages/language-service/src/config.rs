//! Language service configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How an element's tag name is compared with a directive's selector text
/// when no component is attached to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementSelectorMatch {
    /// The selector text contains the tag name anywhere, so `my-dir` also
    /// matches a selector such as `[my-dir-extra]`.
    #[default]
    Substring,
    /// The tag name must appear as a whole selector token.
    TokenBoundary,
}

impl ElementSelectorMatch {
    pub fn matches(&self, selector: &str, tag_name: &str) -> bool {
        match self {
            ElementSelectorMatch::Substring => selector.contains(tag_name),
            ElementSelectorMatch::TokenBoundary => {
                let is_token_char = |c: char| c.is_alphanumeric() || c == '-' || c == '_';
                selector.match_indices(tag_name).any(|(start, _)| {
                    let end = start + tag_name.len();
                    let before = selector[..start].chars().next_back();
                    let after = selector[end..].chars().next();
                    !before.is_some_and(is_token_char) && !after.is_some_and(is_token_char)
                })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageServiceConfig {
    pub element_selector_match: ElementSelectorMatch,
}

impl LanguageServiceConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
