//! Directive Matching - CSS Selector Matching
//!
//! Parses directive selectors and answers "which directives on this element
//! does a given selector select". The language service uses it to decide
//! whether a plain attribute is what attached a directive to its element.

use crate::error::SelectorError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

static SELECTOR_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\:not\()|(([\.\#]?)[-\w]+)|(?:\[([-.\w*\\$]+)(?:=(?:"([^"]*)"|'([^']*)'|([^\]]*)))?\])|(\))|(\s*,\s*)"#)
        .expect("selector regexp is valid")
});

/// Capture groups of `SELECTOR_REGEXP`.
mod group {
    pub const NOT: usize = 1;
    pub const TAG: usize = 2;
    pub const PREFIX: usize = 3;
    pub const ATTRIBUTE: usize = 4;
    pub const VALUE_DOUBLE: usize = 5;
    pub const VALUE_SINGLE: usize = 6;
    pub const VALUE_UNQUOTED: usize = 7;
    pub const NOT_END: usize = 8;
    pub const SEPARATOR: usize = 9;
}

/// A single compound selector such as `div.cls[attr=value]:not(.other)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssSelector {
    pub element: Option<String>,
    pub class_names: Vec<String>,
    /// `(name, value)` pairs; an empty value means "attribute present".
    pub attrs: Vec<(String, String)>,
    pub not_selectors: Vec<CssSelector>,
}

impl CssSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a selector list (`a, b[c]`) into its compound selectors.
    pub fn parse(selector: &str) -> Result<Vec<CssSelector>, SelectorError> {
        let mut results = Vec::new();
        let mut current = CssSelector::new();
        let mut in_not = false;

        for cap in SELECTOR_REGEXP.captures_iter(selector) {
            if cap.get(group::NOT).is_some() {
                if in_not {
                    return Err(SelectorError::NestedNot);
                }
                in_not = true;
                current.not_selectors.push(CssSelector::new());
            }

            let target = innermost(&mut current, in_not);

            if let Some(tag) = cap.get(group::TAG) {
                let tag = tag.as_str();
                match cap.get(group::PREFIX).map(|m| m.as_str()) {
                    Some("#") => target.add_attribute("id", &tag[1..]),
                    Some(".") => target.add_class_name(&tag[1..]),
                    _ => target.set_element(tag),
                }
            }

            if let Some(attr) = cap.get(group::ATTRIBUTE) {
                let value = [group::VALUE_DOUBLE, group::VALUE_SINGLE, group::VALUE_UNQUOTED]
                    .into_iter()
                    .find_map(|g| cap.get(g))
                    .map(|m| m.as_str())
                    .unwrap_or("");
                target.add_attribute(&unescape_attribute(attr.as_str())?, value);
            }

            if cap.get(group::NOT_END).is_some() {
                in_not = false;
            }

            if cap.get(group::SEPARATOR).is_some() {
                if in_not {
                    return Err(SelectorError::MultipleInNot);
                }
                push_result(&mut results, std::mem::take(&mut current));
            }
        }

        push_result(&mut results, current);
        Ok(results)
    }

    pub fn has_element_selector(&self) -> bool {
        self.element.as_deref().is_some_and(|e| e != "*")
    }

    pub fn set_element(&mut self, element: &str) {
        self.element = Some(element.to_string());
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_string(), value.to_lowercase()));
    }

    pub fn add_class_name(&mut self, name: &str) {
        self.class_names.push(name.to_lowercase());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `self`, describing a concrete element, satisfies `pattern`.
    fn satisfies(&self, pattern: &CssSelector) -> bool {
        if let Some(wanted) = pattern.element.as_deref().filter(|e| *e != "*") {
            if self.element.as_deref() != Some(wanted) {
                return false;
            }
        }

        if !pattern
            .class_names
            .iter()
            .all(|class| self.class_names.contains(class))
        {
            return false;
        }

        let attrs_ok = pattern.attrs.iter().all(|(name, wanted)| {
            self.attrs.iter().any(|(n, v)| {
                n == name && (wanted.is_empty() || v.eq_ignore_ascii_case(wanted))
            })
        });
        if !attrs_ok {
            return false;
        }

        !pattern.not_selectors.iter().any(|not| self.satisfies(not))
    }
}

/// The selector that tokens currently apply to: the open `:not(...)` if any.
fn innermost(selector: &mut CssSelector, in_not: bool) -> &mut CssSelector {
    let len = selector.not_selectors.len();
    if in_not && len > 0 {
        &mut selector.not_selectors[len - 1]
    } else {
        selector
    }
}

fn push_result(results: &mut Vec<CssSelector>, mut selector: CssSelector) {
    if !selector.not_selectors.is_empty()
        && selector.element.is_none()
        && selector.class_names.is_empty()
        && selector.attrs.is_empty()
    {
        selector.element = Some("*".to_string());
    }
    results.push(selector);
}

/// Strips `\` escapes; a bare `$` is rejected.
fn unescape_attribute(attr: &str) -> Result<String, SelectorError> {
    let mut result = String::with_capacity(attr.len());
    let mut escaping = false;

    for ch in attr.chars() {
        if ch == '\\' {
            escaping = true;
            continue;
        }
        if ch == '$' && !escaping {
            return Err(SelectorError::UnescapedDollar(attr.to_string()));
        }
        escaping = false;
        result.push(ch);
    }

    Ok(result)
}

impl std::fmt::Display for CssSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element.as_deref().unwrap_or(""))?;
        for class_name in &self.class_names {
            write!(f, ".{}", class_name)?;
        }
        for (name, value) in &self.attrs {
            let name = name.replace('$', "\\$");
            if value.is_empty() {
                write!(f, "[{}]", name)?;
            } else {
                write!(f, "[{}={}]", name, value)?;
            }
        }
        for not in &self.not_selectors {
            write!(f, ":not({})", not)?;
        }
        Ok(())
    }
}

/// Indexes selectables by element, class and attribute so a candidate
/// selector only has to be checked against plausible patterns.
pub struct SelectorMatcher<T> {
    selectables: Vec<(CssSelector, T)>,
    element_map: HashMap<String, Vec<usize>>,
    class_map: HashMap<String, Vec<usize>>,
    /// attribute name -> attribute value -> selectables
    attr_map: HashMap<String, HashMap<String, Vec<usize>>>,
}

impl<T> SelectorMatcher<T> {
    pub fn new() -> Self {
        SelectorMatcher {
            selectables: Vec::new(),
            element_map: HashMap::new(),
            class_map: HashMap::new(),
            attr_map: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selectables.is_empty()
    }

    pub fn add_selectables(&mut self, selectors: Vec<CssSelector>, data: T)
    where
        T: Clone,
    {
        for selector in selectors {
            self.add_selectable(selector, data.clone());
        }
    }

    pub fn add_selectable(&mut self, selector: CssSelector, data: T) {
        let id = self.selectables.len();

        if let Some(element) = &selector.element {
            self.element_map.entry(element.clone()).or_default().push(id);
        }
        for class_name in &selector.class_names {
            self.class_map.entry(class_name.clone()).or_default().push(id);
        }
        for (name, value) in &selector.attrs {
            self.attr_map
                .entry(name.clone())
                .or_default()
                .entry(value.clone())
                .or_default()
                .push(id);
        }

        self.selectables.push((selector, data));
    }

    /// Calls `callback` once for every selectable that `selector` satisfies,
    /// in registration order. Returns whether anything matched.
    pub fn match_selector<F>(&self, selector: &CssSelector, mut callback: F) -> bool
    where
        F: FnMut(&CssSelector, &T),
    {
        let matched = self.candidates(selector);
        for &id in &matched {
            let (pattern, data) = &self.selectables[id];
            callback(pattern, data);
        }
        !matched.is_empty()
    }

    fn candidates(&self, selector: &CssSelector) -> BTreeSet<usize> {
        let mut ids: Vec<usize> = Vec::new();

        // `*` patterns only apply to candidates that name an element.
        if let Some(element) = &selector.element {
            ids.extend(self.element_map.get(element).into_iter().flatten());
            ids.extend(self.element_map.get("*").into_iter().flatten());
        }

        for class_name in &selector.class_names {
            ids.extend(self.class_map.get(class_name).into_iter().flatten());
        }

        for (name, value) in &selector.attrs {
            if let Some(values) = self.attr_map.get(name) {
                ids.extend(values.get(value).into_iter().flatten());
                // `[attr]` patterns select any value.
                if !value.is_empty() {
                    ids.extend(values.get("").into_iter().flatten());
                }
            }
        }

        ids.into_iter()
            .filter(|&id| selector.satisfies(&self.selectables[id].0))
            .collect()
    }
}

impl<T> Default for SelectorMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
