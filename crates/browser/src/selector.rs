//! Locator vocabulary shared by page models and drivers
//!
//! Selectors are plain data. Each driver decides how to resolve one against
//! its page: the Playwright sidecar maps them onto `page.locator` /
//! `page.getByRole` / `page.getByPlaceholder` / `page.getByLabel` /
//! `page.getByText`, the fake page matches them structurally.

use serde::{Deserialize, Serialize};

/// How to locate one element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Selector {
    /// Raw CSS selector
    Css { css: String },

    /// ARIA role plus accessible name, e.g. `button` / `"Add Client"`
    Role { role: String, name: String },

    /// Input matched by its placeholder text
    Placeholder { text: String },

    /// Form control matched by its label text
    Label { text: String },

    /// Element matched by its visible text
    Text { text: String },
}

impl Selector {
    pub fn css(css: impl Into<String>) -> Self {
        Selector::Css { css: css.into() }
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Selector::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Selector::Placeholder { text: text.into() }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Selector::Label { text: text.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Selector::Text { text: text.into() }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Css { css } => write!(f, "css={}", css),
            Selector::Role { role, name } => write!(f, "role={}[name={}]", role, name),
            Selector::Placeholder { text } => write!(f, "placeholder={}", text),
            Selector::Label { text } => write!(f, "label={}", text),
            Selector::Text { text } => write!(f, "text={}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_serializes_with_tag() {
        let sel = Selector::role("button", "Add Client");
        let json = serde_json::to_value(&sel).unwrap();
        assert_eq!(json["by"], "role");
        assert_eq!(json["role"], "button");
        assert_eq!(json["name"], "Add Client");
    }

    #[test]
    fn selector_display_is_stable() {
        assert_eq!(
            Selector::placeholder("Enter client name").to_string(),
            "placeholder=Enter client name"
        );
        assert_eq!(Selector::css(".error-message").to_string(), "css=.error-message");
    }
}
