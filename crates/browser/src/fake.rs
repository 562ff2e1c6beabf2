//! Scripted in-memory page for tests
//!
//! [`FakePage`] implements [`Page`] against a hash-map "DOM" instead of a
//! browser. Tests script it with elements, native-select option lists, and
//! click triggers that apply effects (show/hide an element, change the URL)
//! after a configurable delay. The delays are what make reconciliation races
//! testable: a toast that appears 50ms after the submit click, a redirect
//! that lands 200ms later, or neither.
//!
//! Interaction methods mirror the auto-wait semantics of the real driver:
//! they poll for the target to become visible up to an action timeout, so a
//! trigger scheduled by an earlier step can land mid-wait.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{BrowserError, BrowserResult};
use crate::page::{Page, WaitState};
use crate::selector::Selector;

/// A state change applied when a trigger fires.
#[derive(Debug, Clone)]
pub enum FakeEffect {
    /// Make an element visible with the given text.
    Show { selector: Selector, text: String },
    /// Hide an element.
    Hide { selector: Selector },
    /// Change the current URL (a "redirect").
    SetUrl { url: String },
}

#[derive(Debug, Clone, Default)]
struct Element {
    visible: bool,
    text: String,
    value: String,
    /// Visible labels for a native select; `None` for other elements.
    options: Option<Vec<String>>,
}

#[derive(Debug)]
struct Trigger {
    delay: Duration,
    effects: Vec<FakeEffect>,
}

#[derive(Debug)]
struct Scheduled {
    due: Instant,
    effects: Vec<FakeEffect>,
}

#[derive(Debug, Default)]
struct State {
    url: String,
    elements: HashMap<Selector, Element>,
    triggers: HashMap<Selector, Vec<Trigger>>,
    scheduled: Vec<Scheduled>,
    clicks: Vec<Selector>,
    fills: Vec<(Selector, String)>,
    typed: Vec<(Selector, String)>,
    pressed: Vec<(Selector, String)>,
    files: Vec<(Selector, PathBuf)>,
    navigations: Vec<String>,
}

impl State {
    fn apply_due(&mut self) {
        let now = Instant::now();
        let mut due = Vec::new();
        self.scheduled.retain(|s| {
            if s.due <= now {
                due.push(s.effects.clone());
                false
            } else {
                true
            }
        });
        for effects in due {
            for effect in effects {
                match effect {
                    FakeEffect::Show { selector, text } => {
                        let el = self.elements.entry(selector).or_default();
                        el.visible = true;
                        el.text = text;
                    }
                    FakeEffect::Hide { selector } => {
                        if let Some(el) = self.elements.get_mut(&selector) {
                            el.visible = false;
                        }
                    }
                    FakeEffect::SetUrl { url } => self.url = url,
                }
            }
        }
    }

    fn is_visible(&self, selector: &Selector) -> bool {
        self.elements.get(selector).map(|e| e.visible).unwrap_or(false)
    }
}

/// Scripted page double. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct FakePage {
    state: Arc<Mutex<State>>,
    action_timeout: Duration,
    poll_interval: Duration,
}

impl FakePage {
    pub fn new(initial_url: impl Into<String>) -> Self {
        let state = State {
            url: initial_url.into(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            action_timeout: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(5),
        }
    }

    /// Override the auto-wait budget for fill/type/press/select actions.
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    /// Add a visible element with the given text.
    pub fn add_element(&self, selector: Selector, text: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        let el = state.elements.entry(selector).or_default();
        el.visible = true;
        el.text = text.into();
    }

    /// Add a visible native select with the given option labels.
    pub fn add_select(&self, selector: Selector, options: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let el = state.elements.entry(selector).or_default();
        el.visible = true;
        el.options = Some(options.iter().map(|s| (*s).to_string()).collect());
    }

    /// Register effects to apply `delay` after `selector` is clicked.
    /// Triggers are repeatable; each click schedules the effects again.
    pub fn on_click(&self, selector: Selector, delay: Duration, effects: Vec<FakeEffect>) {
        let mut state = self.state.lock().unwrap();
        state
            .triggers
            .entry(selector)
            .or_default()
            .push(Trigger { delay, effects });
    }

    /// Change the current URL directly, as an out-of-band "redirect".
    pub fn set_url(&self, url: impl Into<String>) {
        self.state.lock().unwrap().url = url.into();
    }

    /// Current value of an element, as written by fill/type/select.
    pub fn value_of(&self, selector: &Selector) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.elements.get(selector).map(|e| e.value.clone())
    }

    /// Selectors clicked so far, in order.
    pub fn clicks(&self) -> Vec<Selector> {
        self.state.lock().unwrap().clicks.clone()
    }

    /// Fill operations so far, in order.
    pub fn fills(&self) -> Vec<(Selector, String)> {
        self.state.lock().unwrap().fills.clone()
    }

    /// Keys pressed so far, in order.
    pub fn pressed(&self) -> Vec<(Selector, String)> {
        self.state.lock().unwrap().pressed.clone()
    }

    /// File attachments so far, in order.
    pub fn files(&self) -> Vec<(Selector, PathBuf)> {
        self.state.lock().unwrap().files.clone()
    }

    /// URLs navigated to so far, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    /// Wait until `selector` is visible, up to `budget`.
    async fn wait_visible(&self, selector: &Selector, budget: Duration) -> BrowserResult<()> {
        let deadline = Instant::now() + budget;
        loop {
            {
                let mut state = self.state.lock().unwrap();
                state.apply_due();
                if state.is_visible(selector) {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms: budget.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl Page for FakePage {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        let mut state = self.state.lock().unwrap();
        state.apply_due();
        state.url = url.to_string();
        state.navigations.push(url.to_string());
        Ok(())
    }

    async fn wait_for_load(&self) -> BrowserResult<()> {
        self.state.lock().unwrap().apply_due();
        Ok(())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> BrowserResult<()> {
        self.wait_visible(selector, self.action_timeout).await?;
        let mut state = self.state.lock().unwrap();
        if let Some(el) = state.elements.get_mut(selector) {
            el.value = value.to_string();
        }
        state.fills.push((selector.clone(), value.to_string()));
        Ok(())
    }

    async fn click(&self, selector: &Selector, timeout_ms: u64) -> BrowserResult<()> {
        self.wait_visible(selector, Duration::from_millis(timeout_ms)).await?;
        let mut state = self.state.lock().unwrap();
        state.clicks.push(selector.clone());
        let now = Instant::now();
        let mut scheduled = Vec::new();
        if let Some(triggers) = state.triggers.get(selector) {
            for trigger in triggers {
                scheduled.push(Scheduled {
                    due: now + trigger.delay,
                    effects: trigger.effects.clone(),
                });
            }
        }
        state.scheduled.extend(scheduled);
        // Zero-delay triggers take effect before the click returns,
        // like a same-tick DOM update.
        state.apply_due();
        Ok(())
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> BrowserResult<()> {
        self.wait_visible(selector, self.action_timeout).await?;
        let mut state = self.state.lock().unwrap();
        if let Some(el) = state.elements.get_mut(selector) {
            el.value.push_str(text);
        }
        state.typed.push((selector.clone(), text.to_string()));
        Ok(())
    }

    async fn press(&self, selector: &Selector, key: &str) -> BrowserResult<()> {
        self.wait_visible(selector, self.action_timeout).await?;
        let mut state = self.state.lock().unwrap();
        state.pressed.push((selector.clone(), key.to_string()));
        Ok(())
    }

    async fn select_option(&self, selector: &Selector, label: &str) -> BrowserResult<()> {
        self.wait_visible(selector, self.action_timeout).await?;
        let mut state = self.state.lock().unwrap();
        let Some(el) = state.elements.get_mut(selector) else {
            return Err(BrowserError::ActionFailed {
                action: "select_option".to_string(),
                selector: selector.to_string(),
                reason: "no such element".to_string(),
            });
        };
        if let Some(options) = &el.options {
            if !options.iter().any(|o| o == label) {
                return Err(BrowserError::ActionFailed {
                    action: "select_option".to_string(),
                    selector: selector.to_string(),
                    reason: format!("no option with label {:?}", label),
                });
            }
        }
        el.value = label.to_string();
        Ok(())
    }

    async fn set_input_files(&self, selector: &Selector, path: &Path) -> BrowserResult<()> {
        self.wait_visible(selector, self.action_timeout).await?;
        let mut state = self.state.lock().unwrap();
        state.files.push((selector.clone(), path.to_path_buf()));
        Ok(())
    }

    async fn wait_for(
        &self,
        selector: &Selector,
        state: WaitState,
        timeout_ms: u64,
    ) -> BrowserResult<()> {
        let budget = Duration::from_millis(timeout_ms);
        match state {
            WaitState::Visible | WaitState::Attached => self.wait_visible(selector, budget).await,
            WaitState::Hidden | WaitState::Detached => {
                let deadline = Instant::now() + budget;
                loop {
                    {
                        let mut st = self.state.lock().unwrap();
                        st.apply_due();
                        if !st.is_visible(selector) {
                            return Ok(());
                        }
                    }
                    if Instant::now() >= deadline {
                        return Err(BrowserError::WaitTimeout {
                            selector: selector.to_string(),
                            timeout_ms,
                        });
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    async fn is_visible(&self, selector: &Selector) -> BrowserResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.apply_due();
        Ok(state.is_visible(selector))
    }

    async fn inner_text(&self, selector: &Selector) -> BrowserResult<String> {
        let mut state = self.state.lock().unwrap();
        state.apply_due();
        state
            .elements
            .get(selector)
            .map(|e| e.text.clone())
            .ok_or_else(|| BrowserError::ActionFailed {
                action: "inner_text".to_string(),
                selector: selector.to_string(),
                reason: "no such element".to_string(),
            })
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let mut state = self.state.lock().unwrap();
        state.apply_due();
        Ok(state.url.clone())
    }

    async fn page_content(&self) -> BrowserResult<String> {
        let mut state = self.state.lock().unwrap();
        state.apply_due();
        let mut body = String::new();
        for el in state.elements.values() {
            if el.visible && !el.text.is_empty() {
                body.push_str(&el.text);
                body.push('\n');
            }
        }
        Ok(format!("<html><body>\n{}</body></html>", body))
    }

    async fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, b"fake-screenshot")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn click_trigger_applies_effects_after_delay() {
        let page = FakePage::new("https://app.test/form");
        let submit = Selector::role("button", "Save");
        let toast = Selector::text("Saved successfully");
        page.add_element(submit.clone(), "Save");
        page.on_click(
            submit.clone(),
            Duration::from_millis(30),
            vec![FakeEffect::Show { selector: toast.clone(), text: "Saved successfully".into() }],
        );

        page.click(&submit, 100).await.unwrap();
        assert!(!page.is_visible(&toast).await.unwrap());

        page.wait_for(&toast, WaitState::Visible, 500).await.unwrap();
        assert!(page.is_visible(&toast).await.unwrap());
    }

    #[tokio::test]
    async fn click_on_missing_element_times_out() {
        let page = FakePage::new("https://app.test");
        let err = page
            .click(&Selector::role("button", "Nope"), 50)
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::WaitTimeout { .. }));
    }

    #[tokio::test]
    async fn select_option_rejects_unknown_label() {
        let page = FakePage::new("https://app.test");
        let sel = Selector::label("Status");
        page.add_select(sel.clone(), &["Planned", "In Progress"]);

        page.select_option(&sel, "In Progress").await.unwrap();
        assert_eq!(page.value_of(&sel).as_deref(), Some("In Progress"));

        let err = page.select_option(&sel, "Cancelled").await.unwrap_err();
        assert!(matches!(err, BrowserError::ActionFailed { .. }));
    }

    #[tokio::test]
    async fn redirect_effect_changes_url() {
        let page = FakePage::new("https://app.test/events/list");
        let submit = Selector::role("button", "Create Event");
        page.add_element(submit.clone(), "Create Event");
        page.on_click(
            submit.clone(),
            Duration::ZERO,
            vec![FakeEffect::SetUrl { url: "https://app.test/events/42".into() }],
        );

        page.click(&submit, 100).await.unwrap();
        assert_eq!(page.current_url().await.unwrap(), "https://app.test/events/42");
    }
}
