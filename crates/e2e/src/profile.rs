//! Deployment form profiles
//!
//! Which widget a logical field is rendered as changes between releases of
//! the target application (the status field alone has shipped as a native
//! select, an overlay option list, and a type-ahead filter). The binding is
//! therefore configuration: a [`FormPlan`] describes one creation form for
//! one deployment, and can be loaded from YAML to track UI drift without a
//! code change. Built-in plans for the current deployment live in
//! [`crate::pages`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use rsvp_browser::Selector;

use crate::error::SuiteResult;

/// UI widget kind for one form field. Resolved from configuration, never
/// inferred at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Plain text input, filled by direct value assignment.
    #[default]
    Text,
    /// Date input taking `YYYY-MM-DD` text.
    Date,
    /// Native `<select>`; select by visible label.
    NativeSelect,
    /// Custom pop-up selector: click to open, click the matching option in
    /// the overlay.
    OverlayOptionList,
    /// Free-text filter box acting as a selector: click, type the target
    /// label, confirm with Enter.
    TypeAheadFilter,
}

/// Where a field's value comes from.
///
/// Most fields read a fixture column; a few (e.g. the client form's
/// customer select) are fixed per deployment and carry no column at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldBinding {
    /// Fixture column to read. Takes precedence over `value`.
    #[serde(default)]
    pub column: Option<String>,

    /// Fixed value used when no column applies.
    #[serde(default)]
    pub value: Option<String>,

    pub selector: Selector,

    #[serde(default)]
    pub widget: WidgetKind,
}

impl FieldBinding {
    pub fn column(column: impl Into<String>, selector: Selector, widget: WidgetKind) -> Self {
        Self {
            column: Some(column.into()),
            value: None,
            selector,
            widget,
        }
    }

    pub fn fixed(value: impl Into<String>, selector: Selector, widget: WidgetKind) -> Self {
        Self {
            column: None,
            value: Some(value.into()),
            selector,
            widget,
        }
    }

    /// The value to enter for `record`.
    pub fn resolve<'r>(&'r self, record: &'r crate::record::DomainRecord) -> &'r str {
        match (&self.column, &self.value) {
            (Some(column), _) => record.get(column),
            (None, Some(value)) => value.as_str(),
            (None, None) => "",
        }
    }

    /// Name used in diagnostics and `FieldNotFound`.
    pub fn name(&self) -> String {
        self.column
            .clone()
            .unwrap_or_else(|| self.selector.to_string())
    }
}

/// Signals the reconciler races after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileSignals {
    /// Toast/banner text confirming acceptance.
    pub success_text: String,

    /// Regex matched against the current URL; a match means the app
    /// returned to the list view.
    pub list_url_pattern: String,

    /// Regex matched against the current URL; capture group 1, when
    /// present, is the created entity's identifier.
    pub detail_url_pattern: String,

    /// Overall deadline for the race.
    #[serde(default = "default_reconcile_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_reconcile_timeout_ms() -> u64 {
    10_000
}

fn default_open_timeout_ms() -> u64 {
    5_000
}

fn default_field_timeout_ms() -> u64 {
    5_000
}

/// One creation form: how to open it, what to enter, how to submit, and
/// which signals confirm acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormPlan {
    pub name: String,

    /// Control that opens the creation form.
    pub open_form: Selector,

    /// The form's primary input; the form counts as open once this is
    /// interactable.
    pub primary_input: Selector,

    pub fields: Vec<FieldBinding>,

    pub submit: Selector,

    pub signals: ReconcileSignals,

    #[serde(default = "default_open_timeout_ms")]
    pub open_timeout_ms: u64,

    #[serde(default = "default_field_timeout_ms")]
    pub field_timeout_ms: u64,
}

impl FormPlan {
    pub fn from_yaml(yaml: &str) -> SuiteResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> SuiteResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DomainRecord;

    #[test]
    fn parse_plan_from_yaml() {
        let yaml = r#"
name: add-event
open_form:
  by: css
  css: 'button.btn-primary:has-text("Add Event")'
primary_input:
  by: placeholder
  text: Enter event name
fields:
  - column: eventName
    selector:
      by: placeholder
      text: Enter event name
  - column: status
    widget: native_select
    selector:
      by: label
      text: Status
  - column: venue
    widget: overlay_option_list
    selector:
      by: label
      text: Venues
submit:
  by: role
  role: button
  name: Create Event
signals:
  success_text: Event created successfully
  list_url_pattern: '/events/list'
  detail_url_pattern: '/events/(\d+)$'
"#;
        let plan = FormPlan::from_yaml(yaml).unwrap();
        assert_eq!(plan.name, "add-event");
        assert_eq!(plan.fields.len(), 3);
        assert_eq!(plan.fields[0].widget, WidgetKind::Text);
        assert_eq!(plan.fields[1].widget, WidgetKind::NativeSelect);
        assert_eq!(plan.fields[2].widget, WidgetKind::OverlayOptionList);
        assert_eq!(plan.signals.timeout_ms, 10_000);
        assert_eq!(plan.open_timeout_ms, 5_000);
    }

    #[test]
    fn binding_resolution_prefers_column_over_fixed() {
        let record = DomainRecord::from_pairs([("status", "In Progress")]);

        let from_column = FieldBinding::column(
            "status",
            Selector::label("Status"),
            WidgetKind::NativeSelect,
        );
        assert_eq!(from_column.resolve(&record), "In Progress");

        let fixed = FieldBinding::fixed(
            "Glintz Entertainment",
            Selector::label("Customer"),
            WidgetKind::NativeSelect,
        );
        assert_eq!(fixed.resolve(&record), "Glintz Entertainment");
        assert_eq!(fixed.name(), "label=Customer");
    }
}
