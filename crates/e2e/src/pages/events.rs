//! Events pages: list, creation form, sub-event form

use rsvp_browser::Selector;

use crate::profile::{FieldBinding, FormPlan, ReconcileSignals, WidgetKind};

/// Anchor element proving the events list view is ready.
pub fn add_event_button() -> Selector {
    Selector::css("button.btn-primary:has-text(\"Add Event\")")
}

/// Link to one event's detail page in the list.
pub fn event_link(event_name: &str) -> Selector {
    Selector::text(event_name)
}

/// Built-in plan for the Add Event form.
///
/// Client, status and event type are native selects in the current release;
/// the venue picker is the custom overlay. Releases have shipped the status
/// field under every widget variant, so a YAML override of this plan is the
/// expected escape hatch when the UI drifts.
pub fn form_plan() -> FormPlan {
    FormPlan {
        name: "add-event".to_string(),
        open_form: add_event_button(),
        primary_input: Selector::placeholder("Enter event name"),
        fields: vec![
            FieldBinding::column("client", Selector::label("Client"), WidgetKind::NativeSelect),
            FieldBinding::column(
                "eventName",
                Selector::placeholder("Enter event name"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "description",
                Selector::placeholder("Enter event description"),
                WidgetKind::Text,
            ),
            FieldBinding::column("status", Selector::label("Status"), WidgetKind::NativeSelect),
            FieldBinding::column(
                "eventType",
                Selector::label("Event Type"),
                WidgetKind::NativeSelect,
            ),
            FieldBinding::column(
                "venue",
                Selector::label("Venues"),
                WidgetKind::OverlayOptionList,
            ),
            FieldBinding::column("startDate", Selector::label("Start Date"), WidgetKind::Date),
            FieldBinding::column("endDate", Selector::label("End Date"), WidgetKind::Date),
        ],
        submit: Selector::role("button", "Create Event"),
        signals: ReconcileSignals {
            success_text: "Event created successfully".to_string(),
            list_url_pattern: "/events/list".to_string(),
            detail_url_pattern: "/events/(\\d+)$".to_string(),
            timeout_ms: 10_000,
        },
        open_timeout_ms: 5_000,
        field_timeout_ms: 5_000,
    }
}

/// Built-in plan for the Add Sub-Event form on an event's detail page.
pub fn sub_event_form_plan() -> FormPlan {
    FormPlan {
        name: "add-sub-event".to_string(),
        open_form: Selector::role("button", "Add Sub-Event"),
        primary_input: Selector::placeholder("Enter sub-event name"),
        fields: vec![
            FieldBinding::column(
                "name",
                Selector::placeholder("Enter sub-event name"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "description",
                Selector::placeholder("Enter sub-event description"),
                WidgetKind::Text,
            ),
            FieldBinding::column("startDate", Selector::label("Start Date"), WidgetKind::Date),
            FieldBinding::column("endDate", Selector::label("End Date"), WidgetKind::Date),
            FieldBinding::column(
                "location",
                Selector::placeholder("Enter location"),
                WidgetKind::Text,
            ),
        ],
        submit: Selector::role("button", "Save Sub-Event"),
        signals: ReconcileSignals {
            success_text: "Sub-event added successfully".to_string(),
            // The sub-event form lives on the parent's detail page; the URL
            // signals rarely fire, so the toast and list membership carry
            // the reconciliation.
            list_url_pattern: "/events/list".to_string(),
            detail_url_pattern: "/events/(\\d+)$".to_string(),
            timeout_ms: 10_000,
        },
        open_timeout_ms: 5_000,
        field_timeout_ms: 5_000,
    }
}
