//! Clients page and its creation form

use rsvp_browser::Selector;

use crate::profile::{FieldBinding, FormPlan, ReconcileSignals, WidgetKind};

/// Anchor element proving the clients list view is ready.
pub fn add_client_button() -> Selector {
    Selector::role("button", "Add Client")
}

/// Bulk CSV import entry point.
pub fn import_button() -> Selector {
    Selector::role("button", "Import")
}

/// File input of the bulk import dialog.
pub fn import_file_input() -> Selector {
    Selector::css("input[type=\"file\"]")
}

pub fn bulk_import_success() -> Selector {
    Selector::text("Bulk client upload completed successfully")
}

/// Built-in plan for the Add Client form.
///
/// `customer` is the visible label to pick in the Customer select; it is a
/// deployment fixture (an existing customer account), not part of the
/// client record itself. Pass `""` to leave the select at its default.
pub fn form_plan(customer: &str) -> FormPlan {
    FormPlan {
        name: "add-client".to_string(),
        open_form: add_client_button(),
        primary_input: Selector::placeholder("Enter client name"),
        fields: vec![
            FieldBinding::fixed(customer, Selector::label("Customer"), WidgetKind::NativeSelect),
            FieldBinding::column(
                "Client Name",
                Selector::placeholder("Enter client name"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "Email",
                Selector::placeholder("Enter email address"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "Phone",
                Selector::placeholder("Enter phone number"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "Website",
                Selector::placeholder("Enter website URL"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "Industry",
                Selector::placeholder("Enter industry"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "Address",
                Selector::placeholder("Enter address"),
                WidgetKind::Text,
            ),
            FieldBinding::column("City", Selector::placeholder("Enter city"), WidgetKind::Text),
            FieldBinding::column("State", Selector::placeholder("Enter state"), WidgetKind::Text),
            FieldBinding::column(
                "Postal Code",
                Selector::placeholder("Enter postal code"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "Country",
                Selector::placeholder("Enter country"),
                WidgetKind::Text,
            ),
            FieldBinding::column(
                "Notes",
                Selector::placeholder("Enter notes or additional information"),
                WidgetKind::Text,
            ),
        ],
        submit: Selector::role("button", "Save Client"),
        signals: ReconcileSignals {
            success_text: "Client added successfully".to_string(),
            list_url_pattern: "/clients(\\?|$)".to_string(),
            detail_url_pattern: "/clients/(\\d+)$".to_string(),
            timeout_ms: 10_000,
        },
        open_timeout_ms: 5_000,
        field_timeout_ms: 5_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Domain;

    #[test]
    fn plan_covers_every_schema_column() {
        let plan = form_plan("Any Customer");
        let schema = Domain::Clients.schema();
        for column in schema.required.iter().chain(schema.optional.iter()) {
            assert!(
                plan.fields
                    .iter()
                    .any(|f| f.column.as_deref() == Some(*column)),
                "no binding for column {:?}",
                column
            );
        }
    }

    #[test]
    fn plan_round_trips_through_yaml() {
        let plan = form_plan("Glintz Entertainment");
        let yaml = serde_yaml::to_string(&plan).unwrap();
        let parsed = FormPlan::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.name, plan.name);
        assert_eq!(parsed.fields.len(), plan.fields.len());
        assert_eq!(parsed.signals.success_text, plan.signals.success_text);
    }
}
