//! Domain records and per-domain schemas

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row of tabular input mapped to named fields for one target entity.
///
/// All values are untyped text from the fixture source. Missing optional
/// fields read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    values: HashMap<String, String>,
}

impl DomainRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Field value, or `""` when the field is absent.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Expected fixture columns for one domain. Header names are matched
/// case-sensitively.
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

/// Target entity kind driven by the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Clients,
    Events,
    SubEvents,
}

impl Domain {
    pub fn schema(&self) -> RecordSchema {
        match self {
            Domain::Clients => RecordSchema {
                required: &[
                    "Client Name",
                    "Email",
                    "Phone",
                    "Website",
                    "Industry",
                    "Address",
                    "City",
                    "State",
                    "Postal Code",
                    "Country",
                ],
                optional: &["Notes"],
            },
            Domain::Events => RecordSchema {
                required: &[
                    "eventName",
                    "description",
                    "client",
                    "status",
                    "eventType",
                    "venue",
                    "startDate",
                    "endDate",
                ],
                optional: &[],
            },
            Domain::SubEvents => RecordSchema {
                required: &[
                    "parentEvent",
                    "name",
                    "description",
                    "startDate",
                    "endDate",
                    "location",
                ],
                optional: &[],
            },
        }
    }

    /// List view path for this domain, relative to the base URL.
    pub fn list_path(&self) -> &'static str {
        match self {
            Domain::Clients => "/clients",
            // Sub-events are reached through their parent event's detail
            // page, starting from the events list.
            Domain::Events | Domain::SubEvents => "/events/list",
        }
    }

    /// Fields that must not collide across repeated runs.
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Domain::Clients => &["Client Name", "Email"],
            Domain::Events => &["eventName"],
            Domain::SubEvents => &["name"],
        }
    }

    /// The field shown in list views, used for membership checks and
    /// report labels.
    pub fn display_field(&self) -> &'static str {
        match self {
            Domain::Clients => "Client Name",
            Domain::Events => "eventName",
            Domain::SubEvents => "name",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Clients => write!(f, "clients"),
            Domain::Events => write!(f, "events"),
            Domain::SubEvents => write!(f, "sub-events"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_reads_as_empty() {
        let record = DomainRecord::from_pairs([("Client Name", "Acme")]);
        assert_eq!(record.get("Client Name"), "Acme");
        assert_eq!(record.get("Notes"), "");
    }

    #[test]
    fn schemas_cover_display_and_unique_fields() {
        for domain in [Domain::Clients, Domain::Events, Domain::SubEvents] {
            let schema = domain.schema();
            let known: Vec<&str> = schema
                .required
                .iter()
                .chain(schema.optional.iter())
                .copied()
                .collect();
            assert!(known.contains(&domain.display_field()));
            for field in domain.unique_fields() {
                assert!(known.contains(field), "{} not in {} schema", field, domain);
            }
        }
    }
}
