//! Formatted view of a stored RDAP document.

use serde_json::Value;

use super::extract::vcard_field;
use crate::types::{RdapEntitySummary, RdapEvent, RdapSummary};

impl RdapSummary {
    /// Parse a stored raw WHOIS blob.
    ///
    /// Returns `None` unless the text is a JSON object; diagnostics written by failed refreshes
    /// and free text typed by the user fall into that case.
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        let document: Value = serde_json::from_str(raw.trim()).ok()?;
        document.is_object().then(|| Self::from_document(&document))
    }

    fn from_document(document: &Value) -> Self {
        let handle = string_field(document, "handle");
        Self {
            domain_name: string_field(document, "ldhName").or_else(|| handle.clone()),
            handle,
            status: string_list(document.get("status")),
            events: array(document, "events")
                .filter_map(|event| {
                    Some(RdapEvent {
                        action: event.get("eventAction")?.as_str()?.replace('_', " "),
                        date: event
                            .get("eventDate")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                })
                .collect(),
            nameservers: array(document, "nameservers")
                .filter_map(|ns| string_field(ns, "ldhName"))
                .map(|name| name.to_lowercase())
                .collect(),
            entities: array(document, "entities")
                .map(|entity| RdapEntitySummary {
                    roles: string_list(entity.get("roles")),
                    handle: string_field(entity, "handle"),
                    name: vcard_field(entity, "fn")
                        .unwrap_or("Unknown")
                        .to_string(),
                })
                .collect(),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(ToString::to_string)
}

/// Array of strings, or a single string promoted to a one-element list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn array<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}
