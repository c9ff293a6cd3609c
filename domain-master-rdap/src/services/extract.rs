//! Tolerant field extraction from RDAP documents.
//!
//! RDAP replies differ per registry: events, entities and vCards may be missing, empty or shaped
//! slightly differently. Each extractor is an independent lookup over the untyped document and
//! returns `None` as soon as an expected piece is absent.

use chrono::NaiveDate;
use serde_json::Value;

use crate::types::RdapRecord;

/// Build a record from a parsed RDAP document.
pub(super) fn parse_record(document: &Value) -> RdapRecord {
    RdapRecord {
        registration_date: event_date(document, "registration"),
        expiration_date: event_date(document, "expiration"),
        registrar: registrar_name(document),
        raw: serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string()),
    }
}

/// Date of the first event with the given `eventAction`, time-of-day discarded.
pub(super) fn event_date(document: &Value, action: &str) -> Option<NaiveDate> {
    let event = document
        .get("events")?
        .as_array()?
        .iter()
        .find(|event| event.get("eventAction").and_then(Value::as_str) == Some(action))?;
    let date = event.get("eventDate")?.as_str()?;
    let day = date.split('T').next()?.trim();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Formatted name of the first entity carrying the `registrar` role.
///
/// Only that first entity and its first `fn` field are inspected.
pub(super) fn registrar_name(document: &Value) -> Option<String> {
    let entity = document
        .get("entities")?
        .as_array()?
        .iter()
        .find(|entity| has_role(entity, "registrar"))?;
    vcard_field(entity, "fn")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
}

/// Whether an entity's `roles` list contains `role`.
pub(super) fn has_role(entity: &Value, role: &str) -> bool {
    entity
        .get("roles")
        .and_then(Value::as_array)
        .is_some_and(|roles| roles.iter().any(|r| r.as_str() == Some(role)))
}

/// Text value of the first vCard property tagged `tag`.
///
/// jCard layout: `["vcard", [[name, params, type, value], ...]]`.
pub(super) fn vcard_field<'a>(entity: &'a Value, tag: &str) -> Option<&'a str> {
    entity
        .get("vcardArray")?
        .get(1)?
        .as_array()?
        .iter()
        .find(|property| property.get(0).and_then(Value::as_str) == Some(tag))?
        .get(3)?
        .as_str()
}
