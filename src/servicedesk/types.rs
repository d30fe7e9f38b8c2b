//! Wire types of the service desk REST backend.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// A loosely typed response field.
///
/// The backend is not strict about field types, so values are kept as raw
/// JSON and rendered without quotes when they are strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FieldValue(pub Value);

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue(Value::String(s.to_string()))
    }
}

/// Render an optional field, `N/A` when absent or null.
pub fn or_na(field: &Option<FieldValue>) -> String {
    match field {
        Some(value) => value.to_string(),
        None => "N/A".to_string(),
    }
}

/// `{"dynamicName": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallerRef {
    #[serde(rename = "dynamicName")]
    pub dynamic_name: String,
}

/// `{"name": ...}` as sent when creating an incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityRef {
    pub name: String,
}

/// Body of `POST /TOPDESK_POST/incidents`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIncident {
    pub caller: CallerRef,
    pub priority: PriorityRef,
    pub description: String,
    pub category: String,
    pub status: String,
    pub urgency: String,
    pub impact: String,
}

/// Summary returned after creating an incident.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedIncident {
    pub caller_name: Option<FieldValue>,
    pub priority_name: Option<FieldValue>,
    pub category: Option<FieldValue>,
    pub status: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentPriority {
    pub name: Option<FieldValue>,
}

/// One entry of `GET /TOPDESK_POST/incidents/name/{caller}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Incident {
    pub description: Option<FieldValue>,
    pub status: Option<FieldValue>,
    pub priority: Option<IncidentPriority>,
    pub category: Option<FieldValue>,
}

/// `GET /knowledgeItems/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeItem {
    pub title: Option<FieldValue>,
    pub content: Option<FieldValue>,
}

/// One entry of `GET /knowledgeItems`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeItemSummary {
    pub id: Option<FieldValue>,
    pub title: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInActivity {
    pub last_sign_in_date_time: Option<FieldValue>,
    pub risk_level_aggregated: Option<FieldValue>,
}

/// One entry of `GET /v1.0/users`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: Option<FieldValue>,
    pub user_principal_name: Option<FieldValue>,
    pub sign_in_activity: Option<SignInActivity>,
}

impl UserProfile {
    pub fn has_display_name(&self, name: &str) -> bool {
        matches!(&self.display_name, Some(FieldValue(Value::String(s))) if s == name)
    }
}

/// Decode a list endpoint body. A body that is not a JSON array counts as
/// an empty list; an array element that does not decode is an error naming
/// its position.
pub(crate) fn decode_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, String> {
    let Value::Array(items) = body else {
        return Ok(Vec::new());
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| format!("invalid list item {index}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_values_render_plainly() {
        assert_eq!(FieldValue::from("Open").to_string(), "Open");
        assert_eq!(FieldValue(json!(42)).to_string(), "42");
        assert_eq!(or_na(&None), "N/A");
    }

    #[test]
    fn null_fields_are_absent() {
        let incident: Incident =
            serde_json::from_value(json!({"description": null, "priority": {"name": "High"}}))
                .unwrap();
        assert!(incident.description.is_none());
        assert_eq!(or_na(&incident.priority.unwrap().name), "High");
    }

    #[test]
    fn non_list_body_is_empty() {
        let items: Vec<KnowledgeItemSummary> = decode_list(json!({"detail": "oops"})).unwrap();
        assert!(items.is_empty());

        let items: Vec<KnowledgeItemSummary> =
            decode_list(json!([{"id": 7, "title": "VPN"}])).unwrap();
        assert_eq!(or_na(&items[0].id), "7");
    }

    #[test]
    fn one_bad_element_fails_the_list() {
        let err = decode_list::<Incident>(json!([
            {"description": "VPN down", "priority": {"name": "High"}},
            {"description": "Printer", "priority": "Low"}
        ]))
        .unwrap_err();
        assert!(err.starts_with("invalid list item 1:"), "{err}");
    }

    #[test]
    fn new_incident_wire_shape() {
        let body = NewIncident {
            caller: CallerRef {
                dynamic_name: "Ada".into(),
            },
            priority: PriorityRef {
                name: "High".into(),
            },
            description: "Printer on fire".into(),
            category: "General".into(),
            status: "Öppen".into(),
            urgency: "High".into(),
            impact: "High".into(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({
                "caller": {"dynamicName": "Ada"},
                "priority": {"name": "High"},
                "description": "Printer on fire",
                "category": "General",
                "status": "Öppen",
                "urgency": "High",
                "impact": "High"
            })
        );
    }
}
