use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ============= Organization Models =============

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationRequest {
    pub org_name: String,
    pub environments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Option<String>,
    #[serde(alias = "org_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub environments: Vec<OrganizationEnvironment>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationEnvironment {
    pub name: Option<String>,
    pub api_key: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Organization {
    /// API key issued for the first environment, used to bootstrap later calls
    pub fn first_api_key(&self) -> Option<&str> {
        self.environments.first()?.api_key.as_deref()
    }
}

// ============= Auto-Monitor Setup Models =============

/// Reference to an evaluator: an existing one by id, or a new one by type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluatorRef {
    Id { evaluator_id: String },
    Type { evaluator_type: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupRequest {
    pub entity_type: String,
    pub entity_value: String,
    pub evaluators: Vec<EvaluatorRef>,
}

impl SetupRequest {
    /// Existing evaluator ids come first, followed by types to create
    pub fn new(
        entity_type: impl Into<String>,
        entity_value: impl Into<String>,
        evaluator_ids: &[String],
        evaluator_types: &[String],
    ) -> Self {
        let evaluators = evaluator_ids
            .iter()
            .map(|id| EvaluatorRef::Id {
                evaluator_id: id.clone(),
            })
            .chain(evaluator_types.iter().map(|t| EvaluatorRef::Type {
                evaluator_type: t.clone(),
            }))
            .collect();

        Self {
            entity_type: entity_type.into(),
            entity_value: entity_value.into(),
            evaluators,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMonitorSetup {
    pub id: Option<String>,
    pub entity_type: Option<String>,
    pub entity_value: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub evaluators: Vec<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Default)]
pub struct SetupListFilter {
    pub entity_type: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_setup_request_evaluator_order() {
        let request = SetupRequest::new(
            "agent",
            "support-bot",
            &["ev-1".to_string()],
            &["toxicity".to_string(), "char-count".to_string()],
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "entity_type": "agent",
                "entity_value": "support-bot",
                "evaluators": [
                    {"evaluator_id": "ev-1"},
                    {"evaluator_type": "toxicity"},
                    {"evaluator_type": "char-count"}
                ]
            })
        );
    }

    #[test]
    fn test_organization_first_api_key() {
        let org: Organization = serde_json::from_value(json!({
            "id": "org-1",
            "name": "Demo Organization",
            "environments": [{"name": "prd", "api_key": "key-prd", "id": "env-1"}],
            "created_at": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(org.first_api_key(), Some("key-prd"));
        assert_eq!(org.extra["created_at"], "2024-01-01");
        assert_eq!(org.environments[0].extra["id"], "env-1");
    }

    #[test]
    fn test_organization_without_environments() {
        let org: Organization = serde_json::from_value(json!({"org_name": "x"})).unwrap();
        assert_eq!(org.name.as_deref(), Some("x"));
        assert_eq!(org.first_api_key(), None);
    }

    #[test]
    fn test_setup_keeps_unknown_fields() {
        let setup: AutoMonitorSetup = serde_json::from_value(json!({
            "id": "s-1",
            "entity_type": "workflow",
            "entity_value": "joke_generator",
            "status": "pending",
            "evaluators": [{"evaluator_id": "ev-1"}],
            "created_at": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(setup.evaluators.len(), 1);
        let round_trip = serde_json::to_value(&setup).unwrap();
        assert_eq!(round_trip["created_at"], "2024-01-01");
    }
}
