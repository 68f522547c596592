use serde::{Deserialize, Serialize};

use bizflow_core::error::{BizflowError, Result};
use bizflow_core::types::Automation;

use crate::store::SqliteStore;

/// A JSON file of automation definitions and space memberships to load into a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutomationBundle {
    #[serde(default)]
    pub automations: Vec<Automation>,
    #[serde(default)]
    pub space_members: Vec<SpaceMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceMember {
    pub space_id: String,
    pub user_id: String,
}

impl AutomationBundle {
    pub fn from_json(input: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(input)?;
        for automation in &bundle.automations {
            if automation.id.trim().is_empty() {
                return Err(BizflowError::InvalidWorkflow(format!(
                    "automation '{}' has an empty id",
                    automation.name
                )));
            }
        }
        Ok(bundle)
    }
}

impl SqliteStore {
    /// Save every automation and membership in the bundle. Returns the number of automations.
    pub fn import_bundle(&self, bundle: &AutomationBundle) -> Result<usize> {
        for member in &bundle.space_members {
            self.add_space_member(&member.space_id, &member.user_id)?;
        }
        for automation in &bundle.automations {
            self.save_automation(automation)?;
        }
        Ok(bundle.automations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizflow_core::traits::AutomationStore;
    use bizflow_core::workflow::NodeSubtype;

    const BUNDLE: &str = r#"{
        "automations": [{
            "id": "welcome",
            "name": "Welcome new member",
            "user_id": "owner",
            "space_id": "space-1",
            "nodes": [
                { "id": "t", "node_type": "trigger", "node_subtype": "member_joined", "order_index": 0 },
                { "id": "mail", "node_type": "action", "node_subtype": "send_email", "order_index": 1,
                  "config": { "type": "invitation", "subject": "Welcome" } }
            ],
            "connections": [
                { "source_node_id": "t", "target_node_id": "mail" }
            ]
        }],
        "space_members": [{ "space_id": "space-1", "user_id": "ada" }]
    }"#;

    #[tokio::test]
    async fn test_import_bundle() {
        let store = SqliteStore::in_memory().unwrap();
        let bundle = AutomationBundle::from_json(BUNDLE).unwrap();
        assert_eq!(store.import_bundle(&bundle).unwrap(), 1);

        let automation = store.get_active_automation("welcome").await.unwrap().unwrap();
        assert!(automation.is_active);
        assert_eq!(automation.nodes[1].node_subtype, NodeSubtype::SendEmail);
        assert_eq!(automation.connections.len(), 1);
        assert!(store.is_space_member("space-1", "ada").await.unwrap());
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = AutomationBundle::from_json(
            r#"{ "automations": [{ "id": " ", "name": "x", "user_id": "u" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, BizflowError::InvalidWorkflow(_)));
    }
}
