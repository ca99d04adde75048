//! Permission Model
//!
//! A permission row grants a role, for a module, a set of actions and a
//! pair of field-visibility lists. At most one row per (role, module)
//! pair is assumed in the server dataset.

use serde::{Deserialize, Serialize};

/// Capability a role may hold for a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    /// All actions, in display order.
    pub const ALL: [Action; 4] = [Action::Read, Action::Create, Action::Update, Action::Delete];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// One-letter marker for matrix cells.
    pub fn flag(&self) -> char {
        match self {
            Action::Read => 'r',
            Action::Create => 'c',
            Action::Update => 'u',
            Action::Delete => 'd',
        }
    }
}

/// Permission row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: i64,
    pub role_id: i64,
    pub module_id: i64,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub visible_fields: Vec<String>,
    #[serde(default)]
    pub editable_fields: Vec<String>,
}

impl Permission {
    /// Whether this row grants `action`.
    pub fn grants(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Action list with `action` added; other actions keep their order.
    pub fn with_action(&self, action: Action) -> Vec<Action> {
        let mut actions = self.actions.clone();
        if !actions.contains(&action) {
            actions.push(action);
        }
        actions
    }

    /// Action list with `action` removed; other actions keep their order.
    pub fn without_action(&self, action: Action) -> Vec<Action> {
        self.actions
            .iter()
            .copied()
            .filter(|a| *a != action)
            .collect()
    }
}

/// Create permission payload (row minus the server-assigned id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCreate {
    pub role_id: i64,
    pub module_id: i64,
    pub actions: Vec<Action>,
    pub visible_fields: Vec<String>,
    pub editable_fields: Vec<String>,
}

impl PermissionCreate {
    /// New row granting a single action, with empty field lists.
    pub fn single_action(role_id: i64, module_id: i64, action: Action) -> Self {
        Self {
            role_id,
            module_id,
            actions: vec![action],
            visible_fields: Vec::new(),
            editable_fields: Vec::new(),
        }
    }

    /// New row carrying only field lists, with no actions.
    pub fn fields_only(
        role_id: i64,
        module_id: i64,
        visible_fields: Vec<String>,
        editable_fields: Vec<String>,
    ) -> Self {
        Self {
            role_id,
            module_id,
            actions: Vec::new(),
            visible_fields,
            editable_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&Action::Read).unwrap(), r#""read""#);
        let action: Action = serde_json::from_str(r#""delete""#).unwrap();
        assert_eq!(action, Action::Delete);
        assert!(serde_json::from_str::<Action>(r#""admin""#).is_err());
    }

    #[test]
    fn permission_uses_camel_case_keys() {
        let raw = r#"{
            "id": 7,
            "roleId": 2,
            "moduleId": 3,
            "actions": ["read", "update"],
            "visibleFields": ["amount"],
            "editableFields": []
        }"#;
        let permission: Permission = serde_json::from_str(raw).unwrap();
        assert_eq!(permission.role_id, 2);
        assert_eq!(permission.module_id, 3);
        assert!(permission.grants(Action::Update));
        assert!(!permission.grants(Action::Delete));

        let body = serde_json::to_string(&permission).unwrap();
        assert!(body.contains(r#""roleId":2"#));
        assert!(body.contains(r#""visibleFields":["amount"]"#));
    }

    #[test]
    fn with_action_leaves_existing_grants_alone() {
        let permission = Permission {
            id: 1,
            role_id: 1,
            module_id: 1,
            actions: vec![Action::Read, Action::Update],
            visible_fields: vec!["amount".to_string()],
            editable_fields: Vec::new(),
        };
        assert_eq!(
            permission.with_action(Action::Create),
            vec![Action::Read, Action::Update, Action::Create]
        );
        // already present: unchanged
        assert_eq!(
            permission.with_action(Action::Read),
            vec![Action::Read, Action::Update]
        );
        assert_eq!(permission.without_action(Action::Read), vec![Action::Update]);
        assert_eq!(
            permission.without_action(Action::Delete),
            vec![Action::Read, Action::Update]
        );
    }
}
