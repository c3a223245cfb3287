use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub gender: String,
    #[serde(alias = "age_from")]
    pub age_from: i32,
    #[serde(alias = "age_to")]
    pub age_to: i32,
    pub location: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Older service revisions neither send nor expect a goal.
    #[serde(default)]
    pub goal: String,
    pub profile: Profile,
}

impl Agent {
    pub fn new(name: impl Into<String>, goal: impl Into<String>, profile: Profile) -> Self {
        Self {
            id: None,
            name: name.into(),
            goal: goal.into(),
            profile,
        }
    }

    /// The server-assigned id, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_identified(&self) -> bool {
        self.id().is_some()
    }

    /// Copy of this agent without an id, as sent on create.
    pub fn unidentified(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default, alias = "agent_id", skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, alias = "initial_goal")]
    pub goal: String,
    #[serde(default)]
    pub seed: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    #[serde(default)]
    pub timestamp: String,
    #[serde(alias = "agent_id")]
    pub agent_id: String,
    #[serde(alias = "task_id")]
    pub task_id: String,
    #[serde(alias = "action_id")]
    pub action_id: String,
    #[serde(alias = "action_type")]
    pub action_type: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default, alias = "target_url")]
    pub url: String,
    #[serde(default)]
    pub step: u32,
}

/// Body of a parameterized dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub goal: Option<String>,
    pub seed: Option<String>,
}

impl DispatchRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: Some(goal.into()),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }
}

/// What a dispatch call hands back: a reference to the started work,
/// never its result.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Token(String),
    Json(serde_json::Value),
}

impl DispatchOutcome {
    pub fn as_token(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Token(token) => Some(token),
            DispatchOutcome::Json(serde_json::Value::String(token)) => Some(token),
            DispatchOutcome::Json(_) => None,
        }
    }
}
