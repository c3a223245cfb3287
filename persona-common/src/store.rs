//! Observable agent collection kept in step with the remote service.
//!
//! Every operation is a single transition of the collection (replace-all,
//! append-one or remove-by-id) published to subscribers as a fresh
//! snapshot. The collection is mutated either before the remote call
//! (optimistic) or after it (confirmed), never both.

use crate::client::AgentBackend;
use crate::error::{Error, Result};
use persona_protocol::Agent;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

/// When a created agent enters the local collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatePolicy {
    /// Append the server's copy, id included, once the create succeeds.
    #[default]
    Confirmed,
    /// Append the caller's agent right away. Until the next `init` the
    /// collection holds it without an id.
    Optimistic,
}

/// What happens to an optimistic mutation when the remote call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    LeaveStale,
    Rollback,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub create: CreatePolicy,
    pub on_failure: FailurePolicy,
}

/// An entry taken out by a delete, with the entries that followed it at
/// the time. A rollback re-inserts it before the first of those still
/// present, so concurrent removals cannot shift it.
struct Removed {
    agent: Agent,
    successors: Vec<Agent>,
}

pub struct AgentStore<B> {
    backend: B,
    config: StoreConfig,
    agents: watch::Sender<Vec<Agent>>,
}

impl<B: AgentBackend> AgentStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    pub fn with_config(backend: B, config: StoreConfig) -> Self {
        let (agents, _) = watch::channel(Vec::new());
        Self {
            backend,
            config,
            agents,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Agent>> {
        self.agents.subscribe()
    }

    pub fn snapshot(&self) -> Vec<Agent> {
        self.agents.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.agents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.borrow().is_empty()
    }

    /// Replaces the whole collection with the service's current list.
    pub async fn init(&self) -> Result<()> {
        let agents = self.backend.get_agents().await?;
        debug!("Loaded {} agent(s)", agents.len());
        self.agents.send_replace(agents);
        Ok(())
    }

    pub async fn create(&self, agent: Agent) -> Result<Agent> {
        match self.config.create {
            CreatePolicy::Confirmed => {
                let created = self.backend.create_agent(&agent).await?;
                self.agents.send_modify(|agents| agents.push(created.clone()));
                Ok(created)
            }
            CreatePolicy::Optimistic => {
                let provisional = agent.unidentified();
                self.agents
                    .send_modify(|agents| agents.push(provisional.clone()));

                match self.backend.create_agent(&provisional).await {
                    Ok(created) => Ok(created),
                    Err(e) => {
                        self.undo_create(&provisional);
                        Err(e)
                    }
                }
            }
        }
    }

    /// Removes the agent locally, then deletes it remotely.
    ///
    /// Fails with [`Error::MissingId`] without contacting the service when
    /// the agent has no id.
    pub async fn delete(&self, agent: &Agent) -> Result<()> {
        let id = agent.id().ok_or(Error::MissingId)?;

        let mut removed = Vec::new();
        self.agents.send_if_modified(|agents| {
            let mut kept = Vec::with_capacity(agents.len());
            let mut gone = Vec::new();
            for a in agents.drain(..) {
                if a.id() == Some(id) {
                    gone.push((a, kept.len()));
                } else {
                    kept.push(a);
                }
            }
            removed = gone
                .into_iter()
                .map(|(agent, at)| Removed {
                    agent,
                    successors: kept[at..].to_vec(),
                })
                .collect();
            *agents = kept;
            !removed.is_empty()
        });

        if let Err(e) = self.backend.delete_agent(id).await {
            self.undo_delete(id, removed);
            return Err(e);
        }

        Ok(())
    }

    fn undo_create(&self, provisional: &Agent) {
        match self.config.on_failure {
            FailurePolicy::LeaveStale => {
                warn!(
                    "Create of agent '{}' failed, leaving unconfirmed entry in place",
                    provisional.name
                );
            }
            FailurePolicy::Rollback => {
                warn!("Create of agent '{}' failed, rolling back", provisional.name);
                self.agents.send_if_modified(|agents| {
                    match agents.iter().rposition(|a| a == provisional) {
                        Some(position) => {
                            agents.remove(position);
                            true
                        }
                        None => false,
                    }
                });
            }
        }
    }

    fn undo_delete(&self, id: &str, removed: Vec<Removed>) {
        match self.config.on_failure {
            FailurePolicy::LeaveStale => {
                warn!("Delete of agent {} failed, keeping it removed locally", id);
            }
            FailurePolicy::Rollback => {
                if removed.is_empty() {
                    return;
                }
                warn!("Delete of agent {} failed, restoring it", id);
                self.agents.send_modify(|agents| {
                    for entry in removed {
                        let at = agents
                            .iter()
                            .position(|a| entry.successors.contains(a))
                            .unwrap_or(agents.len());
                        agents.insert(at, entry.agent);
                    }
                });
            }
        }
    }
}
