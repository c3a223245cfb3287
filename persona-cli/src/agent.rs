use crate::output::{print_agent, print_json, print_log};
use crate::{AgentAction, AgentFields};
use anyhow::{anyhow, Result};
use persona_common::{AgentStore, ApiClient, ClientConfig, DispatchOutcome, DispatchRequest};
use persona_protocol::{Agent, Profile};
use tracing::{debug, error, info, warn};

pub async fn handle_agent_command(
    config: &ClientConfig,
    action: AgentAction,
    json: bool,
) -> Result<()> {
    let client = ApiClient::from_config(config);
    debug!(
        "Using {} with capabilities {:?}",
        client.base_url(),
        client.capabilities()
    );

    match action {
        AgentAction::List => list_agents(&client, json).await,
        AgentAction::Get { id } => get_agent(&client, &id, json).await,
        AgentAction::Create { fields } => create_agent(client, config, fields, json).await,
        AgentAction::Update { id, fields } => update_agent(&client, &id, fields, json).await,
        AgentAction::Delete { id } => delete_agent(client, config, &id).await,
        AgentAction::Dispatch { id, goal, seed } => {
            dispatch_agent(&client, &id, DispatchRequest { goal, seed }, json).await
        }
        AgentAction::Status { id } => {
            let status = client.get_agent_status(&id).await?;
            print_json(&status)
        }
        AgentAction::Logs { id, log_id } => agent_logs(&client, &id, log_id, json).await,
    }
}

impl AgentFields {
    fn into_agent(self) -> Agent {
        Agent::new(
            self.name,
            self.goal,
            Profile {
                gender: self.gender,
                age_from: self.age_from,
                age_to: self.age_to,
                location: self.location,
                interests: self.interests,
                description: self.description,
            },
        )
    }
}

async fn list_agents(client: &ApiClient, json: bool) -> Result<()> {
    let agents = client.get_agents().await?;
    if json {
        return print_json(&agents);
    }

    if agents.is_empty() {
        println!("No agents registered");
        return Ok(());
    }

    println!("Found {} agent(s):", agents.len());
    println!();
    for agent in &agents {
        print_agent(agent);
        println!();
    }

    Ok(())
}

async fn get_agent(client: &ApiClient, id: &str, json: bool) -> Result<()> {
    match client.get_agent(id).await {
        Ok(agent) if json => print_json(&agent),
        Ok(agent) => {
            print_agent(&agent);
            Ok(())
        }
        Err(e) => {
            error!("Failed to get agent '{}': {}", id, e);
            Err(e.into())
        }
    }
}

async fn create_agent(
    client: ApiClient,
    config: &ClientConfig,
    fields: AgentFields,
    json: bool,
) -> Result<()> {
    let store = AgentStore::with_config(client, config.store);
    let agent = fields.into_agent();

    info!(
        "Creating agent '{}' ({:?} create policy)...",
        agent.name,
        store.config().create
    );
    let created = store.create(agent).await?;
    if !created.is_identified() {
        warn!("Service returned agent '{}' without an id", created.name);
    }

    if json {
        return print_json(&created);
    }
    println!(
        "✅ Created agent '{}' with id {}",
        created.name,
        created.id().unwrap_or("(unassigned)")
    );
    Ok(())
}

async fn update_agent(client: &ApiClient, id: &str, fields: AgentFields, json: bool) -> Result<()> {
    let mut agent = fields.into_agent();
    agent.id = Some(id.to_string());

    let updated = client.update_agent(id, &agent).await?;
    if json {
        return print_json(&updated);
    }
    println!("✅ Updated agent '{}'", updated.name);
    Ok(())
}

async fn delete_agent(client: ApiClient, config: &ClientConfig, id: &str) -> Result<()> {
    let store = AgentStore::with_config(client, config.store);
    debug!("Deleting with {:?} failure policy", store.config().on_failure);
    store.init().await?;

    let agent = store
        .snapshot()
        .into_iter()
        .find(|a| a.id() == Some(id))
        .ok_or_else(|| anyhow!("Agent '{}' not found", id))?;

    match store.delete(&agent).await {
        Ok(()) => {
            println!("✅ Deleted agent '{}' ({} remaining)", agent.name, store.len());
            Ok(())
        }
        Err(e) => {
            error!("Failed to delete agent '{}': {}", agent.name, e);
            Err(e.into())
        }
    }
}

async fn dispatch_agent(
    client: &ApiClient,
    id: &str,
    request: DispatchRequest,
    json: bool,
) -> Result<()> {
    info!("Dispatching agent {}...", id);

    match client.dispatch_agent(id, &request).await? {
        DispatchOutcome::Json(value) if json => print_json(&value),
        outcome => {
            match outcome.as_token() {
                Some(token) => println!("🚀 Dispatched agent {}: {}", id, token),
                None => println!("🚀 Dispatched agent {}", id),
            }
            Ok(())
        }
    }
}

async fn agent_logs(client: &ApiClient, id: &str, log_id: Option<String>, json: bool) -> Result<()> {
    if let Some(log_id) = log_id {
        let log = client.get_agent_log(id, &log_id).await?;
        if json {
            return print_json(&log);
        }
        print_log(&log);
        return Ok(());
    }

    let logs = client.get_agent_logs(id).await?;
    if json {
        return print_json(&logs);
    }
    if logs.is_empty() {
        println!("No logs for agent {}", id);
    }
    for log in &logs {
        print_log(log);
    }

    Ok(())
}
