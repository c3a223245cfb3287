use anyhow::Result;
use persona_protocol::{Agent, Log, Task};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_agent(agent: &Agent) {
    let profile = &agent.profile;

    println!("🤖 {}", agent.name);
    println!("   Id: {}", agent.id().unwrap_or("(unassigned)"));
    if !agent.goal.is_empty() {
        println!("   Goal: {}", agent.goal);
    }
    println!(
        "   Profile: {}, {}-{}, {}",
        profile.gender, profile.age_from, profile.age_to, profile.location
    );
    if !profile.interests.is_empty() {
        println!("   Interests: {}", profile.interests.join(", "));
    }
    if let Some(description) = &profile.description {
        println!("   Description: {}", description);
    }
}

pub fn print_log(log: &Log) {
    println!(
        "[{}] step {} {} {}",
        log.timestamp, log.step, log.action_type, log.url
    );
    println!(
        "   Agent: {}  Task: {}  Action: {}",
        log.agent_id, log.task_id, log.action_id
    );
}

pub fn print_task(task: &Task) {
    println!("📋 {} [{}]", task.id, task.status);
    if let Some(agent_id) = &task.agent_id {
        println!("   Agent: {}", agent_id);
    }
    if !task.goal.is_empty() {
        println!("   Goal: {}", task.goal);
    }
    if let Some(seed) = &task.seed {
        println!("   Seed: {}", seed);
    }
}
