use crate::output::{print_json, print_log, print_task};
use anyhow::Result;
use persona_common::{ApiClient, ClientConfig};
use tracing::error;

pub async fn show_logs(config: &ClientConfig, json: bool) -> Result<()> {
    let client = ApiClient::from_config(config);

    let logs = match client.get_logs().await {
        Ok(logs) => logs,
        Err(e) => {
            error!("Failed to fetch logs: {}", e);
            return Err(e.into());
        }
    };

    if json {
        return print_json(&logs);
    }
    if logs.is_empty() {
        println!("No logs recorded");
        return Ok(());
    }
    for log in &logs {
        print_log(log);
    }

    Ok(())
}

pub async fn show_tasks(config: &ClientConfig, json: bool) -> Result<()> {
    let client = ApiClient::from_config(config);

    let tasks = match client.get_tasks().await {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("Failed to fetch tasks: {}", e);
            return Err(e.into());
        }
    };

    if json {
        return print_json(&tasks);
    }
    if tasks.is_empty() {
        println!("No tasks dispatched");
        return Ok(());
    }

    println!("Found {} task(s):", tasks.len());
    println!();
    for task in &tasks {
        print_task(task);
        println!();
    }

    Ok(())
}
