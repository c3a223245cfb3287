//! Client and reactive agent store for the persona agent service.

pub mod client;
pub mod config;
pub mod error;
pub mod store;


pub use client::{AgentBackend, ApiClient};
pub use config::{Capabilities, ClientConfig, DispatchMode, DispatchResponse};
pub use error::{Error, Result};
pub use store::{AgentStore, CreatePolicy, FailurePolicy, StoreConfig};

pub use persona_protocol::{Agent, DispatchOutcome, DispatchRequest, Log, Profile, Task};
