use crate::config::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Shared outbound client for the IP-lookup proxy
    pub http: reqwest::Client,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }
}
