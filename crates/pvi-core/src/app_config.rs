#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub serper_api_key: String,
    pub apify_api_token: String,
    pub textgen_base_url: String,
    pub textgen_model: String,
    pub serper_base_url: String,
    pub apify_base_url: String,
    pub apify_actor: String,
    pub request_timeout_secs: u64,
    pub signal_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &"[redacted]")
            .field("serper_api_key", &"[redacted]")
            .field("apify_api_token", &"[redacted]")
            .field("textgen_base_url", &self.textgen_base_url)
            .field("textgen_model", &self.textgen_model)
            .field("serper_base_url", &self.serper_base_url)
            .field("apify_base_url", &self.apify_base_url)
            .field("apify_actor", &self.apify_actor)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("signal_timeout_secs", &self.signal_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
