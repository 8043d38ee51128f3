use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{alm::AlmClient, http::HttpClient, poll::PollPolicy, runtime::Runtime};

/// Environment variable holding the user token.
pub const TOKEN_ENV: &str = "ALM_TOKEN";

/// Server used when neither `--server-url` nor `ALM_SERVER_URL` is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9000";

pub struct Config {
    pub alm: AlmClient,
}

impl Config {
    pub fn new<R: Runtime>(
        runtime: &R,
        server_url: Option<String>,
        poll_policy: PollPolicy,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(token) = runtime.env_var(TOKEN_ENV) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using {} for authentication: {}", TOKEN_ENV, mask(&token));
        }

        let client = Client::builder()
            .user_agent("almi-cli")
            .default_headers(headers)
            .build()?;

        let server_url = server_url.unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let alm = AlmClient::new(HttpClient::new(client), &server_url, poll_policy);

        Ok(Self { alm })
    }
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
