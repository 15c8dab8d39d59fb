use std::env;

/// Settings for the example host binary.
///
/// - `DATAPORTEN_BIND_ADDR`: Listen address (default: `127.0.0.1:3000`)
/// - `DATAPORTEN_DEMO_TOKENS`: Comma separated `username=token` pairs seeding
///   the in-memory token store
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub demo_tokens: Vec<(String, String)>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("DATAPORTEN_BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "127.0.0.1:3000".to_string());

        let demo_tokens = lookup("DATAPORTEN_DEMO_TOKENS")
            .map(|raw| parse_token_pairs(&raw))
            .unwrap_or_default();

        Self {
            bind_addr,
            demo_tokens,
        }
    }
}

fn parse_token_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (user, token) = pair.split_once('=')?;
            let (user, token) = (user.trim(), token.trim());
            if user.is_empty() || token.is_empty() {
                return None;
            }
            Some((user.to_string(), token.to_string()))
        })
        .collect()
}
