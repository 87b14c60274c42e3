use crate::error::ConfigError;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Connection parameters for the hosted REST store.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`. No trailing slash.
    pub url: String,
    /// Anonymous access key, sent as both `apikey` and bearer token.
    pub anon_key: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, URL_VAR)?;
        let anon_key = required(&lookup, KEY_VAR)?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                name: URL_VAR,
                value: url,
            });
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_both_values() {
        let cfg = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "https://demo.supabase.co/"),
            (KEY_VAR, "anon-key"),
        ]))
        .unwrap();
        assert_eq!(cfg.url, "https://demo.supabase.co");
        assert_eq!(cfg.anon_key, "anon-key");
    }

    #[test]
    fn missing_url_is_fatal() {
        let err = StoreConfig::from_lookup(lookup(&[(KEY_VAR, "anon-key")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(URL_VAR));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "https://demo.supabase.co"),
            (KEY_VAR, "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(KEY_VAR));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "demo.supabase.co"),
            (KEY_VAR, "anon-key"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn debug_hides_key() {
        let cfg = StoreConfig {
            url: "https://demo.supabase.co".into(),
            anon_key: "secret".into(),
        };
        assert!(!format!("{:?}", cfg).contains("secret"));
    }
}
