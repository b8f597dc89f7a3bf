use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub download: DownloadConfig,
    pub documents: DocumentsConfig,
    pub firebase: FirebaseConfig,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Upper bound on a single upstream fetch, headers and body included.
    pub timeout: Duration,
    /// Hosts the proxy may fetch from. Empty allows every host.
    pub allowed_hosts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentBackend {
    Firestore,
    Local,
}

#[derive(Debug, Clone)]
pub struct DocumentsConfig {
    pub backend: DocumentBackend,
    /// Directory holding the local redb mirror
    pub local_data_dir: String,
    pub firestore_base_url: String,
}

/// Web client settings for the hosted Firebase project.
/// None of these are validated; a missing value surfaces as a query failure.
#[derive(Debug, Clone, Default)]
pub struct FirebaseConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            allowed_hosts: Vec::new(),
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            backend: DocumentBackend::Firestore,
            local_data_dir: "./data".to_string(),
            firestore_base_url: "https://firestore.googleapis.com".to_string(),
        }
    }
}

impl FirebaseConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.project_id.is_some()
    }
}

impl SupabaseConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Frontend deployments expose the same keys with a NEXT_PUBLIC_ prefix
        let public = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("NEXT_PUBLIC_{key}")))
                .filter(|v| !v.trim().is_empty())
        };

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let timeout_secs = match lookup("DOWNLOAD_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "DOWNLOAD_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => 30,
        };

        let allowed_hosts: Vec<String> = lookup("DOWNLOAD_ALLOWED_HOSTS")
            .map(|hosts| {
                hosts
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let backend = match lookup("DOCUMENT_BACKEND")
            .unwrap_or_else(|| "firestore".to_string())
            .to_lowercase()
            .as_str()
        {
            "local" => DocumentBackend::Local,
            _ => DocumentBackend::Firestore,
        };

        let local_data_dir = lookup("LOCAL_DATA_DIR").unwrap_or_else(|| "./data".to_string());
        let firestore_base_url = lookup("FIRESTORE_BASE_URL")
            .unwrap_or_else(|| "https://firestore.googleapis.com".to_string());

        let config = Config {
            server: ServerConfig { bind_address },
            download: DownloadConfig {
                timeout: Duration::from_secs(timeout_secs),
                allowed_hosts,
            },
            documents: DocumentsConfig {
                backend,
                local_data_dir,
                firestore_base_url: firestore_base_url.trim_end_matches('/').to_string(),
            },
            firebase: FirebaseConfig {
                api_key: public("FIREBASE_API_KEY"),
                auth_domain: public("FIREBASE_AUTH_DOMAIN"),
                project_id: public("FIREBASE_PROJECT_ID"),
                storage_bucket: public("FIREBASE_STORAGE_BUCKET"),
                messaging_sender_id: public("FIREBASE_MESSAGING_SENDER_ID"),
                app_id: public("FIREBASE_APP_ID"),
            },
            supabase: SupabaseConfig {
                url: public("SUPABASE_URL"),
                anon_key: public("SUPABASE_ANON_KEY"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.download.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "DOWNLOAD_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
        assert_eq!(config.download.timeout, Duration::from_secs(30));
        assert!(config.download.allowed_hosts.is_empty());
        assert_eq!(config.documents.backend, DocumentBackend::Firestore);
        assert!(!config.firebase.is_configured());
        assert!(!config.supabase.is_configured());
    }

    #[test]
    fn test_allowed_hosts_are_trimmed_and_lowercased() {
        let config = load(&[(
            "DOWNLOAD_ALLOWED_HOSTS",
            " FirebaseStorage.googleapis.com, ,storage.example.org ",
        )])
        .unwrap();
        assert_eq!(
            config.download.allowed_hosts,
            vec!["firebasestorage.googleapis.com", "storage.example.org"]
        );
    }

    #[test]
    fn test_public_prefix_fallback() {
        let config = load(&[
            ("NEXT_PUBLIC_FIREBASE_API_KEY", "key-1"),
            ("FIREBASE_PROJECT_ID", "landing"),
            ("NEXT_PUBLIC_FIREBASE_PROJECT_ID", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.firebase.api_key.as_deref(), Some("key-1"));
        assert_eq!(config.firebase.project_id.as_deref(), Some("landing"));
        assert!(config.firebase.is_configured());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(load(&[("DOWNLOAD_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("DOWNLOAD_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn test_local_backend_and_base_url() {
        let config = load(&[
            ("DOCUMENT_BACKEND", "LOCAL"),
            ("LOCAL_DATA_DIR", "/tmp/mirror"),
            ("FIRESTORE_BASE_URL", "http://localhost:8080/"),
        ])
        .unwrap();
        assert_eq!(config.documents.backend, DocumentBackend::Local);
        assert_eq!(config.documents.local_data_dir, "/tmp/mirror");
        assert_eq!(config.documents.firestore_base_url, "http://localhost:8080");
    }
}
