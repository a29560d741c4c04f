//! Credential resolution from prioritized sources
//!
//! Secrets are looked up through an ordered source chain (config file first,
//! then process environment) and cached for the process lifetime. Remote
//! secret stores can be appended to the chain via [`CredentialSource`].

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Secret name for the OpenAI API key
pub const OPENAI_KEY_NAME: &str = "OPENAI_API_KEY";

/// Secret name for the Anthropic API key
pub const ANTHROPIC_KEY_NAME: &str = "ANTHROPIC_API_KEY";

/// Secret name for the DeepSeek API key
pub const DEEPSEEK_KEY_NAME: &str = "DEEPSEEK_API_KEY";

/// A single place a secret can come from
pub trait CredentialSource: Send + Sync {
    /// Look up `name`, returning `None` when this source has no value
    fn fetch(&self, name: &str) -> Option<String>;

    /// Short label for log messages
    fn describe(&self) -> &str;
}

/// Source backed by a TOML file with a `[credentials]` table
///
/// ```toml
/// [credentials]
/// OPENAI_API_KEY = "sk-..."
/// DEEPSEEK_API_KEY = "sk-..."
/// ```
pub struct ConfigFileSource {
    values: HashMap<String, String>,
}

impl ConfigFileSource {
    /// Load the file once at construction. A missing file yields an empty
    /// source rather than an error, so the environment can still supply keys.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("credential file {} not found, skipping", path.display());
                return Ok(ConfigFileSource {
                    values: HashMap::new(),
                });
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read credential file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let table: toml::Table = content
            .parse()
            .map_err(|e| Error::Config(format!("invalid credential file {}: {}", path.display(), e)))?;

        let mut values = HashMap::new();
        if let Some(toml::Value::Table(credentials)) = table.get("credentials") {
            for (name, value) in credentials {
                if let toml::Value::String(s) = value {
                    values.insert(name.clone(), s.clone());
                }
            }
        }

        Ok(ConfigFileSource { values })
    }

    /// Build a source from already-parsed pairs (used by tests)
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        ConfigFileSource {
            values: pairs.into_iter().collect(),
        }
    }
}

impl CredentialSource for ConfigFileSource {
    fn fetch(&self, name: &str) -> Option<String> {
        self.values.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn describe(&self) -> &str {
        "config file"
    }
}

/// Source backed by process environment variables
pub struct EnvSource;

impl CredentialSource for EnvSource {
    fn fetch(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }

    fn describe(&self) -> &str {
        "environment"
    }
}

/// Resolves named secrets through an ordered source chain, caching the first
/// hit per name for the process lifetime.
///
/// Constructed explicitly and handed to adapters at startup; there is no
/// process-global instance.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
    cache: Mutex<HashMap<String, String>>,
}

impl CredentialResolver {
    /// Build a resolver over an explicit source chain, highest priority first
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        CredentialResolver {
            sources,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Default chain: credential file (if given), then process environment
    pub fn with_defaults(credentials_file: Option<&Path>) -> Result<Self> {
        let mut sources: Vec<Box<dyn CredentialSource>> = Vec::new();
        if let Some(path) = credentials_file {
            sources.push(Box::new(ConfigFileSource::load(path)?));
        }
        sources.push(Box::new(EnvSource));
        Ok(CredentialResolver::new(sources))
    }

    /// Resolve `name` through the source chain, returning the cached value on
    /// repeat calls. Fails with [`Error::CredentialNotFound`] when every
    /// source is exhausted; callers must not retry without new configuration.
    pub fn resolve(&self, name: &str) -> Result<String> {
        // Check-then-set under one lock so concurrent first resolutions of
        // the same key observe a single cached value.
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(value) = cache.get(name) {
            return Ok(value.clone());
        }

        for source in &self.sources {
            if let Some(value) = source.fetch(name) {
                info!("resolved credential {} from {}", name, source.describe());
                cache.insert(name.to_string(), value.clone());
                return Ok(value);
            }
        }

        Err(Error::CredentialNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Source that counts how often it is consulted
    struct CountingSource {
        value: Option<String>,
        hits: Arc<AtomicUsize>,
    }

    impl CredentialSource for CountingSource {
        fn fetch(&self, _name: &str) -> Option<String> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.value.clone()
        }

        fn describe(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_resolve_from_env() {
        std::env::set_var("CHATGATE_TEST_RESOLVE_ENV", "from-env");
        let resolver = CredentialResolver::new(vec![Box::new(EnvSource)]);
        assert_eq!(
            resolver.resolve("CHATGATE_TEST_RESOLVE_ENV").unwrap(),
            "from-env"
        );
        std::env::remove_var("CHATGATE_TEST_RESOLVE_ENV");
    }

    #[test]
    fn test_missing_everywhere_is_credential_not_found() {
        let resolver = CredentialResolver::new(vec![Box::new(EnvSource)]);
        let err = resolver
            .resolve("CHATGATE_TEST_DEFINITELY_UNSET")
            .unwrap_err();
        assert!(matches!(err, Error::CredentialNotFound(name) if name == "CHATGATE_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_config_file_takes_priority_over_env() {
        std::env::set_var("CHATGATE_TEST_PRIORITY", "from-env");
        let file = ConfigFileSource::from_pairs([(
            "CHATGATE_TEST_PRIORITY".to_string(),
            "from-file".to_string(),
        )]);
        let resolver = CredentialResolver::new(vec![Box::new(file), Box::new(EnvSource)]);
        assert_eq!(
            resolver.resolve("CHATGATE_TEST_PRIORITY").unwrap(),
            "from-file"
        );
        std::env::remove_var("CHATGATE_TEST_PRIORITY");
    }

    #[test]
    fn test_second_resolve_hits_cache_not_source() {
        let hits = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            value: Some("cached-value".to_string()),
            hits: hits.clone(),
        };
        let resolver = CredentialResolver::new(vec![Box::new(source)]);

        assert_eq!(resolver.resolve("ANY_KEY").unwrap(), "cached-value");
        assert_eq!(resolver.resolve("ANY_KEY").unwrap(), "cached-value");

        // The source was consulted exactly once; the second call was served
        // from the cache.
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_value_is_skipped() {
        let file = ConfigFileSource::from_pairs([(
            "CHATGATE_TEST_EMPTY".to_string(),
            String::new(),
        )]);
        let resolver = CredentialResolver::new(vec![Box::new(file)]);
        assert!(matches!(
            resolver.resolve("CHATGATE_TEST_EMPTY"),
            Err(Error::CredentialNotFound(_))
        ));
    }

    #[test]
    fn test_config_file_source_parses_credentials_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[credentials]\nOPENAI_API_KEY = \"sk-test\"\n\n[other]\nignored = \"yes\""
        )
        .unwrap();

        let source = ConfigFileSource::load(file.path()).unwrap();
        assert_eq!(source.fetch(OPENAI_KEY_NAME), Some("sk-test".to_string()));
        assert_eq!(source.fetch("ignored"), None);
    }

    #[test]
    fn test_config_file_source_missing_file_is_empty() {
        let source =
            ConfigFileSource::load(Path::new("/nonexistent/chatgate-credentials.toml")).unwrap();
        assert_eq!(source.fetch(OPENAI_KEY_NAME), None);
    }
}
