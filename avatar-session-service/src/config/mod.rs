use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config::{layered_builder, ServerConfig};
use service_core::error::AppError;

pub const DEFAULT_AVATAR_ID: &str = "acab2901-7118-431e-881c-914992e194a6";
pub const DEFAULT_VOICE_ID: &str = "d06244d0-6311-46b3-a740-abc8d46ed494";
pub const DEFAULT_API_BASE_URL: &str = "https://api.liveavatar.com";

/// Unprefixed environment variables mapped onto `liveavatar.*` keys.
const LIVEAVATAR_ENV_KEYS: [(&str, &str); 5] = [
    ("LIVEAVATAR_API_KEY", "liveavatar.api_key"),
    ("AVATAR_ID", "liveavatar.avatar_id"),
    ("VOICE_ID", "liveavatar.voice_id"),
    ("CONTEXT_ID", "liveavatar.context_id"),
    ("LIVEAVATAR_API_BASE_URL", "liveavatar.api_base_url"),
];

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub liveavatar: LiveAvatarSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LiveAvatarSettings {
    /// Server-held key for the token endpoint. Checked per request, not at startup.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    #[serde(default = "default_avatar_id")]
    pub avatar_id: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    /// Knowledge context attached to the avatar persona. Checked per request.
    #[serde(default)]
    pub context_id: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_avatar_id() -> String {
    DEFAULT_AVATAR_ID.to_string()
}

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl LiveAvatarSettings {
    /// Settings with the given mandatory values and every optional value defaulted.
    pub fn new(api_key: Option<&str>, context_id: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(|key| Secret::new(key.to_string())),
            avatar_id: default_avatar_id(),
            voice_id: default_voice_id(),
            context_id: context_id.map(str::to_string),
            api_base_url: default_api_base_url(),
        }
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Blank values are treated the same as unset ones.
    fn normalized(mut self) -> Self {
        self.api_key = self
            .api_key
            .filter(|key| !key.expose_secret().trim().is_empty());
        self.context_id = self.context_id.filter(|id| !id.trim().is_empty());
        if self.avatar_id.trim().is_empty() {
            self.avatar_id = default_avatar_id();
        }
        if self.voice_id.trim().is_empty() {
            self.voice_id = default_voice_id();
        }
        if self.api_base_url.trim().is_empty() {
            self.api_base_url = default_api_base_url();
        }
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.context_id.is_some()
    }
}

impl Settings {
    /// Load settings from `configuration/base.yaml`, `APP_*` variables and the
    /// LiveAvatar environment variables.
    pub fn load() -> Result<Self, AppError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::load`] but resolves the LiveAvatar variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_path = std::env::current_dir()?;
        let configuration_directory = if base_path.ends_with("avatar-session-service") {
            base_path.join("configuration")
        } else {
            base_path.join("avatar-session-service").join("configuration")
        };

        let mut builder = layered_builder(&configuration_directory.join("base.yaml"))
            .set_default("liveavatar.avatar_id", DEFAULT_AVATAR_ID)?
            .set_default("liveavatar.voice_id", DEFAULT_VOICE_ID)?
            .set_default("liveavatar.api_base_url", DEFAULT_API_BASE_URL)?;

        for (variable, key) in LIVEAVATAR_ENV_KEYS {
            builder = builder.set_override_option(key, lookup(variable))?;
        }

        let mut settings = builder.build()?.try_deserialize::<Settings>()?;
        settings.liveavatar = settings.liveavatar.normalized();

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load_with(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = load_from(&[]);

        assert!(settings.liveavatar.api_key.is_none());
        assert!(settings.liveavatar.context_id.is_none());
        assert_eq!(settings.liveavatar.avatar_id, DEFAULT_AVATAR_ID);
        assert_eq!(settings.liveavatar.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(settings.liveavatar.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!settings.liveavatar.is_configured());
    }

    #[test]
    fn test_environment_values_override_defaults() {
        let settings = load_from(&[
            ("LIVEAVATAR_API_KEY", "key-123"),
            ("AVATAR_ID", "avatar-1"),
            ("VOICE_ID", "voice-1"),
            ("CONTEXT_ID", "ctx-1"),
        ]);

        let liveavatar = settings.liveavatar;
        assert_eq!(
            liveavatar.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("key-123")
        );
        assert_eq!(liveavatar.avatar_id, "avatar-1");
        assert_eq!(liveavatar.voice_id, "voice-1");
        assert_eq!(liveavatar.context_id.as_deref(), Some("ctx-1"));
        assert!(liveavatar.is_configured());
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let settings = load_from(&[
            ("LIVEAVATAR_API_KEY", ""),
            ("AVATAR_ID", ""),
            ("CONTEXT_ID", "  "),
        ]);

        assert!(settings.liveavatar.api_key.is_none());
        assert!(settings.liveavatar.context_id.is_none());
        assert_eq!(settings.liveavatar.avatar_id, DEFAULT_AVATAR_ID);
    }

    #[test]
    fn test_api_key_is_redacted_in_debug_output() {
        let settings = LiveAvatarSettings::new(Some("super-secret"), Some("ctx"));
        let rendered = format!("{:?}", settings);

        assert!(!rendered.contains("super-secret"));
    }
}
