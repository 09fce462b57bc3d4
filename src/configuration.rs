use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_bool_from_anything;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::locale::Locale;
use crate::page::PageVariant;
use crate::waitlist_client::WaitlistClient;

/// Global configuration, loaded from `configuration/`. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub waitlist: WaitlistSettings,
    pub page: PageSettings,
}

/// Where entries go. Both the url and the key are provisioned outside this
/// repo; leaving either unset is allowed, it just makes every submission fail
/// with the network error.
#[derive(Deserialize, Clone)]
pub struct WaitlistSettings {
    pub base_url: Option<String>,
    /// Public (anon) client key, sent as a bearer token
    pub api_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl WaitlistSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    // an env var can't remove a value set in yaml, so a blank one
    // (`APP_WAITLIST__API_KEY=""`) means "not provisioned"
    fn collector_url(&self) -> Option<String> {
        self.base_url.clone().filter(|u| !u.trim().is_empty())
    }

    fn collector_key(&self) -> Option<Secret<String>> {
        self.api_key
            .clone()
            .filter(|k| !k.expose_secret().trim().is_empty())
    }

    /// Both the url and the key are present and non-blank
    pub fn is_configured(&self) -> bool {
        self.collector_url().is_some() && self.collector_key().is_some()
    }

    /// The collection path is filled in per page variant
    pub fn client(&self) -> Result<WaitlistClient, reqwest::Error> {
        WaitlistClient::new(
            self.collector_url(),
            self.collector_key(),
            String::new(),
            self.timeout(),
        )
    }
}

/// Which variant of the landing page to serve
#[derive(Deserialize, Clone)]
pub struct PageSettings {
    /// `ko` or `en`
    pub locale: String,
    pub endpoint_path: Option<String>,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub dual_form: bool,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub share_affordance: bool,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub privacy_consent: bool,
    /// Copied by the share button
    pub share_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub initial_signup_count: u64,
}

impl PageSettings {
    pub fn variant(&self) -> Result<PageVariant, String> {
        Ok(PageVariant {
            locale: Locale::try_from(self.locale.clone())?,
            endpoint_path: self.endpoint_path.clone().filter(|p| !p.trim().is_empty()),
            dual_form: self.dual_form,
            share_affordance: self.share_affordance,
            privacy_consent: self.privacy_consent,
        })
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid environment: {e}")),
        }
    }
}

/// Load `configuration/base.yaml`, then `configuration/{APP_ENVIRONMENT}.yaml`
/// (`local` if unset), then `APP_`-prefixed env vars, each layer overriding the
/// previous one.
///
/// `APP_WAITLIST__API_KEY=...` -> `Settings.waitlist.api_key`
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or("local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))).required(false))
        // env vars are always strings, hence `serde-aux` on the numeric and
        // boolean fields
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Settings>()
}
