//! JSON configuration file: identifiers plus notification channel settings.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::model::{PlaceId, ServiceId};
use crate::ports::RunError;

/// File name of the configuration, looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Complete settings file.
pub struct Configuration {
    /// Schedule provider identifiers.
    pub recollect: RecollectSettings,
    /// Notification channels.
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Identifiers of the place and collection program to query.
pub struct RecollectSettings {
    /// Place identifier, usually a UUID.
    pub place_id: String,
    /// Service identifier, usually numeric.
    pub service_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Settings for every supported channel.
pub struct NotificationSettings {
    /// Pushover channel.
    pub pushover: PushoverSettings,
    /// ntfy channel.
    pub ntfy: NtfySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Pushover credentials.
pub struct PushoverSettings {
    /// Whether to deliver through Pushover.
    pub enabled: bool,
    /// Recipient user key.
    pub user_key: String,
    /// Application API token.
    pub api_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// ntfy topic settings.
pub struct NtfySettings {
    /// Whether to deliver through ntfy.
    pub enabled: bool,
    /// Topic to publish to.
    pub topic: String,
}

impl Configuration {
    /// Default location: `config.json` next to the running executable.
    ///
    /// Falls back to the working directory when the executable path is unknown.
    #[must_use]
    pub fn default_path() -> PathBuf {
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default()
            .join(CONFIG_FILE_NAME)
    }

    /// Read the configuration, creating a default file when none exists.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Config`] when the file is not valid JSON of the
    /// expected shape and [`RunError::Io`] when it cannot be read or created.
    pub fn load(path: &Path) -> Result<Self, RunError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let config = Self::default();
                config.save(path)?;
                tracing::warn!(
                    "Created default configuration at {}; fill in your identifiers and enable a channel",
                    path.display()
                );
                return Ok(config);
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_str(&raw)
            .map_err(|err| RunError::Config(format!("{}: {err}", path.display())))
    }

    /// Write the configuration as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RunError> {
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)
            .map_err(|err| RunError::Config(err.to_string()))?;
        buffer.push(b'\n');
        fs::write(path, buffer)?;
        Ok(())
    }

    /// Typed identifiers, rejecting empty placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Config`] if either identifier is still a placeholder.
    pub fn service_area(&self) -> Result<(PlaceId, ServiceId), RunError> {
        let place_id = self.recollect.place_id.trim();
        let service_id = self.recollect.service_id.trim();
        if place_id.is_empty() || service_id.is_empty() {
            return Err(RunError::Config(
                "recollect.place_id and recollect.service_id must be set".to_owned(),
            ));
        }
        Ok((
            PlaceId(place_id.to_owned()),
            ServiceId(service_id.to_owned()),
        ))
    }

    /// Check everything a run needs before touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Config`] for placeholder identifiers or an enabled
    /// channel without credentials.
    pub fn validate(&self) -> Result<(PlaceId, ServiceId), RunError> {
        let area = self.service_area()?;

        let pushover = &self.notifications.pushover;
        if pushover.enabled && (is_blank(&pushover.user_key) || is_blank(&pushover.api_token)) {
            return Err(RunError::Config(
                "pushover is enabled but user_key or api_token is missing".to_owned(),
            ));
        }

        let ntfy = &self.notifications.ntfy;
        if ntfy.enabled && is_blank(&ntfy.topic) {
            return Err(RunError::Config(
                "ntfy is enabled but topic is missing".to_owned(),
            ));
        }

        Ok(area)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
