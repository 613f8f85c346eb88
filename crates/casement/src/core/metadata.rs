//! Application metadata reported to the backend
//!
//! The backend uses these values for things like the "About" dialog, audio
//! mixer entries and task switcher labels. Empty fields are never sent.

use crate::backend::Backend;
use crate::error::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Property key for [`AppMetadata::identifier`]
pub const IDENTIFIER_KEY: &str = "app.metadata.identifier";
/// Property key for [`AppMetadata::name`]
pub const NAME_KEY: &str = "app.metadata.name";
/// Property key for [`AppMetadata::version`]
pub const VERSION_KEY: &str = "app.metadata.version";
/// Property key for [`AppMetadata::creator`]
pub const CREATOR_KEY: &str = "app.metadata.creator";
/// Property key for [`AppMetadata::copyright`]
pub const COPYRIGHT_KEY: &str = "app.metadata.copyright";
/// Property key for [`AppMetadata::url`]
pub const URL_KEY: &str = "app.metadata.url";
/// Property key for [`AppMetadata::kind`]
pub const TYPE_KEY: &str = "app.metadata.type";

/// Descriptive information about the running application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Reverse-DNS identifier, e.g. `com.example.demo`
    pub identifier: String,
    /// Human readable application name
    pub name: String,
    /// Application version string
    pub version: String,
    /// Author or organization
    pub creator: String,
    /// Copyright notice
    pub copyright: String,
    /// Homepage
    pub url: String,
    /// One of `game`, `mediaplayer` or `application`
    #[serde(rename = "type")]
    pub kind: String,
}

impl AppMetadata {
    /// Metadata with just a name and version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Key/value pairs for every non-empty field
    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (IDENTIFIER_KEY, self.identifier.as_str()),
            (NAME_KEY, self.name.as_str()),
            (VERSION_KEY, self.version.as_str()),
            (CREATOR_KEY, self.creator.as_str()),
            (COPYRIGHT_KEY, self.copyright.as_str()),
            (URL_KEY, self.url.as_str()),
            (TYPE_KEY, self.kind.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    }

    pub(crate) fn apply(&self, backend: &dyn Backend) -> Result<()> {
        for (key, value) in self.properties() {
            ensure(backend, backend.set_app_metadata_property(key, value))?;
        }
        Ok(())
    }
}
