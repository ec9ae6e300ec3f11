//! Configuration module
//!
//! Attachment settings are configured once at setup time per record type and
//! are immutable afterwards. Every setting exists at two levels: a concrete
//! model-level default and an optional per-field override. Resolution picks
//! the first set value of `[field override, model default]` per setting;
//! there is no deeper merging across levels.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AttachmentErrorKind;

/// Default maximum upload size: 5 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 5_242_880;
/// Default destination subdirectory under the base dir.
pub const DEFAULT_FIELD_DIR: &str = "files";
/// Default base directory under the web root.
pub const DEFAULT_BASE_DIR: &str = "uploads";
/// Default physical filename template.
pub const DEFAULT_PHYSICAL_NAME: &str = "{ID}-{FILENAME}";

/// Allow-rule for MIME types and file extensions.
///
/// `Any` is the wildcard; `OneOf` matches case-insensitively and also passes
/// everything when the set itself contains a `"*"` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    Any,
    OneOf(Vec<String>),
}

impl MatchRule {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            MatchRule::Any => true,
            MatchRule::OneOf(allowed) => allowed
                .iter()
                .any(|a| a == "*" || a.eq_ignore_ascii_case(value)),
        }
    }
}

/// Model-level defaults, all concrete. Applied to every field that does not
/// override the setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefaults {
    pub dir: String,
    pub types: MatchRule,
    pub extensions: MatchRule,
    /// Maximum size in bytes, exclusive. 0 means unlimited.
    pub max_size: u64,
    pub physical_name: String,
    pub create_dir: bool,
    pub error_messages: HashMap<AttachmentErrorKind, String>,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            dir: DEFAULT_FIELD_DIR.to_string(),
            types: MatchRule::Any,
            extensions: MatchRule::Any,
            max_size: DEFAULT_MAX_SIZE,
            physical_name: DEFAULT_PHYSICAL_NAME.to_string(),
            create_dir: true,
            error_messages: HashMap::new(),
        }
    }
}

/// Per-field overrides, all optional. An unset field falls back to the
/// model-level default; the error-message map falls back per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldOverrides {
    pub dir: Option<String>,
    pub types: Option<MatchRule>,
    pub extensions: Option<MatchRule>,
    pub max_size: Option<u64>,
    pub physical_name: Option<String>,
    pub create_dir: Option<bool>,
    #[serde(default)]
    pub error_messages: HashMap<AttachmentErrorKind, String>,
}

/// Attachment configuration for one record type: the base directory, the
/// model-level defaults, and the configured fields with their overrides.
///
/// Shared read-only across all records of the type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentSettings {
    pub base_dir: String,
    pub defaults: ModelDefaults,
    pub fields: BTreeMap<String, FieldOverrides>,
}

impl AttachmentSettings {
    pub fn new(base_dir: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            defaults: ModelDefaults::default(),
            fields: BTreeMap::new(),
        }
    }

    /// Register a field with its overrides. Builder-style for setup code.
    pub fn field(mut self, label: impl Into<String>, overrides: FieldOverrides) -> Self {
        self.fields.insert(label.into(), overrides);
        self
    }

    pub fn with_defaults(mut self, defaults: ModelDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Configured field labels in deterministic order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Resolve the effective configuration for one field. Unknown labels
    /// resolve to the plain model defaults.
    pub fn resolve(&self, label: &str) -> ResolvedField {
        let overrides = self.fields.get(label).cloned().unwrap_or_default();
        ResolvedField::resolve(&self.defaults, overrides)
    }
}

impl Default for AttachmentSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}

/// The effective configuration for one field after two-level resolution.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub dir: String,
    pub types: MatchRule,
    pub extensions: MatchRule,
    pub max_size: u64,
    pub physical_name: String,
    pub create_dir: bool,
    field_messages: HashMap<AttachmentErrorKind, String>,
    default_messages: HashMap<AttachmentErrorKind, String>,
}

/// First set value of `[field override, model default]`.
fn first_set<T: Clone>(field: Option<T>, model: &T) -> T {
    field.unwrap_or_else(|| model.clone())
}

impl ResolvedField {
    pub fn resolve(defaults: &ModelDefaults, overrides: FieldOverrides) -> Self {
        Self {
            dir: first_set(overrides.dir, &defaults.dir),
            types: first_set(overrides.types, &defaults.types),
            extensions: first_set(overrides.extensions, &defaults.extensions),
            max_size: first_set(overrides.max_size, &defaults.max_size),
            physical_name: first_set(overrides.physical_name, &defaults.physical_name),
            create_dir: first_set(overrides.create_dir, &defaults.create_dir),
            field_messages: overrides.error_messages,
            default_messages: defaults.error_messages.clone(),
        }
    }

    /// User-facing message for an error kind: field-level entry first, then
    /// model-level, then the kind's built-in text.
    pub fn message_for(&self, kind: AttachmentErrorKind) -> String {
        self.field_messages
            .get(&kind)
            .or_else(|| self.default_messages.get(&kind))
            .cloned()
            .unwrap_or_else(|| kind.default_message().to_string())
    }
}

/// Deployment-level processor configuration: where the web-accessible tree
/// lives and where the platform stages incoming uploads.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub web_root: PathBuf,
    pub staging_dir: PathBuf,
}

impl ProcessorConfig {
    pub fn new(web_root: impl Into<PathBuf>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
            staging_dir: staging_dir.into(),
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let web_root = env::var("ANEXA_WEB_ROOT")
            .map_err(|_| anyhow::anyhow!("ANEXA_WEB_ROOT not configured"))?;
        let staging_dir = env::var("ANEXA_STAGING_DIR")
            .map_err(|_| anyhow::anyhow!("ANEXA_STAGING_DIR not configured"))?;

        let config = Self::new(web_root, staging_dir);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.web_root.as_os_str().is_empty() {
            anyhow::bail!("web root must not be empty");
        }
        if self.staging_dir.as_os_str().is_empty() {
            anyhow::bail!("staging dir must not be empty");
        }
        Ok(())
    }
}
