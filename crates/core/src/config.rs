//! Layered configuration for a job run.
//!
//! Values are merged from (lowest to highest precedence):
//!
//! 1. built-in defaults, including credentials supplied by the process
//!    environment adapter,
//! 2. `$BANNER_HOME/admin/banner_jobsub.yaml`,
//! 3. `~/.banner_jobsub`,
//! 4. overrides passed by the caller.
//!
//! A missing file is skipped. A file that exists but cannot be read or
//! parsed is fatal.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{de, Deserialize, Deserializer};

use crate::error::CoreError;
use crate::security::RoleSeeds;

/// Page length used when neither configuration nor the run archive set one.
pub const DEFAULT_PAGE_LENGTH: u32 = 55;

/// Footer written after each report page (form feed).
pub const DEFAULT_FOOTER: &str = "\x0c";

/// Site-wide configuration file, relative to `$BANNER_HOME`.
pub const SITE_CONFIG_PATH: &str = "admin/banner_jobsub.yaml";

/// Per-user configuration file, relative to the home directory.
pub const USER_CONFIG_FILE: &str = ".banner_jobsub";

/// One configuration layer. Every field is optional; unknown keys are ignored.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub username: Option<String>,
    pub password: Option<String>,
    pub instance: Option<String>,
    pub seed_one: Option<i64>,
    pub seed_three: Option<i64>,
    #[serde(deserialize_with = "page_length_value")]
    pub page_length: Option<u32>,
    pub footer: Option<String>,
    pub header: Option<String>,
}

impl ConfigLayer {
    /// Built-in defaults. Credentials come from the caller because core never
    /// reads the process environment itself.
    pub fn defaults(
        username: Option<String>,
        password: Option<String>,
        instance: Option<String>,
    ) -> Self {
        Self {
            username,
            password,
            instance,
            seed_one: None,
            seed_three: None,
            page_length: Some(DEFAULT_PAGE_LENGTH),
            footer: Some(DEFAULT_FOOTER.to_string()),
            header: Some(String::new()),
        }
    }

    /// Overlay `higher` on top of `self`. Values present in `higher` win.
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            username: higher.username.or(self.username),
            password: higher.password.or(self.password),
            instance: higher.instance.or(self.instance),
            seed_one: higher.seed_one.or(self.seed_one),
            seed_three: higher.seed_three.or(self.seed_three),
            page_length: higher.page_length.or(self.page_length),
            footer: higher.footer.or(self.footer),
            header: higher.header.or(self.header),
        }
    }

    /// Parse a layer from YAML text. An empty document is an empty layer.
    pub fn parse(yaml: &str, path: &Path) -> Result<Self, CoreError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| CoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a layer from disk. Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Check that every key is present, in declaration order.
    fn finalize(self) -> Result<JobsubConfig, CoreError> {
        let username = self.username.ok_or(CoreError::Configuration("username"))?;
        let password = self.password.ok_or(CoreError::Configuration("password"))?;
        let instance = self.instance.ok_or(CoreError::Configuration("instance"))?;
        let seeds = RoleSeeds::from_options(self.seed_one, self.seed_three)?;
        let page_length = self
            .page_length
            .ok_or(CoreError::Configuration("page_length"))?;
        let footer = self.footer.ok_or(CoreError::Configuration("footer"))?;
        let header = self.header.ok_or(CoreError::Configuration("header"))?;

        Ok(JobsubConfig {
            credential: Credential {
                username,
                password,
                instance,
            },
            seeds,
            page_length,
            footer,
            header,
        })
    }
}

/// `page_length` may be written as a number or as a quoted number.
fn page_length_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) => text.trim().parse().map(Some).map_err(|_| {
            de::Error::custom(format!(
                "page_length must be a non-negative integer, got {text:?}"
            ))
        }),
    }
}

impl fmt::Debug for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLayer")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("instance", &self.instance)
            .field("seed_one", &self.seed_one.map(|_| "<redacted>"))
            .field("seed_three", &self.seed_three.map(|_| "<redacted>"))
            .field("page_length", &self.page_length)
            .field("footer", &self.footer)
            .field("header", &self.header)
            .finish()
    }
}

/// Database login identity. Supplied externally, never derived.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password: String,
    /// `host[:port]/database` of the target instance.
    pub instance: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("instance", &self.instance)
            .finish()
    }
}

/// Fully resolved configuration. Every required value is present.
#[derive(Debug, Clone)]
pub struct JobsubConfig {
    pub credential: Credential,
    pub seeds: RoleSeeds,
    pub page_length: u32,
    pub footer: String,
    /// Report header template. Empty means "generate the default header".
    pub header: String,
}

/// Merges configuration layers into a [`JobsubConfig`].
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    defaults: ConfigLayer,
    files: Vec<PathBuf>,
}

impl ConfigResolver {
    pub fn new(defaults: ConfigLayer) -> Self {
        Self {
            defaults,
            files: Vec::new(),
        }
    }

    /// Resolver over the standard site and user files. A layer whose base
    /// directory is unknown is left out.
    pub fn standard(defaults: ConfigLayer, banner_home: Option<&Path>, home: Option<&Path>) -> Self {
        let mut resolver = Self::new(defaults);
        if let Some(banner_home) = banner_home {
            resolver = resolver.with_file(banner_home.join(SITE_CONFIG_PATH));
        }
        if let Some(home) = home {
            resolver = resolver.with_file(home.join(USER_CONFIG_FILE));
        }
        resolver
    }

    /// Append a file layer. Later files take precedence over earlier ones.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Merge defaults, every file layer, then `overrides`, and validate.
    pub fn resolve(&self, overrides: ConfigLayer) -> Result<JobsubConfig, CoreError> {
        let mut merged = self.defaults.clone();
        for path in &self.files {
            match ConfigLayer::load(path)? {
                Some(layer) => {
                    tracing::debug!(path = %path.display(), "Applied configuration file");
                    merged = merged.merge(layer);
                }
                None => {
                    tracing::debug!(path = %path.display(), "Configuration file not found, skipping");
                }
            }
        }
        merged.merge(overrides).finalize()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
