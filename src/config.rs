use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::cli::OperatorArgs;
use crate::error::{OperatorError, OperatorResult};

/// Location of the kubeconfig file relative to the user's home directory
pub const DEFAULT_KUBECONFIG_PATH: &str = ".kube/config";

/// Settings layered from `.env` and `KUDOCTL_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_kubeconfig")]
    pub kubeconfig: Option<String>,

    #[serde(default)]
    pub context: Option<String>,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_tty")]
    pub tty: bool,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub selector_label: Option<String>,
}

fn default_kubeconfig() -> Option<String> {
    None
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_tty() -> bool {
    true
}

impl Settings {
    pub fn load() -> OperatorResult<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("KUDOCTL").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kubeconfig: default_kubeconfig(),
            context: None,
            namespace: default_namespace(),
            tty: default_tty(),
            timeout_secs: None,
            selector_label: None,
        }
    }
}

/// Immutable per-invocation configuration shared by every pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorConfig {
    pub kubeconfig: PathBuf,
    pub context: Option<String>,
    pub namespace: String,
    pub name: String,
    /// Label key used to select pods; the workload name itself when unset
    pub selector_label: Option<String>,
    pub tty: bool,
    /// Deadline around the streaming phase; unbounded when unset
    pub timeout: Option<Duration>,
}

impl OperatorConfig {
    /// Merge command-line arguments over the environment settings.
    pub fn resolve(settings: Settings, args: &OperatorArgs) -> OperatorResult<Self> {
        let kubeconfig = match args.kubeconfig.clone().or(settings.kubeconfig.map(PathBuf::from)) {
            Some(path) => path,
            None => default_kubeconfig_path()?,
        };

        Ok(Self {
            kubeconfig,
            context: args.context.clone().or(settings.context),
            namespace: args.namespace.clone().unwrap_or(settings.namespace),
            name: args.name.clone(),
            selector_label: args.selector_label.clone().or(settings.selector_label),
            tty: settings.tty && !args.no_tty,
            timeout: args
                .timeout
                .or(settings.timeout_secs)
                .map(Duration::from_secs),
        })
    }

    /// Label selector for the workload's pods.
    ///
    /// Key and value are both the workload name unless a label key was configured.
    pub fn pod_selector(&self) -> String {
        let key = self.selector_label.as_deref().unwrap_or(&self.name);
        format!("{}={}", key, self.name)
    }

    /// Label selector for the workload's framework versions
    pub fn version_selector(&self) -> String {
        format!("app={}", self.name)
    }
}

/// `$HOME/.kube/config`
pub fn default_kubeconfig_path() -> OperatorResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_KUBECONFIG_PATH))
        .ok_or_else(|| OperatorError::Config("failed to determine user's home dir".to_string()))
}
