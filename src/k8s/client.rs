//! Kubernetes client construction from an explicit kubeconfig file

use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, DynamicObject},
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config,
};
use tracing::{debug, instrument};

use crate::config::OperatorConfig;
use crate::error::{OperatorError, OperatorResult};
use crate::models::framework_version_resource;

/// Wrapper around kube::Client scoped to the operator's namespace
#[derive(Clone)]
pub struct K8sClient {
    client: Client,
    namespace: String,
}

impl K8sClient {
    /// Build a client from the configured kubeconfig file.
    ///
    /// The file's existence is checked before anything else so a missing
    /// kubeconfig never reaches the network.
    #[instrument(skip_all, fields(kubeconfig = %config.kubeconfig.display()))]
    pub async fn connect(config: &OperatorConfig) -> OperatorResult<Self> {
        let kube_config = load_kube_config(config).await?;
        let client = Client::try_from(kube_config).map_err(OperatorError::connection)?;

        debug!("Built Kubernetes client");

        Ok(Self {
            client,
            namespace: config.namespace.clone(),
        })
    }

    /// Get the namespace this client operates in
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get a typed API for pods in the operator namespace
    pub fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    /// Get a typed API for pods in another namespace
    pub fn pods_in(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Get a dynamic API for framework versions in the operator namespace
    pub fn framework_versions(&self) -> Api<DynamicObject> {
        Api::namespaced_with(
            self.client.clone(),
            &self.namespace,
            &framework_version_resource(),
        )
    }
}

/// Read the kubeconfig file and turn it into a client configuration
pub async fn load_kube_config(config: &OperatorConfig) -> OperatorResult<Config> {
    if !config.kubeconfig.exists() {
        return Err(OperatorError::connection(format!(
            "failed to find the kubeconfig file ({})",
            config.kubeconfig.display()
        )));
    }

    let kubeconfig = Kubeconfig::read_from(&config.kubeconfig).map_err(OperatorError::connection)?;
    let options = KubeConfigOptions {
        context: config.context.clone(),
        ..Default::default()
    };

    Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(OperatorError::connection)
}
