use k8s_openapi::api::core::v1::Pod;

/// A running pod as seen at lookup time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerGroup {
    pub namespace: String,
    pub name: String,
    /// Container names in pod spec order
    pub containers: Vec<String>,
}

impl ContainerGroup {
    pub fn new(namespace: &str, name: &str, containers: &[&str]) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            containers: containers.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Build from a pod, falling back to `default_namespace` when the pod omits it.
    /// Pods without a name are not addressable and yield `None`.
    pub fn from_pod(pod: &Pod, default_namespace: &str) -> Option<Self> {
        let name = pod.metadata.name.clone()?;
        let namespace = pod
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| default_namespace.to_string());
        let containers = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default();

        Some(Self {
            namespace,
            name,
            containers,
        })
    }

    pub fn first_container(&self) -> Option<&str> {
        self.containers.first().map(String::as_str)
    }
}
