//! Workload lookups: running pods and declared framework versions

use kube::api::ListParams;
use tracing::{debug, info, instrument};

use super::client::K8sClient;
use crate::config::OperatorConfig;
use crate::error::{OperatorError, OperatorResult};
use crate::models::{decode_framework_versions, ContainerGroup, FrameworkVersion};

/// Source of pods and framework versions for a workload.
///
/// The two lookups are independent and share no state.
#[allow(async_fn_in_trait)]
pub trait WorkloadLocator {
    /// Pods matching the workload's pod selector, in API order
    async fn container_groups(&self, config: &OperatorConfig) -> OperatorResult<Vec<ContainerGroup>>;

    /// Framework versions labelled `app=<name>`, in API order
    async fn framework_versions(&self, config: &OperatorConfig) -> OperatorResult<Vec<FrameworkVersion>>;
}

/// Results of both lookups, kept apart so one failing leaves the other intact
#[derive(Debug)]
pub struct Located {
    pub container_groups: OperatorResult<Vec<ContainerGroup>>,
    pub framework_versions: OperatorResult<Vec<FrameworkVersion>>,
}

impl Located {
    /// Both result sets, or the first error (pods before versions)
    pub fn into_results(self) -> OperatorResult<(Vec<ContainerGroup>, Vec<FrameworkVersion>)> {
        Ok((self.container_groups?, self.framework_versions?))
    }
}

/// Run both lookups concurrently and wait for both to finish.
#[instrument(skip_all, fields(name = %config.name, namespace = %config.namespace))]
pub async fn locate<L: WorkloadLocator>(config: &OperatorConfig, locator: &L) -> Located {
    let (container_groups, framework_versions) = tokio::join!(
        locator.container_groups(config),
        locator.framework_versions(config)
    );

    Located {
        container_groups,
        framework_versions,
    }
}

/// Locator backed by the Kubernetes API
#[derive(Debug, Clone, Default)]
pub struct KubeLocator;

impl WorkloadLocator for KubeLocator {
    #[instrument(skip_all, fields(selector = %config.pod_selector()))]
    async fn container_groups(&self, config: &OperatorConfig) -> OperatorResult<Vec<ContainerGroup>> {
        let client = K8sClient::connect(config).await?;
        let params = ListParams::default().labels(&config.pod_selector());

        let list = client
            .pods()
            .list(&params)
            .await
            .map_err(|e| lookup_error("pods", e))?;

        let groups: Vec<ContainerGroup> = list
            .items
            .iter()
            .filter_map(|pod| ContainerGroup::from_pod(pod, client.namespace()))
            .collect();

        info!(count = groups.len(), "Listed pods");
        Ok(groups)
    }

    #[instrument(skip_all, fields(selector = %config.version_selector()))]
    async fn framework_versions(&self, config: &OperatorConfig) -> OperatorResult<Vec<FrameworkVersion>> {
        let client = K8sClient::connect(config).await?;
        let params = ListParams::default().labels(&config.version_selector());

        let list = client
            .framework_versions()
            .list(&params)
            .await
            .map_err(|e| lookup_error("frameworkversions", e))?;
        debug!(count = list.items.len(), "Listed framework versions");

        let versions = decode_framework_versions(&list.items)?;
        info!(count = versions.len(), "Decoded framework versions");
        Ok(versions)
    }
}

/// API rejections are failed lookups; anything else means the cluster was unreachable.
fn lookup_error(resource: &str, err: kube::Error) -> OperatorError {
    match err {
        kube::Error::Api(response) => OperatorError::not_found(resource, response.message),
        other => OperatorError::connection(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    struct StaticLocator {
        groups: Vec<ContainerGroup>,
        versions_payload: serde_json::Value,
    }

    impl WorkloadLocator for StaticLocator {
        async fn container_groups(&self, _: &OperatorConfig) -> OperatorResult<Vec<ContainerGroup>> {
            Ok(self.groups.clone())
        }

        async fn framework_versions(&self, _: &OperatorConfig) -> OperatorResult<Vec<FrameworkVersion>> {
            let objects = serde_json::from_value::<Vec<kube::api::DynamicObject>>(
                self.versions_payload.clone(),
            )
            .map_err(|source| OperatorError::Decode {
                name: "list".to_string(),
                source,
            })?;
            decode_framework_versions(&objects)
        }
    }

    fn config() -> OperatorConfig {
        OperatorConfig {
            kubeconfig: "/nonexistent".into(),
            context: None,
            namespace: "default".to_string(),
            name: "zk".to_string(),
            selector_label: None,
            tty: true,
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_pod_results() {
        let locator = StaticLocator {
            groups: vec![ContainerGroup::new("default", "zk-0", &["zookeeper"])],
            versions_payload: serde_json::json!([{
                "apiVersion": "kudo.k8s.io/v1alpha1",
                "kind": "FrameworkVersion",
                "metadata": {"name": "zk-1.0"},
                "spec": {"commands": "not-a-list"}
            }]),
        };

        let located = locate(&config(), &locator).await;
        assert!(matches!(located.framework_versions, Err(OperatorError::Decode { .. })));
        assert_eq!(
            located.container_groups.as_ref().unwrap(),
            &vec![ContainerGroup::new("default", "zk-0", &["zookeeper"])]
        );
        assert!(matches!(located.into_results(), Err(OperatorError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_located_into_results() {
        let locator = StaticLocator {
            groups: vec![],
            versions_payload: serde_json::json!([]),
        };

        let (groups, versions) = locate(&config(), &locator).await.into_results().unwrap();
        assert!(groups.is_empty());
        assert!(versions.is_empty());
    }

    #[tokio::test]
    async fn test_kube_locator_missing_kubeconfig() {
        let located = locate(&config(), &KubeLocator).await;
        assert!(matches!(located.container_groups, Err(OperatorError::Connection(_))));
        assert!(matches!(located.framework_versions, Err(OperatorError::Connection(_))));
    }

    #[test]
    fn test_lookup_error_api_is_not_found() {
        let err = lookup_error(
            "pods",
            kube::Error::Api(ErrorResponse {
                status: "Failure".to_string(),
                message: "pods is forbidden".to_string(),
                reason: "Forbidden".to_string(),
                code: 403,
            }),
        );
        assert!(matches!(err, OperatorError::NotFound { ref resource, .. } if resource == "pods"));
    }

    #[test]
    fn test_lookup_error_transport_is_connection() {
        let transport = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = lookup_error("pods", kube::Error::Service(Box::new(transport)));
        assert!(matches!(err, OperatorError::Connection(_)));
    }
}
