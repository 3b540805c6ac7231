//! Picks the pod, container and command for an operator invocation

use crate::models::{ContainerGroup, ExecutionRequest, FrameworkVersion};

/// Why no execution request could be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatch {
    /// No running pod carries the workload label
    ContainerGroups,
    /// No framework version is labelled with the workload name
    VersionRecords,
    /// The first framework version declares no usable command
    Commands,
    /// The first pod has no containers
    Containers,
}

impl std::fmt::Display for NoMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoMatch::ContainerGroups => write!(f, "no pods found"),
            NoMatch::VersionRecords => write!(f, "no framework versions found"),
            NoMatch::Commands => write!(f, "framework version declares no command"),
            NoMatch::Containers => write!(f, "pod has no containers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Ready(ExecutionRequest),
    NoMatch(NoMatch),
}

/// Resolve the first pod, its first container and the first command of the
/// first framework version.
///
/// Nothing is inspected beyond list order: no health, readiness or freshness
/// ordering is applied.
pub fn resolve(groups: &[ContainerGroup], versions: &[FrameworkVersion]) -> Resolution {
    let Some(group) = groups.first() else {
        return Resolution::NoMatch(NoMatch::ContainerGroups);
    };
    let Some(version) = versions.first() else {
        return Resolution::NoMatch(NoMatch::VersionRecords);
    };

    let argv = match version.first_command() {
        Some(template) => template.argv(),
        None => return Resolution::NoMatch(NoMatch::Commands),
    };
    if argv.is_empty() {
        return Resolution::NoMatch(NoMatch::Commands);
    }

    let Some(container) = group.first_container() else {
        return Resolution::NoMatch(NoMatch::Containers);
    };

    Resolution::Ready(ExecutionRequest {
        namespace: group.namespace.clone(),
        pod: group.name.clone(),
        container: container.to_string(),
        argv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<ContainerGroup> {
        vec![
            ContainerGroup::new("default", "A", &["main", "sidecar"]),
            ContainerGroup::new("default", "B", &["main"]),
        ]
    }

    fn versions() -> Vec<FrameworkVersion> {
        vec![
            FrameworkVersion::new("V1", &["echo v1 first", "echo v1 second"]),
            FrameworkVersion::new("V2", &["echo v2"]),
        ]
    }

    #[test]
    fn test_first_of_each_list_wins() {
        let expected = Resolution::Ready(ExecutionRequest {
            namespace: "default".to_string(),
            pod: "A".to_string(),
            container: "main".to_string(),
            argv: vec!["echo".to_string(), "v1".to_string(), "first".to_string()],
        });

        assert_eq!(resolve(&groups(), &versions()), expected);

        let mut more_groups = groups();
        more_groups.push(ContainerGroup::new("default", "C", &["main"]));
        let mut more_versions = versions();
        more_versions.push(FrameworkVersion::new("V3", &["echo v3"]));
        assert_eq!(resolve(&more_groups, &more_versions), expected);
    }

    #[test]
    fn test_no_pods() {
        assert_eq!(
            resolve(&[], &versions()),
            Resolution::NoMatch(NoMatch::ContainerGroups)
        );
        assert_eq!(resolve(&[], &[]), Resolution::NoMatch(NoMatch::ContainerGroups));
    }

    #[test]
    fn test_no_versions() {
        assert_eq!(
            resolve(&groups(), &[]),
            Resolution::NoMatch(NoMatch::VersionRecords)
        );
    }

    #[test]
    fn test_version_without_commands() {
        let versions = vec![FrameworkVersion::new("V1", &[]), FrameworkVersion::new("V2", &["echo"])];
        assert_eq!(resolve(&groups(), &versions), Resolution::NoMatch(NoMatch::Commands));
    }

    #[test]
    fn test_blank_command() {
        let versions = vec![FrameworkVersion::new("V1", &["   "])];
        assert_eq!(resolve(&groups(), &versions), Resolution::NoMatch(NoMatch::Commands));
    }

    #[test]
    fn test_pod_without_containers() {
        let groups = vec![ContainerGroup::new("default", "A", &[])];
        assert_eq!(
            resolve(&groups, &versions()),
            Resolution::NoMatch(NoMatch::Containers)
        );
    }

    #[test]
    fn test_no_match_display() {
        assert_eq!(NoMatch::ContainerGroups.to_string(), "no pods found");
        assert_eq!(NoMatch::VersionRecords.to_string(), "no framework versions found");
    }
}
