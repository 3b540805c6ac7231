//! Typed view of the KUDO `FrameworkVersion` custom resource

use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{ApiResource, DynamicObject};
use serde::{Deserialize, Serialize};

use crate::error::{OperatorError, OperatorResult};

pub const FRAMEWORK_VERSION_GROUP: &str = "kudo.k8s.io";
pub const FRAMEWORK_VERSION_VERSION: &str = "v1alpha1";
pub const FRAMEWORK_VERSION_KIND: &str = "FrameworkVersion";
pub const FRAMEWORK_VERSION_PLURAL: &str = "frameworkversions";

/// API resource descriptor for `frameworkversions.kudo.k8s.io/v1alpha1`
pub fn framework_version_resource() -> ApiResource {
    ApiResource {
        group: FRAMEWORK_VERSION_GROUP.to_string(),
        version: FRAMEWORK_VERSION_VERSION.to_string(),
        api_version: format!("{}/{}", FRAMEWORK_VERSION_GROUP, FRAMEWORK_VERSION_VERSION),
        kind: FRAMEWORK_VERSION_KIND.to_string(),
        plural: FRAMEWORK_VERSION_PLURAL.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameworkVersion {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: FrameworkVersionSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkVersionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub commands: Vec<CommandTemplate>,
}

/// A command declared by a framework version
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub run_command: String,
}

impl CommandTemplate {
    pub fn new(run_command: &str) -> Self {
        Self {
            run_command: run_command.to_string(),
            ..Default::default()
        }
    }

    /// Split the raw command on whitespace. No quoting or escaping is honoured.
    pub fn argv(&self) -> Vec<String> {
        tokenize(&self.run_command)
    }
}

/// Whitespace tokenizer used for command templates
pub fn tokenize(command: &str) -> Vec<String> {
    command.split_whitespace().map(String::from).collect()
}

impl FrameworkVersion {
    pub fn new(name: &str, commands: &[&str]) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: FrameworkVersionSpec {
                commands: commands.iter().map(|c| CommandTemplate::new(c)).collect(),
                ..Default::default()
            },
        }
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("unknown")
    }

    pub fn first_command(&self) -> Option<&CommandTemplate> {
        self.spec.commands.first()
    }

    /// Re-encode a schema-less object and decode it into the typed shape.
    pub fn from_dynamic(obj: &DynamicObject) -> OperatorResult<Self> {
        let name = obj.metadata.name.clone().unwrap_or_else(|| "unknown".to_string());
        let decode = |source| OperatorError::Decode {
            name: name.clone(),
            source,
        };

        let value = serde_json::to_value(obj).map_err(decode)?;
        serde_json::from_value(value).map_err(decode)
    }
}

/// Decode every object of a list, failing on the first malformed one
pub fn decode_framework_versions(objects: &[DynamicObject]) -> OperatorResult<Vec<FrameworkVersion>> {
    objects.iter().map(FrameworkVersion::from_dynamic).collect()
}
