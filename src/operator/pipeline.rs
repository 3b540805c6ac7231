use tracing::{info, instrument, warn};

use super::resolver::{resolve, NoMatch, Resolution};
use crate::config::OperatorConfig;
use crate::error::OperatorResult;
use crate::k8s::{locate, RemoteExecutor, WorkloadLocator};
use crate::models::ExecutionRequest;

/// Exit code when nothing matched the workload name
pub const EXIT_NO_MATCH: u8 = 2;

/// Result of a pipeline run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Executed(ExecutionRequest),
    NoMatch(NoMatch),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Executed(_) => 0,
            Outcome::NoMatch(_) => EXIT_NO_MATCH,
        }
    }
}

/// Locate, resolve and execute the operator command for `config.name`.
///
/// Both lookups must finish before resolution; the executor is only called
/// when a pod, a framework version and a command were all found.
#[instrument(skip_all, fields(name = %config.name, namespace = %config.namespace))]
pub async fn run_operator<L, E>(config: &OperatorConfig, locator: &L, executor: &E) -> OperatorResult<Outcome>
where
    L: WorkloadLocator,
    E: RemoteExecutor,
{
    let (groups, versions) = locate(config, locator).await.into_results()?;
    info!(pods = groups.len(), versions = versions.len(), "Located workload");

    match resolve(&groups, &versions) {
        Resolution::Ready(request) => {
            info!(exec = %request, "Executing operator command");
            executor.execute(config, &request).await?;
            Ok(Outcome::Executed(request))
        }
        Resolution::NoMatch(reason) => {
            warn!(%reason, "Nothing to execute");
            Ok(Outcome::NoMatch(reason))
        }
    }
}
