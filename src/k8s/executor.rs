//! Remote command execution through the pod `exec` subresource

use std::future::Future;
use std::time::Duration;

use futures::future::OptionFuture;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use kube::api::{AttachParams, AttachedProcess};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use super::client::K8sClient;
use crate::config::OperatorConfig;
use crate::error::{OperatorError, OperatorResult};
use crate::models::ExecutionRequest;

const RELAY_BUFFER_SIZE: usize = 8 * 1024;

/// Lifecycle of a single exec session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecPhase {
    Idle,
    Negotiating,
    Streaming,
    Done,
    Failed,
}

impl std::fmt::Display for ExecPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecPhase::Idle => write!(f, "idle"),
            ExecPhase::Negotiating => write!(f, "negotiating"),
            ExecPhase::Streaming => write!(f, "streaming"),
            ExecPhase::Done => write!(f, "done"),
            ExecPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Runs a resolved command in its target container.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Blocks until the remote command exits or the stream fails.
    async fn execute(&self, config: &OperatorConfig, request: &ExecutionRequest) -> OperatorResult<()>;
}

/// Executor backed by the Kubernetes exec subresource, relaying to the local stdout/stderr
#[derive(Debug, Clone, Default)]
pub struct KubeExecutor;

impl RemoteExecutor for KubeExecutor {
    #[instrument(skip_all, fields(pod = %request.pod, container = %request.container))]
    async fn execute(&self, config: &OperatorConfig, request: &ExecutionRequest) -> OperatorResult<()> {
        let mut phase = ExecPhase::Idle;

        advance(&mut phase, ExecPhase::Negotiating);
        let mut attached = match open_session(config, request).await {
            Ok(attached) => attached,
            Err(e) => {
                advance(&mut phase, ExecPhase::Failed);
                return Err(e);
            }
        };

        advance(&mut phase, ExecPhase::Streaming);
        let streaming = stream_session(
            attached.stdout(),
            attached.stderr(),
            attached.take_status(),
            tokio::io::stdout(),
            tokio::io::stderr(),
        );
        let result = match with_deadline(config.timeout, streaming).await {
            Ok(()) => attached.join().await.map_err(OperatorError::stream),
            Err(e) => {
                attached.abort();
                Err(e)
            }
        };

        settle(&mut phase, &result);
        match &result {
            Ok(()) => info!(command = %request.argv.join(" "), "Remote command finished"),
            Err(e) => warn!(error = %e, "Remote command failed"),
        }

        result
    }
}

fn advance(phase: &mut ExecPhase, next: ExecPhase) {
    debug!(from = %phase, to = %next, "Exec phase transition");
    *phase = next;
}

/// Move a streaming session to its terminal phase.
fn settle(phase: &mut ExecPhase, result: &OperatorResult<()>) {
    match result {
        Ok(()) => advance(phase, ExecPhase::Done),
        Err(_) => advance(phase, ExecPhase::Failed),
    }
}

/// Bound `streaming` by `deadline`; no deadline waits for as long as it takes.
pub async fn with_deadline<F>(deadline: Option<Duration>, streaming: F) -> OperatorResult<()>
where
    F: Future<Output = OperatorResult<()>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout(deadline, streaming)
            .await
            .unwrap_or_else(|_| {
                Err(OperatorError::stream(format!(
                    "no exit status within {:?}",
                    deadline
                )))
            }),
        None => streaming.await,
    }
}

/// Exec parameters for a request.
///
/// A terminal carries stdout and stderr on one stream, so the separate
/// stderr channel is only requested without a tty.
pub fn attach_params(request: &ExecutionRequest, tty: bool) -> AttachParams {
    AttachParams::default()
        .container(request.container.clone())
        .stdin(false)
        .stdout(true)
        .stderr(!tty)
        .tty(tty)
}

async fn open_session(config: &OperatorConfig, request: &ExecutionRequest) -> OperatorResult<AttachedProcess> {
    let client = K8sClient::connect(config).await?;
    let params = attach_params(request, config.tty);

    client
        .pods_in(&request.namespace)
        .exec(&request.pod, request.argv.clone(), &params)
        .await
        .map_err(OperatorError::connection)
}

/// Relay the remote streams to the local ones, then read the exit status.
pub async fn stream_session<O, E, S, LO, LE>(
    stdout: Option<O>,
    stderr: Option<E>,
    status: Option<S>,
    local_stdout: LO,
    local_stderr: LE,
) -> OperatorResult<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
    S: Future<Output = Option<Status>>,
    LO: AsyncWrite + Unpin,
    LE: AsyncWrite + Unpin,
{
    let stdout = OptionFuture::from(stdout.map(|reader| relay(reader, local_stdout)));
    let stderr = OptionFuture::from(stderr.map(|reader| relay(reader, local_stderr)));

    let (stdout, stderr) = tokio::join!(stdout, stderr);
    stdout.transpose().map_err(OperatorError::stream)?;
    stderr.transpose().map_err(OperatorError::stream)?;

    let status = match status {
        Some(status) => status.await,
        None => None,
    };
    check_status(status)
}

/// Copy `reader` to `writer`, flushing each chunk before reading the next.
pub async fn relay<R, W>(mut reader: R, mut writer: W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; RELAY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        writer.flush().await?;
        total += n as u64;
    }

    Ok(total)
}

/// Map the exec status channel to a result.
///
/// A stream that closes without a status counts as a normal exit.
pub fn check_status(status: Option<Status>) -> OperatorResult<()> {
    let Some(status) = status else {
        return Ok(());
    };

    if status.status.as_deref() == Some("Success") {
        return Ok(());
    }

    Err(OperatorError::stream(format!(
        "{}: {}",
        status.reason.as_deref().unwrap_or("Failure"),
        status.message.as_deref().unwrap_or("remote command failed")
    )))
}
