//! Kubernetes integration for kudoctl
//!
//! This module handles all interactions with the cluster:
//! - Building clients from an explicit kubeconfig file
//! - Listing workload pods and KUDO framework versions
//! - Running commands through the pod exec subresource

mod client;
mod executor;
mod locator;

pub use client::{load_kube_config, K8sClient};
pub use executor::{attach_params, check_status, relay, ExecPhase, KubeExecutor, RemoteExecutor};
pub use locator::{locate, KubeLocator, Located, WorkloadLocator};
