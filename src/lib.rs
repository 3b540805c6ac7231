//! kudoctl library
//!
//! Resolves a running KUDO workload and runs the command its framework
//! version declares inside one of its containers.

pub mod cli;
pub mod config;
pub mod error;
pub mod k8s;
pub mod models;
pub mod operator;

pub use error::{OperatorError, OperatorResult};
