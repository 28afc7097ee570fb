//! HTTP client for selfheal-api.

pub mod client;

pub use client::{
    ClientError, LeakReport, ReadyState, RestartReport, SelfhealClient, ServiceStatus, WorkReport,
};
