//! Processing module - side channel to remote job-processing backends

mod proxy;

pub use proxy::{ProcessingProxy, ProxyRequest, Service};
