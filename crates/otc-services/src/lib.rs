//! Open Telekom Cloud service wrappers
//!
//! [`Client`] authenticates against the identity service, resolves the VPC,
//! compute and image endpoints, and exposes one method per resource
//! operation plus status-polling helpers.
//!
//! # Example
//!
//! ```ignore
//! use otc_config::DriverConfig;
//! use otc_services::{Client, ResourceStatus};
//!
//! let mut client = Client::authenticate(&DriverConfig::load()?).await?;
//! client.init_network()?;
//!
//! let vpc = client.create_vpc("machine-vpc").await?;
//! client
//!     .wait_for_vpc_status(&vpc.id, ResourceStatus::Active)
//!     .await?
//!     .into_result("machine-vpc")?;
//! ```

pub mod auth;
mod client;
pub mod compute;
pub mod error;
pub mod models;
mod names;
pub mod network;

// Re-exports
pub use auth::Session;
pub use client::Client;
pub use compute::{
    DEFAULT_AVAILABILITY_ZONE, DEFAULT_DISK_SIZE, DEFAULT_FLAVOR, DEFAULT_IMAGE,
    DEFAULT_VOLUME_TYPE,
};
pub use error::{Result, ServiceError};
pub use models::{
    CreateInstanceOpts, DiskOpts, Flavor, FloatingIp, Image, Instance, InstanceAddress, KeyPair,
    PortRange, SecurityGroup, SecurityGroupRule, Subnet, Vpc,
};
pub use names::random_name;
pub use otc_core::{
    CancellationToken, CloudError, Probe, ResourceStatus, WaitConfig, WaitOutcome, WaitTarget,
};
