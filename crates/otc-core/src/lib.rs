//! OTC machine driver core
//!
//! Shared building blocks for the service wrappers in `otc-services`:
//!
//! - [`CloudError`]: errors common to every resource kind
//! - [`ResourceStatus`]: one lifecycle for VPCs, subnets, addresses and servers
//! - [`poll_until`]: timeout-bounded, cancellable status polling
//!
//! # Example
//!
//! ```ignore
//! use otc_core::{poll_until, Probe, WaitConfig, WaitOutcome};
//! use tokio_util::sync::CancellationToken;
//!
//! let outcome = poll_until(&WaitConfig::default(), &CancellationToken::new(), || async {
//!     Ok::<_, otc_core::CloudError>(Probe::Reached)
//! })
//! .await?;
//! assert_eq!(outcome, WaitOutcome::Reached);
//! ```

pub mod error;
pub mod status;
pub mod wait;

// Re-exports
pub use error::{CloudError, Result};
pub use status::ResourceStatus;
pub use wait::{Probe, WaitConfig, WaitOutcome, WaitTarget, poll_until};
pub use tokio_util::sync::CancellationToken;
