//! The offline cache manager and its lifecycle.
//!
//! This module provides:
//! - `OfflineCacheManager`: lifecycle handlers the host calls (`on_install`,
//!   `on_activate`, `on_fetch`, `on_sync`, `on_push`, `on_notification_click`)
//! - `WorkerState`: `uninstalled -> installing -> installed -> activating -> active`
//! - `RegistrationStore`: persistence of the state between host processes

pub mod error;
pub mod manager;
pub mod registration;
pub mod state;

pub use error::WorkerError;
pub use manager::{ActivateReport, ClickOutcome, InstallReport, OfflineCacheManager, SyncOutcome};
pub use registration::{Registration, RegistrationStore};
pub use state::WorkerState;
