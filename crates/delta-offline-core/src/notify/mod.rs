//! Push notifications and window-client routing.
//!
//! This module provides:
//! - `Notification`: the fixed-shape descriptor shown for every push
//! - `NotificationClick` / `ClickAction`: what the user clicked
//! - `ClientHost`: the host seam for showing notifications and managing windows

pub mod host;
pub mod notification;

pub use host::{ClientHost, HostError, WindowClient};
pub use notification::{
    ClickAction, Notification, NotificationAction, NotificationClick, NotificationOptions,
    DEFAULT_PUSH_BODY, NOTIFICATION_TITLE,
};
