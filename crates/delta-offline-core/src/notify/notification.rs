use serde::{Deserialize, Serialize};

/// Title shown on every push notification
pub const NOTIFICATION_TITLE: &str = "DELTA Lighting";

/// Body used when a push arrives without text ("New update from DELTA Lighting")
pub const DEFAULT_PUSH_BODY: &str = "تحديث جديد من DELTA Lighting";

const ICON_SVG: &str = r#"data:image/svg+xml,<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 192 192"><rect fill="%230066ff" width="192" height="192"/><text x="50%" y="50%" font-size="100" fill="white" dominant-baseline="middle" text-anchor="middle" font-weight="bold">⚡</text></svg>"#;

const BADGE_SVG: &str = r#"data:image/svg+xml,<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 96 96"><circle fill="%230066ff" cx="48" cy="48" r="48"/><text x="50%" y="50%" font-size="60" fill="white" dominant-baseline="middle" text-anchor="middle">⚡</text></svg>"#;

const ACTION_OPEN: &str = "open";
const ACTION_CLOSE: &str = "close";

/// A button on the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub actions: Vec<NotificationAction>,
}

/// Descriptor handed to the host for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub options: NotificationOptions,
}

impl Notification {
    /// Build the notification for a push payload.
    ///
    /// A missing or empty payload falls back to [`DEFAULT_PUSH_BODY`].
    pub fn for_push(payload: Option<&str>) -> Self {
        let body = payload
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_PUSH_BODY);

        Self {
            title: NOTIFICATION_TITLE.to_string(),
            options: NotificationOptions {
                body: body.to_string(),
                icon: ICON_SVG.to_string(),
                badge: BADGE_SVG.to_string(),
                actions: vec![
                    NotificationAction {
                        action: ACTION_OPEN.to_string(),
                        title: "فتح".to_string(),
                    },
                    NotificationAction {
                        action: ACTION_CLOSE.to_string(),
                        title: "إغلاق".to_string(),
                    },
                ],
            },
        }
    }
}

/// Which part of a notification the user activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// The notification body, no button
    Body,
    Open,
    Close,
    Other(String),
}

impl ClickAction {
    pub fn parse(action: Option<&str>) -> Self {
        match action {
            None | Some("") => ClickAction::Body,
            Some(ACTION_OPEN) => ClickAction::Open,
            Some(ACTION_CLOSE) => ClickAction::Close,
            Some(other) => ClickAction::Other(other.to_string()),
        }
    }

    /// Body clicks and the open button both bring the site forward
    pub fn opens_site(&self) -> bool {
        matches!(self, ClickAction::Body | ClickAction::Open)
    }
}

/// A click delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationClick {
    /// Host identifier of the clicked notification
    pub notification_id: String,
    pub action: ClickAction,
}

impl NotificationClick {
    pub fn new(notification_id: impl Into<String>, action: Option<&str>) -> Self {
        Self {
            notification_id: notification_id.into(),
            action: ClickAction::parse(action),
        }
    }
}
