use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use crate::libs::observable::observable::Observable;
use crate::libs::patterns::observer::SubscriptionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub body: String,
}

impl Alert {
    /// Splits a "Title: body" message at the first ": ". A message with no separator is all
    /// title. Empty messages are not alerts.
    pub fn parse(kind: AlertKind, message: &str) -> Option<Alert> {
        if message.is_empty() {
            return None;
        }
        let (title, body) = match message.find(": ") {
            Some(at) => (&message[..at], &message[at + 2..]),
            None => (message, ""),
        };
        Some(Alert { kind, title: title.to_string(), body: body.to_string() })
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} {}", self.title, self.body)
        }
    }
}

/// Collects the alerts raised on an error and a success message. Only messages published after
/// attaching are shown; a stale message from before is not an alert.
pub struct StatusView {
    error: Arc<Observable<String>>,
    success: Arc<Observable<String>>,
    subscriptions: (SubscriptionId, SubscriptionId),
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl StatusView {
    pub fn attach(error: Arc<Observable<String>>, success: Arc<Observable<String>>) -> StatusView {
        let alerts = Arc::new(Mutex::new(Vec::new()));
        let error_id = error.subscribe_with(alerter(AlertKind::Error, alerts.clone()), false);
        let success_id = success.subscribe_with(alerter(AlertKind::Success, alerts.clone()), false);
        StatusView {
            error,
            success,
            subscriptions: (error_id, success_id),
            alerts,
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last_alert(&self) -> Option<Alert> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

fn alerter(kind: AlertKind, alerts: Arc<Mutex<Vec<Alert>>>) -> impl Fn(&String) + Send + Sync {
    move |message: &String| {
        if let Some(alert) = Alert::parse(kind, message) {
            debug!("{:?} alert: {}", kind, alert);
            alerts.lock().unwrap_or_else(PoisonError::into_inner).push(alert);
        }
    }
}

impl Drop for StatusView {
    fn drop(&mut self) {
        self.error.unsubscribe(self.subscriptions.0);
        self.success.unsubscribe(self.subscriptions.1);
    }
}
