use crate::models::{Notification, NotificationKind};
use colored::*;
use std::sync::Mutex;

/// Receives the user-facing messages raised by the studio.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints one colored line per notification, for the terminal form.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    pub show_colors: bool,
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self { show_colors: true }
    }
}

impl ConsoleNotifier {
    pub fn format(&self, notification: &Notification) -> String {
        let (badge, color) = match notification.kind {
            NotificationKind::Success => ("✅", Color::Green),
            NotificationKind::Error => ("❌", Color::Red),
        };

        if self.show_colors {
            format!(
                "{} {} {}",
                badge,
                notification.title.color(color).bold(),
                notification.message
            )
        } else {
            format!("{} {} {}", badge, notification.title, notification.message)
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        println!("{}", self.format(&notification));
    }
}

/// Keeps every notification in memory, newest last.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.entries().into_iter().filter(|n| n.is_error()).collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}
