//! Session context
//!
//! Holds the signed-in user, a loading flag and the active toast. A
//! [`Session`] is owned by the [`crate::AppContext`] and handed to every
//! handler explicitly; front ends that want to react to changes subscribe to
//! its broadcast channel instead of polling.

use imgpress_model::prelude::{TOAST_DURATION, Toast, User};
use tokio::sync::broadcast;
use tokio::time::Instant;

const EVENT_CAPACITY: usize = 32;

/// Change notifications published by a [`Session`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    UserChanged(Option<User>),
    Loading(bool),
    Toast(Toast),
    ToastCleared,
}

/// The single active toast and when it stops being visible
#[derive(Debug, Clone, Default)]
pub struct ToastSlot {
    active: Option<(Toast, Instant)>,
}

impl ToastSlot {
    /// Replace whatever is showing with `toast`, visible until `now + 3s`
    pub fn show(&mut self, toast: Toast, now: Instant) {
        self.active = Some((toast, now + TOAST_DURATION));
    }

    /// The toast visible at `now`
    pub fn current(&self, now: Instant) -> Option<&Toast> {
        match &self.active {
            Some((toast, deadline)) if now < *deadline => Some(toast),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.active.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Drop the toast once its window has passed. Returns whether it was
    /// dropped.
    pub fn clear_expired(&mut self, now: Instant) -> bool {
        match &self.active {
            Some((_, deadline)) if now >= *deadline => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}

/// Per-process session state
#[derive(Debug)]
pub struct Session {
    user: Option<User>,
    loading: bool,
    toast: ToastSlot,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            user: None,
            loading: false,
            toast: ToastSlot::default(),
            events,
        }
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user.clone();
        self.publish(SessionEvent::UserChanged(user));
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Plain flag, not a counter: overlapping calls can leave it stale.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.publish(SessionEvent::Loading(loading));
    }

    pub fn show_toast(&mut self, toast: Toast) {
        self.show_toast_at(toast, Instant::now());
    }

    pub fn show_toast_at(&mut self, toast: Toast, now: Instant) {
        self.toast.show(toast.clone(), now);
        self.publish(SessionEvent::Toast(toast));
    }

    /// Toast visible right now
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.current(Instant::now())
    }

    pub fn toast_at(&self, now: Instant) -> Option<&Toast> {
        self.toast.current(now)
    }

    /// Wait out the active toast's window and clear it.
    ///
    /// A toast shown while waiting keeps its own, later deadline.
    pub async fn expire_toast(&mut self) {
        while let Some(deadline) = self.toast.deadline() {
            tokio::time::sleep_until(deadline).await;
            if self.toast.clear_expired(Instant::now()) {
                self.publish(SessionEvent::ToastCleared);
                return;
            }
        }
    }

    /// Forget the user and any toast
    pub fn reset(&mut self) {
        self.set_user(None);
        if self.toast.active.take().is_some() {
            self.publish(SessionEvent::ToastCleared);
        }
    }
}
