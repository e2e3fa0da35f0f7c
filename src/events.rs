//! Progress change notifications
//!
//! Surfaces that show derived summaries (percent complete, total points)
//! subscribe here instead of polling the progress store.

/// A change to a learner's progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A completion call changed a module's record
    ModuleCompleted {
        topic_id: String,
        lesson_id: String,
        module_id: String,
        points_earned: u32,
        total_points: u32,
        lesson_completed: bool,
        topic_completed: bool,
    },
    /// All progress for the course was deleted
    Reset { course_id: String },
}

pub trait ProgressListener {
    fn on_progress_changed(&self, event: &ProgressEvent);
}

impl<F> ProgressListener for F
where
    F: Fn(&ProgressEvent),
{
    fn on_progress_changed(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Handle returned by [`ProgressNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct ProgressNotifier {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Box<dyn ProgressListener + Send + Sync>)>,
}

impl ProgressNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&mut self, listener: L) -> SubscriptionId
    where
        L: ProgressListener + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != len_before
    }

    /// Deliver an event to every listener, in subscription order
    pub fn notify(&self, event: &ProgressEvent) {
        for (_, listener) in &self.listeners {
            listener.on_progress_changed(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn reset_event() -> ProgressEvent {
        ProgressEvent::Reset {
            course_id: "course".to_string(),
        }
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut notifier = ProgressNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        notifier.subscribe(move |event: &ProgressEvent| sink.lock().unwrap().push(event.clone()));

        notifier.notify(&reset_event());
        assert_eq!(*seen.lock().unwrap(), vec![reset_event()]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut notifier = ProgressNotifier::new();
        let count = Arc::new(Mutex::new(0));

        let sink = Arc::clone(&count);
        let id = notifier.subscribe(move |_: &ProgressEvent| *sink.lock().unwrap() += 1);

        notifier.notify(&reset_event());
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(&reset_event());

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(notifier.listener_count(), 0);
    }
}
