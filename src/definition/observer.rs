use std::fmt;

/// Pushed to subscribers when a definition's observable validity flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidityEvent {
    /// Validity before the transition.
    pub was_valid: bool,
    /// Validity after the transition.
    pub is_valid: bool,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

type Callback = Box<dyn FnMut(&ValidityEvent)>;

/// Subscriber list owned by a definition.
///
/// Cloning yields an empty list: copies of a definition start without subscribers.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, f: impl FnMut(&ValidityEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(f)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cid, _)| *cid != id);
        self.callbacks.len() != before
    }

    /// Notify every subscriber, but only when the flag actually changes.
    pub(crate) fn notify(&mut self, was_valid: bool, is_valid: bool) {
        if was_valid == is_valid {
            return;
        }
        let event = ValidityEvent {
            was_valid,
            is_valid,
        };
        for (_, cb) in &mut self.callbacks {
            cb(&event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

impl Clone for Observers {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
