//! Single source of truth for the configuration tree.
//!
//! Every change replaces the whole tree: callers build a deep copy, edit it,
//! and hand it to [`ConfigStore::propose`]. Installed trees are frozen behind
//! an `Arc`, so a [`Snapshot`] held by a view never changes under it.
//! Writers on other threads go through [`UpdateSender`]; their updates are
//! queued and applied on the owning thread in send order.

use std::ops::Deref;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, warn};

use crate::config::ConfigurationTree;
use crate::error::ConfigValidationError;

/// Immutable view of the tree at one revision.
#[derive(Debug, Clone)]
pub struct Snapshot {
    tree: Arc<ConfigurationTree>,
    revision: u64,
}

impl Snapshot {
    /// Monotonic counter, bumped by every accepted proposal.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Deep copy suitable for editing and proposing back.
    pub fn to_tree(&self) -> ConfigurationTree {
        ConfigurationTree::clone(&self.tree)
    }
}

impl Deref for Snapshot {
    type Target = ConfigurationTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

/// Handle returned by [`ConfigStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Snapshot)>;
type TreeEdit = Box<dyn FnOnce(&mut ConfigurationTree) + Send>;

/// Update queued by a writer that does not own the store.
pub enum PendingUpdate {
    /// Install this tree as-is.
    Replace(Box<ConfigurationTree>),
    /// Apply this edit to a copy of whatever is current when it is drained.
    Edit(TreeEdit),
}

/// Cloneable, `Send` handle for publishing updates from worker threads.
#[derive(Clone)]
pub struct UpdateSender {
    tx: Sender<PendingUpdate>,
}

impl UpdateSender {
    /// Queue an update; returns `false` once the store has been dropped.
    pub fn send(&self, update: PendingUpdate) -> bool {
        self.tx.send(update).is_ok()
    }

    pub fn replace(&self, tree: ConfigurationTree) -> bool {
        self.send(PendingUpdate::Replace(Box::new(tree)))
    }

    pub fn edit(&self, edit: impl FnOnce(&mut ConfigurationTree) + Send + 'static) -> bool {
        self.send(PendingUpdate::Edit(Box::new(edit)))
    }
}

/// Holds the current snapshot and notifies subscribers on every change.
pub struct ConfigStore {
    current: Snapshot,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    pending_tx: Sender<PendingUpdate>,
    pending_rx: Receiver<PendingUpdate>,
}

impl ConfigStore {
    /// Create a store seeded with `initial`, which must pass validation.
    pub fn new(initial: ConfigurationTree) -> Result<Self, ConfigValidationError> {
        initial.validate()?;
        Ok(Self::seeded(initial))
    }

    fn seeded(tree: ConfigurationTree) -> Self {
        let (pending_tx, pending_rx) = mpsc::channel();
        Self {
            current: Snapshot {
                tree: Arc::new(tree),
                revision: 0,
            },
            subscribers: Vec::new(),
            next_subscription: 1,
            pending_tx,
            pending_rx,
        }
    }

    /// Current snapshot.
    pub fn read(&self) -> Snapshot {
        self.current.clone()
    }

    pub fn revision(&self) -> u64 {
        self.current.revision
    }

    /// Validate `next`, install it and notify subscribers before returning.
    ///
    /// A rejected tree leaves the current snapshot untouched.
    pub fn propose(&mut self, next: ConfigurationTree) -> Result<u64, ConfigValidationError> {
        if let Err(err) = next.validate() {
            warn!("Rejected configuration update: {err}");
            return Err(err);
        }
        let revision = self.current.revision + 1;
        self.current = Snapshot {
            tree: Arc::new(next),
            revision,
        };
        debug!(revision, "Configuration updated");
        let snapshot = self.current.clone();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
        Ok(revision)
    }

    /// Decode a host payload and propose it.
    pub fn propose_value(
        &mut self,
        value: serde_json::Value,
    ) -> Result<u64, ConfigValidationError> {
        match ConfigurationTree::from_value(value) {
            Ok(tree) => self.propose(tree),
            Err(err) => {
                warn!("Rejected configuration payload: {err}");
                Err(err)
            }
        }
    }

    /// Deep-copy the current tree, apply `edit`, and propose the result.
    pub fn update(
        &mut self,
        edit: impl FnOnce(&mut ConfigurationTree),
    ) -> Result<u64, ConfigValidationError> {
        let mut next = self.current.to_tree();
        edit(&mut next);
        self.propose(next)
    }

    /// Register a callback invoked synchronously after every accepted proposal.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn update_sender(&self) -> UpdateSender {
        UpdateSender {
            tx: self.pending_tx.clone(),
        }
    }

    /// Apply queued updates in the order they were sent.
    ///
    /// Returns how many were accepted; rejected ones are logged and skipped.
    pub fn drain_pending(&mut self) -> usize {
        let mut accepted = 0;
        while let Ok(update) = self.pending_rx.try_recv() {
            let result = match update {
                PendingUpdate::Replace(tree) => self.propose(*tree),
                PendingUpdate::Edit(edit) => self.update(edit),
            };
            if result.is_ok() {
                accepted += 1;
            }
        }
        accepted
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::seeded(ConfigurationTree::default())
    }
}
