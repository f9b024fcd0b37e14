//! One-shot deferred resync requests.
//!
//! Validation callbacks fire in a context where the scene must not be
//! restructured. Nodes enqueue a [`DeferredResync`] instead, and the host
//! runs the queue once that context has unwound.

use std::collections::VecDeque;

use crate::scene::SceneNodeId;

/// A request to resync `node`, valid only while `ticket` matches the node's
/// current ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredResync {
    pub node: SceneNodeId,
    pub ticket: u64,
}

/// FIFO of deferred resync requests.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    queue: VecDeque<DeferredResync>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a request. Tickets only grow per node, so requests are never
    /// identical and need no dedup.
    pub fn push(&mut self, request: DeferredResync) {
        self.queue.push_back(request);
    }

    /// Take every queued request in scheduling order.
    pub fn drain(&mut self) -> Vec<DeferredResync> {
        self.queue.drain(..).collect()
    }

    /// Drop all requests for `node`. Returns how many were removed.
    pub fn cancel(&mut self, node: SceneNodeId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|r| r.node != node);
        before - self.queue.len()
    }

    pub fn contains(&self, node: SceneNodeId) -> bool {
        self.queue.iter().any(|r| r.node == node)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(node: u64, ticket: u64) -> DeferredResync {
        DeferredResync {
            node: SceneNodeId(node),
            ticket,
        }
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut q = DeferredQueue::new();
        q.push(req(1, 1));
        q.push(req(2, 1));
        q.push(req(1, 2));

        let drained = q.drain();
        assert_eq!(drained, vec![req(1, 1), req(2, 1), req(1, 2)]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_push_appends_superseded_requests() {
        let mut q = DeferredQueue::new();
        q.push(req(1, 1));
        q.push(req(1, 2));
        assert_eq!(q.len(), 2);
        assert_eq!(q.drain(), vec![req(1, 1), req(1, 2)]);
    }

    #[test]
    fn test_cancel_removes_only_that_node() {
        let mut q = DeferredQueue::new();
        q.push(req(1, 1));
        q.push(req(2, 1));
        q.push(req(1, 2));

        assert_eq!(q.cancel(SceneNodeId(1)), 2);
        assert!(!q.contains(SceneNodeId(1)));
        assert!(q.contains(SceneNodeId(2)));
        assert_eq!(q.cancel(SceneNodeId(7)), 0);
    }
}
