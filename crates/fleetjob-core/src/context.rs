//! JobContext - 実行コンテキスト（trace 用の key/value + cancellation）
//!
//! A context is immutable. Deriving a child (`with_value`, `with_cancel`) never
//! touches the parent, so a context can be handed to many workers at once.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct ValueNode {
    key: String,
    value: String,
    parent: Option<Arc<ValueNode>>,
}

/// Run-scoped context passed from the command layer down to workers and loggers.
#[derive(Debug, Clone)]
pub struct JobContext {
    values: Option<Arc<ValueNode>>,
    cancel: CancellationToken,
}

/// Cancels the context it was created with (and every context derived from it).
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl JobContext {
    /// Root context: no values, never cancelled.
    pub fn background() -> Self {
        Self {
            values: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Child context carrying `value` under `key`.
    ///
    /// A newer binding for the same key shadows the older one; the parent still
    /// sees its own binding.
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            values: Some(Arc::new(ValueNode {
                key: key.into(),
                value: value.into(),
                parent: self.values.clone(),
            })),
            cancel: self.cancel.clone(),
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        let mut node = self.values.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return Some(&n.value);
            }
            node = n.parent.as_deref();
        }
        None
    }

    /// All keys visible from this context with their newest value.
    pub fn values(&self) -> BTreeMap<&str, &str> {
        let mut out = BTreeMap::new();
        let mut node = self.values.as_deref();
        while let Some(n) = node {
            out.entry(n.key.as_str()).or_insert(n.value.as_str());
            node = n.parent.as_deref();
        }
        out
    }

    /// Child context that can be cancelled independently.
    ///
    /// Cancelling the parent cancels the child; cancelling the child leaves the
    /// parent alone.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let token = self.cancel.child_token();
        let ctx = Self {
            values: self.values.clone(),
            cancel: token.clone(),
        };
        (ctx, CancelHandle { token })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

impl Default for JobContext {
    fn default() -> Self {
        Self::background()
    }
}
