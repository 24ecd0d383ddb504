//! Run identifiers.
//!
//! 1 回の CLI 実行につき 1 つの `RunId` を払い出し、trace context の `run_id` に載せます。
//! ULID なので時刻順にソートでき、ログを跨いだ突き合わせに使えます。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

use crate::ports::Clock;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(Ulid);

impl RunId {
    /// Generate a new id whose timestamp part comes from `clock`.
    pub fn generate(clock: &dyn Clock) -> Self {
        let timestamp_ms = clock.now().timestamp_millis() as u64;
        Self(Ulid::from_parts(timestamp_ms, rand::random()))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}
