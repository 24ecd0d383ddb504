//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **CommandBuilder**: registry から CLI の command tree を構築
//! - **JobCommand**: parse → config → run → report
//! - **WorkerPool**: work item を固定数の worker で処理

pub mod builder;
pub mod command;
pub mod pool;

pub use self::builder::{BuildError, CommandBuilder};
pub use self::command::{CommandError, JobCommand, RunSummary};
pub use self::pool::{PoolError, WorkerPool};
