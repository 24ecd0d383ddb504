//! Ports - 抽象化レイヤー
//!
//! 外部の collaborator（ログ sink、メトリクス出力先、時刻）への interface です。
//! 実装は `impls` にあり、テストでは fake に差し替えます。

pub mod clock;
pub mod enrichment;
pub mod reporter;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::enrichment::{EnrichmentSink, ExtraDataCallback};
pub use self::reporter::MetricsReporter;
