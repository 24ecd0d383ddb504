//! Typed - 型付き Job API
//!
//! # 二層構造
//! - **表層（Typed）**: `Job` trait - work item の型を持つ
//! - **内部（Dyn）**: `DynJob` trait - object-safe, registry に格納できる

pub mod erased;
pub mod job;
pub mod registry;

pub use self::erased::{DynJob, TypedJob};
pub use self::job::Job;
pub use self::registry::{JobRegistry, RegistryError};
