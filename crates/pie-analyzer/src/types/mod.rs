//! Piethon's type system
//!
//! Piethon only has three baked-in primitive types plus a distinguished
//! error type used by the checker to stop one root cause from producing a
//! cascade of diagnostics.

mod pie_type;

pub use pie_type::{PieType, SymbolKind};
