//! Result aggregation and ranking engine.
//!
//! The one computation every dashboard shares, extracted into a single
//! pure module:
//! - **grade**: letter-grade bonus point table
//! - **enrich**: join results to their programme metadata
//! - **roster**: candidate/team lookup indexes and the legacy
//!   chest-number fallback
//! - **aggregate**: fold results into per-team or per-candidate totals
//! - **rank**: deterministic ordering with explicit tie-breaks
//!
//! The engine has no error paths: absent or malformed data degrades to
//! zero points and placeholder labels, never a failure.

mod aggregate;
mod enrich;
mod grade;
mod rank;
mod roster;

pub use aggregate::*;
pub use enrich::*;
pub use grade::*;
pub use rank::*;
pub use roster::*;
