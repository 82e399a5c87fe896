//! Conversation extraction from an ordered entry path.
//!
//! Two views over the same path:
//! - [`group_into_turns`] compresses the path into user/assistant turns
//!   for conversational display;
//! - [`extract_raw_messages`] flattens every sub-block into its own
//!   record for full-fidelity inspection.

mod raw;
mod turns;

pub use raw::{extract_raw_messages, RawMessage, COMPACT_BOUNDARY_MARKER};
pub use turns::{group_into_turns, ToolSummary, Turn, TurnMode, TurnOptions};
