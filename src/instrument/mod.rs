//! Instrumentation adapter.
//!
//! Locates insertion points inside host method bodies by matching short
//! instruction sequences, and splices extension call-outs before or after
//! them. The adapter is the only part of the crate that knows the host's
//! code has a shape; everything above it sees typed hook frames.
//!
//! ```
//! use combat_extend::instrument::{HookId, Instruction, Instrumentation, MethodBody, Pattern, Step};
//!
//! let body = MethodBody::new("Combat::ApplyDamage", vec![
//!     Instruction::call("Combat::Hit"),
//!     Instruction::ret(),
//! ]);
//!
//! let mut adapter = Instrumentation::new();
//! adapter.attach_after("on_hit", "Combat::ApplyDamage", Some(&body), Pattern::unique_call("Hit"), HookId(7)).unwrap();
//!
//! assert_eq!(adapter.plan(&body), vec![Step::Native(0), Step::Hook(HookId(7)), Step::Native(1)]);
//! ```

mod adapter;
mod opcode;
mod pattern;

pub use adapter::{AttachError, HookId, HookPoint, Instrumentation, Splice, Step};
pub use opcode::{Instruction, MethodBody, OpCode, Operand};
pub use pattern::{MatchSpan, Matcher, Pattern, PatternError, SearchMode};
