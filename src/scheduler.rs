//! Real-Time Scheduler
//!
//! The 1 ms tick only decrements the shared counters (see
//! [`hal::timer`](crate::hal::timer)). Everything else runs in the
//! foreground as small state machines polled once per loop iteration.

pub mod key;
pub mod led;
pub mod supervisor;

pub use key::{classify, KeyEvent, KeyMachine, KeyState};
pub use led::{LedPattern, LedStep};
pub use supervisor::{Action, Poll, Supervisor};
