//! Building blocks shared by the panel controllers
//!
//! A search-driven panel combines a [`Debouncer`] for keystrokes, a
//! [`RequestSequence`] to drop stale responses and [`fan_out`] for the
//! per-item secondary fetches. [`RenderState`] tracks what its container
//! currently shows.

pub mod debounce;
pub mod fanout;
pub mod search;
pub mod sequence;
pub mod state;

pub use debounce::Debouncer;
pub use fanout::{FanOut, fan_out};
pub use search::{QueryMode, dedup_by_key};
pub use sequence::{RequestSequence, Ticket};
pub use state::RenderState;
