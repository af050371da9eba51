use std::fmt;

use serde::Serialize;

/// What a panel container currently shows.
///
/// Every new load or query moves the panel back to `Loading`; the outcome
/// then settles it in exactly one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderState {
    #[default]
    Idle,
    Loading,
    Content,
    /// The request succeeded but matched nothing
    Empty,
    Error,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Content => "content",
            Self::Empty => "empty",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}
