use std::future::Future;

use tracing::warn;

use crate::{Result, ShowcaseError};

/// Outcome of one secondary fetch per item
#[derive(Debug)]
pub struct FanOut<T, R> {
    pub entries: Vec<(T, Result<R>)>,
}

impl<T, R> FanOut<T, R> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_err()).count()
    }

    /// A batch only fails as a whole when no entry succeeded
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.entries.is_empty() && self.failures() == self.entries.len()
    }

    /// Collapse a fully failed batch into its first error
    pub fn into_partial(self) -> Result<Vec<(T, Result<R>)>> {
        if self.all_failed() {
            let first = self
                .entries
                .into_iter()
                .find_map(|(_, r)| r.err())
                .unwrap_or_else(|| ShowcaseError::general("every request failed"));
            return Err(first);
        }
        Ok(self.entries)
    }
}

/// Start `fetch` for every item at once and wait for all of them.
///
/// Results keep the input order. Individual failures are logged and kept
/// next to their item.
pub async fn fan_out<T, R, F, Fut>(items: Vec<T>, fetch: F) -> FanOut<T, R>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let results = futures::future::join_all(items.iter().map(&fetch)).await;

    let entries: Vec<(T, Result<R>)> = items.into_iter().zip(results).collect();
    for (index, (_, result)) in entries.iter().enumerate() {
        if let Err(err) = result {
            warn!("Secondary fetch {} failed: {}", index, err);
        }
    }

    FanOut { entries }
}
