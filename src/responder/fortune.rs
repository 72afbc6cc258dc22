//! Random fortune from a fixed list

use super::Responder;
use crate::{Error, Result};
use bytes::Bytes;
use futures::future::{self, BoxFuture, FutureExt};
use rand::seq::SliceRandom;

const DEFAULT_FORTUNES: &[&str] = &[
    "A journey of a thousand miles begins with a single SELECT.",
    "Your query will be answered, though not in the way you expect.",
    "Fortune favors the well-indexed.",
    "Today is a good day to read the docs.",
    "Streaming data flows to those who wait.",
    "Nothing is as permanent as a temporary table.",
    "He who joins without a predicate receives everything.",
    "The answer you seek is one row, one column.",
];

/// Answers with a random entry of a fortune list
#[derive(Debug, Clone)]
pub struct FortuneResponder {
    fortunes: Vec<Bytes>,
}

impl FortuneResponder {
    /// Create a responder over `fortunes`
    ///
    /// Fails with [`Error::Config`] when the list is empty.
    pub fn new<I, S>(fortunes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Bytes>,
    {
        let fortunes: Vec<Bytes> = fortunes.into_iter().map(Into::into).collect();
        if fortunes.is_empty() {
            return Err(Error::Config("fortune list must not be empty".into()));
        }
        Ok(Self { fortunes })
    }

    /// The fortunes this responder picks from
    pub fn fortunes(&self) -> &[Bytes] {
        &self.fortunes
    }

    fn pick(&self) -> Bytes {
        self.fortunes
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for FortuneResponder {
    fn default() -> Self {
        Self {
            fortunes: DEFAULT_FORTUNES
                .iter()
                .map(|f| Bytes::from_static(f.as_bytes()))
                .collect(),
        }
    }
}

impl Responder for FortuneResponder {
    fn respond(&self) -> BoxFuture<'_, Result<Bytes>> {
        future::ready(Ok(self.pick())).boxed()
    }
}
