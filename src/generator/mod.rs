pub mod corpus;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::generator::corpus::{CorpusError, CorpusRegistry};

/// Samples target text out of the corpora in a registry.
#[derive(Clone, Debug, Default)]
pub struct CorpusGenerator {
    registry: CorpusRegistry,
}

impl CorpusGenerator {
    pub fn new(registry: CorpusRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CorpusRegistry {
        &self.registry
    }

    /// Up to `count` distinct entries of the named corpus in random order,
    /// joined by single spaces.
    pub fn generate(&self, source: &str, count: usize) -> Result<Vec<char>, CorpusError> {
        self.generate_with_rng(source, count, &mut SmallRng::from_entropy())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        source: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<char>, CorpusError> {
        let corpus = self.registry.get(source)?;
        let mut pool: Vec<&str> = corpus.entries().iter().map(String::as_str).collect();
        pool.shuffle(rng);
        pool.truncate(count);

        let text = pool.join(" ");
        tracing::debug!(corpus = source, entries = pool.len(), chars = text.len(), "generated target text");
        Ok(text.trim().chars().collect())
    }
}
