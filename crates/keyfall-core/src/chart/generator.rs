use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::lane::LaneRegistry;

use super::{Chart, Note};

/// Pseudo-random chart generator.
pub struct ChartGenerator {
    rng: StdRng,
    min_gap: u64,
    max_gap: u64,
}

impl ChartGenerator {
    pub fn new(seed: Option<u64>, min_gap: u64, max_gap: u64) -> Result<Self> {
        if min_gap == 0 || max_gap < min_gap {
            return Err(Error::InvalidConfig(format!(
                "invalid note gap range {}..={}",
                min_gap, max_gap
            )));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            rng,
            min_gap,
            max_gap,
        })
    }

    pub fn from_config(config: &GameConfig) -> Result<Self> {
        Self::new(config.seed, config.min_gap, config.max_gap)
    }

    /// Generate `length` notes over the given lanes.
    ///
    /// Each note picks a lane uniformly and lands `min_gap..=max_gap` ticks
    /// after the previous one, so spawn times strictly increase.
    pub fn generate(&mut self, length: usize, lanes: &LaneRegistry) -> Result<Chart> {
        if lanes.is_empty() {
            return Err(Error::InvalidConfig("cannot generate a chart without lanes".into()));
        }

        let mut notes = Vec::with_capacity(length);
        let mut time = 0u64;
        for _ in 0..length {
            let lane = &lanes.lanes()[self.rng.random_range(0..lanes.len())];
            time += self.rng.random_range(self.min_gap..=self.max_gap);
            notes.push(Note::new(lane.key, time));
        }

        debug!("Generated chart with {} notes ending at tick {}", length, time);
        Ok(Chart::from_notes(notes))
    }
}
