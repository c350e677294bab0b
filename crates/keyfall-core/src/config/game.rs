use crate::error::{Error, Result};
use crate::lane::{Lane, LaneRegistry};

use super::{chart, timing};

/// Settings for one game session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub ticks_per_second: u32,
    pub chart_length: usize,
    pub min_gap: u64,
    pub max_gap: u64,
    /// Seed for chart generation. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub target_row: u32,
    pub hit_window: u64,
    pub lanes: LaneRegistry,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: timing::TICKS_PER_SECOND,
            chart_length: chart::DEFAULT_LENGTH,
            min_gap: chart::MIN_GAP,
            max_gap: chart::MAX_GAP,
            seed: None,
            target_row: timing::TARGET_ROW,
            hit_window: timing::HIT_WINDOW_TICKS,
            lanes: LaneRegistry::default(),
        }
    }
}

impl GameConfig {
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    /// Check the relations between settings.
    ///
    /// A note reaches the target row `target_row - 1` ticks after it spawns,
    /// so the hit window has to land on exactly that tick.
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_second == 0 {
            return Err(Error::InvalidConfig("tick rate must be positive".into()));
        }
        if self.min_gap == 0 {
            return Err(Error::InvalidConfig("minimum note gap must be at least 1".into()));
        }
        if self.max_gap < self.min_gap {
            return Err(Error::InvalidConfig(format!(
                "note gap range {}..={} is empty",
                self.min_gap, self.max_gap
            )));
        }
        if self.target_row == 0 {
            return Err(Error::InvalidConfig("target row must be positive".into()));
        }
        if self.hit_window + 1 != u64::from(self.target_row) {
            return Err(Error::InvalidConfig(format!(
                "hit window {} never lines up with target row {}",
                self.hit_window, self.target_row
            )));
        }
        Ok(())
    }
}

/// Builder for [`GameConfig`].
#[derive(Debug, Default)]
pub struct GameConfigBuilder {
    config: GameConfig,
    lanes: Option<Vec<Lane>>,
}

impl GameConfigBuilder {
    pub fn ticks_per_second(mut self, rate: u32) -> Self {
        self.config.ticks_per_second = rate;
        self
    }

    pub fn chart_length(mut self, length: usize) -> Self {
        self.config.chart_length = length;
        self
    }

    pub fn gap_range(mut self, min: u64, max: u64) -> Self {
        self.config.min_gap = min;
        self.config.max_gap = max;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn target_row(mut self, row: u32) -> Self {
        self.config.target_row = row;
        self
    }

    pub fn hit_window(mut self, ticks: u64) -> Self {
        self.config.hit_window = ticks;
        self
    }

    pub fn lanes(mut self, lanes: Vec<Lane>) -> Self {
        self.lanes = Some(lanes);
        self
    }

    pub fn build(self) -> Result<GameConfig> {
        let mut config = self.config;
        if let Some(lanes) = self.lanes {
            config.lanes = LaneRegistry::new(lanes)?;
        }
        config.validate()?;
        Ok(config)
    }
}
