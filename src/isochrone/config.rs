use thiserror::Error;

use crate::{contour::ContourParams, field::RadialParams, reach::ModeFilter};

pub(crate) const MIN_MINUTES: u32 = 5;
pub(crate) const MAX_MINUTES: u32 = 60;

/// Everything one isochrone request can tune.
#[derive(Debug, Clone)]
pub struct IsochroneConfig {
    /// Search budget in minutes, 5 through 60.
    pub budget_minutes: u32,
    /// Region thresholds in minutes, each 5 through 60. Thresholds above
    /// the budget are dropped before any work happens.
    pub thresholds: Vec<u32>,
    pub modes: ModeFilter,
    pub radial: RadialParams,
    pub contour: ContourParams,
}

impl Default for IsochroneConfig {
    fn default() -> Self {
        Self {
            budget_minutes: 30,
            thresholds: vec![15, 30, 45, 60],
            modes: ModeFilter::all(),
            radial: RadialParams::default(),
            contour: ContourParams::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Time budget of {0} min is outside the supported 5-60 min range")]
    BudgetOutOfRange(u32),
    #[error("Threshold of {0} min is outside the supported 5-60 min range")]
    ThresholdOutOfRange(u32),
    #[error("No thresholds at or below the time budget")]
    EmptyThresholds,
    #[error("The mode filter excludes every transport mode")]
    EmptyModeFilter,
    #[error("Origin stop id does not match any entry")]
    UnknownOrigin,
}

impl IsochroneConfig {
    /// Validates the tunable surface and returns the thresholds actually
    /// worth computing, sorted descending with duplicates removed.
    pub(crate) fn effective_thresholds(&self) -> Result<Vec<u32>, ConfigError> {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&self.budget_minutes) {
            return Err(ConfigError::BudgetOutOfRange(self.budget_minutes));
        }
        if self.modes.is_empty() {
            return Err(ConfigError::EmptyModeFilter);
        }
        if self.thresholds.is_empty() {
            return Err(ConfigError::EmptyThresholds);
        }
        for threshold in &self.thresholds {
            if !(MIN_MINUTES..=MAX_MINUTES).contains(threshold) {
                return Err(ConfigError::ThresholdOutOfRange(*threshold));
            }
        }

        let mut effective: Vec<u32> = self
            .thresholds
            .iter()
            .copied()
            .filter(|threshold| *threshold <= self.budget_minutes)
            .collect();
        effective.sort_unstable_by(|a, b| b.cmp(a));
        effective.dedup();
        if effective.is_empty() {
            return Err(ConfigError::EmptyThresholds);
        }
        Ok(effective)
    }
}

#[test]
fn default_config_test() {
    let effective = IsochroneConfig::default().effective_thresholds().unwrap();
    // 45 and 60 exceed the default 30 minute budget.
    assert_eq!(effective, vec![30, 15]);
}

#[test]
fn budget_range_test() {
    let low = IsochroneConfig {
        budget_minutes: 4,
        ..IsochroneConfig::default()
    };
    assert!(matches!(
        low.effective_thresholds(),
        Err(ConfigError::BudgetOutOfRange(4))
    ));

    let high = IsochroneConfig {
        budget_minutes: 61,
        ..IsochroneConfig::default()
    };
    assert!(matches!(
        high.effective_thresholds(),
        Err(ConfigError::BudgetOutOfRange(61))
    ));
}

#[test]
fn threshold_range_test() {
    let config = IsochroneConfig {
        thresholds: vec![15, 61],
        ..IsochroneConfig::default()
    };
    assert!(matches!(
        config.effective_thresholds(),
        Err(ConfigError::ThresholdOutOfRange(61))
    ));
}

#[test]
fn threshold_ordering_test() {
    let config = IsochroneConfig {
        budget_minutes: 60,
        thresholds: vec![30, 15, 30, 60, 45],
        ..IsochroneConfig::default()
    };
    assert_eq!(config.effective_thresholds().unwrap(), vec![60, 45, 30, 15]);
}

#[test]
fn no_effective_thresholds_test() {
    let empty = IsochroneConfig {
        thresholds: Vec::new(),
        ..IsochroneConfig::default()
    };
    assert!(matches!(
        empty.effective_thresholds(),
        Err(ConfigError::EmptyThresholds)
    ));

    // Every threshold sits above the budget.
    let capped = IsochroneConfig {
        budget_minutes: 10,
        thresholds: vec![15, 30],
        ..IsochroneConfig::default()
    };
    assert!(matches!(
        capped.effective_thresholds(),
        Err(ConfigError::EmptyThresholds)
    ));
}

#[test]
fn empty_mode_filter_test() {
    let config = IsochroneConfig {
        modes: ModeFilter::none(),
        ..IsochroneConfig::default()
    };
    assert!(matches!(
        config.effective_thresholds(),
        Err(ConfigError::EmptyModeFilter)
    ));
}
