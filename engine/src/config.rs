//! Engine configuration: recognized options, defaults, and eager
//! validation at construction.

use thiserror::Error;

use crate::conveyor::Role;
use crate::pallet::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    MostFree,
    RoundRobin,
    DedicatedPlusDynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionKind {
    FirstThree,
    LongestHead,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("x_minutes must be >= 1, got {0}")]
    NonPositivePeriod(i64),

    #[error("x_minutes ({0}) must be evenly divisible by 3")]
    IndivisibleConsumptionPeriod(i64),

    #[error("row_capacity must be > 0, got {0}")]
    NonPositiveCapacity(i64),

    #[error("rows must be > 0, got {0}")]
    NonPositiveRows(i64),

    #[error("role_layout has {actual} entries, expected {expected}")]
    RoleLayoutLengthMismatch { expected: usize, actual: usize },

    #[error("role_layout has no dedicated row for source {0}")]
    NoDedicatedRowForSource(Source),

    #[error("maturation_minutes must be >= 0, got {0}")]
    NegativeMaturation(i64),

    #[error("window_minutes must be > 0, got {0}")]
    NonPositiveWindow(i64),
}

/// Recognized construction options for [`crate::engine::Engine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub x_minutes: i64,
    pub maturation_minutes: i64,
    pub window_minutes: i64,
    pub rows: usize,
    pub row_capacity: usize,
    pub role_layout: Vec<Role>,
    pub allocation_strategy: AllocationKind,
    pub consumption_strategy: ConsumptionKind,
    pub activation_times: [(Source, i64); 3],
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn consumption_period(&self) -> i64 {
        self.x_minutes / 3
    }

    pub fn lot_size(&self) -> i64 {
        self.window_minutes / self.consumption_period()
    }

    pub fn dedicated_rows(&self, source: Source) -> Vec<usize> {
        self.role_layout
            .iter()
            .enumerate()
            .filter(|(_, role)| role.dedicated_to() == Some(source))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn dynamic_rows(&self) -> Vec<usize> {
        self.role_layout
            .iter()
            .enumerate()
            .filter(|(_, role)| matches!(role, Role::Dynamic))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn activation_time(&self, source: Source) -> i64 {
        self.activation_times
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, t)| *t)
            .expect("activation_times always covers all three sources")
    }

    /// Re-runs construction-time validation against the already-built
    /// configuration. Used by [`crate::engine::Engine::reset`], which can
    /// also surface a `ConfigurationError`, even though in practice a
    /// config that validated once cannot fail the same checks again.
    pub fn revalidate(&self) -> Result<(), ConfigurationError> {
        if self.x_minutes < 1 {
            return Err(ConfigurationError::NonPositivePeriod(self.x_minutes));
        }
        if self.x_minutes % 3 != 0 {
            return Err(ConfigurationError::IndivisibleConsumptionPeriod(
                self.x_minutes,
            ));
        }
        if self.maturation_minutes < 0 {
            return Err(ConfigurationError::NegativeMaturation(
                self.maturation_minutes,
            ));
        }
        if self.window_minutes <= 0 {
            return Err(ConfigurationError::NonPositiveWindow(self.window_minutes));
        }
        if self.rows == 0 {
            return Err(ConfigurationError::NonPositiveRows(self.rows as i64));
        }
        if self.row_capacity == 0 {
            return Err(ConfigurationError::NonPositiveCapacity(
                self.row_capacity as i64,
            ));
        }
        if self.role_layout.len() != self.rows {
            return Err(ConfigurationError::RoleLayoutLengthMismatch {
                expected: self.rows,
                actual: self.role_layout.len(),
            });
        }
        for source in Source::ALL {
            if !self
                .role_layout
                .iter()
                .any(|r| r.dedicated_to() == Some(source))
            {
                return Err(ConfigurationError::NoDedicatedRowForSource(source));
            }
        }
        Ok(())
    }
}

/// Default layout: rows 0-2 dedicated A, 3 dynamic, 4-6 dedicated B, 7
/// dynamic, 8-10 dedicated C, 11 dynamic.
fn default_role_layout() -> Vec<Role> {
    vec![
        Role::Dedicated(Source::A),
        Role::Dedicated(Source::A),
        Role::Dedicated(Source::A),
        Role::Dynamic,
        Role::Dedicated(Source::B),
        Role::Dedicated(Source::B),
        Role::Dedicated(Source::B),
        Role::Dynamic,
        Role::Dedicated(Source::C),
        Role::Dedicated(Source::C),
        Role::Dedicated(Source::C),
        Role::Dynamic,
    ]
}

#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    x_minutes: i64,
    maturation_minutes: i64,
    window_minutes: i64,
    rows: usize,
    row_capacity: usize,
    role_layout: Option<Vec<Role>>,
    allocation_strategy: AllocationKind,
    consumption_strategy: ConsumptionKind,
    activation_times: [(Source, i64); 3],
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self {
            x_minutes: 24,
            maturation_minutes: 1200,
            window_minutes: 720,
            rows: 12,
            row_capacity: 22,
            role_layout: None,
            allocation_strategy: AllocationKind::MostFree,
            consumption_strategy: ConsumptionKind::FirstThree,
            activation_times: [(Source::A, 0), (Source::B, 720), (Source::C, 1440)],
        }
    }
}

impl EngineConfigBuilder {
    pub fn x_minutes(mut self, v: i64) -> Self {
        self.x_minutes = v;
        self
    }

    pub fn maturation_minutes(mut self, v: i64) -> Self {
        self.maturation_minutes = v;
        self
    }

    pub fn window_minutes(mut self, v: i64) -> Self {
        self.window_minutes = v;
        self
    }

    pub fn rows(mut self, v: usize) -> Self {
        self.rows = v;
        self
    }

    pub fn row_capacity(mut self, v: usize) -> Self {
        self.row_capacity = v;
        self
    }

    pub fn role_layout(mut self, v: Vec<Role>) -> Self {
        self.role_layout = Some(v);
        self
    }

    pub fn allocation_strategy(mut self, v: AllocationKind) -> Self {
        self.allocation_strategy = v;
        self
    }

    pub fn consumption_strategy(mut self, v: ConsumptionKind) -> Self {
        self.consumption_strategy = v;
        self
    }

    pub fn activation_times(mut self, v: [(Source, i64); 3]) -> Self {
        self.activation_times = v;
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigurationError> {
        if self.x_minutes < 1 {
            return Err(ConfigurationError::NonPositivePeriod(self.x_minutes));
        }
        if self.x_minutes % 3 != 0 {
            return Err(ConfigurationError::IndivisibleConsumptionPeriod(
                self.x_minutes,
            ));
        }
        if self.maturation_minutes < 0 {
            return Err(ConfigurationError::NegativeMaturation(
                self.maturation_minutes,
            ));
        }
        if self.window_minutes <= 0 {
            return Err(ConfigurationError::NonPositiveWindow(self.window_minutes));
        }
        if self.rows == 0 {
            return Err(ConfigurationError::NonPositiveRows(self.rows as i64));
        }
        if self.row_capacity == 0 {
            return Err(ConfigurationError::NonPositiveCapacity(
                self.row_capacity as i64,
            ));
        }

        let role_layout = self.role_layout.unwrap_or_else(|| {
            if self.rows == 12 {
                default_role_layout()
            } else {
                vec![Role::Dynamic; self.rows]
            }
        });

        if role_layout.len() != self.rows {
            return Err(ConfigurationError::RoleLayoutLengthMismatch {
                expected: self.rows,
                actual: role_layout.len(),
            });
        }

        for source in Source::ALL {
            if !role_layout
                .iter()
                .any(|r| r.dedicated_to() == Some(source))
            {
                return Err(ConfigurationError::NoDedicatedRowForSource(source));
            }
        }

        Ok(EngineConfig {
            x_minutes: self.x_minutes,
            maturation_minutes: self.maturation_minutes,
            window_minutes: self.window_minutes,
            rows: self.rows,
            row_capacity: self.row_capacity,
            role_layout,
            allocation_strategy: self.allocation_strategy,
            consumption_strategy: self.consumption_strategy,
            activation_times: self.activation_times,
        })
    }
}
