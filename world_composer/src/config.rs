//! Composer configuration
//!
//! Every value the batch run depends on (directories, seed range, placement
//! gap, extraction policy) lives here and is passed explicitly into the
//! merge and batch code. Values can come from a TOML file, builder methods
//! or CLI overrides.

use std::ops::Range;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{ComposeError, ComposeResult};

/// Which dynamic `<model>` elements are transplanted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelPolicy {
    /// Every model in the dynamic world
    All,
    /// Only models with at least one direct `<plugin>` child
    #[default]
    PluginBearing,
}

/// What the batch driver does when a pair fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Log the failing index and continue with the next pair
    #[default]
    BestEffort,
    /// Stop the batch at the first failing pair
    FailFast,
}

/// Placement of the dynamic cluster beside the static one
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Translate transplanted entities at all
    pub enabled: bool,
    /// Clearance between the static and dynamic clusters along X
    pub gap: f64,
    /// Vertical offset applied to every transplanted entity
    pub z_offset: f64,
    /// Offset used when either side has no measurable bounds
    pub default_offset: [f64; 3],
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gap: 0.3,
            z_offset: 0.0,
            default_offset: [6.0, 0.0, 0.0],
        }
    }
}

/// Settings for a single static/dynamic merge
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub model_policy: ModelPolicy,
    pub placement: PlacementConfig,
}

impl MergeConfig {
    pub fn with_model_policy(mut self, policy: ModelPolicy) -> Self {
        self.model_policy = policy;
        self
    }

    pub fn with_placement(mut self, enabled: bool) -> Self {
        self.placement.enabled = enabled;
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.placement.gap = gap;
        self
    }
}

/// Batch run configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Directory holding `static_seed_NNNN.<ext>` files
    pub static_dir: PathBuf,
    /// Directory holding `dynamic_seed_NNNN.<ext>` files
    pub dynamic_dir: PathBuf,
    /// Directory receiving `unified_seed_NNNN.<ext>` files
    pub output_dir: PathBuf,
    /// Number of seeds to process
    pub count: u32,
    /// First seed index
    pub first_index: u32,
    /// File extension shared by inputs and outputs
    pub extension: String,
    pub merge: MergeConfig,
    pub error_policy: ErrorPolicy,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("worlds_static"),
            dynamic_dir: PathBuf::from("worlds_dynamic"),
            output_dir: PathBuf::from("worlds_unified"),
            count: 200,
            first_index: 1,
            extension: "world".to_string(),
            merge: MergeConfig::default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl ComposerConfig {
    /// Load from a TOML file; missing keys take their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> ComposeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ComposeError::io(path, e))?;
        toml::from_str(&content).map_err(|e| ComposeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_dirs(
        mut self,
        static_dir: impl Into<PathBuf>,
        dynamic_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        self.static_dir = static_dir.into();
        self.dynamic_dir = dynamic_dir.into();
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_first_index(mut self, first_index: u32) -> Self {
        self.first_index = first_index;
        self
    }

    pub fn with_merge(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Seed indices covered by this run
    ///
    /// Fails when the last index would not fit in a `u32`.
    pub fn indices(&self) -> ComposeResult<Range<u32>> {
        let end = self
            .first_index
            .checked_add(self.count)
            .ok_or(ComposeError::SeedRange {
                first: self.first_index,
                count: self.count,
            })?;
        Ok(self.first_index..end)
    }

    pub fn static_path(&self, index: u32) -> PathBuf {
        self.static_dir.join(self.seed_file("static", index))
    }

    pub fn dynamic_path(&self, index: u32) -> PathBuf {
        self.dynamic_dir.join(self.seed_file("dynamic", index))
    }

    pub fn output_path(&self, index: u32) -> PathBuf {
        self.output_dir.join(self.seed_file("unified", index))
    }

    fn seed_file(&self, kind: &str, index: u32) -> String {
        format!("{}_seed_{:04}.{}", kind, index, self.extension)
    }
}
