//! Run Configuration
//!
//! Parameters for both generators and the frame writer, loaded from an
//! optional TOML file and overridden from the command line. `validate` is the
//! single place where ranges are enforced; the engines themselves accept any
//! value.
//!
//! ```toml
//! [output]
//! format = "png"
//! image_size = 1024
//! out_dir = "frames"
//!
//! [chaos]
//! n_points = 50000
//! seed = 42
//! save_mode = "all"
//! snapshot_count = 5
//!
//! [ifs8]
//! max_generation = 5
//! name_base = "triangle_ifs8"
//! ```
//!
//! License: MIT

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{GasketError, Result};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Points generated by the chaos game
pub const DEFAULT_POINTS: usize = 50_000;

/// Snapshots after the empty frame in chaos "all" mode
pub const DEFAULT_SNAPSHOT_COUNT: usize = 5;

/// Final subdivision generation
pub const DEFAULT_MAX_GENERATION: usize = 5;

/// Deepest generation accepted without `allow_deep` (8^7 ≈ 2.1M triangles)
pub const DEFAULT_GENERATION_LIMIT: usize = 7;

pub const DEFAULT_NAME_BASE: &str = "triangle_ifs8";
pub const DEFAULT_OUT_DIR: &str = "frames";
pub const DEFAULT_IMAGE_SIZE: u32 = 1024;
pub const DEFAULT_CHAOS_DPI: u32 = 100;
pub const DEFAULT_IFS8_DPI: u32 = 300;

/// Accepted image sizes (nominal edge length at 100 dpi)
pub const IMAGE_SIZES: [u32; 5] = [256, 512, 1024, 2048, 4096];

const MAX_DPI: u32 = 1200;

/// Largest raster edge in pixels
const MAX_PIXEL_EXTENT: u32 = 16_384;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which frames to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Every snapshot / generation
    All,
    /// Only the last one
    #[default]
    Final,
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveMode::All => write!(f, "all"),
            SaveMode::Final => write!(f, "final"),
        }
    }
}

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Tif,
    Svg,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Tif => "tif",
            OutputFormat::Svg => "svg",
        }
    }

    #[inline]
    pub fn is_raster(self) -> bool {
        !matches!(self, OutputFormat::Svg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Shared image settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub image_size: u32,
    pub out_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            image_size: DEFAULT_IMAGE_SIZE,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl OutputConfig {
    /// Raster edge length in pixels: `image_size * dpi / 100`
    pub fn pixel_extent(&self, dpi: u32) -> u32 {
        (self.image_size as u64 * dpi as u64 / 100).min(u32::MAX as u64) as u32
    }
}

/// Chaos game settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChaosConfig {
    pub n_points: usize,
    pub seed: Option<u64>,
    pub save_mode: SaveMode,
    pub snapshot_count: usize,
    pub dpi: u32,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            n_points: DEFAULT_POINTS,
            seed: None,
            save_mode: SaveMode::Final,
            snapshot_count: DEFAULT_SNAPSHOT_COUNT,
            dpi: DEFAULT_CHAOS_DPI,
        }
    }
}

/// 8-map subdivision settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubdivisionConfig {
    pub max_generation: usize,
    pub save_mode: SaveMode,
    pub name_base: String,
    pub dpi: u32,
    pub generation_limit: usize,
    pub allow_deep: bool,
}

impl Default for SubdivisionConfig {
    fn default() -> Self {
        Self {
            max_generation: DEFAULT_MAX_GENERATION,
            save_mode: SaveMode::Final,
            name_base: DEFAULT_NAME_BASE.to_string(),
            dpi: DEFAULT_IFS8_DPI,
            generation_limit: DEFAULT_GENERATION_LIMIT,
            allow_deep: false,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GasketConfig {
    pub output: OutputConfig,
    pub chaos: ChaosConfig,
    pub ifs8: SubdivisionConfig,
}

impl GasketConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check every recognised option against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !IMAGE_SIZES.contains(&self.output.image_size) {
            return Err(invalid(format!(
                "image_size {} is not one of {:?}",
                self.output.image_size, IMAGE_SIZES
            )));
        }
        self.validate_dpi("chaos", self.chaos.dpi)?;
        self.validate_dpi("ifs8", self.ifs8.dpi)?;

        let name_base = self.ifs8.name_base.as_str();
        if name_base.is_empty() || name_base.contains(['/', '\\']) {
            return Err(invalid(format!(
                "name_base {:?} must be a non-empty file stem",
                name_base
            )));
        }

        let ifs8 = &self.ifs8;
        if ifs8.max_generation > ifs8.generation_limit && !ifs8.allow_deep {
            return Err(invalid(format!(
                "max_generation {} exceeds the limit of {} ({} triangles); set allow_deep to proceed",
                ifs8.max_generation,
                ifs8.generation_limit,
                crate::generators::triangle_count(ifs8.max_generation)
                    .map_or_else(|| "more than 2^64".to_string(), |n| n.to_string()),
            )));
        }
        Ok(())
    }

    fn validate_dpi(&self, section: &str, dpi: u32) -> Result<()> {
        if dpi == 0 || dpi > MAX_DPI {
            return Err(invalid(format!(
                "{}.dpi {} must be in 1..={}",
                section, dpi, MAX_DPI
            )));
        }
        let extent = self.output.pixel_extent(dpi);
        if self.output.format.is_raster() && extent > MAX_PIXEL_EXTENT {
            return Err(invalid(format!(
                "{} raster of {}px exceeds {}px; lower image_size or dpi",
                section, extent, MAX_PIXEL_EXTENT
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> GasketError {
    GasketError::InvalidConfiguration(message)
}
