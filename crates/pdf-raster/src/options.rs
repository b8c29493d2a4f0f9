use crate::constants::*;
use crate::deskew::DeskewOptions;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by every tool
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToolOptions {
    // Input
    pub input_files: Vec<PathBuf>,

    // Output sheet for N-Up and Poster
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Fraction of an N-Up cell a page may fill
    pub margin_factor: f32,

    // Rasterization scale (pixels per point) for source pages and output sheets
    pub raster_scale: f32,

    // JPEG quality for re-encoded sheets (1-100)
    pub jpeg_quality: u8,

    // Skew estimation
    pub deskew: DeskewOptions,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            input_files: Vec::new(),
            paper_size: PaperSize::Letter,
            orientation: Orientation::Portrait,
            margin_factor: DEFAULT_MARGIN_FACTOR,
            raster_scale: DEFAULT_RASTER_SCALE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            deskew: DeskewOptions::default(),
        }
    }
}

impl ToolOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| RasterError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RasterError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Output sheet size for N-Up and Poster layouts
    pub fn sheet_size(&self) -> Size {
        self.paper_size.size_pt(self.orientation)
    }

    /// Validate the options, including the input file list
    pub fn validate(&self) -> Result<()> {
        if self.input_files.is_empty() {
            return Err(RasterError::Config("No input files specified".to_string()));
        }
        self.validate_settings()
    }

    /// Validate everything except the input file list.
    ///
    /// Used when pages have already been loaded by the caller.
    pub fn validate_settings(&self) -> Result<()> {
        if !self.sheet_size().is_valid() {
            return Err(RasterError::Config(format!(
                "Paper size must be positive, got {:?}",
                self.paper_size
            )));
        }

        if !(self.margin_factor > 0.0 && self.margin_factor <= 1.0) {
            return Err(RasterError::Config(format!(
                "Margin factor must be in (0, 1], got {}",
                self.margin_factor
            )));
        }

        if !(self.raster_scale.is_finite() && self.raster_scale > 0.0) {
            return Err(RasterError::Config(format!(
                "Raster scale must be positive, got {}",
                self.raster_scale
            )));
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(RasterError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        self.deskew.validate()
    }
}
