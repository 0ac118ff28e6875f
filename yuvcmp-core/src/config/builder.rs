// ============================================================================
// yuvcmp-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for AnalysisConfig
//
// Fluent construction of an AnalysisConfig. Optional settings start at the
// crate defaults; `build` checks that the required pieces are present and
// runs AnalysisConfig::validate before handing the value out.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{AnalysisConfig, AnalysisMode, DimensionSource};
use crate::error::{CoreError, CoreResult};
use crate::frame::FrameGeometry;

/// Builder for creating AnalysisConfig instances.
///
/// # Examples
///
/// ```rust
/// use yuvcmp_core::config::{AnalysisConfigBuilder, AnalysisMode, DimensionSource};
/// use yuvcmp_core::frame::FrameGeometry;
///
/// let config = AnalysisConfigBuilder::new()
///     .input_a("capture1.yuv")
///     .input_b("capture2.yuv")
///     .geometry(FrameGeometry::new(1920, 1080).unwrap(), DimensionSource::UserSupplied)
///     .mode(AnalysisMode::BestMatch)
///     .skip_frames(5)
///     .window_size(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.window_size, 60);
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfigBuilder {
    // Required fields
    input_a: Option<PathBuf>,
    geometry: Option<(FrameGeometry, DimensionSource)>,

    // Optional fields with defaults
    input_b: Option<PathBuf>,
    skip_frames: u64,
    window_size: u64,
    mode: AnalysisMode,
    verbosity: u8,
}

impl Default for AnalysisConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            input_a: None,
            geometry: None,
            input_b: None,
            skip_frames: super::DEFAULT_SKIP_FRAMES,
            window_size: super::DEFAULT_WINDOW_SIZE,
            mode: AnalysisMode::default(),
            verbosity: 0,
        }
    }

    /// Sets the first input stream.
    pub fn input_a(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_a = Some(path.into());
        self
    }

    /// Sets the second input stream.
    pub fn input_b(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_b = Some(path.into());
        self
    }

    /// Sets the frame geometry and how it was obtained.
    pub fn geometry(mut self, geometry: FrameGeometry, source: DimensionSource) -> Self {
        self.geometry = Some((geometry, source));
        self
    }

    pub fn skip_frames(mut self, skip_frames: u64) -> Self {
        self.skip_frames = skip_frames;
        self
    }

    pub fn window_size(mut self, window_size: u64) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` if the first input or the geometry is missing,
    ///   or if validation fails
    pub fn build(self) -> CoreResult<AnalysisConfig> {
        let input_a = self
            .input_a
            .ok_or_else(|| CoreError::Config("first input file is required".to_string()))?;
        let (geometry, dimension_source) = self
            .geometry
            .ok_or_else(|| CoreError::Config("frame dimensions are required".to_string()))?;

        let config = AnalysisConfig {
            input_a,
            input_b: self.input_b,
            geometry,
            dimension_source,
            skip_frames: self.skip_frames,
            window_size: self.window_size,
            mode: self.mode,
            verbosity: self.verbosity,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> FrameGeometry {
        FrameGeometry::new(4, 4).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AnalysisConfigBuilder::new()
            .input_a("a.yuv")
            .input_b("b.yuv")
            .geometry(geometry(), DimensionSource::UserSupplied)
            .build()
            .unwrap();

        assert_eq!(config.window_size, super::super::DEFAULT_WINDOW_SIZE);
        assert_eq!(config.skip_frames, 0);
        assert_eq!(config.mode, AnalysisMode::Compare);
        assert!(!config.verbose());
        assert_eq!(config.inputs().count(), 2);
    }

    #[test]
    fn test_missing_second_input_for_pair_modes() {
        let result = AnalysisConfigBuilder::new()
            .input_a("a.yuv")
            .geometry(geometry(), DimensionSource::UserSupplied)
            .mode(AnalysisMode::BestMatch)
            .build();
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_hash_mode_accepts_single_input() {
        let config = AnalysisConfigBuilder::new()
            .input_a("a.yuv")
            .geometry(geometry(), DimensionSource::Detected)
            .mode(AnalysisMode::HashAlign)
            .build()
            .unwrap();
        assert_eq!(config.inputs().count(), 1);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let result = AnalysisConfigBuilder::new()
            .input_a("a.yuv")
            .input_b("b.yuv")
            .geometry(geometry(), DimensionSource::UserSupplied)
            .window_size(0)
            .build();
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_missing_geometry() {
        let result = AnalysisConfigBuilder::new().input_a("a.yuv").build();
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
