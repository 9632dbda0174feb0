//! Configuration for sprite fingerprints and template matching

/// Controls how sprite fingerprints are derived from reference images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteConfig {
    /// Number of most frequent colors kept per animation frame
    pub signature_color_count: usize,
    /// Number of anchor draws per animation frame
    pub constellation_size: usize,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            signature_color_count: 8,
            constellation_size: 8,
        }
    }
}

/// Score metric used by template matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    /// Normalized cross correlation, 1.0 is a perfect match
    CrossCorrelationNormalized,
    /// Normalized squared difference, 0.0 is a perfect match
    SumOfSquaredErrorsNormalized,
}

impl MatchMethod {
    pub fn lower_is_better(self) -> bool {
        matches!(self, MatchMethod::SumOfSquaredErrorsNormalized)
    }

    /// Check if a score is good enough to be considered at all
    pub fn passes(self, score: f32, threshold: f32) -> bool {
        if self.lower_is_better() {
            score <= threshold
        } else {
            score >= threshold
        }
    }

    /// Check if `score` replaces `best`; later candidates win correlation ties
    pub fn improves(self, score: f32, best: f32) -> bool {
        if self.lower_is_better() {
            score < best
        } else {
            score >= best
        }
    }

    /// The score given to windows where the metric is undefined
    pub(crate) fn worst_score(self) -> f32 {
        if self.lower_is_better() {
            f32::MAX
        } else {
            f32::MIN
        }
    }
}

/// Which pixel data takes part in template matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateChannels {
    /// Red, green and blue are correlated together; alpha is dropped
    Color,
    /// Both images are reduced to luma first
    Luma,
}

#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub method: MatchMethod,
    pub channels: TemplateChannels,
    /// Score a frame's best alignment must reach (or stay under, for difference metrics)
    pub match_threshold: f32,
    /// Report matches in frame coordinates when searching a region
    pub use_global_location: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            method: MatchMethod::CrossCorrelationNormalized,
            channels: TemplateChannels::Color,
            match_threshold: 0.95,
            use_global_location: true,
        }
    }
}

/// Configuration preset for sprites that must match almost pixel for pixel
pub fn create_precise_config() -> TemplateConfig {
    TemplateConfig {
        method: MatchMethod::CrossCorrelationNormalized,
        channels: TemplateChannels::Color,
        match_threshold: 0.98,
        use_global_location: true,
    }
}

/// Configuration preset trading color fidelity for speed
pub fn create_fast_config() -> TemplateConfig {
    TemplateConfig {
        method: MatchMethod::CrossCorrelationNormalized,
        channels: TemplateChannels::Luma,
        match_threshold: 0.9,
        use_global_location: true,
    }
}
