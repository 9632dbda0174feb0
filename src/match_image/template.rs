//! Template matching: normalized correlation of the full sprite grid

use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::integral_image::{integral_image, sum_image_pixels};
use imageproc::template_matching::{Extremes, MatchTemplateMethod, find_extremes, match_template};
use std::borrow::Cow;

use super::config::{MatchMethod, TemplateChannels, TemplateConfig};
use super::region::Region;
use super::{report_location, search_window};
use crate::error::SpriteResult;
use crate::frame::Frame;
use crate::pixels::ColorImage;
use crate::sprite::SpriteModel;

type ScoreImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Locate `sprite` in `frame` by normalized cross correlation on color pixels.
///
/// Shorthand for [`locate_template_with`] using the default configuration
/// with the given threshold and location mode.
pub fn locate_template(
    sprite: &SpriteModel,
    frame: &Frame,
    region: Option<Region>,
    use_global_location: bool,
    match_threshold: f32,
) -> SpriteResult<Option<Region>> {
    let config = TemplateConfig {
        match_threshold,
        use_global_location,
        ..TemplateConfig::default()
    };
    locate_template_with(sprite, frame, region, &config)
}

/// Locate `sprite` in `frame` by scanning every animation frame over every alignment.
///
/// Each animation frame contributes its best scoring alignment if that
/// score passes the threshold; the best of those wins. Correlation ties go
/// to the later animation frame. Returns `Ok(None)` without scanning when
/// the searched area is smaller than the sprite.
pub fn locate_template_with(
    sprite: &SpriteModel,
    frame: &Frame,
    region: Option<Region>,
    config: &TemplateConfig,
) -> SpriteResult<Option<Region>> {
    let image = frame.image();
    let window = search_window(image, region)?;

    let (sprite_height, sprite_width) = sprite.image_shape();
    if window.height() < sprite_height || window.width() < sprite_width {
        return Ok(None);
    }

    let searched: Cow<'_, ColorImage> = match region {
        Some(region) => Cow::Owned(image.crop(region)),
        None => Cow::Borrowed(image),
    };
    let pixels = SearchPixels::prepare(&searched, config.channels);

    let method = config.method;
    let mut best: Option<(f32, (u32, u32))> = None;

    for (index, sprite_frame) in sprite.frames().iter().enumerate() {
        let scores = pixels.score(sprite_frame.image(), method);
        let Extremes {
            max_value,
            min_value,
            max_value_location,
            min_value_location,
            ..
        } = find_extremes(&scores);

        let (score, location) = if method.lower_is_better() {
            (min_value, min_value_location)
        } else {
            (max_value, max_value_location)
        };

        log::trace!(
            "🔍 '{}' frame {}: best score {:.4} at ({},{})",
            sprite.name(),
            index,
            score,
            location.0,
            location.1
        );

        if !method.passes(score, config.match_threshold) {
            continue;
        }
        if best.is_none_or(|(best_score, _)| method.improves(score, best_score)) {
            best = Some((score, location));
        }
    }

    Ok(best.map(|(_, (x, y))| {
        let location = Region::from_xywh(x, y, sprite_width, sprite_height);
        report_location(location, region, config.use_global_location)
    }))
}

impl From<MatchMethod> for MatchTemplateMethod {
    fn from(method: MatchMethod) -> Self {
        match method {
            MatchMethod::CrossCorrelationNormalized => MatchTemplateMethod::CrossCorrelationNormalized,
            MatchMethod::SumOfSquaredErrorsNormalized => {
                MatchTemplateMethod::SumOfSquaredErrorsNormalized
            }
        }
    }
}

/// The searched pixels, converted once for all animation frames
enum SearchPixels {
    Color(RgbImage),
    Luma(GrayImage),
}

impl SearchPixels {
    fn prepare(image: &ColorImage, channels: TemplateChannels) -> Self {
        match channels {
            TemplateChannels::Color => SearchPixels::Color(image.to_rgb8()),
            TemplateChannels::Luma => SearchPixels::Luma(image.to_luma8()),
        }
    }

    /// Score surface over all alignments.
    ///
    /// A normalized score is undefined where the window or the template is
    /// all black; those alignments get the worst value in both channel modes.
    fn score(&self, template: &ColorImage, method: MatchMethod) -> ScoreImage {
        let mut scores = match self {
            SearchPixels::Color(image) => color_scores(image, &template.to_rgb8(), method),
            SearchPixels::Luma(image) => {
                let template = template.to_luma8();
                let mut scores = match_template(image, &template, method.into());
                mark_blank_windows(&mut scores, image, &template);
                scores
            }
        };

        let worst = method.worst_score();
        for score in scores.pixels_mut() {
            if score.0[0].is_nan() {
                score.0[0] = worst;
            }
        }
        scores
    }
}

/// `match_template` falls back to the raw sum when the normalization term is
/// zero; mark those alignments undefined instead.
fn mark_blank_windows(scores: &mut ScoreImage, image: &GrayImage, template: &GrayImage) {
    let (template_width, template_height) = template.dimensions();
    let blank_template = template.pixels().all(|p| p.0[0] == 0);
    let sums = integral_image::<_, u64>(image);

    for (x, y, score) in scores.enumerate_pixels_mut() {
        let [window_sum] = sum_image_pixels(
            &sums,
            x,
            y,
            x + template_width - 1,
            y + template_height - 1,
        );
        if blank_template || window_sum == 0 {
            score.0[0] = f32::NAN;
        }
    }
}

/// Correlate all three color channels at once.
///
/// Sums are kept as integers so identical windows score exactly.
fn color_scores(image: &RgbImage, template: &RgbImage, method: MatchMethod) -> ScoreImage {
    let (image_width, image_height) = image.dimensions();
    let (template_width, template_height) = template.dimensions();

    let image_data = image.as_raw();
    let template_data = template.as_raw();
    let image_stride = image_width as usize * 3;
    let row_len = template_width as usize * 3;

    let template_energy: u64 = template_data.iter().map(|&v| u64::from(v) * u64::from(v)).sum();

    ImageBuffer::from_fn(
        image_width - template_width + 1,
        image_height - template_height + 1,
        |x, y| {
            let mut cross: u64 = 0;
            let mut window_energy: u64 = 0;

            for ty in 0..template_height as usize {
                let start = (y as usize + ty) * image_stride + x as usize * 3;
                let image_row = &image_data[start..start + row_len];
                let template_row = &template_data[ty * row_len..(ty + 1) * row_len];

                for (&i, &t) in image_row.iter().zip(template_row) {
                    let (i, t) = (u64::from(i), u64::from(t));
                    cross += i * t;
                    window_energy += i * i;
                }
            }

            Luma([normalized_score(method, cross, window_energy, template_energy)])
        },
    )
}

fn normalized_score(method: MatchMethod, cross: u64, window_energy: u64, template_energy: u64) -> f32 {
    let denominator = (window_energy as f64).sqrt() * (template_energy as f64).sqrt();
    if denominator == 0.0 {
        return f32::NAN;
    }

    match method {
        MatchMethod::CrossCorrelationNormalized => (cross as f64 / denominator) as f32,
        MatchMethod::SumOfSquaredErrorsNormalized => {
            let squared_difference = window_energy + template_energy - 2 * cross;
            (squared_difference as f64 / denominator) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    #[test]
    fn test_identical_patches_score_perfectly() {
        let image = RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 50, 9]));

        let scores = color_scores(&image, &image, MatchMethod::CrossCorrelationNormalized);
        assert_eq!(scores.dimensions(), (1, 1));
        assert!((scores.get_pixel(0, 0).0[0] - 1.0).abs() < 1e-6);

        let scores = color_scores(&image, &image, MatchMethod::SumOfSquaredErrorsNormalized);
        assert_eq!(scores.get_pixel(0, 0).0[0], 0.0);
    }

    #[test]
    fn test_orthogonal_colors_do_not_correlate() {
        let red = solid_rgb(3, 3, [255, 0, 0]);
        let blue = solid_rgb(3, 3, [0, 0, 255]);

        let scores = color_scores(&blue, &red, MatchMethod::CrossCorrelationNormalized);
        assert_eq!(scores.get_pixel(0, 0).0[0], 0.0);

        let scores = color_scores(&blue, &red, MatchMethod::SumOfSquaredErrorsNormalized);
        assert!((scores.get_pixel(0, 0).0[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_surface_size() {
        let image = solid_rgb(10, 7, [1, 2, 3]);
        let template = solid_rgb(4, 3, [1, 2, 3]);
        let scores = color_scores(&image, &template, MatchMethod::CrossCorrelationNormalized);
        assert_eq!(scores.dimensions(), (7, 5));
    }

    #[test]
    fn test_black_window_is_sanitized() {
        let black = ColorImage::from(solid_rgb(6, 6, [0, 0, 0]));
        let template = ColorImage::from(solid_rgb(2, 2, [10, 10, 10]));

        for channels in [TemplateChannels::Color, TemplateChannels::Luma] {
            let pixels = SearchPixels::prepare(&black, channels);

            let scores = pixels.score(&template, MatchMethod::CrossCorrelationNormalized);
            assert!(scores.pixels().all(|p| p.0[0] == f32::MIN), "{channels:?}");

            let scores = pixels.score(&template, MatchMethod::SumOfSquaredErrorsNormalized);
            assert!(scores.pixels().all(|p| p.0[0] == f32::MAX), "{channels:?}");
        }
    }

    #[test]
    fn test_luma_blank_windows_only_are_marked() {
        // Black left half, gray right half
        let image = ColorImage::from(RgbImage::from_fn(8, 4, |x, _| {
            if x < 4 { Rgb([0, 0, 0]) } else { Rgb([90, 90, 90]) }
        }));
        let template = ColorImage::from(solid_rgb(2, 2, [90, 90, 90]));
        let pixels = SearchPixels::prepare(&image, TemplateChannels::Luma);

        let scores = pixels.score(&template, MatchMethod::CrossCorrelationNormalized);
        assert_eq!(scores.get_pixel(0, 0).0[0], f32::MIN);
        assert_eq!(scores.get_pixel(2, 0).0[0], f32::MIN);
        assert!(scores.get_pixel(3, 0).0[0] > 0.0);
        assert!((scores.get_pixel(6, 2).0[0] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_black_on_black_scores_worst_in_both_channels() {
        let frame = ColorImage::from(solid_rgb(30, 20, [0, 0, 0]));
        let sprite = ColorImage::from(solid_rgb(4, 3, [0, 0, 0]));

        for channels in [TemplateChannels::Color, TemplateChannels::Luma] {
            let pixels = SearchPixels::prepare(&frame, channels);

            let scores = pixels.score(&sprite, MatchMethod::CrossCorrelationNormalized);
            assert_eq!(scores.dimensions(), (27, 18));
            assert!(scores.pixels().all(|p| p.0[0] == f32::MIN), "{channels:?}");

            let scores = pixels.score(&sprite, MatchMethod::SumOfSquaredErrorsNormalized);
            assert!(scores.pixels().all(|p| p.0[0] == f32::MAX), "{channels:?}");
        }
    }
}
