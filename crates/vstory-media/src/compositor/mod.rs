//! Storyboard compositor.
//!
//! Packs ordered (representative frame, caption) pairs into a fixed grid:
//! equal-size cells, an image region letterboxed into each cell, and a
//! caption region beneath it. The caption region height is uniform across
//! the grid (the maximum over all panels) so rows stay rectangular.

pub mod layout;
pub mod text;

use std::path::PathBuf;

use fontdue::{Font, FontSettings};
use image::{imageops, Rgb, RgbImage};
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Caption and border ink.
const INK: Rgb<u8> = Rgb([20, 20, 20]);
/// Canvas background.
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
/// Letterbox bars behind scaled images.
const LETTERBOX_FILL: Rgb<u8> = Rgb([16, 16, 16]);
/// Placeholder fill for missing or corrupt frames.
const PLACEHOLDER_FILL: Rgb<u8> = Rgb([200, 200, 200]);

/// Font locations tried when none is configured.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
];

/// Compositor tuning.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Target column count; `ceil(sqrt(n))` when unset
    pub columns: Option<u32>,
    /// Image region width per panel
    pub panel_width: u32,
    /// Image region height per panel (16:9 with the default width)
    pub panel_height: u32,
    /// Padding between and around cells
    pub padding: u32,
    /// Cell border stroke width
    pub border: u32,
    /// Title band height across the top
    pub title_height: u32,
    /// Caption font size in pixels
    pub font_size: f32,
    /// Explicit font path; system locations are searched when unset
    pub font_path: Option<PathBuf>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            columns: None,
            panel_width: 320,
            panel_height: 180,
            padding: 10,
            border: 2,
            title_height: 40,
            font_size: 16.0,
            font_path: None,
        }
    }
}

/// One panel's content: the representative raster (if it survived) and the
/// final caption.
#[derive(Debug)]
pub struct PanelInput<'a> {
    /// `None` renders the placeholder fill; the caption is drawn regardless
    pub image: Option<&'a RgbImage>,
    pub caption: &'a str,
}

/// Renders storyboards. Holds the loaded caption font.
pub struct Compositor {
    config: CompositorConfig,
    font: Font,
}

impl Compositor {
    /// Create a compositor, loading the caption font from the configured
    /// path or the first usable system location.
    pub fn new(config: CompositorConfig) -> MediaResult<Self> {
        let font = load_font(config.font_path.as_deref())?;
        Ok(Self { config, font })
    }

    /// Compose the storyboard image from ordered panels.
    ///
    /// Canvas dimensions are a pure function of the panel count, column
    /// count, panel size and the maximum caption height.
    pub fn compose(&self, panels: &[PanelInput<'_>]) -> MediaResult<RgbImage> {
        if panels.is_empty() {
            return Err(MediaError::InvalidVideo(
                "No panels to compose".to_string(),
            ));
        }

        let cfg = &self.config;
        let n = panels.len();
        let columns = cfg.columns.unwrap_or_else(|| layout::auto_columns(n));
        let rows = layout::grid_rows(n, columns);

        let wrap_width = (cfg.panel_width - 2 * cfg.padding) as f32;
        let wrapped: Vec<Vec<String>> = panels
            .iter()
            .map(|p| text::wrap_text(p.caption, wrap_width, |s| self.measure(s)))
            .collect();

        let line_height = self.line_height();
        let max_lines = wrapped.iter().map(|lines| lines.len()).max().unwrap_or(1);
        // Uniform caption region: panels with short captions get padding,
        // not a shorter cell
        let caption_height = max_lines as u32 * line_height + 2 * cfg.padding;
        let cell_height = cfg.panel_height + caption_height;

        let (width, height) = layout::canvas_size(
            columns,
            rows,
            cfg.panel_width,
            cfg.panel_height,
            caption_height,
            cfg.padding,
            cfg.title_height,
        );
        let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

        let title = format!("Storyboard - {} scenes", n);
        let title_width = self.measure(&title);
        let title_x = (width as f32 - title_width).max(0.0) / 2.0;
        let title_baseline = (cfg.title_height + cfg.font_size as u32) / 2;
        self.draw_line(&mut canvas, &title, title_x as i32, title_baseline as i32);

        for (i, (panel, lines)) in panels.iter().zip(&wrapped).enumerate() {
            let row = i as u32 / columns;
            let col = i as u32 % columns;
            let (x, y) = layout::cell_origin(
                row,
                col,
                cfg.panel_width,
                cell_height,
                cfg.padding,
                cfg.title_height,
            );

            match panel.image {
                Some(image) => self.draw_letterboxed(&mut canvas, image, x, y),
                None => {
                    warn!(panel = i, "Missing representative frame, rendering placeholder");
                    fill_rect(
                        &mut canvas,
                        x,
                        y,
                        cfg.panel_width,
                        cfg.panel_height,
                        PLACEHOLDER_FILL,
                    );
                }
            }

            // Caption lines centered in the caption region
            let mut baseline = y + cfg.panel_height + cfg.padding + line_height;
            for line in lines {
                let line_width = self.measure(line);
                let line_x = x as f32 + (cfg.panel_width as f32 - line_width).max(0.0) / 2.0;
                self.draw_line(&mut canvas, line, line_x as i32, baseline as i32);
                baseline += line_height;
            }

            stroke_rect(
                &mut canvas,
                x,
                y,
                cfg.panel_width,
                cell_height,
                cfg.border,
                INK,
            );
        }

        info!(
            panels = n,
            columns, rows, width, height, "Storyboard composed"
        );
        Ok(canvas)
    }

    /// Scale the image into the panel's content region, preserving aspect
    /// ratio by letterboxing (fixed policy for the whole run).
    fn draw_letterboxed(&self, canvas: &mut RgbImage, image: &RgbImage, x: u32, y: u32) {
        let cfg = &self.config;
        fill_rect(canvas, x, y, cfg.panel_width, cfg.panel_height, LETTERBOX_FILL);

        let (dx, dy, w, h) = letterbox_rect(
            cfg.panel_width,
            cfg.panel_height,
            image.width(),
            image.height(),
        );
        let resized = imageops::resize(image, w, h, imageops::FilterType::Triangle);
        imageops::overlay(canvas, &resized, (x + dx) as i64, (y + dy) as i64);
        debug!(w, h, "Panel image scaled");
    }

    /// Width of a text run at the caption font size.
    fn measure(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, self.config.font_size).advance_width)
            .sum()
    }

    /// Line height from font metrics, with a fallback proportional to the
    /// font size.
    fn line_height(&self) -> u32 {
        self.font
            .horizontal_line_metrics(self.config.font_size)
            .map(|m| m.new_line_size.ceil() as u32)
            .unwrap_or((self.config.font_size * 1.25) as u32)
    }

    /// Draw one line of text with its baseline at `baseline_y`.
    fn draw_line(&self, canvas: &mut RgbImage, line: &str, start_x: i32, baseline_y: i32) {
        let mut pen_x = start_x as f32;
        for ch in line.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, self.config.font_size);
            let glyph_x = pen_x as i32 + metrics.xmin;
            let glyph_y = baseline_y - metrics.height as i32 - metrics.ymin;
            blend_glyph(canvas, &coverage, metrics.width, metrics.height, glyph_x, glyph_y);
            pen_x += metrics.advance_width;
        }
    }
}

/// Centered target rectangle for scaling `(iw, ih)` into `(pw, ph)` without
/// distortion: offset within the panel plus scaled dimensions.
pub fn letterbox_rect(pw: u32, ph: u32, iw: u32, ih: u32) -> (u32, u32, u32, u32) {
    if iw == 0 || ih == 0 {
        return (0, 0, pw, ph);
    }
    let scale = (pw as f64 / iw as f64).min(ph as f64 / ih as f64);
    let w = ((iw as f64 * scale).round() as u32).clamp(1, pw);
    let h = ((ih as f64 * scale).round() as u32).clamp(1, ph);
    ((pw - w) / 2, (ph - h) / 2, w, h)
}

fn load_font(explicit: Option<&std::path::Path>) -> MediaResult<Font> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => FONT_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
    };

    for path in &candidates {
        if !path.exists() {
            continue;
        }
        let data = std::fs::read(path)?;
        match Font::from_bytes(data, FontSettings::default()) {
            Ok(font) => {
                debug!(path = %path.display(), "Loaded caption font");
                return Ok(font);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unusable font");
            }
        }
    }

    Err(MediaError::FontNotFound(candidates.len()))
}

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(canvas.width());
    let y_end = (y + h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn stroke_rect(canvas: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, stroke: u32, color: Rgb<u8>) {
    if stroke == 0 {
        return;
    }
    fill_rect(canvas, x, y, w, stroke, color);
    fill_rect(canvas, x, y + h.saturating_sub(stroke), w, stroke, color);
    fill_rect(canvas, x, y, stroke, h, color);
    fill_rect(canvas, x + w.saturating_sub(stroke), y, stroke, h, color);
}

/// Blend a grayscale glyph bitmap onto the canvas as dark ink.
fn blend_glyph(canvas: &mut RgbImage, coverage: &[u8], w: usize, h: usize, x: i32, y: i32) {
    for gy in 0..h {
        for gx in 0..w {
            let px = x + gx as i32;
            let py = y + gy as i32;
            if px < 0 || py < 0 || px as u32 >= canvas.width() || py as u32 >= canvas.height() {
                continue;
            }
            let alpha = coverage[gy * w + gx] as u16;
            if alpha == 0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            for (channel, ink) in dst.0.iter_mut().zip(INK.0) {
                let blended =
                    (ink as u16 * alpha + *channel as u16 * (255 - alpha)) / 255;
                *channel = blended as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_wide_image() {
        // 640x360 into 320x180 is an exact fit
        assert_eq!(letterbox_rect(320, 180, 640, 360), (0, 0, 320, 180));
        // A square image pillarboxes horizontally
        let (dx, dy, w, h) = letterbox_rect(320, 180, 400, 400);
        assert_eq!((w, h), (180, 180));
        assert_eq!(dy, 0);
        assert_eq!(dx, (320 - 180) / 2);
    }

    #[test]
    fn test_letterbox_tall_image() {
        let (dx, dy, w, h) = letterbox_rect(320, 180, 90, 180);
        assert_eq!((w, h), (90, 180));
        assert_eq!((dx, dy), ((320 - 90) / 2, 0));
    }

    #[test]
    fn test_letterbox_degenerate_image() {
        assert_eq!(letterbox_rect(320, 180, 0, 0), (0, 0, 320, 180));
    }

    #[test]
    fn test_fill_rect_clamps_to_canvas() {
        let mut canvas = RgbImage::from_pixel(10, 10, BACKGROUND);
        fill_rect(&mut canvas, 5, 5, 20, 20, INK);
        assert_eq!(*canvas.get_pixel(9, 9), INK);
        assert_eq!(*canvas.get_pixel(4, 4), BACKGROUND);
    }

    #[test]
    fn test_stroke_rect_outlines() {
        let mut canvas = RgbImage::from_pixel(20, 20, BACKGROUND);
        stroke_rect(&mut canvas, 2, 2, 16, 16, 2, INK);
        assert_eq!(*canvas.get_pixel(2, 2), INK);
        assert_eq!(*canvas.get_pixel(17, 17), INK);
        assert_eq!(*canvas.get_pixel(10, 10), BACKGROUND);
    }

    #[test]
    fn test_compose_renders_placeholder_and_is_deterministic() {
        // Skip silently on hosts with no usable system font; everything
        // font-independent is covered above and in layout/text tests
        let compositor = match Compositor::new(CompositorConfig::default()) {
            Ok(c) => c,
            Err(MediaError::FontNotFound(_)) => return,
            Err(e) => panic!("unexpected error: {}", e),
        };

        let frame = RgbImage::from_pixel(64, 36, Rgb([90, 120, 150]));
        let panels = [
            PanelInput {
                image: Some(&frame),
                caption: "a dog in a park",
            },
            PanelInput {
                image: None,
                caption: "placeholder panel still gets its caption",
            },
        ];

        let first = compositor.compose(&panels).unwrap();
        let second = compositor.compose(&panels).unwrap();
        assert_eq!(first.dimensions(), second.dimensions());
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_compose_rejects_empty_input() {
        if let Ok(compositor) = Compositor::new(CompositorConfig::default()) {
            assert!(compositor.compose(&[]).is_err());
        }
    }
}
