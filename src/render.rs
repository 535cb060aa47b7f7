//! Software rasterizer for the tray icon.
//!
//! Draws the six-band disc with tiny-skia and the overlay glyphs with
//! cosmic-text, producing a fixed-size RGBA buffer for the host tray
//! widget. All rendering is done on the CPU.

use std::io;
use std::time::Duration;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache};
use tiny_skia::{
    Color, FillRule, IntSize, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke,
    Transform,
};

use crate::icon::{overlay, render_bands, DisplayMode, Rgba, BAND_COUNT, ICON_SIZE};

const DISC_MARGIN: f32 = 2.0;
const OUTLINE: Rgba = Rgba::new(139, 0, 0, 255);

/// One rendered icon: fixed-dimension RGBA pixels plus the overlay text
/// and color as independent outputs for hosts that draw their own label.
#[derive(Clone, Debug, PartialEq)]
pub struct IconFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA, row-major, premultiplied alpha.
    pub pixels: Vec<u8>,
    pub text: Option<(String, Rgba)>,
}

impl IconFrame {
    fn blank() -> Self {
        Self {
            width: ICON_SIZE,
            height: ICON_SIZE,
            pixels: vec![0; (ICON_SIZE * ICON_SIZE * 4) as usize],
            text: None,
        }
    }
}

/// Owns the font system and glyph cache; constructed once at startup and
/// handed to whatever renders, never a process-wide global.
pub struct IconRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl IconRenderer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Rasterize the disc for the given timer reading.
    pub fn render(
        &mut self,
        elapsed: Duration,
        target: Duration,
        running: bool,
        mode: DisplayMode,
    ) -> IconFrame {
        let bands = render_bands(elapsed, target, running);
        let text = overlay(elapsed, target, mode);

        let Some(mut pixmap) = Pixmap::new(ICON_SIZE, ICON_SIZE) else {
            return IconFrame::blank();
        };

        let size = ICON_SIZE as f32;
        let radius = size / 2.0 - DISC_MARGIN;
        let center = size / 2.0;

        let mut pb = PathBuilder::new();
        pb.push_circle(center, center, radius);
        let Some(circle) = pb.finish() else {
            return IconFrame::blank();
        };

        let Some(mut disc_mask) = Mask::new(ICON_SIZE, ICON_SIZE) else {
            return IconFrame::blank();
        };
        disc_mask.fill_path(&circle, FillRule::Winding, true, Transform::identity());

        // Six horizontal bands bottom to top, clipped to the disc.
        let inner = size - 2.0 * DISC_MARGIN;
        let band_height = inner / BAND_COUNT as f32;
        for (i, band) in bands.iter().enumerate() {
            if band.a == 0 {
                continue;
            }
            let top = DISC_MARGIN + inner - (i as f32 + 1.0) * band_height;
            let Some(rect) = Rect::from_xywh(DISC_MARGIN, top, inner, band_height) else {
                continue;
            };
            let mut paint = Paint::default();
            paint.set_color(to_skia(*band));
            paint.anti_alias = false;
            pixmap.fill_rect(rect, &paint, Transform::identity(), Some(&disc_mask));
        }

        let mut paint = Paint::default();
        paint.set_color(to_skia(OUTLINE));
        paint.anti_alias = true;
        let stroke = Stroke {
            width: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&circle, &paint, &stroke, Transform::identity(), None);

        if let Some((label, color)) = &text {
            self.draw_text_centered(&mut pixmap, label, *color);
        }

        IconFrame {
            width: ICON_SIZE,
            height: ICON_SIZE,
            pixels: pixmap.take(),
            text,
        }
    }

    /// Shape and blend the overlay glyphs into the disc, centered.
    fn draw_text_centered(&mut self, pixmap: &mut Pixmap, text: &str, color: Rgba) {
        let font_size = if text.len() <= 2 { 30.0 } else { 20.0 };
        let metrics = Metrics::new(font_size, font_size * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        let attrs = Attrs::new().family(Family::Monospace);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
        }

        let x_off = (ICON_SIZE as f32 - width) / 2.0;
        let y_off = (ICON_SIZE as f32 - height) / 2.0;

        let mut placed = Vec::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                placed.push(glyph.physical((x_off, y_off + run.line_y), 1.0));
            }
        }

        for physical in placed {
            if let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical.cache_key)
            {
                let glyph_x = physical.x + image.placement.left;
                let glyph_y = physical.y - image.placement.top;
                blend_glyph(
                    pixmap,
                    &image.data,
                    image.placement.width,
                    image.placement.height,
                    glyph_x,
                    glyph_y,
                    color,
                );
            }
        }
    }
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a frame as PNG for debugging dumps.
pub fn encode_png(frame: &IconFrame) -> io::Result<Vec<u8>> {
    let size = IntSize::from_wh(frame.width, frame.height)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "zero-sized frame"))?;
    let pixmap = Pixmap::from_vec(frame.pixels.clone(), size)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "pixel buffer size mismatch"))?;
    pixmap
        .encode_png()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn to_skia(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Alpha blend an 8-bit coverage glyph onto the pixmap.
fn blend_glyph(
    pixmap: &mut Pixmap,
    glyph_data: &[u8],
    glyph_width: u32,
    glyph_height: u32,
    dest_x: i32,
    dest_y: i32,
    color: Rgba,
) {
    let pixmap_width = pixmap.width() as i32;
    let pixmap_height = pixmap.height() as i32;
    let data = pixmap.data_mut();

    for gy in 0..glyph_height as i32 {
        let py = dest_y + gy;
        if py < 0 || py >= pixmap_height {
            continue;
        }
        for gx in 0..glyph_width as i32 {
            let px = dest_x + gx;
            if px < 0 || px >= pixmap_width {
                continue;
            }

            let glyph_idx = (gy as u32 * glyph_width + gx as u32) as usize;
            let Some(&coverage) = glyph_data.get(glyph_idx) else {
                continue;
            };
            if coverage == 0 {
                continue;
            }

            let pixel_idx = ((py as u32 * pixmap_width as u32 + px as u32) * 4) as usize;
            if pixel_idx + 3 >= data.len() {
                continue;
            }

            let src_a = (coverage as u32 * color.a as u32) / 255;
            let inv_a = 255 - src_a;
            data[pixel_idx] =
                ((color.r as u32 * src_a + data[pixel_idx] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 1] =
                ((color.g as u32 * src_a + data[pixel_idx + 1] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 2] =
                ((color.b as u32 * src_a + data[pixel_idx + 2] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 3] = (src_a + (data[pixel_idx + 3] as u32 * inv_a) / 255) as u8;
        }
    }
}
