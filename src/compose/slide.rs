//! One slide's layer stack.
//!
//! A slide is a background fill plus an ordered list of layers, each a
//! premultiplied bitmap with a motion describing its position over the
//! slide's local time. The text panel enters from the left and the product
//! photo from the right, both easing to rest inside the first part of the
//! slide; logo and ribbon are static for the whole duration.

use kurbo::Point;

use crate::anim::ease::{entrance_progress, ENTRANCE_WINDOW_SEC};
use crate::assets::font::FontBook;
use crate::assets::prepare::PreparedImage;
use crate::compose::blit::{PremulRgba8, Raster};
use crate::config::RenderConfig;
use crate::foundation::error::SlatecastResult;
use crate::overlay::logo::logo_position;
use crate::overlay::ribbon::{info_line, render_ribbon, ribbon_position};
use crate::text::panel::render_text_panel;
use crate::timeline::record::SlideRecord;

/// Where a layer sits at each moment of the slide's local time.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerMotion {
    Static {
        pos: Point,
    },
    /// Ease-out from `from` to `to` over the first `window_sec` seconds,
    /// then hold at `to`.
    SlideIn {
        from: Point,
        to: Point,
        window_sec: f64,
    },
}

impl LayerMotion {
    pub fn position_at(&self, t_sec: f64) -> Point {
        match self {
            LayerMotion::Static { pos } => *pos,
            LayerMotion::SlideIn {
                from,
                to,
                window_sec,
            } => {
                let p = entrance_progress(t_sec, *window_sec);
                Point::new(from.x + (to.x - from.x) * p, from.y + (to.y - from.y) * p)
            }
        }
    }

    /// Position once all entrances have settled.
    pub fn rest(&self) -> Point {
        match self {
            LayerMotion::Static { pos } => *pos,
            LayerMotion::SlideIn { to, .. } => *to,
        }
    }
}

pub struct SlideLayer {
    pub raster: Raster,
    pub motion: LayerMotion,
}

/// A fully prepared slide, ready to rasterize at any `t` in
/// `[0, duration_sec]`. Layers are ordered back to front.
pub struct SlideClip {
    pub width: u32,
    pub height: u32,
    pub background: PremulRgba8,
    pub duration_sec: f64,
    pub layers: Vec<SlideLayer>,
}

/// Assemble the layer stack for one record.
pub fn build_slide_clip(
    cfg: &RenderConfig,
    book: &FontBook,
    record: &SlideRecord,
    product: &PreparedImage,
    logo: Option<&Raster>,
) -> SlatecastResult<SlideClip> {
    let bg = cfg.background_rgb()?;
    let width = cfg.frame_width;
    let height = cfg.frame_height;
    let panel_w = cfg.panel_width();
    let inset = i64::from(cfg.safe_inset_px);

    let mut layers = Vec::new();

    let panel = render_text_panel(cfg, book, &record.title, &record.bullets)?;
    layers.push(SlideLayer {
        motion: entrance(
            cfg,
            Point::new(-f64::from(panel_w), 0.0),
            Point::new(0.0, 0.0),
        ),
        raster: panel,
    });

    // Fit the product into the right-hand area, inset on both sides, and
    // center it in the leftover space.
    let avail_w = i64::from(width) - i64::from(panel_w) - 2 * inset;
    let avail_h = i64::from(height) - 2 * inset;
    let scale = (avail_w as f64 / f64::from(product.raster.width))
        .min(avail_h as f64 / f64::from(product.raster.height))
        .max(0.0);
    let new_w = ((f64::from(product.raster.width) * scale) as u32).max(1);
    let new_h = ((f64::from(product.raster.height) * scale) as u32).max(1);
    let fitted = product.raster.resized(new_w, new_h);

    let rest_x = i64::from(panel_w) + (avail_w - i64::from(new_w)) / 2 + inset;
    let rest_y = (i64::from(height) - i64::from(new_h)) / 2;
    layers.push(SlideLayer {
        motion: entrance(
            cfg,
            Point::new(f64::from(width), rest_y as f64),
            Point::new(rest_x as f64, rest_y as f64),
        ),
        raster: fitted,
    });

    if let Some(logo) = logo {
        layers.push(SlideLayer {
            motion: LayerMotion::Static {
                pos: logo_position(cfg, logo.width),
            },
            raster: logo.clone(),
        });
    }

    if cfg.show_info_ribbon {
        if let Some(text) = info_line(&record.capacity, &record.dimensions) {
            layers.push(SlideLayer {
                motion: LayerMotion::Static {
                    pos: ribbon_position(cfg),
                },
                raster: render_ribbon(cfg, book, &text),
            });
        }
    }

    Ok(SlideClip {
        width,
        height,
        background: [bg[0], bg[1], bg[2], 255],
        duration_sec: cfg.seconds_per_slide,
        layers,
    })
}

fn entrance(cfg: &RenderConfig, from: Point, to: Point) -> LayerMotion {
    if cfg.animate_entrances {
        LayerMotion::SlideIn {
            from,
            to,
            window_sec: ENTRANCE_WINDOW_SEC,
        }
    } else {
        LayerMotion::Static { pos: to }
    }
}
