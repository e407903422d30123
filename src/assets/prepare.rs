//! Product image preparation: decode, screen, matte, upscale.

use image::{imageops, Rgba, RgbaImage};
use tracing::warn;

use crate::assets::font::FontBook;
use crate::assets::matting::Matting;
use crate::assets::sharpness::blur_variance;
use crate::compose::blit::Raster;
use crate::config::RenderConfig;
use crate::foundation::error::SlatecastResult;
use crate::foundation::math::premultiply_rgba8_in_place;

const PLACEHOLDER_SIDE: u32 = 800;
const PLACEHOLDER_TEXT_PX: f32 = 24.0;

/// A product photo ready for compositing.
pub struct PreparedImage {
    pub raster: Raster,
    /// True when the source file could not be decoded and a synthetic
    /// "missing image" card stands in for it.
    pub placeholder: bool,
    /// Laplacian variance when sharpness screening ran.
    pub blur_variance: Option<f64>,
}

/// Run the full preparation pipeline for one product photo.
///
/// Every failure along the way degrades: an unreadable file becomes a
/// placeholder card, a failed matte keeps the original pixels, a blurry
/// image is only warned about. The returned image always has both sides
/// at or above the configured upscale threshold.
pub fn prepare_product_image(
    cfg: &RenderConfig,
    matting: &dyn Matting,
    book: &FontBook,
    image_name: &str,
) -> SlatecastResult<PreparedImage> {
    let path = cfg.images_dir.join(image_name);
    let (mut rgba, placeholder) = match image::open(&path) {
        Ok(img) => (img.to_rgba8(), false),
        Err(err) => {
            warn!(path = %path.display(), %err, "product image unreadable, using placeholder");
            (placeholder_product(image_name, book), true)
        }
    };

    let mut variance = None;
    if cfg.screen_blurry && !placeholder {
        let v = blur_variance(&rgba);
        if v < cfg.blur_variance_threshold {
            warn!(
                image = image_name,
                variance = v,
                "image looks blurry, keeping it but consider replacing"
            );
        }
        variance = Some(v);
    }

    if cfg.remove_background && !placeholder {
        match matting.matte(&rgba) {
            Ok(matted) => rgba = matted,
            Err(err) => {
                warn!(
                    image = image_name,
                    provider = matting.name(),
                    %err,
                    "background removal failed, keeping original pixels"
                );
            }
        }
    }

    rgba = upscale_min_side(rgba, cfg.upscale_min_side_px);

    let (w, h) = (rgba.width(), rgba.height());
    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Ok(PreparedImage {
        raster: Raster::from_premul_rgba8(w, h, data)?,
        placeholder,
        blur_variance: variance,
    })
}

/// Neutral-gray card labelled with the missing file's name.
fn placeholder_product(name: &str, book: &FontBook) -> RgbaImage {
    let mut raster = Raster::filled(PLACEHOLDER_SIDE, PLACEHOLDER_SIDE, [230, 230, 230, 255]);
    let line_h = book.body.line_height(PLACEHOLDER_TEXT_PX);
    let mut baseline = 40.0 + book.body.ascent(PLACEHOLDER_TEXT_PX);
    for line in ["Missing image:", name] {
        book.body
            .draw(&mut raster, 40.0, baseline, line, PLACEHOLDER_TEXT_PX, [80, 80, 80]);
        baseline += line_h;
    }
    // Everything drawn is opaque, so the premultiplied buffer is already
    // straight RGBA.
    RgbaImage::from_raw(raster.width, raster.height, raster.data).unwrap_or_else(|| {
        RgbaImage::from_pixel(PLACEHOLDER_SIDE, PLACEHOLDER_SIDE, Rgba([230, 230, 230, 255]))
    })
}

/// Uniformly scale up so the smaller side reaches `min_side`. Images already
/// at or above the threshold pass through untouched.
fn upscale_min_side(img: RgbaImage, min_side: u32) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    let small = w.min(h);
    if min_side == 0 || small == 0 || small >= min_side {
        return img;
    }
    let scale = f64::from(min_side) / f64::from(small);
    let nw = (f64::from(w) * scale).round() as u32;
    let nh = (f64::from(h) * scale).round() as u32;
    imageops::resize(&img, nw.max(1), nh.max(1), imageops::FilterType::Lanczos3)
}

/// Decode the configured logo, if any. A missing or unreadable logo is
/// advisory only.
pub fn load_logo(cfg: &RenderConfig) -> Option<Raster> {
    let path = cfg.logo_path.as_ref()?;
    let img = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            warn!(path = %path.display(), %err, "logo not readable, continuing without it");
            return None;
        }
    };
    let (w, h) = (img.width(), img.height());
    let mut data = img.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Raster::from_premul_rgba8(w, h, data).ok()
}
