//! Focus screening for product photos.

use image::RgbaImage;

/// Variance of a 3x3 Laplacian over the image luma.
///
/// Low values indicate little high-frequency detail, i.e. a blurry or flat
/// image. Images too small to hold the kernel interior report infinite
/// variance and are treated as sharp.
pub fn blur_variance(img: &RgbaImage) -> f64 {
    let (w, h) = (img.width() as usize, img.height() as usize);
    if w < 3 || h < 3 {
        return f64::INFINITY;
    }

    let mut luma = vec![0.0f64; w * h];
    for (i, px) in img.pixels().enumerate() {
        let [r, g, b, _] = px.0;
        luma[i] = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    }

    // Laplacian responses over the interior, kernel (0,1,0; 1,-4,1; 0,1,0).
    let count = (w - 2) * (h - 2);
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let c = luma[y * w + x];
            let lap = luma[(y - 1) * w + x] + luma[(y + 1) * w + x] + luma[y * w + x - 1]
                + luma[y * w + x + 1]
                - 4.0 * c;
            sum += lap;
            sum_sq += lap * lap;
        }
    }

    let mean = sum / count as f64;
    (sum_sq / count as f64) - mean * mean
}
