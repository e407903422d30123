//! Row eligibility and timeline math.

use tracing::info;

use crate::config::RenderConfig;
use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::timeline::record::SlideRecord;

/// Filter rows into the slide sequence, preserving input order.
///
/// Rules apply in order: stop once `max_slides` rows are selected, then per
/// row skip on the skip flag, on an empty image reference, and on filenames
/// containing a barcode keyword (case-insensitive). Zero surviving rows is
/// fatal since an empty video is never valid output.
pub fn select_slides(
    records: &[SlideRecord],
    cfg: &RenderConfig,
) -> SlatecastResult<Vec<SlideRecord>> {
    let mut selected = Vec::new();
    for record in records {
        if selected.len() >= cfg.max_slides {
            break;
        }
        if record.skip_requested() {
            continue;
        }
        let image = record.image.trim();
        if image.is_empty() {
            continue;
        }
        let lowered = image.to_lowercase();
        if cfg
            .barcode_keywords
            .iter()
            .any(|k| lowered.contains(&k.to_lowercase()))
        {
            info!(image, "filename looks like a barcode, skipping row");
            continue;
        }
        selected.push(record.clone());
    }

    if selected.is_empty() {
        return Err(SlatecastError::NoSlides);
    }
    Ok(selected)
}

pub fn frames_per_slide(cfg: &RenderConfig) -> u64 {
    (cfg.seconds_per_slide * f64::from(cfg.fps)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(image: &str) -> SlideRecord {
        SlideRecord {
            image: image.to_string(),
            ..SlideRecord::default()
        }
    }

    #[test]
    fn keeps_valid_rows_in_order() {
        let cfg = RenderConfig::default();
        let records = vec![record("a.png"), record("b.png"), record("c.png")];
        let selected = select_slides(&records, &cfg).unwrap();
        let names: Vec<_> = selected.iter().map(|r| r.image.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn skip_flag_empty_image_and_barcode_rows_are_dropped() {
        let cfg = RenderConfig::default();
        let mut skipped = record("b.png");
        skipped.skip = true;
        let records = vec![
            record("a.png"),
            skipped,
            record(""),
            record("barcode_1.png"),
            record("c.png"),
        ];
        let selected = select_slides(&records, &cfg).unwrap();
        let names: Vec<_> = selected.iter().map(|r| r.image.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn barcode_match_is_case_insensitive() {
        let cfg = RenderConfig::default();
        let records = vec![record("Product_QR_Label.PNG"), record("ok.png")];
        let selected = select_slides(&records, &cfg).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].image, "ok.png");
    }

    #[test]
    fn selection_stops_at_max_slides() {
        let cfg = RenderConfig {
            max_slides: 2,
            ..RenderConfig::default()
        };
        let records = vec![record("a.png"), record("b.png"), record("c.png")];
        let selected = select_slides(&records, &cfg).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn zero_surviving_rows_is_fatal() {
        let cfg = RenderConfig::default();
        let mut flagged = record("a.png");
        flagged.skip = true;
        let err = select_slides(&[flagged, record("")], &cfg).unwrap_err();
        assert!(matches!(err, SlatecastError::NoSlides));
    }

    #[test]
    fn three_row_sheet_yields_one_slide() {
        // One valid row, one flagged skip, one barcode filename.
        let cfg = RenderConfig::default();
        let mut flagged = record("widget_b.png");
        flagged.skip = true;
        let mut valid = record("widget.png");
        valid.title = "Widget".to_string();
        valid.bullets = vec!["durable".to_string(), "compact".to_string()];

        let selected = select_slides(&[valid, flagged, record("barcode_1.png")], &cfg).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title, "Widget");
    }

    #[test]
    fn frames_per_slide_rounds_seconds_times_fps() {
        let cfg = RenderConfig::default();
        assert_eq!(frames_per_slide(&cfg), 150);

        let odd = RenderConfig {
            seconds_per_slide: 0.5,
            fps: 25,
            ..RenderConfig::default()
        };
        assert_eq!(frames_per_slide(&odd), 13);
    }
}
