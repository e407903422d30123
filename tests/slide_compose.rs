use std::path::Path;

use slatecast::{
    build_slide_clip, detect_matting, prepare_product_image, render_clip_frame, ribbon_position,
    FontBook, FrameRGBA, LayerMotion, Point, Raster, RenderConfig, SlideClip, SlideRecord,
    ENTRANCE_WINDOW_SEC,
};

fn compose_config(images_dir: &Path) -> RenderConfig {
    RenderConfig {
        frame_width: 192,
        frame_height: 96,
        panel_ratio: 0.5,
        edge_padding_px: 8,
        line_spacing_px: 2,
        safe_inset_px: 4,
        title_font_px: 12.0,
        body_font_px: 10.0,
        remove_background: false,
        screen_blurry: false,
        upscale_min_side_px: 0,
        images_dir: images_dir.to_path_buf(),
        ..RenderConfig::default()
    }
}

fn write_red_square(dir: &Path, name: &str) {
    let img = image::RgbaImage::from_pixel(40, 40, image::Rgba([255, 0, 0, 255]));
    img.save(dir.join(name)).unwrap();
}

fn record(title: &str, capacity: &str) -> SlideRecord {
    SlideRecord {
        image: "red.png".to_string(),
        title: title.to_string(),
        capacity: capacity.to_string(),
        ..SlideRecord::default()
    }
}

fn build(cfg: &RenderConfig, rec: &SlideRecord, logo: Option<&Raster>) -> SlideClip {
    let book = FontBook::builtin();
    let matting = detect_matting(false);
    let product = prepare_product_image(cfg, matting.as_ref(), &book, &rec.image).unwrap();
    build_slide_clip(cfg, &book, rec, &product, logo).unwrap()
}

#[test]
fn product_rests_inside_the_safe_area() {
    let dir = tempfile::tempdir().unwrap();
    write_red_square(dir.path(), "red.png");
    let cfg = compose_config(dir.path());

    let clip = build(&cfg, &record("Jar", ""), None);
    let product = &clip.layers[1];
    let rest = product.motion.rest();

    // 40x40 source scaled into the 88x88 region right of the panel.
    assert_eq!((product.raster.width, product.raster.height), (88, 88));
    assert_eq!((rest.x, rest.y), (100.0, 4.0));
    assert!(rest.x >= f64::from(cfg.panel_width() + cfg.safe_inset_px));
    assert!(rest.x + f64::from(product.raster.width) <= 192.0 - 4.0);
    assert!(rest.y + f64::from(product.raster.height) <= 96.0 - 4.0);
}

#[test]
fn entrance_interpolates_both_layers_from_offscreen() {
    let dir = tempfile::tempdir().unwrap();
    write_red_square(dir.path(), "red.png");
    let cfg = compose_config(dir.path());

    let clip = build(&cfg, &record("Jar", ""), None);
    let panel = &clip.layers[0].motion;
    let product = &clip.layers[1].motion;

    assert_eq!(panel.position_at(0.0).x, -f64::from(cfg.panel_width()));
    assert_eq!(product.position_at(0.0).x, 192.0);

    let mid = ENTRANCE_WINDOW_SEC / 2.0;
    let panel_mid = panel.position_at(mid).x;
    let product_mid = product.position_at(mid).x;
    assert!(panel_mid > -f64::from(cfg.panel_width()) && panel_mid < 0.0);
    assert!(product_mid < 192.0 && product_mid > product.rest().x);

    assert_eq!(panel.position_at(ENTRANCE_WINDOW_SEC), panel.rest());
    assert_eq!(product.position_at(ENTRANCE_WINDOW_SEC * 3.0), product.rest());
}

#[test]
fn disabling_entrances_pins_layers_at_rest() {
    let dir = tempfile::tempdir().unwrap();
    write_red_square(dir.path(), "red.png");
    let cfg = RenderConfig {
        animate_entrances: false,
        ..compose_config(dir.path())
    };

    let clip = build(&cfg, &record("Jar", "500 ml"), None);
    for layer in &clip.layers {
        assert!(matches!(layer.motion, LayerMotion::Static { .. }));
        assert_eq!(layer.motion.position_at(0.0), layer.motion.rest());
    }
}

#[test]
fn ribbon_layer_tracks_capacity_and_toggle() {
    let dir = tempfile::tempdir().unwrap();
    write_red_square(dir.path(), "red.png");
    let cfg = compose_config(dir.path());

    let with_ribbon = build(&cfg, &record("Jar", "500 ml"), None);
    assert_eq!(with_ribbon.layers.len(), 3);
    let ribbon = with_ribbon.layers.last().unwrap();
    assert_eq!(ribbon.motion.rest(), ribbon_position(&cfg));

    let no_details = build(&cfg, &record("Jar", ""), None);
    assert_eq!(no_details.layers.len(), 2);

    let disabled_cfg = RenderConfig {
        show_info_ribbon: false,
        ..compose_config(dir.path())
    };
    let disabled = build(&disabled_cfg, &record("Jar", "500 ml"), None);
    assert_eq!(disabled.layers.len(), 2);
}

#[test]
fn logo_layer_sits_in_the_configured_corner() {
    let dir = tempfile::tempdir().unwrap();
    write_red_square(dir.path(), "red.png");
    let cfg = compose_config(dir.path());

    let logo = Raster::filled(10, 6, [0, 0, 0, 255]);
    let clip = build(&cfg, &record("Jar", ""), Some(&logo));
    assert_eq!(clip.layers.len(), 3);

    let corner = &clip.layers[2].motion;
    assert!(matches!(corner, LayerMotion::Static { .. }));
    assert_eq!(corner.rest(), Point::new(192.0 - 10.0 - 28.0, 28.0));
}

#[test]
fn frame_shows_background_first_then_product_at_rest() {
    let dir = tempfile::tempdir().unwrap();
    write_red_square(dir.path(), "red.png");
    let cfg = RenderConfig {
        show_info_ribbon: false,
        ..compose_config(dir.path())
    };

    let clip = build(&cfg, &record("", ""), None);

    let at = |frame: &FrameRGBA, x: u32, y: u32| {
        let i = ((y * frame.width + x) * 4) as usize;
        [frame.data[i], frame.data[i + 1], frame.data[i + 2]]
    };

    // Both layers are still offscreen on the first frame.
    let first = render_clip_frame(&clip, 0.0);
    assert_eq!(at(&first, 144, 48), [255, 255, 255]);
    assert_eq!(at(&first, 20, 48), [255, 255, 255]);

    // Product center lands at (144, 48) once the entrance completes.
    let settled = render_clip_frame(&clip, ENTRANCE_WINDOW_SEC + 0.1);
    let center = at(&settled, 144, 48);
    assert!(center[0] > 250 && center[1] < 5, "got {center:?}");
}
