use crate::common::{TempAssets, fixture_font, inked_pixels, strings};
use gcaptcha::{
    CaptchaError, Challenge, MusicChallenge, RenderOptions, Solution, StaffLayout, TrebleStaff,
    place_notes,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn options() -> RenderOptions {
    RenderOptions {
        header_height: 16,
        cell_width: 40,
        cell_height: 120,
        gap: 4,
        padding: 4,
        font_path: Some(fixture_font()),
        ..RenderOptions::default()
    }
}

#[test]
fn test_staff_offsets_descend() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let staff = StaffLayout::generate(&mut rng);
        let offsets = staff.offsets();
        assert_eq!(offsets.len(), 11);
        assert!(offsets.windows(2).all(|pair| pair[0] > pair[1]));
    }
}

#[test]
fn test_accidental_sits_one_pixel_lower() {
    let mut rng = StdRng::seed_from_u64(2);
    let staff = StaffLayout::generate(&mut rng);
    let notes = place_notes(&mut rng, &staff, &strings(&["A", "#A", "bB", "B"]), &TrebleStaff)
        .unwrap();

    let a = staff.offset(4).unwrap();
    let b = staff.offset(5).unwrap();
    assert_eq!(notes[0].y, a - 5);
    assert_eq!(notes[1].y, a - 4);
    assert_eq!(notes[2].y, b - 4);
    assert_eq!(notes[3].y, b - 5);
    assert!(notes[1].accidental_anchor().is_some());
    assert!(notes[0].accidental_anchor().is_none());
}

#[test]
fn test_cursor_only_moves_right() {
    let mut rng = StdRng::seed_from_u64(8);
    let staff = StaffLayout::generate(&mut rng);
    let codes = strings(&["C", "#C", "D", "bE", "E", "F", "#F", "G"]);
    let notes = place_notes(&mut rng, &staff, &codes, &TrebleStaff).unwrap();

    for (i, pair) in notes.windows(2).enumerate() {
        let step = pair[1].x - pair[0].x;
        if codes[i].len() > 1 {
            assert!((18..23).contains(&step), "step {step} after accidental");
        } else {
            assert!((23..30).contains(&step), "step {step}");
        }
    }
}

#[test]
fn test_unknown_code_fails() {
    let mut rng = StdRng::seed_from_u64(1);
    let result = MusicChallenge::with_rng(&mut rng, "", &strings(&["C", "H"]), None, 2);
    assert!(matches!(result, Err(CaptchaError::UnknownNote(code)) if code == "H"));
}

#[test]
fn test_render_with_clef_image() {
    let assets = TempAssets::new("music");
    let clef = assets.write_png(
        "clef.png",
        &image::RgbaImage::from_pixel(6, 6, image::Rgba([200, 0, 0, 255])),
    );

    let mut rng = StdRng::seed_from_u64(10);
    let mut challenge =
        MusicChallenge::with_rng(&mut rng, "", &strings(&["E", "#G", "B"]), Some(clef), 3)
            .unwrap();
    challenge.set_options(options());

    let png = challenge.render().unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3 * 44 + 4 + 2 * 4, 120 + 8 + 16 + 8));
    assert_eq!(*img.get_pixel(12, 62), image::Rgba([200, 0, 0, 255]));

    assert_eq!(challenge.solution(), Solution::Text(challenge.text()));
    assert_eq!(challenge.render().unwrap(), png);
}

#[test]
fn test_accidentals_need_a_font() {
    let mut rng = StdRng::seed_from_u64(10);
    let mut challenge =
        MusicChallenge::with_rng(&mut rng, "", &strings(&["E", "#G"]), None, 2).unwrap();
    challenge.set_options(RenderOptions {
        font_path: None,
        ..options()
    });
    assert!(matches!(challenge.render(), Err(CaptchaError::Font(_))));

    challenge.set_options(options());
    let png = challenge.render().unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert!(inked_pixels(&img, image::Rgba([255, 255, 255, 255])) > 0);
}
