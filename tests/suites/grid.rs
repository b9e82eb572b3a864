use crate::common::{TempAssets, catalog, grid_options};
use gcaptcha::{
    CaptchaError, Challenge, DirectoryImages, GridChallenge, GridPlan, Solution, load_catalog,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

#[test]
fn test_selection_invariants_hold_across_seeds() {
    let items = catalog(10, 5);
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = GridPlan::generate(&mut rng, 9, &items, 3).unwrap();

        assert_eq!(plan.concepts().len(), 4);
        assert!(plan.concepts().contains_key(&plan.target()));

        let mut chosen = HashSet::new();
        for (index, pick) in plan.concepts() {
            let expected = if *index == plan.target() { 3 } else { 2 };
            assert_eq!(pick.slots.len(), expected);
            assert_eq!(pick.slots.iter().collect::<HashSet<_>>().len(), expected);
            assert!(pick.slots.iter().all(|slot| *slot < items[*index].filenames.len()));
            chosen.extend(pick.keys());
        }

        let placed: Vec<&String> = plan.cells().values().collect();
        assert_eq!(placed.len(), chosen.len());
        assert_eq!(placed.into_iter().cloned().collect::<HashSet<_>>(), chosen);
        assert!(plan.cells().keys().all(|cell| *cell < 9));
    }
}

#[test]
fn test_answer_rederived_from_selection() {
    let items = catalog(6, 4);
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = GridPlan::generate(&mut rng, 9, &items, 3).unwrap();

        let target_keys: HashSet<String> = plan.target_pick().keys().collect();
        let mut expected: Vec<usize> = plan
            .cells()
            .iter()
            .filter(|(_, key)| target_keys.contains(*key))
            .map(|(cell, _)| *cell)
            .collect();
        expected.sort_unstable();

        let mut answer = plan.answer();
        answer.sort_unstable();
        assert_eq!(answer, expected);
        assert_eq!(answer.len(), 3);
    }
}

#[test]
fn test_forced_target_five_concepts() {
    let items = catalog(5, 4);
    let mut rng = StdRng::seed_from_u64(9);
    let plan = GridPlan::with_target(&mut rng, 9, &items, 3, 2).unwrap();

    assert!(plan.concepts().contains_key(&2));
    assert_eq!(plan.concepts().len(), 4);
    let total: usize = plan.concepts().values().map(|pick| pick.slots.len()).sum();
    assert_eq!(total, 9);
    assert_eq!(plan.cells().len(), 9);

    let answer = plan.answer();
    assert_eq!(answer.len(), 3);
    assert!(answer.iter().all(|cell| plan.cells()[cell].starts_with("set2/")));
}

#[test]
fn test_distractors_not_below_catalog_size() {
    let items = catalog(3, 4);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        GridPlan::generate(&mut rng, 9, &items, 3),
        Err(CaptchaError::InvalidConfig(_))
    ));
    assert!(matches!(
        GridPlan::generate(&mut rng, 9, &items, 5),
        Err(CaptchaError::InvalidConfig(_))
    ));
}

#[test]
fn test_render_from_disk() {
    let assets = TempAssets::new("grid");
    let items = catalog(5, 3);
    let catalog_path = assets.write_catalog(&items, 10, 10);
    let loaded = load_catalog(&catalog_path).unwrap();
    assert_eq!(loaded, items);

    let mut rng = StdRng::seed_from_u64(3);
    let mut challenge = GridChallenge::with_rng(
        &mut rng,
        9,
        &loaded,
        3,
        DirectoryImages::new(assets.path()),
    )
    .unwrap();
    challenge.set_options(grid_options());

    let png = challenge.render().unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (3 * 12 + 2 + 6, 3 * 12 + 2 + 12 + 6));

    let answer = challenge.answer();
    assert_eq!(challenge.solution(), Solution::Cells(answer.clone()));
    let submitted: Vec<String> = answer.iter().map(ToString::to_string).collect();
    assert!(challenge.solution().matches(&submitted.join(",")));

    assert_eq!(challenge.render().unwrap(), png);
    assert_eq!(challenge.answer(), answer);
}

#[test]
fn test_render_missing_picture_aborts() {
    let assets = TempAssets::new("grid-missing");
    let items = catalog(5, 3);
    assets.write_catalog(&items, 10, 10);
    std::fs::remove_file(assets.path().join("set0/1.png")).unwrap();
    std::fs::remove_file(assets.path().join("set1/1.png")).unwrap();
    std::fs::remove_file(assets.path().join("set2/1.png")).unwrap();
    std::fs::remove_file(assets.path().join("set3/1.png")).unwrap();
    std::fs::remove_file(assets.path().join("set4/1.png")).unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let mut challenge = GridChallenge::with_rng(
        &mut rng,
        9,
        &items,
        3,
        DirectoryImages::new(assets.path()),
    )
    .unwrap();
    challenge.set_options(grid_options());

    match challenge.render() {
        Err(CaptchaError::Image { source, .. }) => {
            assert!(matches!(source, image::ImageError::IoError(_)));
        }
        other => panic!("expected image error, got {:?}", other.map(|png| png.len())),
    }
}

#[test]
fn test_background_is_composited() {
    let assets = TempAssets::new("grid-bg");
    let items = catalog(4, 3);
    assets.write_catalog(&items, 10, 10);
    let bg = assets.write_png(
        "bg.png",
        &image::RgbaImage::from_pixel(200, 200, image::Rgba([10, 20, 30, 255])),
    );

    let mut rng = StdRng::seed_from_u64(8);
    let mut challenge = GridChallenge::with_rng(
        &mut rng,
        9,
        &items,
        3,
        DirectoryImages::new(assets.path()),
    )
    .unwrap();
    let mut options = grid_options();
    options.background = Some(bg);
    challenge.set_options(options);

    let png = challenge.render().unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(*img.get_pixel(0, 0), image::Rgba([10, 20, 30, 255]));
}

#[test]
fn test_catalog_titles_with_escapes_round_trip() {
    let assets = TempAssets::new("grid-escapes");
    let mut items = catalog(4, 3);
    items[0].title = r#"the "odd" one"#.to_string();
    items[1].title = r"back\slash".to_string();
    let path = assets.write_catalog(&items, 10, 10);

    let loaded = load_catalog(&path).unwrap();
    assert_eq!(loaded, items);
}

#[test]
fn test_render_without_font_is_refused() {
    let assets = TempAssets::new("grid-nofont");
    let items = catalog(5, 4);
    assets.write_catalog(&items, 10, 10);

    let mut rng = StdRng::seed_from_u64(3);
    let mut challenge = GridChallenge::with_rng(
        &mut rng,
        9,
        &items,
        3,
        DirectoryImages::new(assets.path()),
    )
    .unwrap();
    let mut options = grid_options();
    options.font_path = None;
    options.header_height = 30;
    challenge.set_options(options);

    assert!(matches!(challenge.render(), Err(CaptchaError::Font(_))));
}
