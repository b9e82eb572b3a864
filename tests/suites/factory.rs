use crate::common::{TempAssets, catalog, create_test_config};
use gcaptcha::{CaptchaError, ChallengeKind, Solution, build_challenge};

#[test]
fn test_seeded_grid_is_reproducible() {
    let assets = TempAssets::new("factory-grid");
    assets.write_catalog(&catalog(6, 4), 10, 10);
    let config = create_test_config(ChallengeKind::Grid, &assets);

    let first = build_challenge(&config).unwrap();
    let second = build_challenge(&config).unwrap();
    assert_eq!(first.solution(), second.solution());
    assert_eq!(first.render().unwrap(), second.render().unwrap());

    let Solution::Cells(cells) = first.solution() else {
        panic!("grid challenge must report cells");
    };
    assert_eq!(cells.len(), 3);
    assert!(first.render_data_uri().unwrap().starts_with("data:image/png;base64,"));
}

#[test]
fn test_missing_catalog_is_reported() {
    let assets = TempAssets::new("factory-missing");
    let config = create_test_config(ChallengeKind::Grid, &assets);
    assert!(matches!(
        build_challenge(&config),
        Err(CaptchaError::Catalog(_))
    ));
}

#[test]
fn test_music_from_config() {
    let assets = TempAssets::new("factory-music");
    let config = create_test_config(ChallengeKind::Music, &assets);
    let challenge = build_challenge(&config).unwrap();

    let Solution::Text(mut codes) = challenge.solution() else {
        panic!("music challenge must report text");
    };
    codes.sort();
    assert_eq!(codes, vec!["#D", "C", "G"]);
    assert!(challenge.render().is_ok());
}

#[test]
fn test_text_from_config() {
    let assets = TempAssets::new("factory-text");
    let config = create_test_config(ChallengeKind::Text, &assets);
    let challenge = build_challenge(&config).unwrap();
    assert_eq!(challenge.options().cell_width, 10);
    let Solution::Text(chars) = challenge.solution() else {
        panic!("text challenge must report text");
    };
    assert_eq!(chars.len(), 4);
    assert_eq!(challenge.render().unwrap(), challenge.render().unwrap());
}
