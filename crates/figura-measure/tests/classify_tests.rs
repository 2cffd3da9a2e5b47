use figura_measure::{classify, Band, BandSet, BandTable, Category, PipelineConfig};

#[test]
fn test_default_male_boundaries_are_inclusive() {
    let bands = BandSet::default();
    let cases = [
        (100.0, "a2"),
        (70.0, "a2"),
        (69.99, "b2"),
        (50.0, "b2"),
        (49.99, "c2"),
        (40.0, "c2"),
        (39.99, "d2"),
        (0.0, "d2"),
    ];
    for (score, expected) in cases {
        assert_eq!(classify(score, &bands, Category::Male), expected, "score {}", score);
    }
}

#[test]
fn test_default_female_uses_own_outcomes() {
    let bands = BandSet::default();
    assert_eq!(classify(92.67, &bands, Category::Female), "a1");
    assert_eq!(classify(55.0, &bands, Category::Female), "b1");
    assert_eq!(classify(45.0, &bands, Category::Female), "c1");
    assert_eq!(classify(12.0, &bands, Category::Female), "d1");
}

#[test]
fn test_every_score_gets_exactly_one_outcome() {
    let bands = BandSet::default();
    for category in [Category::Male, Category::Female] {
        let table = bands.table(category);
        let outcomes: Vec<&str> = table.bands().map(|b| b.outcome.as_str()).collect();
        for i in -200..=400 {
            let score = i as f32 * 0.5;
            let outcome = classify(score, &bands, category);
            assert!(outcomes.contains(&outcome), "{} -> {}", score, outcome);
        }
        for score in [f32::NEG_INFINITY, f32::INFINITY, f32::NAN] {
            let outcome = classify(score, &bands, category);
            assert!(outcomes.contains(&outcome));
        }
    }
}

#[test]
fn test_higher_scores_never_map_to_lower_bands() {
    let table = &BandSet::default().male;
    let rank = |score: f32| {
        let outcome = &table.classify(score).outcome;
        table.bands().position(|b| &b.outcome == outcome)
    };
    let mut prev = rank(0.0);
    for i in 1..=100 {
        let r = rank(i as f32);
        assert!(r <= prev);
        prev = r;
    }
}

#[test]
fn test_custom_table_from_config() {
    let json = r#"{
        "version": 1,
        "bands": {
            "male": [
                {"min": 90, "outcome": "top", "label": "90+"},
                {"min": 60, "outcome": "mid"},
                {"outcome": "rest"}
            ],
            "female": [
                {"min": 55.5, "outcome": "f-hi"},
                {"outcome": "f-lo"}
            ]
        }
    }"#;
    let config = PipelineConfig::from_json(json).unwrap();

    assert_eq!(classify(90.0, &config.bands, Category::Male), "top");
    assert_eq!(classify(89.0, &config.bands, Category::Male), "mid");
    assert_eq!(classify(-5.0, &config.bands, Category::Male), "rest");
    assert_eq!(classify(55.5, &config.bands, Category::Female), "f-hi");
    assert_eq!(classify(55.4, &config.bands, Category::Female), "f-lo");
    assert_eq!(
        config.bands.male.classify(95.0).label.as_deref(),
        Some("90+")
    );
}

#[test]
fn test_table_serializes_as_list() {
    let table = BandTable::new(vec![Band::new(50.0, "hi"), Band::catch_all("lo")]).unwrap();
    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json[0]["min"], 50.0);
    assert!(json[1]["min"].is_null());
    assert_eq!(json[1]["outcome"], "lo");
}
