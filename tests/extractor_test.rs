//! OCR抽出の結合テスト
//!
//! 実スキャンに近いOCRテキストを入力に、抽出の一連の動きを確認する。

use card_scan_rust::{Game, ImageAnalysis, OcrExtractor};

fn extractor() -> OcrExtractor {
    OcrExtractor::with_fallback_names()
}

#[test]
fn test_round_trip_vivid_voltage_charizard() {
    let result = extractor().parse("Charizard\nHP 170\n025/185\nSWSH4", Game::Pokemon);

    assert_eq!(result.card_number, "25");
    assert_eq!(result.set_total, "185");
    assert_eq!(result.hp, "170");
    assert_eq!(result.set_code, "swsh4");
    assert_eq!(result.card_name, "Charizard");
    assert!(result.confidence >= 0.9);
}

#[test]
fn test_base_set_card() {
    let text = "Alakazam\nHP 80\n1/102\n©1999 Wizards of the Coast";
    let result = extractor().parse(text, Game::Pokemon);

    assert_eq!(result.card_name, "Alakazam");
    assert_eq!(result.card_number, "1");
    assert_eq!(result.set_total, "102");
    assert!(result.is_wotc_era);
    // 年代シグナルにより旧Base Setを選ぶ（総数102はTriumphantと共有）
    assert_eq!(result.set_code, "base1");
    assert_eq!(result.candidate_sets, vec!["base1", "hgss4"]);
}

#[test]
fn test_first_edition_base_set() {
    let text = "Charizard\nHP 120\n4/102\n1ST EDITION\n©1999 Wizards";
    let result = extractor().parse(text, Game::Pokemon);

    assert!(result.is_first_edition);
    assert!(result.is_wotc_era);
    assert_eq!(result.card_number, "4");
}

#[test]
fn test_legacy_two_letter_code() {
    // 旧2文字コード JU はセット名が読めなくても Jungle を指す
    let text = "Scyther\nHP 70\n10/64\nJU";
    let result = extractor().parse(text, Game::Pokemon);
    assert_eq!(result.set_code, "base2");
    assert_eq!(result.match_reason, "ptcgo_code");
}

#[test]
fn test_ocr_noise_in_name_and_digits() {
    // 名前の誤読（1→i）と数字の誤読（O→0）を同時に吸収する
    let text = "Char1zard\nHP 17O\nO25/185";
    let result = extractor().parse(text, Game::Pokemon);

    assert_eq!(result.card_name, "Charizard");
    assert_eq!(result.card_number, "25");
    assert_eq!(result.set_total, "185");
}

#[test]
fn test_foil_suffixes_never_set_foil() {
    for text in [
        "Pikachu V\n025/185",
        "Charizard VMAX\nHP 330",
        "Charizard VSTAR",
        "Mewtwo GX",
        "Ho-oh EX",
        "Koraidon ex",
    ] {
        let result = extractor().parse(text, Game::Pokemon);
        assert!(!result.is_foil, "{:?} はフォイル扱いにしない", text);
    }
}

#[test]
fn test_explicit_foil_phrases() {
    let result = extractor().parse("Charizard\nHolo", Game::Pokemon);
    assert!(result.is_foil);
    assert!((result.foil_confidence - 0.9).abs() < f64::EPSILON);

    let result = extractor().parse("Charizard\nReverse Holo", Game::Pokemon);
    assert!(result.is_foil);
    assert!((result.foil_confidence - 0.9).abs() < f64::EPSILON);
}

#[test]
fn test_japanese_card_mixed_text() {
    let text = "リザードンex\nHP330\n025/165\nSV2a";
    let result = extractor().parse(text, Game::Pokemon);

    assert_eq!(result.detected_language, "Japanese");
    assert_eq!(result.card_number, "25");
    assert_eq!(result.hp, "330");
}

#[test]
fn test_japanese_only_text_leaves_name_empty() {
    // 英語部分が無い行からは名前を作らない。番号照合に委ねる
    let text = "たねポケモン\nワザ\n自分の山札";
    let result = extractor().parse(text, Game::Pokemon);
    assert_eq!(result.card_name, "");
    assert!(result.confidence < 0.4);
}

#[test]
fn test_language_detection_european() {
    let result = extractor().parse("Glurak\n120 KP", Game::Pokemon);
    assert_eq!(result.detected_language, "German");

    let result = extractor().parse("Dracaufeu\nPV 120", Game::Pokemon);
    assert_eq!(result.detected_language, "French");

    let result = extractor().parse("Charizard\n120 PS\nENERGIA", Game::Pokemon);
    assert_eq!(result.detected_language, "Italian");
}

#[test]
fn test_image_analysis_conservative_foil() {
    let ex = extractor();

    // 高確度（0.8以上）は自動でフォイル扱い
    let analysis = ImageAnalysis {
        is_foil_detected: true,
        foil_confidence: 0.9,
        ..Default::default()
    };
    let result = ex.parse_with_analysis("Pikachu\n025/185", Game::Pokemon, Some(&analysis));
    assert!(result.is_foil);

    // 中確度（0.5〜0.8）は根拠の記録だけ
    let analysis = ImageAnalysis {
        is_foil_detected: true,
        foil_confidence: 0.7,
        ..Default::default()
    };
    let result = ex.parse_with_analysis("Pikachu\n025/185", Game::Pokemon, Some(&analysis));
    assert!(!result.is_foil);
    assert!(!result.foil_indicators.is_empty());

    // 低確度（0.5未満）は何もしない
    let analysis = ImageAnalysis {
        is_foil_detected: true,
        foil_confidence: 0.3,
        ..Default::default()
    };
    let result = ex.parse_with_analysis("Pikachu\n025/185", Game::Pokemon, Some(&analysis));
    assert!(!result.is_foil);
    assert!(result.foil_indicators.is_empty());
}

#[test]
fn test_magic_card_extraction() {
    let text = "Lightning Bolt\nInstant\nLightning Bolt deals 3 damage to any target.\n123/456\n© 2022 Wizards of the Coast";
    let result = extractor().parse(text, Game::Magic);

    assert_eq!(result.card_name, "Lightning Bolt");
    assert_eq!(result.card_number, "123");
    assert_eq!(result.set_total, "456");
    assert_eq!(result.copyright_year, "2022");
}

#[test]
fn test_pathological_inputs_never_panic() {
    let ex = extractor();
    let long = "A".repeat(50_000);
    for text in [
        "",
        " \n \n ",
        "\u{0}\u{1}\u{2}\u{3}",
        "🂡🂢🂣🂤",
        long.as_str(),
    ] {
        for game in [Game::Pokemon, Game::Magic] {
            let result = ex.parse(text, game);
            assert!(result.confidence <= 1.0);
        }
    }
}

#[test]
fn test_rarity_detection() {
    let result = extractor().parse("Charizard\nSECRET RARE", Game::Pokemon);
    assert_eq!(result.rarity, "Secret Rare");

    let result = extractor().parse("Pikachu\nUNCOMMON", Game::Pokemon);
    assert_eq!(result.rarity, "Uncommon");
}

#[test]
fn test_condition_hints_from_grading_label() {
    let result = extractor().parse("Charizard\nPSA 10 GEM MINT", Game::Pokemon);
    assert!(result
        .condition_hints
        .iter()
        .any(|h| h.contains("PSA graded card")));
    assert!(result
        .condition_hints
        .iter()
        .any(|h| h.contains("PSA grade: 10")));
}
