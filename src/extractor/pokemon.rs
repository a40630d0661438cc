//! ポケモン系カードのOCR解析
//!
//! コレクター番号・HP・セット・フォイル・レアリティ・初版表記を
//! 順に抽出する。セットは明示コード → 年代シグナル → セット名 →
//! 旧2文字コード → 総数推定の優先順で解決する。

use std::collections::HashMap;

use regex::Regex;

use crate::extractor::name_resolver::NameResolver;
use crate::extractor::set_inference;
use crate::extractor::{detect_condition_hints, language, normalize_ocr_digits, OcrResult};
use crate::patterns;

pub(super) fn parse(result: &mut OcrResult, resolver: &NameResolver) {
    let text = result.raw_text.clone();
    let upper_text = text.to_uppercase();

    // 数字抽出用の正規化（O→0, l→1）をかけたテキストで番号を探す
    let normalized_text = normalize_ocr_digits(&text);

    extract_card_number(result, &text, &normalized_text);
    extract_hp(result, &text);
    extract_set_code(result, &upper_text);

    // 年代判定はセット推定が参照するので先に行う
    result.is_wotc_era =
        set_inference::detect_wotc_era(&upper_text, &result.set_total, &result.set_code);

    // 明示コードが無ければセット名で判定
    if result.set_code.is_empty() {
        if let Some((name, code)) = set_inference::detect_set_from_name(&upper_text) {
            result.set_code = code.to_string();
            result.set_name = name.to_string();
            result.match_reason = "set_name".to_string();
        }
    }

    // 旧2文字コード（BS, JU 等）。固有性が高いので総数推定より先
    if result.set_code.is_empty() {
        if let Some(code) = set_inference::detect_set_from_legacy_code(&upper_text) {
            result.set_code = code.to_string();
            result.match_reason = "ptcgo_code".to_string();
        }
    }

    // 最後の手段としてセット総数から推定
    if result.set_code.is_empty() {
        if let Some(inference) =
            set_inference::infer_set_from_total(&result.set_total, result.is_wotc_era)
        {
            result.set_code = inference.set_code;
            result.candidate_sets = inference.candidate_sets;
            result.match_reason = inference.match_reason.to_string();
        }
    }

    detect_foil_indicators(result, &upper_text);
    detect_first_edition(result, &upper_text);
    detect_rarity(result, &upper_text);
    detect_condition_hints(result, &upper_text);

    result.card_name = resolver.resolve(&result.all_lines);
    result.detected_language = language::detect_language(&text).to_string();
}

/// コレクター番号と総数を抽出する
///
/// 基本は XXX/YYY 形式。TG（トレーナーギャラリー）・GG（ガラル
/// ギャラリー）・SV（シャイニーバルト）のサブ番号形式が出ていれば
/// そちらを優先する。番号の先頭ゼロは落とし、総数はそのまま残す。
fn extract_card_number(result: &mut OcrResult, text: &str, normalized_text: &str) {
    lazy_static::lazy_static! {
        static ref CARD_NUM: Regex =
            Regex::new(r"(?:^|\s)(\d{1,3})\s*/\s*(\d{1,3})(?:\s|$|[^0-9])").unwrap();
        static ref TG: Regex = Regex::new(r"TG(\d+)\s*/\s*TG(\d+)").unwrap();
        static ref GG: Regex = Regex::new(r"GG(\d+)\s*/\s*GG(\d+)").unwrap();
        static ref SV_NUM: Regex = Regex::new(r"SV(\d+)\s*/\s*(?:SV)?(\d+)").unwrap();
    }

    if let Some(caps) = CARD_NUM.captures(normalized_text) {
        let number = caps[1].trim_start_matches('0');
        result.card_number = if number.is_empty() {
            "0".to_string()
        } else {
            number.to_string()
        };
        result.set_total = caps[2].to_string();
    }

    if let Some(caps) = TG.captures(text) {
        result.card_number = format!("TG{}", &caps[1]);
    }
    if let Some(caps) = GG.captures(text) {
        result.card_number = format!("GG{}", &caps[1]);
    }
    if let Some(caps) = SV_NUM.captures(text) {
        result.card_number = format!("SV{}", &caps[1]);
        // SV形式の分母はサブセット総数なので set_total には入れない
    }
}

/// HPを抽出する
///
/// 2段構え: まず "HP" の明示があるパターンを全部拾い、頻度→数値の
/// 大きさで決める。無ければラベル無しのフォールバックパターン
/// （モダンカードはHP表記を省くことがある）。10〜400の範囲外は捨てる。
fn extract_hp(result: &mut OcrResult, text: &str) {
    lazy_static::lazy_static! {
        static ref HP_EXPLICIT: Vec<Regex> = vec![
            Regex::new(r"(?i)HP[ ]*(\d{2,3})").unwrap(),
            Regex::new(r"(?i)(\d{2,3})[ ]*HP").unwrap(),
            // "4P 60" は "HP 60" のOCR誤読
            Regex::new(r"(?i)4P[ ]*(\d{2,3})").unwrap(),
        ];
        static ref HP_FALLBACK: Vec<Regex> = vec![
            Regex::new(r"[A-Z](\d{2,3})\s*[&@©]").unwrap(),
            Regex::new(r"[~.,]?(\d{3})\s*[&@©®)>]").unwrap(),
            Regex::new(r"(?i)VMAX[^0-9]*(\d{3})").unwrap(),
            Regex::new(r"(?i)ex[^0-9]*(\d{2,3})\s*[©®]").unwrap(),
        ];
    }

    let mut hp_counts: HashMap<String, usize> = HashMap::new();
    for re in HP_EXPLICIT.iter() {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                if let Ok(value) = m.as_str().parse::<i64>() {
                    if (10..=400).contains(&value) {
                        *hp_counts.entry(m.as_str().to_string()).or_insert(0) += 1;
                    }
                }
            }
        }
    }

    if !hp_counts.is_empty() {
        let mut best_hp = String::new();
        let mut best_count = 0usize;
        let mut best_value = 0i64;
        for (hp, count) in &hp_counts {
            let value = hp.parse::<i64>().unwrap_or(0);
            if *count > best_count || (*count == best_count && value > best_value) {
                best_hp = hp.clone();
                best_count = *count;
                best_value = value;
            }
        }
        result.hp = best_hp;
        return;
    }

    for re in HP_FALLBACK.iter() {
        if let Some(caps) = re.captures(text) {
            if let Some(m) = caps.get(1) {
                if let Ok(value) = m.as_str().parse::<i64>() {
                    if (10..=400).contains(&value) {
                        result.hp = m.as_str().to_string();
                        return;
                    }
                }
            }
        }
    }
}

/// 明示的なセットコード（SWSH4, SV1, XY12 等）を抽出する
///
/// 数字付きのコードだけを対象にして旧2文字コードとの誤判定を避ける。
/// シャイニーバルト番号（SV##）を既に拾っている場合は SV をセット
/// コードとして照合しない。
fn extract_set_code(result: &mut OcrResult, upper_text: &str) {
    lazy_static::lazy_static! {
        static ref SET_CODE_WITHOUT_SV: Regex = Regex::new(
            r"\b(SWSH\d{1,2}|XY\d{1,2}|SM\d{1,2}(?:PT5)?|BW\d{1,2}|DP\d{1,2}|EX\d{1,2}|PGO|CEL25|PR-SW|PR-SV)\b"
        ).unwrap();
        static ref SET_CODE_FULL: Regex = Regex::new(
            r"\b(SWSH\d{1,2}|SV\d{1,2}(?:PT5)?|XY\d{1,2}|SM\d{1,2}(?:PT5)?|BW\d{1,2}|DP\d{1,2}|EX\d{1,2}|PGO|CEL25|PR-SW|PR-SV)\b"
        ).unwrap();
    }

    let re: &Regex = if result.card_number.starts_with("SV") {
        &*SET_CODE_WITHOUT_SV
    } else {
        &*SET_CODE_FULL
    };

    if let Some(m) = re.find(upper_text) {
        result.set_code = m.as_str().to_lowercase();
        result.match_reason = "set_code".to_string();
    }
}

/// フォイル表記を検出する
///
/// 確定パターンだけが is_foil を立てる。カード種別（V, VMAX, VSTAR,
/// GX, EX, MEGA, PRIME）は通常版とフォイル版の両方が存在するため、
/// 意図的にフォイル判定へ使わない。
fn detect_foil_indicators(result: &mut OcrResult, upper_text: &str) {
    // 単独の "HOLO"。複合パターン（HOLOFOIL 等）との二重計上を避ける
    if upper_text.contains("HOLO")
        && !upper_text.contains("HOLOFOIL")
        && !upper_text.contains("HOLO RARE")
        && !upper_text.contains("REVERSE HOLO")
    {
        result.is_foil = true;
        result.foil_confidence = 0.9;
        result
            .foil_indicators
            .push("Holographic text detected".to_string());
    }

    for (pattern, hint) in patterns::FOIL_HIGH_CONFIDENCE {
        if upper_text.contains(pattern) {
            result.is_foil = true;
            result.foil_confidence = 0.9;
            result.foil_indicators.push((*hint).to_string());
        }
    }

    lazy_static::lazy_static! {
        static ref FOIL_WORD: Regex = Regex::new(r"\bFOIL\b").unwrap();
    }
    if FOIL_WORD.is_match(upper_text) {
        result.is_foil = true;
        result.foil_confidence = 0.9;
        result.foil_indicators.push("Foil text detected".to_string());
    }

    // 示唆パターンは確度と根拠だけ積む。is_foil は立てない
    for (pattern, hint) in patterns::FOIL_MEDIUM_CONFIDENCE {
        if upper_text.contains(pattern) {
            if result.foil_confidence < 0.6 {
                result.foil_confidence = 0.6;
            }
            result.foil_indicators.push((*hint).to_string());
        }
    }
}

/// 初版（1st Edition）表記を検出する
fn detect_first_edition(result: &mut OcrResult, upper_text: &str) {
    // "1ST EDITION" は "1ST ED" を含むため長いパターンから照合する
    if upper_text.contains("1ST EDITION") {
        result.is_first_edition = true;
        result
            .first_ed_indicators
            .push("1ST EDITION detected".to_string());
    } else if upper_text.contains("FIRST EDITION") {
        result.is_first_edition = true;
        result
            .first_ed_indicators
            .push("FIRST EDITION detected".to_string());
    } else if upper_text.contains("1ST ED") {
        result.is_first_edition = true;
        result
            .first_ed_indicators
            .push("1ST ED detected".to_string());
    }

    // シャドウレスは初版と無印の間の刷り。根拠としてだけ記録する
    if upper_text.contains("SHADOWLESS") {
        result
            .first_ed_indicators
            .push("Shadowless variant (verify if 1st edition)".to_string());
    }
}

/// レアリティ表記を検出する
fn detect_rarity(result: &mut OcrResult, upper_text: &str) {
    for (pattern, rarity) in patterns::RARITY_PATTERNS {
        if upper_text.contains(pattern) {
            result.rarity = (*rarity).to_string();
            return;
        }
    }

    // レアリティ記号（まる・ひし・ほし）がOCRに残ることがある
    if upper_text.contains('★') || upper_text.contains('☆') {
        result.rarity = "Rare".to_string();
    } else if upper_text.contains('◆') || upper_text.contains('◇') {
        result.rarity = "Uncommon".to_string();
    } else if upper_text.contains('●') {
        result.rarity = "Common".to_string();
    }
}
