//! マジック系カードのOCR解析
//!
//! コレクター番号はパワー/タフネス（4/5 等）と紛らわしいため、
//! 行単位のパターンを優先する。セットコードは3〜4文字の大文字列から
//! 誤検出語を除いた候補のうち、テキスト後方のものを採用する
//! （セットコードはカード下部に印字されるため）。

use regex::Regex;

use crate::extractor::{detect_condition_hints, language, OcrResult};
use crate::patterns;

pub(super) fn parse(result: &mut OcrResult) {
    let text = result.raw_text.clone();
    let upper_text = text.to_uppercase();

    extract_collector_number(result, &text);
    extract_set_code(result, &upper_text);

    for pattern in patterns::MAGIC_FOIL_PATTERNS {
        if upper_text.contains(pattern) {
            result.is_foil = true;
            result
                .foil_indicators
                .push(format!("{} card variant", pattern));
        }
    }

    detect_condition_hints(result, &upper_text);

    // 版権年: "© 2022", "©2022", "TM & © 2022"
    lazy_static::lazy_static! {
        static ref COPYRIGHT: Regex = Regex::new(r"©\s*(\d{4})").unwrap();
    }
    if let Some(caps) = COPYRIGHT.captures(&text) {
        result.copyright_year = caps[1].to_string();
    }

    result.card_name = extract_card_name(&result.all_lines);
    result.detected_language = language::detect_language(&text).to_string();
}

/// コレクター番号を抽出する
///
/// 行として独立した NNN/MMM をまず探し、無ければ総数が2桁以上の
/// パターンを拾う（パワー/タフネスが20を超えることはまず無い）。
fn extract_collector_number(result: &mut OcrResult, text: &str) {
    lazy_static::lazy_static! {
        static ref LINE_COLLECTOR: Regex =
            Regex::new(r"(?:^|\n)\s*(\d{1,4})\s*/\s*(\d{2,4})\s*(?:\n|$)").unwrap();
        static ref FALLBACK: Regex = Regex::new(r"(\d{1,4})\s*/\s*(\d{2,4})").unwrap();
    }

    if let Some(caps) = LINE_COLLECTOR.captures(text) {
        result.card_number = caps[1].to_string();
        result.set_total = caps[2].to_string();
        return;
    }

    for caps in FALLBACK.captures_iter(text) {
        let total = &caps[2];
        if total.len() >= 2 {
            result.card_number = caps[1].to_string();
            result.set_total = total.to_string();
            break;
        }
    }
}

/// セットコードを抽出する
fn extract_set_code(result: &mut OcrResult, upper_text: &str) {
    lazy_static::lazy_static! {
        // 2XM や 2LU のように数字始まりのコードもある
        static ref CODE: Regex = Regex::new(r"\b([A-Z0-9][A-Z0-9]{2,3})\b").unwrap();
        static ref PURE_NUMBER: Regex = Regex::new(r"^\d+$").unwrap();
    }

    let mut candidates: Vec<&str> = Vec::new();
    for caps in CODE.captures_iter(upper_text) {
        let code = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if PURE_NUMBER.is_match(code) {
            continue;
        }
        if !patterns::is_magic_false_positive(code) {
            candidates.push(code);
        }
    }

    // 後方の候補を優先する
    for code in candidates.iter().rev() {
        if code.len() >= 3 && code.len() <= 4 {
            result.set_code = (*code).to_string();
            result.match_reason = "set_code".to_string();
            break;
        }
    }
}

/// カード名を抽出する。通常は先頭行
fn extract_card_name(lines: &[String]) -> String {
    lazy_static::lazy_static! {
        // マナコスト行（{W} 等）と数字だけの行
        static ref MANA_OR_NUMBERS: Regex = Regex::new(r"\{[WUBRG]\}|^[\d\s]+$").unwrap();
    }

    for line in lines {
        if line.chars().count() < 2 {
            continue;
        }
        let lower = line.to_lowercase();
        if patterns::MAGIC_NAME_SKIP.iter().any(|p| lower.contains(p)) {
            continue;
        }
        if MANA_OR_NUMBERS.is_match(line) {
            continue;
        }
        return line.trim().to_string();
    }

    lines
        .first()
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{Game, OcrExtractor};

    fn parse(text: &str) -> OcrResult {
        OcrExtractor::with_fallback_names().parse(text, Game::Magic)
    }

    #[test]
    fn test_collector_number_own_line() {
        let result = parse("Lightning Helix\nInstant\n123/456");
        assert_eq!(result.card_number, "123");
        assert_eq!(result.set_total, "456");
    }

    #[test]
    fn test_power_toughness_not_collector_number() {
        // 4/5 のようなP/Tは総数2桁未満なので拾わない
        let result = parse("Grizzly Bears\nCreature — Bear\n4/5");
        assert_eq!(result.card_number, "");
    }

    #[test]
    fn test_set_code_prefers_later_candidate() {
        let result = parse("Shock\nDeal 2 damage\nDOM");
        assert_eq!(result.set_code, "DOM");
        assert_eq!(result.match_reason, "set_code");
    }

    #[test]
    fn test_set_code_false_positives_skipped() {
        let result = parse("Murder\nDestroy target creature.");
        // "MURDER" は5文字で対象外、"THAT" 等の頻出語は誤検出表で除外
        assert_ne!(result.set_code, "THAT");
    }

    #[test]
    fn test_copyright_year() {
        let result = parse("Shock\n© 2022 Wizards of the Coast");
        assert_eq!(result.copyright_year, "2022");
    }

    #[test]
    fn test_card_name_skips_type_line() {
        let result = parse("Legendary Creature — Dragon\nNicol Bolas");
        assert_eq!(result.card_name, "Nicol Bolas");
    }

    #[test]
    fn test_foil_variants() {
        let result = parse("Shock\nFOIL");
        assert!(result.is_foil);
        let result = parse("Shock\nETCHED");
        assert!(result.is_foil);
    }
}
