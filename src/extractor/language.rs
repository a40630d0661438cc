//! 言語判定
//!
//! OCRテキストからカードの言語を推定する。
//!
//! 判定優先順位:
//! 1. 日本語（ひらがな・カタカナ・漢字）- 文字集合が独立しており最も確実
//! 2. ドイツ語（HPが "KP"）
//! 3. フランス語（HPが "PV"）
//! 4. イタリア語（HPが "PS"）
//! 5. 英語（デフォルト）

use regex::Regex;

lazy_static::lazy_static! {
    static ref GERMAN_KP: Regex =
        Regex::new(r"\b(\d{2,3})\s*KP\b|\bKP\s*(\d{2,3})\b").unwrap();
    static ref FRENCH_PV: Regex =
        Regex::new(r"\b(\d{2,3})\s*PV\b|\bPV\s*(\d{2,3})\b").unwrap();
    static ref ITALIAN_PS: Regex =
        Regex::new(r"\b(\d{2,3})\s*PS\b|\bPS\s*(\d{2,3})\b").unwrap();
}

/// ドイツ語カードの語彙（エネルギー種別など）
static GERMAN_INDICATORS: &[&str] = &[
    "FEUER-ENERGIE",
    "WASSER-ENERGIE",
    "PFLANZEN-ENERGIE",
    "ELEKTRO-ENERGIE",
    "PSYCHO-ENERGIE",
    "KAMPF-ENERGIE",
    "FINSTERNIS",
    "METALL-ENERGIE",
    "RÜCKZUG",
];

/// フランス語カードの語彙
static FRENCH_INDICATORS: &[&str] = &[
    "ÉNERGIE",
    "ENERGIE", // アクサン記号をOCRが落とした場合
    "FEU",
    "EAU",
    "PLANTE",
    "ÉLECTRIQUE",
    "PSY",
    "COMBAT",
    "OBSCURITÉ",
    "MÉTAL",
    "RETRAITE",
];

/// イタリア語カードの語彙
static ITALIAN_INDICATORS: &[&str] = &[
    "ENERGIA",
    "FUOCO",
    "ACQUA",
    "ERBA",
    "ELETTRO",
    "PSICO",
    "LOTTA",
    "OSCURITÀ",
    "METALLO",
    "RITIRATA",
];

/// OCRテキストから言語を判定する
pub fn detect_language(text: &str) -> &'static str {
    let upper_text = text.to_uppercase();

    if contains_japanese_characters(text) {
        return "Japanese";
    }
    if contains_german_indicators(&upper_text) {
        return "German";
    }
    if contains_french_indicators(&upper_text) {
        return "French";
    }
    if contains_italian_indicators(&upper_text) {
        return "Italian";
    }

    "English"
}

/// 日本語文字（ひらがな・カタカナ・CJK統合漢字）を含むか
pub fn contains_japanese_characters(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309F}'   // ひらがな
            | '\u{30A0}'..='\u{30FF}' // カタカナ
            | '\u{4E00}'..='\u{9FFF}' // CJK統合漢字
        )
    })
}

/// 全角ASCII文字を半角に変換する
///
/// 日本語カードは Ｎ や Ｖ のような全角英字を使うことがある。
pub fn normalize_full_width_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => {
                char::from_u32(c as u32 - 0xFF01 + 0x21).unwrap_or(c)
            }
            '　' => ' ',
            _ => c,
        })
        .collect()
}

/// 日本語交じりの行からラテン文字の単語を取り出す
///
/// 2文字以上の語を残す。単独の N / V / G / X はカード名・サフィックス
/// として有効なので大文字化して残す。
pub fn extract_latin_words(line: &str) -> Vec<String> {
    lazy_static::lazy_static! {
        // "Farfetch'd" や "Mr. Mime" の句読点も語の一部として扱う
        static ref WORD: Regex =
            Regex::new(r"[A-Za-z]+(?:[.'-][A-Za-z]+)*\.?|[A-Za-z]").unwrap();
    }

    let normalized = normalize_full_width_ascii(line);
    let mut words = Vec::new();
    for m in WORD.find_iter(&normalized) {
        let w = m.as_str();
        if w.chars().count() >= 2 {
            words.push(w.to_string());
            continue;
        }
        let upper = w.to_uppercase();
        if matches!(upper.as_str(), "N" | "V" | "G" | "X") {
            words.push(upper);
        }
    }
    words
}

fn contains_german_indicators(upper_text: &str) -> bool {
    if GERMAN_KP.is_match(upper_text) {
        return true;
    }
    GERMAN_INDICATORS.iter().any(|w| upper_text.contains(w))
}

fn contains_french_indicators(upper_text: &str) -> bool {
    if FRENCH_PV.is_match(upper_text) {
        return true;
    }
    FRENCH_INDICATORS.iter().any(|w| upper_text.contains(w))
}

fn contains_italian_indicators(upper_text: &str) -> bool {
    if ITALIAN_PS.is_match(upper_text) {
        return true;
    }
    ITALIAN_INDICATORS.iter().any(|w| upper_text.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language_japanese() {
        assert_eq!(detect_language("リザードン HP170"), "Japanese");
        assert_eq!(detect_language("ピカチュウ"), "Japanese");
    }

    #[test]
    fn test_detect_language_european() {
        assert_eq!(detect_language("Glurak 120 KP"), "German");
        assert_eq!(detect_language("Dracaufeu PV 120"), "French");
        assert_eq!(detect_language("Charizard 120 PS"), "Italian");
    }

    #[test]
    fn test_detect_language_default_english() {
        assert_eq!(detect_language("Charizard HP 170"), "English");
        assert_eq!(detect_language(""), "English");
    }

    #[test]
    fn test_normalize_full_width_ascii() {
        assert_eq!(normalize_full_width_ascii("Ｎ"), "N");
        assert_eq!(normalize_full_width_ascii("ＳＶ２ａ"), "SV2a");
        assert_eq!(normalize_full_width_ascii("abc"), "abc");
    }

    #[test]
    fn test_extract_latin_words() {
        let words = extract_latin_words("リザードンex Charizard ex");
        assert!(words.contains(&"Charizard".to_string()));
        assert!(words.contains(&"ex".to_string()));
    }

    #[test]
    fn test_extract_latin_words_single_letters() {
        // 単独の N はカード名として有効
        let words = extract_latin_words("Ｎ　サポート");
        assert_eq!(words, vec!["N".to_string()]);
        // 意味のない単独文字は捨てる
        let words = extract_latin_words("あa");
        assert!(words.is_empty());
    }
}
