//! 索引用のトークン処理
//!
//! - クエリ側: 4文字以上の語に分割（`tokenize_text`）
//! - 索引側: 3文字以上・非数値・ストップワード除外（`extract_index_words`）
//!
//! クエリ側と索引側で基準が異なるのは意図的。索引は再現率を優先して
//! 短めの語も持ち、クエリはノイズ語を落として候補集合を絞る。

use std::collections::HashSet;

use crate::patterns;

/// 語の前後から落とす記号
const TRIM_CHARS: &str = ".,!?\"'();:-";

/// テキストを照合用の語（4文字以上）に分割する
pub fn tokenize_text(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| TRIM_CHARS.contains(c)))
        .filter(|word| word.chars().count() >= 4)
        .map(|word| word.to_string())
        .collect()
}

/// 索引登録に使える語なら返す
///
/// 3文字未満・数字のみ・ストップワードは対象外。
pub fn normalize_word_for_index(word: &str) -> Option<&str> {
    if word.chars().count() < 3 {
        return None;
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if patterns::is_stop_word(word) {
        return None;
    }
    Some(word)
}

/// 検索対象テキストから索引語を抽出する（カード内で重複排除）
pub fn extract_index_words(text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();
    for word in text.split_whitespace() {
        let cleaned = word.trim_matches(|c: char| TRIM_CHARS.contains(c));
        if let Some(normalized) = normalize_word_for_index(cleaned) {
            if seen.insert(normalized) {
                result.push(normalized.to_string());
            }
        }
    }
    result
}

/// 短い名前（1〜2文字）が独立した語として現れるか
///
/// "N" が "Pikachu" 中の n に一致するのを防ぐ。空白・記号で区切られた
/// 語としての一致だけを認める。
pub fn match_short_name_as_word(text: &str, short_name: &str) -> bool {
    if short_name.is_empty() {
        return false;
    }
    text.split_whitespace().any(|word| {
        word.trim_matches(|c: char| ".,!?\"'();:-/".contains(c)) == short_name
    })
}

/// OCR語のうちカードテキストに含まれる数
pub fn count_word_matches(ocr_words: &[String], card_text: &str) -> usize {
    ocr_words
        .iter()
        .filter(|word| card_text.contains(word.as_str()))
        .count()
}

/// 曲がった引用符を直立アポストロフィに揃える
///
/// カードデータは ' (U+2019) を使うことがあるが、OCRや入力は
/// ' (U+0027) で来る。
pub fn normalize_apostrophes(s: &str) -> String {
    s.replace('\u{2019}', "'").replace('\u{2018}', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_text_min_length() {
        let words = tokenize_text("the charizard has fire spin gx");
        // 4文字以上の語だけが残る
        assert_eq!(words, vec!["charizard", "fire", "spin"]);
    }

    #[test]
    fn test_tokenize_text_trims_punctuation() {
        let words = tokenize_text("\"charizard!\" (fire); spin.");
        for word in &words {
            assert!(!word.starts_with(|c: char| TRIM_CHARS.contains(c)));
            assert!(!word.ends_with(|c: char| TRIM_CHARS.contains(c)));
        }
        assert_eq!(words, vec!["charizard", "fire", "spin"]);
    }

    #[test]
    fn test_tokenize_text_empty() {
        assert!(tokenize_text("").is_empty());
        assert!(tokenize_text("a bb ccc").is_empty());
    }

    #[test]
    fn test_normalize_word_for_index() {
        assert_eq!(normalize_word_for_index("charizard"), Some("charizard"));
        assert_eq!(normalize_word_for_index("ab"), None);
        // 数字のみは対象外
        assert_eq!(normalize_word_for_index("123"), None);
        // ストップワード
        assert_eq!(normalize_word_for_index("the"), None);
        assert_eq!(normalize_word_for_index("energy"), None);
    }

    #[test]
    fn test_extract_index_words_dedup() {
        let words = extract_index_words("fire spin fire spin blast");
        assert_eq!(words, vec!["fire", "spin", "blast"]);
    }

    #[test]
    fn test_match_short_name_as_word() {
        // "N" は "pikachu" の n に一致してはならない
        assert!(!match_short_name_as_word("pikachu", "n"));
        // 独立した語としての "N" は一致する
        assert!(match_short_name_as_word("n", "n"));
        assert!(match_short_name_as_word("trainer n supporter", "n"));
        assert!(!match_short_name_as_word("text", ""));
    }

    #[test]
    fn test_count_word_matches() {
        let words = vec!["fire".to_string(), "spin".to_string(), "missing".to_string()];
        assert_eq!(count_word_matches(&words, "charizard fire spin"), 2);
    }

    #[test]
    fn test_normalize_apostrophes() {
        assert_eq!(normalize_apostrophes("Blaine\u{2019}s"), "Blaine's");
        assert_eq!(normalize_apostrophes("Blaine's"), "Blaine's");
    }
}
