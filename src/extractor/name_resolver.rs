//! カード名解決
//!
//! OCRの行からカード名を取り出す。判定は段階式:
//! 1. 既知名の行内一致（ヘッダ行・説明行はスキップ）
//! 2. 全文からの既知名検索（「〜から進化」文中のみの名前は除外）
//! 3. 編集距離によるファジー一致（名前長に応じて許容距離1〜2）
//! 4. 名前らしい行のヒューリスティック探索（OCRノイズ語は棄却）
//!
//! 解決できないときは空文字列を返す。推測で埋めることはしない。

use crate::extractor::language::{
    contains_japanese_characters, extract_latin_words, normalize_full_width_ascii,
};
use crate::patterns;
use regex::Regex;

/// カード名の解決器
///
/// 名簿はコーパス由来の動的リストか組み込みのフォールバックリスト。
/// どちらも小文字・長い順に保持する（短い名前による部分一致の先取り
/// を防ぐため）。
pub struct NameResolver {
    names: Vec<String>,
}

impl NameResolver {
    /// 名簿から解決器を構築する
    pub fn new(names: Vec<String>) -> Self {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        // 長い順、同長は辞書順（決定的な照合順序にする）
        names.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        names.dedup();
        Self { names }
    }

    /// 組み込みのフォールバック名簿で構築する
    pub fn fallback() -> Self {
        Self::new(
            patterns::FALLBACK_CARD_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// 名簿（小文字・長い順）
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 名簿の件数
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// 入力に近い既知名をファジー一致で探す
    ///
    /// 完全一致 → OCR正規化後の一致 → 編集距離の順に試す。
    /// 許容距離は名前6文字以下で1、それ以上で2。
    pub fn fuzzy_match(&self, input: &str) -> Option<String> {
        let input = input.trim().to_lowercase();
        if input.chars().count() < 3 {
            return None;
        }

        for name in &self.names {
            if &input == name {
                return Some(name.clone());
            }
        }

        let normalized = normalize_line_for_name_match(&input).to_lowercase();
        for name in &self.names {
            if &normalized == name {
                return Some(name.clone());
            }
        }

        let input_len = input.chars().count();
        let mut best: Option<(usize, &String)> = None;
        for name in &self.names {
            let name_len = name.chars().count();
            // 長さが離れすぎている候補は飛ばす
            if input_len.abs_diff(name_len) > 3 {
                continue;
            }
            let distance = levenshtein_distance(&normalized, name);
            let max_allowed = if name_len > 6 { 2 } else { 1 };
            if distance <= max_allowed && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, name));
            }
        }

        best.map(|(_, name)| name.clone())
    }

    /// OCRの行からカード名を解決する。見つからなければ空文字列
    pub fn resolve(&self, lines: &[String]) -> String {
        // 第1段: 既知名の行内一致。名前は通常先頭付近の行にあり、
        // 「〜から進化」は後方に来るため行順で優先する
        for line in lines {
            // スキップ判定は元の行で行う。正規化は空白を潰すので
            // "evolves from" のような複数語フレーズが壊れるため
            if should_skip_name(line) {
                continue;
            }
            let lower = normalize_line_for_name_match(line).to_lowercase();
            for name in &self.names {
                if !lower.contains(name.as_str()) {
                    continue;
                }
                for prefix in patterns::GYM_LEADER_PREFIXES {
                    let spaced = format!("{} {}", prefix, name);
                    let joined = format!("{}{}", prefix, name);
                    if lower.contains(&spaced) || lower.contains(&joined) {
                        // "Dark Charizard" や "Lt. Surge's Electabuzz" の形
                        let cleaned = clean_card_name(line, &spaced);
                        if !cleaned.is_empty() {
                            return cleaned;
                        }
                    }
                }
                let cleaned = clean_card_name(line, name);
                if !cleaned.is_empty() {
                    return cleaned;
                }
            }
        }

        // 第2段: 全文から既知名を探す。名前行をOCRが取りこぼしても
        // 本文中に名前が出ていれば拾える
        let all_text = lines.join(" ");
        let lower_all = all_text.to_lowercase();
        let normalized_all = normalize_line_for_name_match(&all_text).to_lowercase();
        for name in &self.names {
            if !normalized_all.contains(name.as_str()) {
                continue;
            }
            // "Evolves from Charmeleon" のような進化元の記述だけに
            // 現れる名前はこのカードの名前ではない
            if let Ok(evolves) =
                Regex::new(&format!(r"evolves\s+from\s+{}", regex::escape(name)))
            {
                if evolves.is_match(&lower_all) {
                    let cleaned_text = evolves.replace_all(&lower_all, "");
                    if !cleaned_text.contains(name.as_str()) {
                        continue;
                    }
                }
            }
            return capitalize(name);
        }

        // 第3段: 先頭数行のファジー一致（名前行のOCRエラーを吸収）
        for (i, line) in lines.iter().enumerate() {
            if i >= 5 {
                break;
            }
            if should_skip_name(line) {
                continue;
            }
            let words: Vec<String> = if contains_japanese_characters(line) {
                extract_latin_words(line)
            } else {
                lazy_static::lazy_static! {
                    static ref LATIN_WORD: Regex = Regex::new(r"[A-Za-z]{3,}").unwrap();
                }
                LATIN_WORD
                    .find_iter(line)
                    .map(|m| m.as_str().to_string())
                    .collect()
            };
            for word in &words {
                if let Some(matched) = self.fuzzy_match(word) {
                    return capitalize(&matched);
                }
            }
        }

        // 第4段: 名前らしい行を探す
        for line in lines {
            if line.chars().count() < 3 {
                continue;
            }
            lazy_static::lazy_static! {
                static ref NUMBERS_ONLY: Regex = Regex::new(r"^[\d\s/]+$").unwrap();
            }
            if NUMBERS_ONLY.is_match(line) {
                continue;
            }
            if should_skip_name(line) {
                continue;
            }
            // 記号が多すぎる行は名前ではない（日本語文字は記号に数えない）
            let symbol_count = line
                .chars()
                .filter(|&c| {
                    !c.is_alphabetic()
                        && !c.is_numeric()
                        && !c.is_whitespace()
                        && c != '\''
                        && c != '-'
                        && c != '/'
                })
                .count();
            if symbol_count > 5 {
                continue;
            }

            let name = clean_card_name(line, "");
            if name.chars().count() >= 3 {
                if should_skip_name(&name) {
                    continue;
                }
                if let Some(matched) = self.fuzzy_match(&name) {
                    return capitalize(&matched);
                }
                // 空白のない短い大文字列（"TQG" 等）はファジーでも
                // 当たらなければOCRノイズとして棄却
                if looks_like_ocr_garbage(&name) {
                    continue;
                }
                return name;
            }
        }

        // 第5段: 文字を含む最初の行
        for line in lines {
            lazy_static::lazy_static! {
                static ref HAS_LETTERS: Regex = Regex::new(r"[a-zA-Z]{3,}").unwrap();
            }
            if !HAS_LETTERS.is_match(line) {
                continue;
            }
            let name = clean_card_name(line, "");
            if name.is_empty() {
                continue;
            }
            if should_skip_name(&name) {
                continue;
            }
            if let Some(matched) = self.fuzzy_match(&name) {
                return capitalize(&matched);
            }
            if looks_like_ocr_garbage(&name) {
                continue;
            }
            return name;
        }

        String::new()
    }
}

/// 名前照合用のOCR正規化
///
/// 数字を見た目の近い文字へ（0→o, 1→i, 5→s, 8→b, 4→a）、
/// 複合誤読（rn→m, cl→d 等）を置換し、語中の単独空白を詰める。
/// 数字抽出用の正規化（`normalize_ocr_digits`）とは逆方向の変換で、
/// 用途が異なるため統一しない。
pub fn normalize_line_for_name_match(line: &str) -> String {
    let mut result = line.to_string();
    for (from, to) in [
        ("0", "o"),
        ("1", "i"),
        ("5", "s"),
        ("8", "b"),
        ("4", "a"),
        ("rn", "m"),
        ("RN", "M"),
        ("cl", "d"),
        ("CL", "D"),
        ("ii", "u"),
        ("ll", "u"),
    ] {
        result = result.replace(from, to);
    }
    lazy_static::lazy_static! {
        static ref MID_SPACE: Regex = Regex::new(r"([[:word:]])\s([[:word:]])").unwrap();
    }
    MID_SPACE.replace_all(&result, "$1$2").to_string()
}

/// レーベンシュタイン距離
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b_len {
        matrix[0][j] = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}

/// OCRノイズらしい短い文字列か
///
/// 例: "TQG", "Zollvp", "HPAO"。実在の名前は空白や記号を含むか、
/// もっと長いことが多い。
pub fn looks_like_ocr_garbage(name: &str) -> bool {
    // 空白やアポストロフィを含む名前は実在の可能性が高い
    if name.contains(' ') || name.contains('\'') {
        return false;
    }
    // 10文字以上ならノイズの可能性は低い
    if name.chars().count() >= 10 {
        return false;
    }

    let lower = name.to_lowercase();
    let upper = name.to_uppercase();

    // 短い全大文字列（"TQG", "HPAO" 等）
    if name == upper && name.chars().count() <= 8 {
        return true;
    }

    // 母音のない短い文字列
    let has_vowel = lower.chars().any(|c| "aeiou".contains(c));
    if !has_vowel && name.chars().count() <= 6 {
        return true;
    }

    // 子音の連続が異常に長い（"Zollvp" の "llvp" 等）
    let mut run = 0usize;
    let mut max_run = 0usize;
    for c in lower.chars() {
        if "bcdfghjklmnpqrstvwxyz".contains(c) {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 0;
        }
    }
    max_run >= 4 && name.chars().count() <= 8
}

/// 名前候補として不適切な行か
fn should_skip_name(name: &str) -> bool {
    let trimmed = name
        .trim()
        .trim_matches(|c: char| ".,:;|!¡?¿()[]{}<>\"'`~".contains(c));
    let lower = trimmed.to_lowercase();
    let upper = trimmed.to_uppercase();

    if trimmed.chars().count() < 2 {
        return true;
    }

    // 記号で始まる行はOCRノイズ（"@N町" 等）
    if let Some(first) = trimmed.chars().next() {
        if !first.is_alphabetic() && !first.is_numeric() {
            return true;
        }
    }

    // セットコード様の行。日本語カードで名前行が欠けたとき
    // "SV2A" や "SWSH4" を名前として拾わないようにする
    lazy_static::lazy_static! {
        static ref CODE_LIKE: Regex = Regex::new(r"^[A-Z0-9]{3,6}$").unwrap();
    }
    if CODE_LIKE.is_match(&upper) {
        if upper.chars().any(|c| c.is_ascii_digit()) {
            return true;
        }
        if matches!(
            upper.as_str(),
            "SV" | "SWSH" | "SM" | "XY" | "BW" | "DP" | "HS" | "HGSS" | "EX" | "POP" | "PL"
        ) {
            return true;
        }
    }

    for pattern in patterns::NAME_SKIP_EXACT {
        if lower == *pattern {
            return true;
        }
    }
    for pattern in patterns::NAME_SKIP_CONTAINS {
        if lower.contains(pattern) {
            return true;
        }
    }
    for pattern in patterns::NAME_SKIP_RARITY {
        if lower == *pattern {
            return true;
        }
    }

    false
}

/// 行からカード名部分を取り出して整形する
///
/// `known_name` が与えられたときはその名前とサフィックス
/// （VMAX/VSTAR/MEGA/PRIME/GX/EX/ex/V）を切り出す。EX/ex は
/// 旧EX期と現行ex期の区別があるため元の大小文字を保つ。
pub fn clean_card_name(line: &str, known_name: &str) -> String {
    lazy_static::lazy_static! {
        static ref HP_AFTER: Regex = Regex::new(r"\s*HP\s*\d+").unwrap();
        static ref HP_BEFORE: Regex = Regex::new(r"\s*\d{2,3}\s*HP").unwrap();
        static ref LEADING_JUNK: Regex = Regex::new(r"^[^a-zA-Z]*").unwrap();
        static ref ARTIFACTS: Regex = Regex::new(r"[^a-zA-Z0-9\s'.-]").unwrap();
        static ref MULTI_SPACE: Regex = Regex::new(r"\s+").unwrap();
    }

    // 全角ASCIIの正規化（日本語カードの Ｎ → N 等）
    let mut name = normalize_full_width_ascii(line);

    // HP表記を除去
    name = HP_AFTER.replace_all(&name, "").to_string();
    name = HP_BEFORE.replace_all(&name, "").to_string();

    // 日本語交じりの行は英語部分だけを使う（名簿が英語のため）。
    // 英語が無ければ空を返し、番号・セット照合に委ねる
    if contains_japanese_characters(&name) {
        let words = extract_latin_words(&name);
        if words.is_empty() {
            return String::new();
        }
        name = words.join(" ");
    }

    // 行頭の数字・記号を落とす
    name = LEADING_JUNK.replace(&name, "").to_string();

    if !known_name.is_empty() {
        // 既知名＋サフィックスを切り出す。長いサフィックスから照合
        // （VMAX を V より先に）
        let pattern = format!(
            r"(?i)({})\s*(VMAX|VSTAR|MEGA|PRIME|GX|EX|ex|V)?",
            regex::escape(known_name)
        );
        if let Ok(re) = Regex::new(&pattern) {
            if let Some(caps) = re.captures(&name) {
                let mut result = caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                if let Some(suffix) = caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
                    if suffix.to_lowercase() == "ex" {
                        // 旧EX期（大文字）と現行ex期（小文字）を区別する
                        // ためOCRの表記をそのまま使う
                        result.push(' ');
                        result.push_str(suffix);
                    } else {
                        result.push(' ');
                        result.push_str(&suffix.to_uppercase());
                    }
                }
                return capitalize(&result);
            }
        }
    }

    // 残りのノイズを除去。"Mr. Mime" の '.' は名前の一部として残す
    name = ARTIFACTS.replace_all(&name, "").to_string();
    name = MULTI_SPACE.replace_all(&name, " ").to_string();
    name = name.trim().to_string();

    apply_name_corrections(&name)
}

/// 既知の誤読表から名前を補正する
pub fn apply_name_corrections(name: &str) -> String {
    lazy_static::lazy_static! {
        static ref TRAILING_JUNK: Regex = Regex::new(r"[^a-zA-Z']+$").unwrap();
    }

    let mut result = name.to_string();
    for &(wrong, correct) in patterns::NAME_CORRECTIONS {
        let lower_result = result.to_lowercase();
        let lower_wrong = wrong.to_lowercase();
        if let Some(idx) = lower_result.find(&lower_wrong) {
            // 小文字化で長さが変わらない場合のみ位置ベースで置換できる
            let end = idx + lower_wrong.len();
            if lower_result.len() == result.len()
                && result.is_char_boundary(idx)
                && result.is_char_boundary(end)
            {
                result = format!("{}{}{}", &result[..idx], correct, &result[end..]);
            } else {
                result = result.replace(wrong, correct);
            }
            break;
        }
    }

    let result = result.trim();
    TRAILING_JUNK.replace_all(result, "").to_string()
}

/// 先頭文字を大文字にする
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match_ocr_error() {
        let resolver = NameResolver::fallback();
        assert_eq!(
            resolver.fuzzy_match("char1zard"),
            Some("charizard".to_string())
        );
        assert_eq!(resolver.fuzzy_match("pikachu"), Some("pikachu".to_string()));
    }

    #[test]
    fn test_fuzzy_match_rejects_garbage() {
        let resolver = NameResolver::fallback();
        assert_eq!(resolver.fuzzy_match("xyzabc"), None);
        assert_eq!(resolver.fuzzy_match("ab"), None);
        assert_eq!(resolver.fuzzy_match(""), None);
    }

    #[test]
    fn test_fuzzy_match_edit_distance_limits() {
        let resolver = NameResolver::fallback();
        // 6文字超は距離2まで許容
        assert_eq!(
            resolver.fuzzy_match("charizord"),
            Some("charizard".to_string())
        );
        // 離れすぎは不一致
        assert_eq!(resolver.fuzzy_match("chxxxzxxd"), None);
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_looks_like_ocr_garbage() {
        assert!(looks_like_ocr_garbage("TQG"));
        assert!(looks_like_ocr_garbage("HPAO"));
        assert!(looks_like_ocr_garbage("Zollvp"));
        assert!(!looks_like_ocr_garbage("Pikachu"));
        assert!(!looks_like_ocr_garbage("Professor's Research"));
        assert!(!looks_like_ocr_garbage("Charizard"));
    }

    #[test]
    fn test_normalize_line_for_name_match() {
        assert_eq!(normalize_line_for_name_match("P1kachu"), "Pikachu");
        assert_eq!(normalize_line_for_name_match("Gyarad0s"), "Gyarados");
        // "rn" → "m" の複合誤読
        assert_eq!(normalize_line_for_name_match("Alakazarn"), "Alakazam");
    }

    #[test]
    fn test_resolve_first_line() {
        let resolver = NameResolver::fallback();
        let lines = vec![
            "Charizard".to_string(),
            "HP 170".to_string(),
            "025/185".to_string(),
        ];
        assert_eq!(resolver.resolve(&lines), "Charizard");
    }

    #[test]
    fn test_resolve_skips_evolves_from() {
        let resolver = NameResolver::fallback();
        let lines = vec![
            "Stage 2".to_string(),
            "Evolves from Charmeleon".to_string(),
            "Char1zard HP 170".to_string(),
        ];
        // 進化元のリザードではなくリザードン側を拾う
        let name = resolver.resolve(&lines);
        assert_eq!(name, "Charizard");
    }

    #[test]
    fn test_resolve_gym_leader_prefix() {
        let resolver = NameResolver::fallback();
        let lines = vec!["Dark Charizard HP 80".to_string()];
        assert_eq!(resolver.resolve(&lines), "Dark Charizard");
    }

    #[test]
    fn test_resolve_suffix_preserved() {
        let resolver = NameResolver::fallback();
        let lines = vec!["Charizard VMAX".to_string()];
        assert_eq!(resolver.resolve(&lines), "Charizard VMAX");
        let lines = vec!["Charizard ex".to_string()];
        assert_eq!(resolver.resolve(&lines), "Charizard ex");
    }

    #[test]
    fn test_resolve_empty_for_pure_japanese() {
        let resolver = NameResolver::fallback();
        let lines = vec!["たねポケモン".to_string(), "ワザ".to_string()];
        assert_eq!(resolver.resolve(&lines), "");
    }

    #[test]
    fn test_resolve_empty_input() {
        let resolver = NameResolver::fallback();
        assert_eq!(resolver.resolve(&[]), "");
    }

    #[test]
    fn test_apply_name_corrections() {
        assert_eq!(apply_name_corrections("Charizarcl"), "Charizard");
        assert_eq!(apply_name_corrections("Genqar"), "Gengar");
        assert_eq!(apply_name_corrections("Pikachu"), "Pikachu");
    }
}
