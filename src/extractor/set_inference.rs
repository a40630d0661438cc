//! セット推定
//!
//! 明示的なセットコードが読めないときの推定チェーン:
//! 1. 年代シグナル（版権表記・発行元トークン、© の誤読も許容）
//! 2. セット名の照合（短い名前は語境界を要求）
//! 3. 旧2文字コードの照合
//! 4. セット総数 → 候補セット表からの推定
//!
//! 総数が複数セットで共有される場合は候補一覧を結果に残し、
//! 下流（画像確認など）での絞り込みに委ねる。このモジュールは
//! どの段でも失敗を返さない。

use crate::patterns;
use regex::Regex;

/// 総数からの推定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalInference {
    /// 最有力のセットコード
    pub set_code: String,
    /// 総数を共有する候補一覧（一意に決まったときは空）
    pub candidate_sets: Vec<String>,
    /// 推定根拠
    pub match_reason: &'static str,
}

/// 旧WotC期（1999〜2003年）のカードかを判定する
///
/// 版権表記・発行元トークンに加え、モダンなセットコードが無いまま
/// 旧期特有の総数が出ている場合も旧期とみなす。
pub fn detect_wotc_era(upper_text: &str, set_total: &str, set_code: &str) -> bool {
    for pattern in patterns::WOTC_ERA_PATTERNS {
        if upper_text.contains(pattern) {
            return true;
        }
    }

    // © の誤読（C, 0, @, ( 等）を含む年表記を拾う
    lazy_static::lazy_static! {
        static ref YEAR_GLYPH: Regex =
            Regex::new(r"[©C@O0(\[][ ]?(199[5-9]|200[0-3])").unwrap();
    }
    if YEAR_GLYPH.is_match(upper_text) {
        return true;
    }

    // 旧期特有の総数 ＋ モダンコード無し
    if !set_total.is_empty() && set_code.is_empty() && patterns::is_wotc_total(set_total) {
        let has_modern_indicator = upper_text.contains("SWSH")
            || upper_text.contains("SV")
            || upper_text.contains("SM")
            || upper_text.contains("XY")
            || upper_text.contains("BW")
            || upper_text.contains("HGSS")
            || upper_text.contains("DP");
        if !has_modern_indicator {
            return true;
        }
    }

    false
}

/// テキスト中のセット名からセットを判定する
///
/// 複数当たったときは最も長い（具体的な）名前を採用する。
/// 短い名前（BASE 等）はカード文中の語に誤一致しやすいため
/// 語境界を要求する。
pub fn detect_set_from_name(upper_text: &str) -> Option<(&'static str, &'static str)> {
    let mut best: Option<(&'static str, &'static str)> = None;

    for &(name, code) in patterns::SET_NAME_TO_CODE {
        if !upper_text.contains(name) {
            continue;
        }
        if patterns::SHORT_SET_NAMES.contains(&name) {
            let pattern = format!(
                r"(?:^|[\s,.:;!?]){}(?:[\s,.:;!?]|$)",
                regex::escape(name)
            );
            match Regex::new(&pattern) {
                Ok(re) if re.is_match(upper_text) => {}
                _ => continue,
            }
        }
        if best.map_or(true, |(b, _)| name.len() > b.len()) {
            best = Some((name, code));
        }
    }

    best
}

/// 旧2文字コード（BS, JU, FO 等）からセットを判定する
pub fn detect_set_from_legacy_code(upper_text: &str) -> Option<&'static str> {
    lazy_static::lazy_static! {
        static ref TWO_LETTER: Regex = Regex::new(r"\b([A-Z][A-Z0-9])\b").unwrap();
    }
    for caps in TWO_LETTER.captures_iter(upper_text) {
        if let Some(set_code) = patterns::legacy_code_lookup(&caps[1]) {
            return Some(set_code);
        }
    }
    None
}

/// セット総数からセットを推定する
///
/// 総数が空なら推定しない。候補が複数ある場合も最有力を選びつつ
/// 候補一覧を保持する。
pub fn infer_set_from_total(set_total: &str, is_wotc_era: bool) -> Option<TotalInference> {
    if set_total.is_empty() {
        return None;
    }

    // 先頭ゼロを落とした表記でも引けるようにする
    let normalized = set_total.trim_start_matches('0');
    let normalized = if normalized.is_empty() { "0" } else { normalized };

    let candidates = patterns::candidates_for_total(set_total)
        .or_else(|| patterns::candidates_for_total(normalized))?;

    let best = select_best_set_from_total(candidates, is_wotc_era);

    if candidates.len() > 1 {
        Some(TotalInference {
            set_code: best.to_string(),
            candidate_sets: candidates.iter().map(|s| s.to_string()).collect(),
            match_reason: "inferred_from_total",
        })
    } else {
        Some(TotalInference {
            set_code: best.to_string(),
            candidate_sets: Vec::new(),
            match_reason: "unique_set_total",
        })
    }
}

/// 総数を共有する候補から最有力のセットを選ぶ
///
/// 年代シグナルが旧期を示していれば旧WotCセットを優先。
/// それ以外は新しいセット（sv/swsh）→ 旧WotCセット → 先頭の順。
pub fn select_best_set_from_total<'a>(candidates: &'a [&'a str], is_wotc_era: bool) -> &'a str {
    if candidates.len() == 1 {
        return candidates[0];
    }

    if is_wotc_era {
        for &set in candidates {
            if patterns::is_base_era_set(set) {
                return set;
            }
        }
    }

    for &set in candidates {
        if set.starts_with("sv") || set.starts_with("swsh") {
            return set;
        }
    }

    for &set in candidates {
        if patterns::is_base_era_set(set) {
            return set;
        }
    }

    candidates[0]
}
