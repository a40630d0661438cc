//! OCRフィールド抽出モジュール
//!
//! スキャナの生テキストからカード特定に使うフィールドを取り出す。
//!
//! ## 処理フロー
//! 1. 長さ制限と行の整形
//! 2. ゲーム種別ごとの解析（番号・HP・セット・フォイル・レアリティ）
//! 3. 画像解析結果の取り込み（外部入力、任意）
//! 4. 抽出できたフィールド数に基づく確度算出
//!
//! どんな入力に対しても失敗しない。取れなかったフィールドは空のまま
//! 低確度の結果を返す。

pub mod language;
pub mod magic;
pub mod name_resolver;
pub mod pokemon;
pub mod set_inference;

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns;
use self::name_resolver::NameResolver;

/// 対象ゲーム
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Pokemon,
    Magic,
}

/// OCR解析結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    pub raw_text: String,
    pub all_lines: Vec<String>,
    pub card_name: String,
    /// "025/185" の "25"（先頭ゼロ除去済み）
    pub card_number: String,
    /// "025/185" の "185"
    pub set_total: String,
    /// 判定したセットコード（例 "swsh4"）
    pub set_code: String,
    /// テキスト中で一致したセット名（例 "VIVID VOLTAGE"）
    pub set_name: String,
    /// 版権年（マジック系のみ）
    pub copyright_year: String,
    pub hp: String,
    pub rarity: String,
    /// セットの判定根拠: "set_code", "set_name", "ptcgo_code",
    /// "unique_set_total", "inferred_from_total"
    pub match_reason: String,
    pub detected_language: String,
    /// 抽出できたフィールド数に基づく確度（0〜1）
    pub confidence: f64,
    pub is_foil: bool,
    pub is_first_edition: bool,
    pub is_wotc_era: bool,
    /// フォイル判定の根拠
    pub foil_indicators: Vec<String>,
    /// 初版判定の根拠
    pub first_ed_indicators: Vec<String>,
    /// 状態に関する手掛かり（鑑定ラベル等）
    pub condition_hints: Vec<String>,
    /// 総数推定が一意に決まらなかったときの候補セット
    pub candidate_sets: Vec<String>,
    /// 以下は画像解析（外部入力）由来
    pub suggested_condition: String,
    pub edge_whitening_score: f64,
    pub corner_scores: HashMap<String, f64>,
    pub foil_confidence: f64,
}

/// クライアント側の画像解析結果（外部コラボレータからの入力）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub is_foil_detected: bool,
    pub foil_confidence: f64,
    pub suggested_condition: String,
    pub edge_whitening_score: f64,
    pub corner_scores: HashMap<String, f64>,
}

/// OCRフィールド抽出器
///
/// 名前解決器を保持する。コーパス読み込み後に
/// `NameResolver::new(corpus.all_card_names())` で作った解決器を
/// 渡すと動的名簿が使われ、無ければフォールバック名簿で動く。
pub struct OcrExtractor {
    resolver: NameResolver,
}

impl OcrExtractor {
    pub fn new(resolver: NameResolver) -> Self {
        log::info!(
            "OCR抽出器を初期化: 名簿 {} 件",
            resolver.name_count()
        );
        Self { resolver }
    }

    /// フォールバック名簿で構築する
    pub fn with_fallback_names() -> Self {
        Self::new(NameResolver::fallback())
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// OCRテキストを解析する
    pub fn parse(&self, text: &str, game: Game) -> OcrResult {
        self.parse_with_analysis(text, game, None)
    }

    /// OCRテキストを解析し、画像解析結果があれば取り込む
    pub fn parse_with_analysis(
        &self,
        text: &str,
        game: Game,
        image_analysis: Option<&ImageAnalysis>,
    ) -> OcrResult {
        // 長すぎる入力は切り詰める（正規表現DoS対策）
        let text = truncate_on_char_boundary(text, patterns::MAX_OCR_TEXT_LENGTH);

        let mut result = OcrResult {
            raw_text: text.to_string(),
            ..Default::default()
        };

        result.all_lines = text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect();

        match game {
            Game::Pokemon => pokemon::parse(&mut result, &self.resolver),
            Game::Magic => magic::parse(&mut result),
        }

        if let Some(analysis) = image_analysis {
            apply_image_analysis(&mut result, analysis);
        }

        result.confidence = calculate_confidence(&result);
        result
    }
}

/// 数字抽出用のOCR正規化（O→0, o→0, l→1）
///
/// 名前照合用の `normalize_line_for_name_match` とは逆方向の変換。
/// 用途が異なるため統一しない。
pub fn normalize_ocr_digits(s: &str) -> String {
    s.replace('O', "0").replace('o', "0").replace('l', "1")
}

/// 文字境界を保ったまま最大バイト長で切り詰める
fn truncate_on_char_boundary(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// 画像解析結果を取り込む
///
/// フォイルの自動判定は確度 0.8 以上のときだけ。0.5〜0.8 は根拠の
/// 記録にとどめる。
fn apply_image_analysis(result: &mut OcrResult, analysis: &ImageAnalysis) {
    result.suggested_condition = analysis.suggested_condition.clone();
    result.edge_whitening_score = analysis.edge_whitening_score;
    result.corner_scores = analysis.corner_scores.clone();

    // テキスト由来と画像由来の高い方を採用
    if analysis.foil_confidence > result.foil_confidence {
        result.foil_confidence = analysis.foil_confidence;
    }

    if analysis.foil_confidence >= 0.8 && analysis.is_foil_detected {
        result.is_foil = true;
        result
            .foil_indicators
            .push("Image analysis detected foil (high confidence)".to_string());
    } else if analysis.is_foil_detected && analysis.foil_confidence >= 0.5 {
        result
            .foil_indicators
            .push("Image analysis suggests foil (medium confidence)".to_string());
    }
}

/// 状態の手掛かりを検出する（両ゲーム共通）
///
/// スキャン画像のOCRが状態を直接読めることは稀だが、鑑定ラベル付きの
/// カードならラベルの文字を拾える。
pub(crate) fn detect_condition_hints(result: &mut OcrResult, upper_text: &str) {
    for (pattern, hint) in patterns::GRADING_PATTERNS {
        if upper_text.contains(pattern) {
            result.condition_hints.push((*hint).to_string());
        }
    }

    // 鑑定グレード（"PSA 10", "BGS 9.5" 等）
    lazy_static::lazy_static! {
        static ref GRADE: Regex = Regex::new(r"(PSA|BGS|CGC|SGC)\s*(\d+\.?\d?)").unwrap();
    }
    if let Some(caps) = GRADE.captures(upper_text) {
        result
            .condition_hints
            .push(format!("{} grade: {}", &caps[1], &caps[2]));
    }

    for (pattern, hint) in patterns::CONDITION_ISSUE_PATTERNS {
        if upper_text.contains(pattern) {
            result.condition_hints.push((*hint).to_string());
        }
    }
}

/// 抽出できたフィールドから確度を算出する
///
/// 名前 +0.4、番号 +0.3、総数またはセットコード +0.2、HP +0.1。
fn calculate_confidence(result: &OcrResult) -> f64 {
    let mut score = 0.0;

    if !result.card_name.is_empty() {
        score += 0.4;
    }
    if !result.card_number.is_empty() {
        score += 0.3;
    }
    if !result.set_total.is_empty() || !result.set_code.is_empty() {
        score += 0.2;
    }
    if !result.hp.is_empty() {
        score += 0.1;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_vivid_voltage() {
        let extractor = OcrExtractor::with_fallback_names();
        let result = extractor.parse("Charizard\nHP 170\n025/185\nSWSH4", Game::Pokemon);

        assert_eq!(result.card_number, "25");
        assert_eq!(result.set_total, "185");
        assert_eq!(result.hp, "170");
        assert_eq!(result.set_code, "swsh4");
        assert_eq!(result.card_name, "Charizard");
        assert!(result.confidence >= 0.9);
    }

    #[test]
    fn test_empty_input_low_confidence() {
        let extractor = OcrExtractor::with_fallback_names();
        let result = extractor.parse("", Game::Pokemon);
        assert_eq!(result.card_name, "");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_garbage_input_never_fails() {
        let extractor = OcrExtractor::with_fallback_names();
        for text in ["@@@@####", "\0\u{1}\u{2}", "🂡🂢🂣", "////////"] {
            let result = extractor.parse(text, Game::Pokemon);
            assert!(result.confidence < 0.5);
        }
    }

    #[test]
    fn test_length_cap() {
        let extractor = OcrExtractor::with_fallback_names();
        let long_text = "あ".repeat(20_000);
        let result = extractor.parse(&long_text, Game::Pokemon);
        assert!(result.raw_text.len() <= patterns::MAX_OCR_TEXT_LENGTH);
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        // マルチバイト文字の途中で切らない
        let text = "あいうえお";
        let truncated = truncate_on_char_boundary(text, 4);
        assert_eq!(truncated, "あ");
        assert_eq!(truncate_on_char_boundary("abc", 10), "abc");
    }

    #[test]
    fn test_normalize_ocr_digits() {
        assert_eq!(normalize_ocr_digits("O25/1O2"), "025/102");
        assert_eq!(normalize_ocr_digits("l70"), "170");
    }

    #[test]
    fn test_confidence_additive() {
        let extractor = OcrExtractor::with_fallback_names();

        // 名前のみ
        let result = extractor.parse("Pikachu", Game::Pokemon);
        assert!((result.confidence - 0.4).abs() < 1e-9);

        // 名前 + 番号 + 総数
        let result = extractor.parse("Pikachu\n025/185", Game::Pokemon);
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_image_analysis_high_confidence_sets_foil() {
        let extractor = OcrExtractor::with_fallback_names();
        let analysis = ImageAnalysis {
            is_foil_detected: true,
            foil_confidence: 0.85,
            ..Default::default()
        };
        let result =
            extractor.parse_with_analysis("Pikachu\n025/185", Game::Pokemon, Some(&analysis));
        assert!(result.is_foil);
        assert!((result.foil_confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_image_analysis_medium_confidence_indicator_only() {
        let extractor = OcrExtractor::with_fallback_names();
        let analysis = ImageAnalysis {
            is_foil_detected: true,
            foil_confidence: 0.6,
            suggested_condition: "Near Mint".to_string(),
            ..Default::default()
        };
        let result =
            extractor.parse_with_analysis("Pikachu\n025/185", Game::Pokemon, Some(&analysis));
        assert!(!result.is_foil);
        assert_eq!(result.suggested_condition, "Near Mint");
        assert!(result
            .foil_indicators
            .iter()
            .any(|i| i.contains("medium confidence")));
    }

    #[test]
    fn test_japanese_card_language() {
        let extractor = OcrExtractor::with_fallback_names();
        let result = extractor.parse("リザードン\nHP170\n025/185", Game::Pokemon);
        assert_eq!(result.detected_language, "Japanese");
    }
}
