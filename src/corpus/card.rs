//! カードコーパスのデータ型
//!
//! 読み込み元のJSONレコード（`CorpusCard` / `SetRecord`）と、
//! 検索結果として外部に返す型を定義する。

use serde::{Deserialize, Serialize};

/// ワザ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cost: Vec<String>,
    #[serde(default)]
    pub converted_energy_cost: i32,
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub text: String,
}

/// 特性
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// 弱点・抵抗
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weakness {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

/// カード画像URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImages {
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

/// セット画像URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetImages {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub logo: String,
}

/// コーパスに読み込まれる1枚分のカードレコード
///
/// ポケモン系はワザ・特性・HP、マジック系はタイプ行・ルールテキスト・
/// P/T を持つ。どちらの属性も検索対象テキストに織り込まれる。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusCard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub supertype: String,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub hp: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub flavor_text: String,
    #[serde(default)]
    pub evolves_from: String,
    #[serde(default)]
    pub evolves_to: Vec<String>,
    #[serde(default)]
    pub regulation_mark: String,
    #[serde(default)]
    pub national_pokedex_numbers: Vec<i32>,
    #[serde(default)]
    pub attacks: Vec<Attack>,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub weaknesses: Vec<Weakness>,
    #[serde(default)]
    pub resistances: Vec<Weakness>,
    #[serde(default)]
    pub retreat_cost: Vec<String>,
    #[serde(default)]
    pub converted_retreat_cost: i32,
    #[serde(default)]
    pub images: CardImages,
    // マジック系カードの属性
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub power: String,
    #[serde(default)]
    pub toughness: String,
    /// 読み込み時にファイル名（セットID）から設定される
    #[serde(skip)]
    pub set_id: String,
    /// 日本語限定カードか
    #[serde(skip)]
    pub is_japanese: bool,
}

/// セット定義レコード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub total: i32,
    #[serde(default)]
    pub images: SetImages,
}

/// 検索結果として返すカード概要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: String,
    pub name: String,
    pub set_name: String,
    pub set_code: String,
    pub card_number: String,
    pub rarity: String,
    pub image_url: String,
    pub image_url_large: String,
}

/// 検索結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub cards: Vec<CardSummary>,
    pub total_count: usize,
    pub has_more: bool,
    /// 先頭のスコア（翻訳フォールバック等の判断材料）
    pub top_score: i64,
}

/// 外部連携（視覚AIのツール呼び出し）に返す候補カード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCard {
    pub id: String,
    pub name: String,
    pub set_code: String,
    pub set_name: String,
    pub number: String,
    pub image_url: String,
    // 絞り込み用の付加情報
    pub rarity: String,
    pub artist: String,
    pub release_date: String,
    pub subtypes: Vec<String>,
    pub hp: String,
    pub types: Vec<String>,
    pub regulation_mark: String,
}

/// ワザの詳細
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackInfo {
    pub name: String,
    pub cost: String,
    pub damage: String,
    pub text: String,
}

/// 特性の詳細
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityInfo {
    pub name: String,
    pub kind: String,
    pub text: String,
}

/// 二次確認用のカード全文詳細
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub id: String,
    pub name: String,
    pub set_code: String,
    pub set_name: String,
    pub number: String,
    pub rarity: String,
    pub artist: String,
    pub image_url: String,
    pub hp: String,
    pub types: Vec<String>,
    pub subtypes: Vec<String>,
    pub attacks: Vec<AttackInfo>,
    pub abilities: Vec<AbilityInfo>,
    pub weaknesses: Vec<String>,
    pub resistances: Vec<String>,
    pub retreat_cost: i32,
    pub regulation_mark: String,
    pub evolves_from: String,
}

/// セット概要
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInfo {
    pub id: String,
    pub name: String,
    pub series: String,
    pub release_date: String,
    pub total_cards: i32,
    pub symbol_url: String,
    pub logo_url: String,
}

/// セット詳細（シンボルの説明付き）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDetails {
    pub id: String,
    pub name: String,
    pub series: String,
    pub release_date: String,
    pub total_cards: i32,
    /// 視覚照合の手掛かりとなるシンボルの言語描写
    pub symbol_description: String,
}

/// セット単位でまとめた検索結果（2段階選択フロー用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSearchResult {
    pub card_name: String,
    pub set_groups: Vec<SetGroup>,
    pub total_sets: usize,
}

/// 1セット分の検索結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGroup {
    pub set_code: String,
    pub set_name: String,
    pub series: String,
    pub release_date: String,
    pub symbol_url: String,
    pub cards: Vec<CardSummary>,
    pub card_count: usize,
}
