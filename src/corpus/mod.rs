//! カードコーパス索引
//!
//! セットごとのJSONレコードから起動時に一度だけ構築する。
//! 索引は3系統:
//! - ID索引（一意、O(1)参照）
//! - 名前索引（完全名と3文字以上の名前語）
//! - 転置語索引（検索対象テキストの正規化トークン）
//!
//! 構築後は読み取り専用。再構築は `reload` による全入れ替えのみで、
//! 部分更新はしない。共有は単一のRwLockで行い、全クエリは読み取り
//! ロックで並行に走る。

pub mod card;
pub mod index;
mod matcher;

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use walkdir::WalkDir;

use crate::error::{CardScanError, Result};
use crate::patterns;
use self::card::{CardSummary, CorpusCard, SetDetails, SetInfo, SetRecord};

/// 派生フィールドを焼き込んだカード
///
/// 小文字名・検索対象テキストは読み込み時に一度だけ計算し、以後
/// 変更しない。照合のホットパスで文字列変換を繰り返さないため。
pub(crate) struct IndexedCard {
    pub(crate) card: CorpusCard,
    pub(crate) name_lower: String,
    pub(crate) set_id_lower: String,
    pub(crate) searchable_text: String,
}

impl IndexedCard {
    fn new(card: CorpusCard) -> Self {
        // アポストロフィを揃えた小文字名（"Blaine's" と "Blaine's" の照合用）
        let name_lower = index::normalize_apostrophes(&card.name).to_lowercase();
        let set_id_lower = card.set_id.to_lowercase();

        // 検索対象テキスト: 名前 + ワザ/特性の名前と本文 + フレーバー
        // + 進化元 + マジック系のタイプ行・ルールテキスト
        let mut parts: Vec<&str> = vec![&card.name];
        for attack in &card.attacks {
            parts.push(&attack.name);
            if !attack.text.is_empty() {
                parts.push(&attack.text);
            }
        }
        for ability in &card.abilities {
            parts.push(&ability.name);
            if !ability.text.is_empty() {
                parts.push(&ability.text);
            }
        }
        if !card.flavor_text.is_empty() {
            parts.push(&card.flavor_text);
        }
        if !card.evolves_from.is_empty() {
            parts.push(&card.evolves_from);
        }
        if !card.type_line.is_empty() {
            parts.push(&card.type_line);
        }
        if !card.oracle_text.is_empty() {
            parts.push(&card.oracle_text);
        }
        let searchable_text = index::normalize_apostrophes(&parts.join(" ")).to_lowercase();

        Self {
            card,
            name_lower,
            set_id_lower,
            searchable_text,
        }
    }
}

pub(crate) struct CorpusInner {
    pub(crate) cards: Vec<IndexedCard>,
    pub(crate) sets: HashMap<String, SetRecord>,
    pub(crate) name_index: HashMap<String, Vec<usize>>,
    pub(crate) word_index: HashMap<String, Vec<usize>>,
    pub(crate) id_index: HashMap<String, usize>,
}

/// カードコーパス
pub struct CardCorpus {
    inner: RwLock<CorpusInner>,
}

impl CardCorpus {
    /// メモリ上のレコードから構築する
    pub fn from_records(cards: Vec<CorpusCard>, sets: Vec<SetRecord>) -> Result<Self> {
        let inner = build_inner(cards, sets)?;
        Ok(Self {
            inner: RwLock::new(inner),
        })
    }

    /// データディレクトリから構築する
    ///
    /// `data_dir` 直下に `sets.json`（セット定義の配列）と `cards/`
    /// （セットIDをファイル名とするカード配列のJSON群）を置く。
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_japanese(data_dir, None)
    }

    /// 日本語限定カードのデータツリーも併せて読み込む
    pub fn load_with_japanese(data_dir: &Path, japan_dir: Option<&Path>) -> Result<Self> {
        let (cards, sets) = read_data_tree(data_dir, japan_dir)?;
        let english_count = cards.iter().filter(|c| !c.is_japanese).count();
        let japanese_count = cards.len() - english_count;

        let corpus = Self::from_records(cards, sets)?;
        {
            let inner = corpus.read_inner();
            log::info!(
                "カードコーパス読み込み完了: {}枚（英語{} / 日本語{}）、{}セット、{}語を索引化",
                inner.cards.len(),
                english_count,
                japanese_count,
                inner.sets.len(),
                inner.word_index.len()
            );
        }
        Ok(corpus)
    }

    /// コーパスを再構築する（書き込みロックで全入れ替え）
    pub fn reload(&self, data_dir: &Path, japan_dir: Option<&Path>) -> Result<()> {
        let (cards, sets) = read_data_tree(data_dir, japan_dir)?;
        let rebuilt = build_inner(cards, sets)?;
        *self.write_inner() = rebuilt;
        Ok(())
    }

    /// カード枚数
    pub fn card_count(&self) -> usize {
        self.read_inner().cards.len()
    }

    /// セット数
    pub fn set_count(&self) -> usize {
        self.read_inner().sets.len()
    }

    /// IDでカードを引く（O(1)）
    pub fn card_by_id(&self, id: &str) -> Option<CardSummary> {
        let inner = self.read_inner();
        let idx = *inner.id_index.get(id)?;
        Some(convert_to_summary(&inner, &inner.cards[idx]))
    }

    /// 日本語限定カードをIDで引く
    pub fn japanese_card_by_id(&self, id: &str) -> Option<CardSummary> {
        let inner = self.read_inner();
        let idx = *inner.id_index.get(id)?;
        let indexed = &inner.cards[idx];
        if !indexed.card.is_japanese {
            return None;
        }
        Some(convert_to_summary(&inner, indexed))
    }

    /// セット一覧をクエリで絞って返す（新しい順、最大20件）
    pub fn list_sets(&self, query: &str) -> Vec<SetInfo> {
        let mut results = self.list_all_sets(query);
        results.truncate(20);
        results
    }

    /// 全セットをクエリで絞って返す（新しい順、件数制限なし）
    pub fn list_all_sets(&self, query: &str) -> Vec<SetInfo> {
        let inner = self.read_inner();
        let query_lower = query.trim().to_lowercase();
        let mut results: Vec<SetInfo> = inner
            .sets
            .values()
            .filter(|set| {
                if query_lower.is_empty() {
                    return true;
                }
                set.name.to_lowercase().contains(&query_lower)
                    || set.series.to_lowercase().contains(&query_lower)
                    || set.id.to_lowercase().contains(&query_lower)
            })
            .map(convert_to_set_info)
            .collect();

        // 新しい順、同日は名前順で決定的に
        results.sort_by(|a, b| {
            b.release_date
                .cmp(&a.release_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        results
    }

    /// セット詳細を引く
    pub fn set_info(&self, set_code: &str) -> Option<SetDetails> {
        let inner = self.read_inner();
        let set = inner.sets.get(&set_code.trim().to_lowercase())?;
        Some(SetDetails {
            id: set.id.clone(),
            name: set.name.clone(),
            series: set.series.clone(),
            release_date: set.release_date.clone(),
            total_cards: set.total,
            symbol_description: generate_set_symbol_description(set),
        })
    }

    /// コーパス中の全カード名（小文字・長い順）
    ///
    /// OCR名前解決の動的名簿になる。ポケモン系はサフィックスを除いた
    /// ベース名も加え、トレーナーズ等は完全名で照合できるようにする。
    pub fn all_card_names(&self) -> Vec<String> {
        let inner = self.read_inner();
        let mut name_set: HashSet<String> = HashSet::new();

        for indexed in &inner.cards {
            let name = indexed.card.name.to_lowercase();
            if indexed.card.supertype == "Pokémon" || indexed.card.supertype == "Pokemon" {
                let base = extract_base_card_name(&name);
                if base.chars().count() >= 3 {
                    name_set.insert(base);
                }
            }
            if name.chars().count() >= 3 {
                name_set.insert(name);
            }
        }

        let mut names: Vec<String> = name_set.into_iter().collect();
        names.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        names
    }

    pub(crate) fn read_inner(&self) -> RwLockReadGuard<'_, CorpusInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, CorpusInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// カード名からサフィックス（V, VMAX, ex 等）を除いたベース名を得る
pub(crate) fn extract_base_card_name(name: &str) -> String {
    let mut result = name;
    for suffix in patterns::BASE_NAME_SUFFIXES {
        if let Some(stripped) = result.strip_suffix(suffix) {
            result = stripped;
            break;
        }
    }
    result.trim().to_string()
}

/// 内部レコードを検索結果用の概要に変換する
///
/// セット定義が無いIDはそのまま表示名にする（欠損は許容する）。
pub(crate) fn convert_to_summary(inner: &CorpusInner, indexed: &IndexedCard) -> CardSummary {
    let card = &indexed.card;
    let set_name = inner
        .sets
        .get(&card.set_id)
        .map(|set| set.name.clone())
        .unwrap_or_else(|| card.set_id.clone());

    CardSummary {
        id: card.id.clone(),
        name: card.name.clone(),
        set_name,
        set_code: card.set_id.clone(),
        card_number: card.number.clone(),
        rarity: card.rarity.clone(),
        image_url: card.images.small.clone(),
        image_url_large: card.images.large.clone(),
    }
}

fn convert_to_set_info(set: &SetRecord) -> SetInfo {
    SetInfo {
        id: set.id.clone(),
        name: set.name.clone(),
        series: set.series.clone(),
        release_date: set.release_date.clone(),
        total_cards: set.total,
        symbol_url: set.images.symbol.clone(),
        logo_url: set.images.logo.clone(),
    }
}

/// セットシンボルの言語描写を生成する（視覚照合の手掛かり）
fn generate_set_symbol_description(set: &SetRecord) -> String {
    static SYMBOL_DESCRIPTIONS: &[(&str, &str)] = &[
        ("Sword & Shield", "Shield-shaped emblem with sword"),
        ("Scarlet & Violet", "Hexagonal pattern with Pokemon outline"),
        ("Sun & Moon", "Sun and moon combined symbol"),
        ("XY", "X and Y intersecting"),
        ("Black & White", "Black and white split design"),
        ("HeartGold & SoulSilver", "Heart and soul combined emblem"),
        ("Platinum", "Platinum arc design"),
        ("Diamond & Pearl", "Diamond and pearl shapes"),
        ("EX", "EX text in stylized font"),
        ("Neo", "Neo-style geometric pattern"),
        ("Gym", "Gym badge style symbol"),
        ("Base", "Simple Pokemon ball or star"),
    ];

    for (series, description) in SYMBOL_DESCRIPTIONS {
        if set.series.contains(series) {
            return (*description).to_string();
        }
    }
    format!("{} series symbol", set.series)
}

/// データツリーを読み込む
fn read_data_tree(
    data_dir: &Path,
    japan_dir: Option<&Path>,
) -> Result<(Vec<CorpusCard>, Vec<SetRecord>)> {
    let sets_file = data_dir.join("sets.json");
    let sets_data = std::fs::read_to_string(&sets_file).map_err(|e| {
        CardScanError::SetsManifest(format!("{}: {}", sets_file.display(), e))
    })?;
    let mut sets: Vec<SetRecord> = serde_json::from_str(&sets_data).map_err(|e| {
        CardScanError::SetsManifest(format!("{}: {}", sets_file.display(), e))
    })?;

    let cards_dir = data_dir.join("cards");
    if !cards_dir.is_dir() {
        return Err(CardScanError::CardsDirNotFound(
            cards_dir.display().to_string(),
        ));
    }
    let mut cards = read_card_files(&cards_dir, false)?;

    if let Some(japan_dir) = japan_dir {
        // 日本語側のセット定義は任意。あれば併合する
        let japan_sets_file = japan_dir.join("sets.json");
        if japan_sets_file.exists() {
            let data = std::fs::read_to_string(&japan_sets_file).map_err(|e| {
                CardScanError::SetsManifest(format!("{}: {}", japan_sets_file.display(), e))
            })?;
            let japan_sets: Vec<SetRecord> = serde_json::from_str(&data).map_err(|e| {
                CardScanError::SetsManifest(format!("{}: {}", japan_sets_file.display(), e))
            })?;
            sets.extend(japan_sets);
        } else {
            log::warn!(
                "日本語セット定義がありません: {}",
                japan_sets_file.display()
            );
        }

        let japan_cards_dir = japan_dir.join("cards");
        if !japan_cards_dir.is_dir() {
            return Err(CardScanError::CardsDirNotFound(
                japan_cards_dir.display().to_string(),
            ));
        }
        cards.extend(read_card_files(&japan_cards_dir, true)?);
    }

    Ok((cards, sets))
}

/// ディレクトリ内のセット別JSONを読み込む
///
/// ファイル名（拡張子抜き）がセットIDになる。読めないファイルは
/// 中途半端な状態で起動しないよう即時エラーにする。
fn read_card_files(cards_dir: &Path, is_japanese: bool) -> Result<Vec<CorpusCard>> {
    let mut cards = Vec::new();

    for entry in WalkDir::new(cards_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CardScanError::Io(e.into()))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let set_id = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        let data = std::fs::read_to_string(path)?;
        let mut file_cards: Vec<CorpusCard> =
            serde_json::from_str(&data).map_err(|e| CardScanError::CardFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        for card in &mut file_cards {
            card.set_id = set_id.clone();
            card.is_japanese = is_japanese;
        }
        cards.extend(file_cards);
    }

    Ok(cards)
}

/// 3系統の索引を構築する
fn build_inner(cards: Vec<CorpusCard>, sets: Vec<SetRecord>) -> Result<CorpusInner> {
    let mut inner = CorpusInner {
        cards: Vec::with_capacity(cards.len()),
        sets: HashMap::new(),
        name_index: HashMap::new(),
        word_index: HashMap::new(),
        id_index: HashMap::new(),
    };

    for set in sets {
        inner.sets.insert(set.id.clone(), set);
    }

    for card in cards {
        let indexed = IndexedCard::new(card);
        let idx = inner.cards.len();

        // ID索引。重複はデータ不整合なので握りつぶさない
        if inner.id_index.insert(indexed.card.id.clone(), idx).is_some() {
            return Err(CardScanError::DuplicateCardId(indexed.card.id.clone()));
        }

        // 名前索引: 完全名と3文字以上の名前語
        inner
            .name_index
            .entry(indexed.name_lower.clone())
            .or_default()
            .push(idx);
        for part in indexed.name_lower.split_whitespace() {
            if part.chars().count() > 2 {
                inner.name_index.entry(part.to_string()).or_default().push(idx);
            }
        }

        // 転置語索引
        for word in index::extract_index_words(&indexed.searchable_text) {
            inner.word_index.entry(word).or_default().push(idx);
        }

        inner.cards.push(indexed);
    }

    Ok(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, name: &str, set_id: &str, number: &str) -> CorpusCard {
        CorpusCard {
            id: id.to_string(),
            name: name.to_string(),
            set_id: set_id.to_string(),
            number: number.to_string(),
            supertype: "Pokémon".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_indexes() {
        let cards = vec![
            card("swsh4-25", "Charizard", "swsh4", "025"),
            card("swsh4-26", "Charizard VMAX", "swsh4", "026"),
        ];
        let corpus = CardCorpus::from_records(cards, Vec::new()).unwrap();
        assert_eq!(corpus.card_count(), 2);
        assert!(corpus.card_by_id("swsh4-25").is_some());
        assert!(corpus.card_by_id("missing").is_none());
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let cards = vec![
            card("swsh4-25", "Charizard", "swsh4", "025"),
            card("swsh4-25", "Charizard", "swsh4", "025"),
        ];
        let result = CardCorpus::from_records(cards, Vec::new());
        assert!(matches!(result, Err(CardScanError::DuplicateCardId(_))));
    }

    #[test]
    fn test_set_name_falls_back_to_id() {
        let cards = vec![card("zz1-1", "Pikachu", "zz1", "1")];
        let corpus = CardCorpus::from_records(cards, Vec::new()).unwrap();
        let summary = corpus.card_by_id("zz1-1").unwrap();
        // セット定義が無ければIDを表示名にする
        assert_eq!(summary.set_name, "zz1");
    }

    #[test]
    fn test_all_card_names_longest_first() {
        let cards = vec![
            card("a-1", "Mew", "a", "1"),
            card("a-2", "Mewtwo", "a", "2"),
            card("a-3", "Charizard VMAX", "a", "3"),
        ];
        let corpus = CardCorpus::from_records(cards, Vec::new()).unwrap();
        let names = corpus.all_card_names();
        // ベース名も含まれ、長い順に並ぶ
        assert!(names.contains(&"charizard".to_string()));
        assert!(names.contains(&"charizard vmax".to_string()));
        let mew_pos = names.iter().position(|n| n == "mew").unwrap();
        let mewtwo_pos = names.iter().position(|n| n == "mewtwo").unwrap();
        assert!(mewtwo_pos < mew_pos);
    }

    #[test]
    fn test_extract_base_card_name() {
        assert_eq!(extract_base_card_name("charizard vmax"), "charizard");
        assert_eq!(extract_base_card_name("charizard ex"), "charizard");
        assert_eq!(extract_base_card_name("pikachu"), "pikachu");
    }

    #[test]
    fn test_searchable_text_precomputed() {
        let mut c = card("a-1", "Alakazam", "base1", "1");
        c.abilities.push(card::Ability {
            name: "Damage Swap".to_string(),
            text: "Move damage counters.".to_string(),
            kind: "Pokémon Power".to_string(),
        });
        c.flavor_text = "Its brain can outperform a supercomputer.".to_string();
        let corpus = CardCorpus::from_records(vec![c], Vec::new()).unwrap();
        let inner = corpus.read_inner();
        let text = &inner.cards[0].searchable_text;
        assert!(text.contains("alakazam"));
        assert!(text.contains("damage swap"));
        assert!(text.contains("supercomputer"));
    }
}
