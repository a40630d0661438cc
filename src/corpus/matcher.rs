//! 全文照合スコアラーと名前検索
//!
//! 2つの入口を持つ:
//! - `match_by_full_text`: OCRテキスト全体をカード全文と照合する。
//!   転置索引で候補を絞る高速パスと、スコアが確信水準（500）未満の
//!   ときの全件走査フォールバックの2段構え。索引の取りこぼしが
//!   見逃しにならないことを全件走査が保証する。
//! - `search_cards`: 入力された名前での検索。完全一致から部分一致まで
//!   の段階スコアで返す。
//!
//! スコア規則を変えるときは高速パスと全件走査の両方を揃えること。

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::corpus::card::{
    AbilityInfo, AttackInfo, CandidateCard, CardDetails, CardSummary, GroupedSearchResult,
    SearchResult, SetGroup,
};
use crate::corpus::{convert_to_summary, index, CardCorpus, CorpusInner, IndexedCard};
use crate::error::{CardScanError, Result};

/// 結果の上限件数
const MAX_RESULTS: usize = 50;

/// 高速パスの確信水準。部分名一致（500）未満なら全件走査に回す
const MIN_CONFIDENT_SCORE: i64 = 500;

/// スコア付きの内部候補
struct ScoredCard {
    idx: usize,
    score: i64,
    matched_fields: Vec<String>,
}

impl CardCorpus {
    /// OCRテキストをカード全文と照合し、スコア順の候補を返す
    ///
    /// 返り値は (結果, 先頭候補の一致フィールド一覧)。
    /// `candidate_sets` が空でなければそのセット内だけを探す。
    pub fn match_by_full_text(
        &self,
        ocr_text: &str,
        candidate_sets: &[String],
    ) -> (SearchResult, Vec<String>) {
        let inner = self.read_inner();

        let ocr_lower = ocr_text.to_lowercase();
        let ocr_words = index::tokenize_text(&ocr_lower);

        let set_filter: HashSet<String> =
            candidate_sets.iter().map(|s| s.to_lowercase()).collect();
        let filter_by_set = !candidate_sets.is_empty();

        // 高速パス: 転置索引から候補を集めて採点
        let candidate_indices =
            find_candidates_by_index(&inner, &ocr_words, &set_filter, filter_by_set);
        let mut scored = score_indices(
            &inner,
            &candidate_indices,
            &ocr_lower,
            &ocr_words,
            &set_filter,
            filter_by_set,
        );

        // 信頼性フォールバック: 先頭スコアが確信水準未満なら全件走査。
        // OCRエラーで索引語が欠けたカードを取りこぼさないための保証
        if scored.is_empty() || scored[0].score < MIN_CONFIDENT_SCORE {
            let full_scored =
                score_all_cards(&inner, &ocr_lower, &ocr_words, &set_filter, filter_by_set);
            if !full_scored.is_empty()
                && (scored.is_empty() || full_scored[0].score > scored[0].score)
            {
                scored = full_scored;
            }
        }

        sort_scored(&mut scored, &inner);

        let top_matched_fields = scored
            .first()
            .map(|s| s.matched_fields.clone())
            .unwrap_or_default();
        let result = build_result(&inner, scored);
        (result, top_matched_fields)
    }

    /// 入力された名前でカードを検索する
    ///
    /// 名前一致の段階スコア（完全1000〜部分500）→ 足りなければ名前語
    /// 索引（400）→ さらに足りなければセット名経由（350〜250）の順で
    /// 候補を広げる。
    pub fn search_cards(&self, query: &str) -> SearchResult {
        let inner = self.read_inner();
        let query_lower = index::normalize_apostrophes(query).trim().to_lowercase();

        let mut scored: Vec<ScoredCard> = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();

        // 第1パス: 名前の段階照合
        for (idx, indexed) in inner.cards.iter().enumerate() {
            let name_lower = &indexed.name_lower;
            let score = if *name_lower == query_lower {
                1000
            } else if is_variant_name(name_lower, &query_lower) {
                // "Charizard" で "Charizard V" 等の別刷りも拾う
                900
            } else if name_lower.starts_with(&format!("{} ", query_lower)) {
                800
            } else if name_lower.starts_with(query_lower.as_str()) {
                700
            } else if name_lower.contains(&format!(" {}", query_lower))
                || name_lower.ends_with(&format!("'s {}", query_lower))
            {
                // 名前中の独立した語としての一致
                600
            } else if name_lower.contains(query_lower.as_str()) {
                500
            } else {
                0
            };

            if score > 0 && seen.insert(idx) {
                scored.push(ScoredCard {
                    idx,
                    score,
                    matched_fields: Vec::new(),
                });
            }
        }

        // 第2パス: 名前語索引での部分一致
        if scored.len() < MAX_RESULTS {
            for (name, indices) in &inner.name_index {
                if name.contains(&query_lower) || query_lower.contains(name.as_str()) {
                    for &idx in indices {
                        if seen.insert(idx) {
                            scored.push(ScoredCard {
                                idx,
                                score: 400,
                                matched_fields: Vec::new(),
                            });
                        }
                    }
                }
            }
        }

        // 第3パス: クエリがセット名らしいときはセット単位で補完
        if scored.len() < 20 {
            for (set_id, set) in &inner.sets {
                let set_name_lower = set.name.to_lowercase();
                let set_score = if set_name_lower == query_lower {
                    350
                } else if set_name_lower.contains(&query_lower) {
                    300
                } else if query_lower.contains(&set_name_lower) {
                    250
                } else {
                    0
                };
                if set_score > 0 {
                    for (idx, indexed) in inner.cards.iter().enumerate() {
                        if indexed.card.set_id == *set_id && seen.insert(idx) {
                            scored.push(ScoredCard {
                                idx,
                                score: set_score,
                                matched_fields: Vec::new(),
                            });
                        }
                    }
                }
            }
        }

        sort_scored(&mut scored, &inner);
        build_result(&inner, scored)
    }

    /// 名前検索の結果をセット単位にまとめる（2段階選択フロー用）
    pub fn search_cards_grouped(&self, query: &str) -> GroupedSearchResult {
        let result = self.search_cards(query);
        if result.cards.is_empty() {
            return GroupedSearchResult {
                card_name: query.to_string(),
                set_groups: Vec::new(),
                total_sets: 0,
            };
        }

        let inner = self.read_inner();

        let mut group_order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, SetGroup> = HashMap::new();
        for card in &result.cards {
            let group = groups.entry(card.set_code.clone()).or_insert_with(|| {
                let (series, release_date, symbol_url) = inner
                    .sets
                    .get(&card.set_code)
                    .map(|set| {
                        (
                            set.series.clone(),
                            set.release_date.clone(),
                            set.images.symbol.clone(),
                        )
                    })
                    .unwrap_or_default();
                group_order.push(card.set_code.clone());
                SetGroup {
                    set_code: card.set_code.clone(),
                    set_name: card.set_name.clone(),
                    series,
                    release_date,
                    symbol_url,
                    cards: Vec::new(),
                    card_count: 0,
                }
            });
            group.cards.push(card.clone());
            group.card_count = group.cards.len();
        }

        let mut set_groups: Vec<SetGroup> = group_order
            .into_iter()
            .filter_map(|set_code| groups.remove(&set_code))
            .collect();

        // 新しいセットから順に
        set_groups.sort_by(|a, b| {
            b.release_date
                .cmp(&a.release_date)
                .then_with(|| a.set_name.cmp(&b.set_name))
        });

        // 代表名: クエリと完全一致する名前があればそれを使う
        let query_lower = query.trim().to_lowercase();
        let card_name = result
            .cards
            .iter()
            .find(|card| card.name.to_lowercase() == query_lower)
            .map(|card| card.name.clone())
            .unwrap_or_else(|| result.cards[0].name.clone());

        GroupedSearchResult {
            total_sets: set_groups.len(),
            card_name,
            set_groups,
        }
    }

    /// 名前と番号で候補セットを横断検索する
    ///
    /// 名前の一致が必須で、番号一致は加点（+200）。抽出結果の
    /// 曖昧さを候補セット一覧で絞り込むときに使う。
    pub fn search_by_name_and_number(
        &self,
        name: &str,
        card_number: &str,
        candidate_sets: &[String],
    ) -> SearchResult {
        let inner = self.read_inner();

        let name_lower = name.trim().to_lowercase();
        if name_lower.is_empty() {
            return SearchResult::default();
        }

        let set_filter: HashSet<String> =
            candidate_sets.iter().map(|s| s.to_lowercase()).collect();
        let filter_by_set = !candidate_sets.is_empty();

        let normalized_number = normalize_collector_number(card_number);

        let mut scored: Vec<ScoredCard> = Vec::new();
        for (idx, indexed) in inner.cards.iter().enumerate() {
            if filter_by_set && !set_filter.contains(&indexed.set_id_lower) {
                continue;
            }

            let mut score = if indexed.name_lower == name_lower {
                1000
            } else if indexed
                .name_lower
                .starts_with(&format!("{} ", name_lower))
            {
                800
            } else if indexed.name_lower.contains(name_lower.as_str()) {
                500
            } else {
                continue;
            };

            if !card_number.is_empty() {
                let local_number = normalize_collector_number(&indexed.card.number);
                if local_number == normalized_number || indexed.card.number == card_number {
                    score += 200;
                }
            }

            scored.push(ScoredCard {
                idx,
                score,
                matched_fields: Vec::new(),
            });
        }

        sort_scored(&mut scored, &inner);
        build_result(&inner, scored)
    }

    /// 全国図鑑番号で検索する（新しいセットから順に）
    pub fn search_by_pokedex_number(&self, pokedex_number: i32) -> SearchResult {
        let inner = self.read_inner();
        if pokedex_number <= 0 {
            return SearchResult::default();
        }

        let mut matches: Vec<CardSummary> = inner
            .cards
            .iter()
            .filter(|indexed| {
                indexed.card.supertype == "Pokémon"
                    && indexed
                        .card
                        .national_pokedex_numbers
                        .contains(&pokedex_number)
            })
            .map(|indexed| convert_to_summary(&inner, indexed))
            .collect();

        matches.sort_by(|a, b| {
            let date_a = inner
                .sets
                .get(&a.set_code.to_lowercase())
                .map(|s| s.release_date.as_str())
                .unwrap_or("");
            let date_b = inner
                .sets
                .get(&b.set_code.to_lowercase())
                .map(|s| s.release_date.as_str())
                .unwrap_or("");
            date_b.cmp(date_a).then_with(|| a.name.cmp(&b.name))
        });

        SearchResult {
            total_count: matches.len(),
            has_more: false,
            top_score: 0,
            cards: matches,
        }
    }

    /// 日本語限定カードを名前で検索する
    pub fn search_japanese_by_name(&self, name: &str) -> Vec<CardSummary> {
        let inner = self.read_inner();
        let name_lower = name.trim().to_lowercase();

        inner
            .cards
            .iter()
            .filter(|indexed| indexed.card.is_japanese)
            .filter(|indexed| {
                indexed.name_lower == name_lower
                    || indexed.name_lower.contains(name_lower.as_str())
                    || name_lower.contains(indexed.name_lower.as_str())
            })
            .map(|indexed| convert_to_summary(&inner, indexed))
            .collect()
    }

    /// 日本語限定カードの候補を段階スコアで返す（外部連携用）
    pub fn japanese_candidates_by_name(&self, name: &str, limit: usize) -> Vec<CandidateCard> {
        let inner = self.read_inner();
        let limit = clamp_limit(limit, 10, 20);
        let name_lower = name.trim().to_lowercase();
        if name_lower.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredCard> = Vec::new();
        for (idx, indexed) in inner.cards.iter().enumerate() {
            if !indexed.card.is_japanese {
                continue;
            }
            let score = name_ladder_score(&indexed.name_lower, &name_lower);
            if score > 0 {
                scored.push(ScoredCard {
                    idx,
                    score,
                    matched_fields: Vec::new(),
                });
            }
        }

        sort_scored(&mut scored, &inner);
        collect_candidates(&inner, &scored, limit)
    }

    /// セットコードと番号でカードを引く（先頭ゼロの揺れを許容）
    pub fn card_by_set_and_number(&self, set_code: &str, card_number: &str) -> Option<CardSummary> {
        let inner = self.read_inner();
        let normalized_number = normalize_collector_number(card_number);

        inner
            .cards
            .iter()
            .find(|indexed| {
                indexed.set_id_lower == set_code.to_lowercase()
                    && (normalize_collector_number(&indexed.card.number) == normalized_number
                        || indexed.card.number == card_number)
            })
            .map(|indexed| convert_to_summary(&inner, indexed))
    }

    /// 名前で候補カードを返す（外部連携用）
    ///
    /// 画像URLの無いカードは候補にしない（視覚確認に使えないため）。
    pub fn candidates_by_name(&self, name: &str, limit: usize) -> Vec<CandidateCard> {
        let inner = self.read_inner();
        let limit = clamp_limit(limit, 10, 20);
        let name_lower = name.trim().to_lowercase();
        if name_lower.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredCard> = Vec::new();
        for (idx, indexed) in inner.cards.iter().enumerate() {
            let score = name_ladder_score(&indexed.name_lower, &name_lower);
            if score > 0 {
                scored.push(ScoredCard {
                    idx,
                    score,
                    matched_fields: Vec::new(),
                });
            }
        }

        sort_scored(&mut scored, &inner);
        collect_candidates(&inner, &scored, limit)
    }

    /// セット内を名前で絞って候補カードを返す（収録番号順）
    pub fn candidates_in_set(
        &self,
        set_code: &str,
        name_filter: &str,
        limit: usize,
    ) -> Result<Vec<CandidateCard>> {
        let inner = self.read_inner();
        let limit = clamp_limit(limit, 20, 50);

        let set_code_lower = set_code.trim().to_lowercase();
        let name_lower = name_filter.trim().to_lowercase();

        let set = inner
            .sets
            .get(&set_code_lower)
            .ok_or_else(|| CardScanError::SetNotFound(set_code.to_string()))?;

        let mut candidates: Vec<CandidateCard> = Vec::new();
        for indexed in &inner.cards {
            if indexed.set_id_lower != set_code_lower {
                continue;
            }
            if !name_lower.is_empty() && !indexed.name_lower.contains(name_lower.as_str()) {
                continue;
            }
            if let Some(candidate) = convert_to_candidate(indexed, &set.name, &set.release_date) {
                candidates.push(candidate);
            }
            if candidates.len() >= limit {
                break;
            }
        }

        candidates.sort_by_key(|c| parse_collector_number(&c.number));
        Ok(candidates)
    }

    /// セット内の全カードを返す（収録番号順）
    pub fn set_cards(&self, set_code: &str, name_filter: &str) -> Result<SearchResult> {
        let inner = self.read_inner();
        let set_code_lower = set_code.trim().to_lowercase();
        let name_lower = name_filter.trim().to_lowercase();

        if !inner.sets.contains_key(&set_code_lower) {
            return Err(CardScanError::SetNotFound(set_code.to_string()));
        }

        let mut cards: Vec<CardSummary> = inner
            .cards
            .iter()
            .filter(|indexed| indexed.set_id_lower == set_code_lower)
            .filter(|indexed| {
                name_lower.is_empty() || indexed.name_lower.contains(name_lower.as_str())
            })
            .map(|indexed| convert_to_summary(&inner, indexed))
            .collect();

        cards.sort_by_key(|c| parse_collector_number(&c.card_number));

        Ok(SearchResult {
            total_count: cards.len(),
            has_more: false,
            top_score: 0,
            cards,
        })
    }

    /// セットコードと番号で候補カードを引く（外部連携用）
    ///
    /// カードIDの表記揺れ（ゼロ詰め・区切り・大小文字）を順に試す。
    pub fn candidate_by_set_and_number(
        &self,
        set_code: &str,
        number: &str,
    ) -> Option<CandidateCard> {
        let inner = self.read_inner();

        let set_code_lower = set_code.to_lowercase();
        let number_clean = {
            let stripped = number.trim_start_matches('0');
            if stripped.is_empty() { "0" } else { stripped }
        };

        let id_variants = [
            format!("{}-{}", set_code_lower, number_clean),
            format!("{}-{}", set_code_lower, number),
            format!("{}-0{}", set_code_lower, number_clean),
            format!("{}-00{}", set_code_lower, number_clean),
            format!("{}{}", set_code_lower, number_clean),
            format!("{}{}", set_code_lower, number),
            format!("{}-{}", set_code.to_uppercase(), number),
        ];

        let idx = id_variants
            .iter()
            .find_map(|id| inner.id_index.get(id).copied())?;

        let indexed = &inner.cards[idx];
        let (set_name, release_date) = inner
            .sets
            .get(&indexed.card.set_id)
            .map(|set| (set.name.clone(), set.release_date.clone()))
            .unwrap_or_else(|| (indexed.card.set_id.clone(), String::new()));
        convert_to_candidate(indexed, &set_name, &release_date)
    }

    /// カード全文詳細を引く（二次確認用）
    pub fn card_details(&self, card_id: &str) -> Option<CardDetails> {
        let inner = self.read_inner();
        let idx = *inner.id_index.get(card_id)?;
        let indexed = &inner.cards[idx];
        let card = &indexed.card;

        let set_name = inner
            .sets
            .get(&card.set_id)
            .map(|set| set.name.clone())
            .unwrap_or_else(|| card.set_id.clone());

        let image_url = if !card.images.large.is_empty() {
            card.images.large.clone()
        } else {
            card.images.small.clone()
        };

        let attacks = card
            .attacks
            .iter()
            .map(|attack| AttackInfo {
                name: attack.name.clone(),
                cost: attack.cost.join(" "),
                damage: attack.damage.clone(),
                text: attack.text.clone(),
            })
            .collect();

        let abilities = card
            .abilities
            .iter()
            .map(|ability| AbilityInfo {
                name: ability.name.clone(),
                kind: ability.kind.clone(),
                text: ability.text.clone(),
            })
            .collect();

        let weaknesses = card
            .weaknesses
            .iter()
            .map(|w| format!("{} {}", w.kind, w.value))
            .collect();
        let resistances = card
            .resistances
            .iter()
            .map(|r| format!("{} {}", r.kind, r.value))
            .collect();

        Some(CardDetails {
            id: card.id.clone(),
            name: card.name.clone(),
            set_code: card.set_id.clone(),
            set_name,
            number: card.number.clone(),
            rarity: card.rarity.clone(),
            artist: card.artist.clone(),
            image_url,
            hp: card.hp.clone(),
            types: card.types.clone(),
            subtypes: card.subtypes.clone(),
            attacks,
            abilities,
            weaknesses,
            resistances,
            retreat_cost: card.converted_retreat_cost,
            regulation_mark: card.regulation_mark.clone(),
            evolves_from: card.evolves_from.clone(),
        })
    }
}

/// 転置索引からOCR語に一致するカード索引を集める（重複排除）
fn find_candidates_by_index(
    inner: &CorpusInner,
    ocr_words: &[String],
    set_filter: &HashSet<String>,
    filter_by_set: bool,
) -> Vec<usize> {
    let mut candidate_set: HashSet<usize> = HashSet::new();

    for word in ocr_words {
        let normalized = match index::normalize_word_for_index(word) {
            Some(normalized) => normalized,
            None => continue,
        };
        if let Some(indices) = inner.word_index.get(normalized) {
            for &idx in indices {
                if filter_by_set && !set_filter.contains(&inner.cards[idx].set_id_lower) {
                    continue;
                }
                candidate_set.insert(idx);
            }
        }
    }

    // 採点順を決定的にするため索引順に並べる
    let mut candidates: Vec<usize> = candidate_set.into_iter().collect();
    candidates.sort_unstable();
    candidates
}

/// 指定した候補集合を採点する
fn score_indices(
    inner: &CorpusInner,
    indices: &[usize],
    ocr_lower: &str,
    ocr_words: &[String],
    set_filter: &HashSet<String>,
    filter_by_set: bool,
) -> Vec<ScoredCard> {
    let mut scored: Vec<ScoredCard> = Vec::new();
    for &idx in indices {
        let indexed = &inner.cards[idx];
        if filter_by_set && !set_filter.contains(&indexed.set_id_lower) {
            continue;
        }
        let (score, matched_fields) = score_card(indexed, ocr_lower, ocr_words);
        if score > 0 {
            scored.push(ScoredCard {
                idx,
                score,
                matched_fields,
            });
        }
    }
    sort_scored(&mut scored, inner);
    scored
}

/// 全カードを採点する（信頼性フォールバック）
fn score_all_cards(
    inner: &CorpusInner,
    ocr_lower: &str,
    ocr_words: &[String],
    set_filter: &HashSet<String>,
    filter_by_set: bool,
) -> Vec<ScoredCard> {
    let mut scored: Vec<ScoredCard> = inner
        .cards
        .par_iter()
        .enumerate()
        .filter(|(_, indexed)| !filter_by_set || set_filter.contains(&indexed.set_id_lower))
        .filter_map(|(idx, indexed)| {
            let (score, matched_fields) = score_card(indexed, ocr_lower, ocr_words);
            if score > 0 {
                Some(ScoredCard {
                    idx,
                    score,
                    matched_fields,
                })
            } else {
                None
            }
        })
        .collect();
    sort_scored(&mut scored, inner);
    scored
}

/// 1枚のカードをOCRテキストに対して採点する
///
/// 加点式: 名前一致 1000 / 名前語の全部分一致 500 / ワザ・特性名の
/// 一致 各200 / 収録番号の一致 300 / 残り語の重なり 1語10点。
fn score_card(indexed: &IndexedCard, ocr_lower: &str, ocr_words: &[String]) -> (i64, Vec<String>) {
    let mut score: i64 = 0;
    let mut matched: Vec<String> = Vec::new();

    // 1〜2文字の名前（"N" 等）は語境界一致を要求する。それ以外は
    // 部分文字列で足りる
    let name_matched = if indexed.name_lower.chars().count() <= 2 {
        index::match_short_name_as_word(ocr_lower, &indexed.name_lower)
    } else {
        ocr_lower.contains(indexed.name_lower.as_str())
    };

    if name_matched {
        score += 1000;
        matched.push("name".to_string());
    } else {
        // 名前を構成する語がすべて現れていれば部分一致
        let name_words: Vec<&str> = indexed.name_lower.split_whitespace().collect();
        let found = name_words
            .iter()
            .filter(|word| word.chars().count() >= 3 && ocr_lower.contains(**word))
            .count();
        if found > 0 && found == name_words.len() {
            score += 500;
            matched.push("name_partial".to_string());
        }
    }

    for attack in &indexed.card.attacks {
        let attack_name = attack.name.to_lowercase();
        if attack_name.chars().count() >= 4 && ocr_lower.contains(&attack_name) {
            score += 200;
            matched.push(format!("attack:{}", attack.name));
        }
    }

    for ability in &indexed.card.abilities {
        let ability_name = ability.name.to_lowercase();
        if ability_name.chars().count() >= 4 && ocr_lower.contains(&ability_name) {
            score += 200;
            matched.push(format!("ability:{}", ability.name));
        }
    }

    // 収録番号: "025/185" のようにスラッシュを伴う形で探す。
    // ゼロ詰めの有無の両方を試す
    if !indexed.card.number.is_empty() {
        let normalized = normalize_collector_number(&indexed.card.number);
        if ocr_lower.contains(&format!("/{}", indexed.card.number))
            || ocr_lower.contains(&format!("{}/", indexed.card.number))
            || ocr_lower.contains(&format!(" {}/", normalized))
            || ocr_lower.contains(&format!("/{} ", normalized))
        {
            score += 300;
            matched.push(format!("number:{}", indexed.card.number));
        }
    }

    if !ocr_words.is_empty() && !indexed.searchable_text.is_empty() {
        score += index::count_word_matches(ocr_words, &indexed.searchable_text) as i64 * 10;
    }

    (score, matched)
}

/// 名前検索の段階スコア（外部連携の候補検索用）
fn name_ladder_score(name_lower: &str, query_lower: &str) -> i64 {
    if name_lower == query_lower {
        1000
    } else if name_lower.starts_with(&format!("{} ", query_lower)) {
        800
    } else if name_lower.ends_with(&format!(" {}", query_lower)) {
        700
    } else if name_lower.contains(query_lower) {
        500
    } else {
        0
    }
}

/// "Charizard" に対する "Charizard V" 等の別刷り名か
fn is_variant_name(name_lower: &str, query_lower: &str) -> bool {
    ["v", "vmax", "vstar", "ex", "gx"]
        .iter()
        .any(|suffix| *name_lower == format!("{} {}", query_lower, suffix))
}

/// スコア降順 → 名前昇順 → 索引順で並べる
///
/// 並び順はスコアと名前の純粋関数。同一入力に対する再実行で
/// 同一の出力になる。
fn sort_scored(scored: &mut [ScoredCard], inner: &CorpusInner) {
    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| inner.cards[a.idx].card.name.cmp(&inner.cards[b.idx].card.name))
            .then_with(|| a.idx.cmp(&b.idx))
    });
}

/// 上位50件に切り詰めて結果を組み立てる
fn build_result(inner: &CorpusInner, scored: Vec<ScoredCard>) -> SearchResult {
    let total_count = scored.len();
    let top_score = scored.first().map(|s| s.score).unwrap_or(0);
    let max_results = total_count.min(MAX_RESULTS);

    let cards = scored[..max_results]
        .iter()
        .map(|s| convert_to_summary(inner, &inner.cards[s.idx]))
        .collect();

    SearchResult {
        cards,
        total_count,
        has_more: total_count > max_results,
        top_score,
    }
}

/// 画像付きの候補カードに変換する。画像が無ければ None
fn convert_to_candidate(
    indexed: &IndexedCard,
    set_name: &str,
    release_date: &str,
) -> Option<CandidateCard> {
    let card = &indexed.card;
    let image_url = if !card.images.large.is_empty() {
        card.images.large.clone()
    } else if !card.images.small.is_empty() {
        card.images.small.clone()
    } else {
        return None;
    };

    Some(CandidateCard {
        id: card.id.clone(),
        name: card.name.clone(),
        set_code: card.set_id.clone(),
        set_name: set_name.to_string(),
        number: card.number.clone(),
        image_url,
        rarity: card.rarity.clone(),
        artist: card.artist.clone(),
        release_date: release_date.to_string(),
        subtypes: card.subtypes.clone(),
        hp: card.hp.clone(),
        types: card.types.clone(),
        regulation_mark: card.regulation_mark.clone(),
    })
}

/// スコア順の候補リストを画像付き候補に変換する（上限まで）
fn collect_candidates(
    inner: &CorpusInner,
    scored: &[ScoredCard],
    limit: usize,
) -> Vec<CandidateCard> {
    let mut candidates = Vec::new();
    for s in scored {
        if candidates.len() >= limit {
            break;
        }
        let indexed = &inner.cards[s.idx];
        let (set_name, release_date) = inner
            .sets
            .get(&indexed.card.set_id)
            .map(|set| (set.name.clone(), set.release_date.clone()))
            .unwrap_or_else(|| (indexed.card.set_id.clone(), String::new()));
        if let Some(candidate) = convert_to_candidate(indexed, &set_name, &release_date) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// 件数上限をデフォルトと最大値に丸める（0はデフォルト扱い）
fn clamp_limit(limit: usize, default: usize, max: usize) -> usize {
    if limit == 0 {
        default
    } else {
        limit.min(max)
    }
}

/// 収録番号の先頭ゼロを落とす（空なら "0"）
fn normalize_collector_number(number: &str) -> String {
    let stripped = number.trim_start_matches('0');
    if stripped.is_empty() && !number.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// 収録番号を数値として解釈する（ソート用、非数値は0）
fn parse_collector_number(number: &str) -> i64 {
    number.trim_start_matches('0').parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::card::{Ability, Attack, CorpusCard, SetRecord};

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

    fn test_corpus() -> CardCorpus {
        let mut charizard = card("swsh4-25", "Charizard", "swsh4", "025");
        charizard.attacks.push(Attack {
            name: "Royal Blaze".to_string(),
            text: "This attack does 50 more damage.".to_string(),
            ..Default::default()
        });

        let mut alakazam = card("base1-1", "Alakazam", "base1", "1");
        alakazam.abilities.push(Ability {
            name: "Damage Swap".to_string(),
            text: "Move 1 damage counter.".to_string(),
            kind: "Pokémon Power".to_string(),
        });

        let n_card = CorpusCard {
            id: "bw4-92".to_string(),
            name: "N".to_string(),
            set_id: "bw4".to_string(),
            number: "92".to_string(),
            supertype: "Trainer".to_string(),
            ..Default::default()
        };

        let mew = card("cel25-11", "Mew", "cel25", "011");

        let sets = vec![
            SetRecord {
                id: "swsh4".to_string(),
                name: "Vivid Voltage".to_string(),
                series: "Sword & Shield".to_string(),
                release_date: "2020/11/13".to_string(),
                total: 185,
                ..Default::default()
            },
            SetRecord {
                id: "base1".to_string(),
                name: "Base".to_string(),
                series: "Base".to_string(),
                release_date: "1999/01/09".to_string(),
                total: 102,
                ..Default::default()
            },
        ];

        CardCorpus::from_records(vec![charizard, alakazam, n_card, mew], sets).unwrap()
    }

    #[test]
    fn test_match_by_full_text_name_and_number() {
        let corpus = test_corpus();
        let (result, matched) =
            corpus.match_by_full_text("Charizard HP 170 025/185 Royal Blaze", &[]);
        assert_eq!(result.cards[0].id, "swsh4-25");
        assert!(matched.contains(&"name".to_string()));
        assert!(matched.contains(&"attack:Royal Blaze".to_string()));
        assert!(matched.contains(&"number:025".to_string()));
    }

    #[test]
    fn test_match_by_full_text_set_filter() {
        let corpus = test_corpus();
        let (unfiltered, _) = corpus.match_by_full_text("damage swap alakazam", &[]);
        let (filtered, _) =
            corpus.match_by_full_text("damage swap alakazam", &["base1".to_string()]);

        assert!(filtered.total_count <= unfiltered.total_count);
        for card in &filtered.cards {
            assert_eq!(card.set_code, "base1");
        }

        // 対象外のセットで絞れば空になる
        let (empty, _) = corpus.match_by_full_text("damage swap alakazam", &["swsh4".to_string()]);
        assert!(empty.cards.iter().all(|c| c.set_code == "swsh4"));
    }

    #[test]
    fn test_match_by_full_text_short_name_boundary() {
        let corpus = test_corpus();
        // "N" はピカチュウ等の文字列中の n に一致してはならない
        let (result, _) = corpus.match_by_full_text("pikachu thunderbolt attack", &[]);
        assert!(result.cards.iter().all(|c| c.name != "N"));

        // 独立した語としての "N" は一致する
        let (result, _) = corpus.match_by_full_text("trainer N supporter", &[]);
        assert!(result.cards.iter().any(|c| c.name == "N"));
    }

    #[test]
    fn test_match_by_full_text_fallback_rescues_short_tokens() {
        let corpus = test_corpus();
        // "Mew" は3文字なのでクエリトークン（4文字以上）にならず、
        // 索引パスでは候補が出ない。全件走査が拾うことを確認する
        let (result, _) = corpus.match_by_full_text("Mew", &[]);
        assert!(!result.cards.is_empty());
        assert_eq!(result.cards[0].name, "Mew");
        assert!(result.top_score >= 1000);
    }

    #[test]
    fn test_match_by_full_text_idempotent() {
        let corpus = test_corpus();
        let text = "charizard royal blaze 025/185";
        let (first, first_fields) = corpus.match_by_full_text(text, &[]);
        let (second, second_fields) = corpus.match_by_full_text(text, &[]);
        assert_eq!(first, second);
        assert_eq!(first_fields, second_fields);
    }

    #[test]
    fn test_match_by_full_text_empty_input() {
        let corpus = test_corpus();
        let (result, matched) = corpus.match_by_full_text("", &[]);
        assert!(result.cards.is_empty());
        assert!(matched.is_empty());
    }

    #[test]
    fn test_search_cards_exact_first() {
        let corpus = test_corpus();
        let result = corpus.search_cards("Charizard");
        assert_eq!(result.cards[0].name, "Charizard");
        assert_eq!(result.top_score, 1000);
    }

    #[test]
    fn test_search_cards_set_name_pass() {
        let corpus = test_corpus();
        let result = corpus.search_cards("vivid voltage");
        // セット名経由でそのセットのカードが出る
        assert!(result.cards.iter().any(|c| c.set_code == "swsh4"));
    }

    #[test]
    fn test_search_by_name_and_number() {
        let corpus = test_corpus();
        let result = corpus.search_by_name_and_number("Charizard", "25", &[]);
        assert_eq!(result.cards[0].id, "swsh4-25");
        // 名前1000 + 番号200
        assert_eq!(result.top_score, 1200);

        let empty = corpus.search_by_name_and_number("", "25", &[]);
        assert!(empty.cards.is_empty());
    }

    #[test]
    fn test_card_by_set_and_number_leading_zeros() {
        let corpus = test_corpus();
        assert!(corpus.card_by_set_and_number("swsh4", "25").is_some());
        assert!(corpus.card_by_set_and_number("swsh4", "025").is_some());
        assert!(corpus.card_by_set_and_number("SWSH4", "25").is_some());
        assert!(corpus.card_by_set_and_number("swsh4", "999").is_none());
    }

    #[test]
    fn test_candidate_by_set_and_number_id_variants() {
        let mut charizard = card("swsh4-25", "Charizard", "swsh4", "025");
        charizard.images.small = "https://img.example/swsh4-25.png".to_string();
        let corpus = CardCorpus::from_records(vec![charizard], Vec::new()).unwrap();

        // "swsh4-025" のIDは無いが、ゼロ詰め除去の変種で当たる
        let candidate = corpus.candidate_by_set_and_number("swsh4", "025");
        assert!(candidate.is_some());
        assert_eq!(candidate.unwrap().id, "swsh4-25");
    }

    #[test]
    fn test_candidates_skip_imageless() {
        let corpus = test_corpus();
        // テストコーパスのカードは画像URLを持たないので候補は空
        assert!(corpus.candidates_by_name("Charizard", 10).is_empty());
    }

    #[test]
    fn test_candidates_in_set_unknown_set() {
        let corpus = test_corpus();
        assert!(matches!(
            corpus.candidates_in_set("nosuch", "", 10),
            Err(CardScanError::SetNotFound(_))
        ));
    }

    #[test]
    fn test_card_details() {
        let corpus = test_corpus();
        let details = corpus.card_details("base1-1").unwrap();
        assert_eq!(details.name, "Alakazam");
        assert_eq!(details.abilities.len(), 1);
        assert_eq!(details.abilities[0].name, "Damage Swap");
        assert!(corpus.card_details("missing").is_none());
    }

    #[test]
    fn test_search_cards_grouped() {
        let corpus = test_corpus();
        let grouped = corpus.search_cards_grouped("Charizard");
        assert_eq!(grouped.card_name, "Charizard");
        assert_eq!(grouped.total_sets, 1);
        assert_eq!(grouped.set_groups[0].set_code, "swsh4");
        assert_eq!(grouped.set_groups[0].card_count, 1);
    }

    #[test]
    fn test_normalize_collector_number() {
        assert_eq!(normalize_collector_number("025"), "25");
        assert_eq!(normalize_collector_number("0"), "0");
        assert_eq!(normalize_collector_number(""), "");
        assert_eq!(normalize_collector_number("000"), "0");
    }
}
