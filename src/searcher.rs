//! 外部連携向けの検索境界
//!
//! 視覚AIのツール呼び出しループやHTTPハンドラが消費する能力契約。
//! 実装はコーパスに限らず差し替えられるよう trait で切る。
//! 画像のダウンロードはネットワークを伴うためこの境界には含めない
//! （候補カードが持つ画像URLを呼び出し側で取得する）。

use crate::corpus::card::{CandidateCard, CardDetails, SearchResult, SetDetails, SetInfo};
use crate::corpus::CardCorpus;
use crate::error::Result;

pub trait CardSearcher: Send + Sync {
    /// 名前でカードを検索する（最大 limit 件）
    fn search_by_name(&self, name: &str, limit: usize) -> Vec<CandidateCard>;

    /// セット内を名前で絞って検索する。セットが無ければエラー
    fn search_in_set(
        &self,
        set_code: &str,
        name_filter: &str,
        limit: usize,
    ) -> Result<Vec<CandidateCard>>;

    /// セットコードと収録番号でカードを引く
    fn get_by_set_and_number(&self, set_code: &str, number: &str) -> Option<CandidateCard>;

    /// カード全文詳細を引く（ワザ・特性テキストでの二次確認用）
    fn get_card_details(&self, card_id: &str) -> Option<CardDetails>;

    /// セット一覧をクエリで絞って返す
    fn list_sets(&self, query: &str) -> Vec<SetInfo>;

    /// セット詳細を引く
    fn get_set_info(&self, set_code: &str) -> Option<SetDetails>;

    /// OCRテキスト全文でカードを照合する
    fn match_by_full_text(
        &self,
        ocr_text: &str,
        candidate_sets: &[String],
    ) -> (SearchResult, Vec<String>);
}

impl CardSearcher for CardCorpus {
    fn search_by_name(&self, name: &str, limit: usize) -> Vec<CandidateCard> {
        self.candidates_by_name(name, limit)
    }

    fn search_in_set(
        &self,
        set_code: &str,
        name_filter: &str,
        limit: usize,
    ) -> Result<Vec<CandidateCard>> {
        self.candidates_in_set(set_code, name_filter, limit)
    }

    fn get_by_set_and_number(&self, set_code: &str, number: &str) -> Option<CandidateCard> {
        self.candidate_by_set_and_number(set_code, number)
    }

    fn get_card_details(&self, card_id: &str) -> Option<CardDetails> {
        self.card_details(card_id)
    }

    fn list_sets(&self, query: &str) -> Vec<SetInfo> {
        CardCorpus::list_sets(self, query)
    }

    fn get_set_info(&self, set_code: &str) -> Option<SetDetails> {
        self.set_info(set_code)
    }

    fn match_by_full_text(
        &self,
        ocr_text: &str,
        candidate_sets: &[String],
    ) -> (SearchResult, Vec<String>) {
        CardCorpus::match_by_full_text(self, ocr_text, candidate_sets)
    }
}
