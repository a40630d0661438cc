use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardScanError {
    #[error("セット定義ファイルが読み込めません: {0}")]
    SetsManifest(String),

    #[error("カードデータディレクトリが見つかりません: {0}")]
    CardsDirNotFound(String),

    #[error("カードファイルのパースに失敗: {path}: {message}")]
    CardFile { path: String, message: String },

    #[error("カードIDが重複しています: {0}")]
    DuplicateCardId(String),

    #[error("セットが見つかりません: {0}")]
    SetNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CardScanError>;
