use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("アイテムが見つかりません: {0}")]
    NotFound(String),

    #[error("Gemini APIキーが設定されていません。`caption-review config --set-api-key YOUR_KEY` で設定してください")]
    MissingCredential,

    #[error("API呼び出しエラー: {0}")]
    Upstream(String),

    #[error("評価レスポンスの解析に失敗: {0}")]
    Evaluation(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] caption_review_common::Error),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
