//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use caption_review::error::ReviewError;
use caption_review::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(ReviewError::FolderNotFound(_))));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let items = scanner::scan_folder(dir.path()).unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_error_display() {
    let errors = vec![
        ReviewError::NotFound("task_1".to_string()),
        ReviewError::MissingCredential,
        ReviewError::Upstream("503".to_string()),
        ReviewError::Evaluation("not json".to_string()),
        ReviewError::Config("テスト設定エラー".to_string()),
        ReviewError::FolderNotFound("/path/to/folder".to_string()),
        ReviewError::Prompt("cancelled".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

#[test]
fn test_missing_credential_message() {
    let display = ReviewError::MissingCredential.to_string();

    assert!(display.contains("APIキー"));
    assert!(display.contains("caption-review config"));
}

#[test]
fn test_not_found_names_the_id() {
    let display = ReviewError::NotFound("task_42".to_string()).to_string();
    assert!(display.contains("task_42"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ReviewError = io_err.into();

    assert!(matches!(err, ReviewError::Io(_)));
    assert!(err.to_string().contains("IO"));
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ReviewError = json_err.into();

    assert!(matches!(err, ReviewError::Json(_)));
}

/// 透過的エラーなのでメッセージがそのまま表示される
#[test]
fn test_common_error_is_transparent() {
    let common_err = caption_review_common::Error::Parse("パースエラー".to_string());
    let err: ReviewError = common_err.into();

    assert!(matches!(err, ReviewError::Common(_)));
    assert!(err.to_string().contains("パースエラー"));
}
