//! 画像キャプション審査パイプラインとLLMベンチマーク審査
//!
//! - store / backend / review / dashboard: 審査キュー
//! - scanner / ollama / ingest: 画像の取り込みと説明文生成
//! - gemini / judge / caption: Gemini API を使う審査・再生成

pub mod backend;
pub mod caption;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gemini;
pub mod ingest;
pub mod judge;
pub mod ollama;
pub mod review;
pub mod scanner;
pub mod store;
