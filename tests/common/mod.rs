//! テスト用の送信層
//!
//! 送信されたリクエストを記録し、あらかじめ決めた応答を返す。
//! Gemini 用（ScriptedTransport）と Ollama 用（ScriptedOllama）。

#![allow(dead_code)]

use async_trait::async_trait;
use caption_review::error::{ReviewError, Result};
use caption_review::gemini::{GeminiClient, GeminiRequest, GeminiResponse, GeminiTransport};
use caption_review::ollama::{OllamaRequest, OllamaResponse, OllamaTransport};
use serde_json::json;
use std::sync::Mutex;

pub enum Reply {
    /// 先頭候補のテキスト
    Text(String),
    /// 候補なし
    Empty,
    /// 通信失敗
    Fail(String),
}

pub struct ScriptedTransport {
    reply: Reply,
    calls: Mutex<Vec<GeminiRequest>>,
}

impl ScriptedTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<GeminiRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GeminiTransport for ScriptedTransport {
    async fn generate_content(
        &self,
        _model: &str,
        _api_key: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse> {
        self.calls.lock().unwrap().push(request.clone());

        match &self.reply {
            Reply::Text(text) => Ok(serde_json::from_value(json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            }))
            .unwrap()),
            Reply::Empty => Ok(GeminiResponse::default()),
            Reply::Fail(reason) => Err(ReviewError::Upstream(reason.clone())),
        }
    }
}

pub fn client(transport: ScriptedTransport, api_key: &str) -> GeminiClient<ScriptedTransport> {
    GeminiClient::new(transport, api_key, "gemini-2.5-flash")
}

/// 先頭 `failures` 回は接続失敗、その後は `reply` を返す
pub struct ScriptedOllama {
    failures: usize,
    reply: String,
    calls: Mutex<Vec<OllamaRequest>>,
}

impl ScriptedOllama {
    pub fn new(failures: usize, reply: &str) -> Self {
        Self {
            failures,
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 常に失敗
    pub fn down() -> Self {
        Self::new(usize::MAX, "")
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<OllamaRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl OllamaTransport for ScriptedOllama {
    async fn generate(&self, request: &OllamaRequest) -> Result<OllamaResponse> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(request.clone());

        if calls.len() <= self.failures {
            return Err(ReviewError::Upstream("connection refused".into()));
        }
        Ok(OllamaResponse {
            response: self.reply.clone(),
        })
    }
}
