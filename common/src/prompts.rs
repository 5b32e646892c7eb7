//! プロンプト生成モジュール
//!
//! - build_challenge_prompt: カテゴリ別のテスト問題生成指示
//! - build_judge_instruction: Judge用のシステム指示（採点基準つき）
//! - build_evaluation_text: 評価対象（問題 + 回答）のテキスト部
//! - DEFAULT_CAPTION_PROMPT: 画像説明の再生成プロンプト

use crate::category::BenchmarkCategory;

/// 問題生成時のシステム指示
pub const CHALLENGE_SYSTEM_INSTRUCTION: &str =
    "You are a rigid benchmark generator for Large Language Models.";

/// 問題生成に失敗したときの代替文
pub const FALLBACK_CHALLENGE: &str = "Failed to generate test case.";

/// 画像説明の再生成プロンプト（繁体字中国語で出力させる）
pub const DEFAULT_CAPTION_PROMPT: &str =
    "請用繁體中文詳細描述這張圖片，包含主要物體、場景氛圍以及任何顯著的細節。";

/// 説明文が返らなかったときの代替文
pub const FALLBACK_CAPTION: &str = "無法生成描述 (No response text)";

/// カテゴリ別の問題生成プロンプト
pub fn build_challenge_prompt(category: BenchmarkCategory) -> &'static str {
    match category {
        BenchmarkCategory::Reasoning => {
            "Generate a difficult multi-hop logic puzzle or a chain-of-thought math word problem. \
             Do not provide the answer, just the question."
        }
        BenchmarkCategory::Coding => {
            "Generate a prompt asking for a specific Python or TypeScript function with a slightly \
             complex constraint (e.g., specific time complexity or handling edge cases). \
             Do not write the code."
        }
        BenchmarkCategory::General => {
            "Generate a prompt for a creative writing task (e.g., write a poem about a specific \
             obscure topic) or a request to summarize a complex concept in a specific style."
        }
        BenchmarkCategory::Embedding => {
            "Generate a 'Semantic Odd One Out' task. List 4 sentences, 3 of which are semantically \
             related and 1 is subtly different. Ask the model to identify the outlier and explain \
             why. Do not reveal the answer."
        }
        BenchmarkCategory::Vision => {
            "Suggest a complex prompt for a Vision model assuming the user has uploaded a photo of a \
             chaotic workspace. The prompt should ask for specific spatial reasoning (e.g., 'What \
             is to the left of the laptop and how might it be used?')."
        }
    }
}

/// Judge用システム指示
pub fn build_judge_instruction(category: BenchmarkCategory) -> String {
    format!(
        r#"You are an expert AI Benchmark Judge.
You will evaluate the output of a local LLM against a specific test case.
Category: {category}.

Scoring Rubric (1-5 Stars):
1: Completely incorrect, hallucinated, or irrelevant.
2: Major errors, missed constraints, or poor coherence.
3: Acceptable but average. Missed nuance or slightly inefficient.
4: Good quality, accurate, and follows instructions well.
5: Exceptional. Perfectly accurate, concise, elegant, or insightful.

Return the result in strict JSON format."#
    )
}

/// 評価対象テキスト
///
/// 画像つきの場合はJudgeが画像と回答を照合するよう指示を変える
pub fn build_evaluation_text(test_case: &str, model_output: &str, with_image: bool) -> String {
    if with_image {
        format!(
            "Original Prompt: {test_case}\n\nModel Answer to Evaluate: {model_output}\n\n\
             Task: Verify if the Model Answer accurately describes the image and answers the prompt."
        )
    } else {
        format!(
            "Test Prompt: \"{test_case}\"\n\nModel Output: \"{model_output}\"\n\n\
             Evaluate this output based on correctness, style, and constraints."
        )
    }
}

/// 画像なしで説明を再生成するときのプロンプト
pub fn build_caption_text_only_prompt(prompt: &str) -> String {
    format!(
        "(Simulated Image Analysis) {prompt}. Context: This is a generated description for a \
         benchmarking pipeline demo."
    )
}
