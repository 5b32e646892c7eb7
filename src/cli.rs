use caption_review_common::{BenchmarkCategory, ItemStatus};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caption-review")]
#[command(about = "画像キャプション審査・LLMベンチマーク審査ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 審査キューを表示
    Queue {
        /// 状態で絞り込み
        #[arg(short, long)]
        status: Option<StatusArg>,

        /// 取り込むフォルダ（省略時はモックデータ）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 集計を表示
    Stats {
        /// 取り込むフォルダ（省略時はモックデータ）
        #[arg(short, long)]
        folder: Option<PathBuf>,
    },

    /// pendingのアイテムを対話式で審査
    Review {
        /// 取り込むフォルダ（省略時はモックデータ）
        #[arg(short, long)]
        folder: Option<PathBuf>,
    },

    /// フォルダの画像に説明文を生成し、出力フォルダへ書き出す
    Ingest {
        /// 取り込むフォルダ（省略時は設定の watch_path）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// 出力フォルダ（省略時は設定の output_path）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 一定間隔で一覧と集計を再取得して表示
    Watch {
        /// 取り込むフォルダ（省略時はモックデータ）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// ポーリング間隔（秒）
        #[arg(short, long, default_value = "30")]
        interval: u64,

        /// 更新回数（省略時は無制限）
        #[arg(short, long)]
        ticks: Option<usize>,
    },

    /// ベンチマーク問題を生成
    Challenge {
        /// カテゴリ
        #[arg(required = true)]
        category: CategoryArg,
    },

    /// 回答をJudgeで採点
    Evaluate {
        /// カテゴリ
        #[arg(short, long)]
        category: CategoryArg,

        /// テスト問題
        #[arg(short, long)]
        prompt: String,

        /// 評価対象モデルの回答
        #[arg(short, long)]
        output: String,

        /// 画像ファイル（Visionのみ使用）
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// 結果を記録するスコアボード
        #[arg(long, default_value = "scoreboard.json")]
        scoreboard: PathBuf,

        /// 対象モデル名
        #[arg(long)]
        model_name: Option<String>,
    },

    /// スコアボードを表示
    Scoreboard {
        /// スコアボードファイル
        #[arg(default_value = "scoreboard.json")]
        path: PathBuf,
    },

    /// 設定の管理
    Config {
        /// Gemini APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// Gemini備援の有効/無効
        #[arg(long)]
        fallback: Option<bool>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Rejected,
    Failed,
    Processing,
}

impl From<StatusArg> for ItemStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => ItemStatus::Pending,
            StatusArg::Approved => ItemStatus::Approved,
            StatusArg::Rejected => ItemStatus::Rejected,
            StatusArg::Failed => ItemStatus::Failed,
            StatusArg::Processing => ItemStatus::Processing,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CategoryArg {
    Reasoning,
    Coding,
    Vision,
    General,
    Embedding,
}

impl From<CategoryArg> for BenchmarkCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Reasoning => BenchmarkCategory::Reasoning,
            CategoryArg::Coding => BenchmarkCategory::Coding,
            CategoryArg::Vision => BenchmarkCategory::Vision,
            CategoryArg::General => BenchmarkCategory::General,
            CategoryArg::Embedding => BenchmarkCategory::Embedding,
        }
    }
}
