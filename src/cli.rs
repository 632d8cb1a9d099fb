use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fod-inspect")]
#[command(about = "異物（FOD）検査AIの解析結果を構造化・記録するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// セッション名（省略時は環境変数 FOD_INSPECT_SESSION または設定値）
    #[arg(long, global = true)]
    pub session: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を検査してバッチとして保存
    Inspect {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// プロジェクトID
        #[arg(long)]
        project_id: Option<String>,

        /// プロジェクト名
        #[arg(long)]
        project_name: Option<String>,

        /// 設計仕様（複数指定可、省略時は設定値）
        #[arg(long = "spec")]
        specs: Vec<String>,
    },

    /// 解析テキストから欠陥と判定を抽出（ファイル省略時は標準入力）
    Parse {
        file: Option<PathBuf>,
    },

    /// 保存済みの検査記録を新しい順に表示
    List {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 検査記録の詳細を表示
    Show {
        #[arg(required = true)]
        id: String,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 検査記録を削除
    Remove {
        #[arg(required = true)]
        id: String,
    },

    /// セッション管理
    Session {
        /// セッションを終了（記録を全削除）
        #[arg(long)]
        clear: bool,

        /// セッション情報を表示
        #[arg(long)]
        info: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 検出サービスのURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
