use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sign-verify")]
#[command(about = "手書き署名の真贋判定クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 予測サービスのエンドポイント（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 署名画像を1枚検証
    Verify {
        /// 署名画像のパス
        #[arg(required = true)]
        image: PathBuf,

        /// スクリプト言語 (hindi/bengali)
        #[arg(short, long)]
        language: String,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話モード（ドラッグ&ドロップ・再検証）
    Interactive,

    /// 対応言語の一覧
    Languages,

    /// 設定の表示・変更
    Config {
        /// エンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
