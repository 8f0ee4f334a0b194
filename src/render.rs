//! 端末への結果表示

use sign_verify_common::{ConfidenceBand, Presentation, SelectedFile, Workflow};

pub fn print_file(file: &SelectedFile, has_preview: bool) {
    println!(
        "🖊  {} ({}, {}){}",
        file.name(),
        file.mime_type(),
        file.size_label(),
        if has_preview { "" } else { " - プレビュー未生成" }
    );
}

/// 結果カード（信頼度バーは reveal 側で描画）
pub fn print_presentation(presentation: &Presentation) {
    println!();
    if let Some(caption) = &presentation.caption {
        println!("  {}", caption);
    }
    println!("  {} {}", presentation.icon(), presentation.verdict_text);

    if presentation.is_error {
        if let Some(message) = &presentation.error_message {
            println!("  ⚠ {}", message);
        }
    } else {
        println!(
            "  Score: {}  ({})",
            presentation.score_text(),
            presentation.band.label()
        );
    }

    println!("  [{}]  [Just now]", presentation.chip_text());
}

/// バンド目盛り（Low / Medium / High / Very High）
pub fn print_band_scale() {
    let labels: Vec<&str> = ConfidenceBand::ALL.iter().map(|b| b.label()).collect();
    println!("  {}", labels.join("  ·  "));
}

/// 現在の状態を1行で表示
pub fn print_status(workflow: &Workflow) {
    let file = workflow
        .selected_file()
        .map(|f| f.name().to_string())
        .unwrap_or_else(|| "(未選択)".into());
    let language = workflow
        .language()
        .map(|l| format!("{} {}", l.label, l.script))
        .unwrap_or_else(|| "(未選択)".into());
    println!("ファイル: {}  言語: {}", file, language);
}
