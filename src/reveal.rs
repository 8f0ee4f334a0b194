//! 信頼度バーの表示（indicatif）

use indicatif::{ProgressBar, ProgressStyle};
use sign_verify_common::{ConfidenceAnimator, Presentation, RevealTicket, REVEAL_DELAY, REVEAL_DURATION};
use std::time::Duration;
use tokio::time::Instant;

const FRAME: Duration = Duration::from_millis(16);
/// バーの分解能（0.1%刻み）
const SCALE: f64 = 10.0;

fn bar_style(genuine: bool) -> ProgressStyle {
    let template = if genuine {
        "  Confidence Score [{bar:40.green/238}] {msg}"
    } else {
        "  Confidence Score [{bar:40.red/238}] {msg}"
    };
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
}

/// 予約された表示更新を実行し、0から目標値までバーを伸ばす
///
/// Ctrl-C で中断した場合は保留中の更新を取り消して false を返す。
pub async fn play(
    animator: &mut ConfidenceAnimator,
    ticket: RevealTicket,
    presentation: &Presentation,
) -> bool {
    let bar = ProgressBar::new((100.0 * SCALE) as u64);
    bar.set_style(bar_style(presentation.is_genuine));
    bar.set_message(format!("{:.1}%", 0.0));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tokio::select! {
        _ = tokio::time::sleep(REVEAL_DELAY) => {}
        _ = &mut ctrl_c => {
            animator.cancel();
            bar.abandon();
            return false;
        }
    }

    if !animator.fire(ticket) {
        bar.finish_and_clear();
        return false;
    }

    let start = Instant::now();
    let mut frames = tokio::time::interval(FRAME);
    loop {
        tokio::select! {
            _ = frames.tick() => {
                let elapsed = start.elapsed();
                let value = animator.value_at(elapsed);
                bar.set_position((value * SCALE).round() as u64);
                bar.set_message(format!("{:.1}%", value));
                if elapsed >= REVEAL_DURATION {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                animator.cancel();
                bar.abandon();
                return false;
            }
        }
    }

    animator.settle(ticket);
    bar.finish_with_message(presentation.confidence_text());
    true
}
