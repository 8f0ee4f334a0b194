//! 信頼度の段階的表示（アニメーション）
//!
//! 新しい成功結果が現れるたびに表示値を0へ戻し、短い遅延の後に
//! 目標値へ補間する。遅延中の更新は結果のIDと世代で管理し、
//! 結果が置き換わった・消えた場合は古い更新を適用しない。
//!
//! タイマー自体はホスト（tokio / ブラウザ）が持つ。ホストは
//! `observe` が返した `RevealTicket` を `REVEAL_DELAY` 後に `fire` する。

use crate::workflow::RequestId;
use std::time::Duration;

/// 結果表示から目標値を適用するまでの遅延
pub const REVEAL_DELAY: Duration = Duration::from_millis(60);

/// 0から目標値までの補間時間
pub const REVEAL_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Inactive,
    Scheduled,
    Animating,
    Settled,
}

/// 予約済みの表示更新
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTicket {
    generation: u64,
    target: f64,
}

impl RevealTicket {
    pub fn target(&self) -> f64 {
        self.target
    }
}

#[derive(Debug, Clone)]
pub struct ConfidenceAnimator {
    key: Option<RequestId>,
    generation: u64,
    phase: RevealPhase,
    displayed: f64,
}

impl Default for ConfidenceAnimator {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            phase: RevealPhase::Inactive,
            displayed: 0.0,
        }
    }
}

impl ConfidenceAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// 現在の目標表示値（補間前）
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    /// 現在の結果を通知する
    ///
    /// 結果が変わった場合は表示値を0に戻し、予約すべき更新を返す。
    /// 同じ結果なら何もしない。
    pub fn observe(&mut self, current: Option<(RequestId, f64)>) -> Option<RevealTicket> {
        let key = current.map(|(id, _)| id);
        if key == self.key {
            return None;
        }

        // 以前の予約を無効化
        self.generation += 1;
        self.key = key;
        self.displayed = 0.0;

        match current {
            Some((_, confidence)) => {
                self.phase = RevealPhase::Scheduled;
                Some(RevealTicket {
                    generation: self.generation,
                    target: confidence.clamp(0.0, 100.0),
                })
            }
            None => {
                self.phase = RevealPhase::Inactive;
                None
            }
        }
    }

    /// 遅延経過後に目標値を適用（古い予約なら false）
    pub fn fire(&mut self, ticket: RevealTicket) -> bool {
        if ticket.generation != self.generation || self.phase != RevealPhase::Scheduled {
            return false;
        }
        self.displayed = ticket.target;
        self.phase = RevealPhase::Animating;
        true
    }

    /// 補間完了
    pub fn settle(&mut self, ticket: RevealTicket) -> bool {
        if ticket.generation != self.generation || self.phase != RevealPhase::Animating {
            return false;
        }
        self.phase = RevealPhase::Settled;
        true
    }

    /// 破棄・中断時に保留中または補間中の更新を取り消す
    pub fn cancel(&mut self) {
        self.generation += 1;
        if matches!(self.phase, RevealPhase::Scheduled | RevealPhase::Animating) {
            self.phase = RevealPhase::Inactive;
        }
    }

    /// 目標適用からの経過時間に対する表示値（ease-out cubic）
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        match self.phase {
            RevealPhase::Inactive | RevealPhase::Scheduled => 0.0,
            RevealPhase::Settled => self.displayed,
            RevealPhase::Animating => {
                let t = (elapsed.as_secs_f64() / REVEAL_DURATION.as_secs_f64()).clamp(0.0, 1.0);
                let eased = 1.0 - (1.0 - t).powi(3);
                self.displayed * eased
            }
        }
    }
}
