//! 单次抓取调用的阶段状态机

use serde::{Deserialize, Serialize};

/// 抓取阶段
///
/// 状态转换规则:
/// Idle → Fetching → Extracting → Mapping → Done
///              ↖ Extracting (轻量抓取无状态时回退渲染, 仅一次)
/// 任一阶段 ↘ Failed (终态)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "reason", rename_all = "snake_case")]
pub enum ScrapeStage {
    Idle,
    Fetching,
    Extracting,
    Mapping,
    Done,
    Failed(String),
}

impl ScrapeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeStage::Idle => "idle",
            ScrapeStage::Fetching => "fetching",
            ScrapeStage::Extracting => "extracting",
            ScrapeStage::Mapping => "mapping",
            ScrapeStage::Done => "done",
            ScrapeStage::Failed(_) => "failed",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ScrapeStage::Done | ScrapeStage::Failed(_))
    }

    pub fn can_transition_to(&self, next: &ScrapeStage) -> bool {
        use ScrapeStage::*;
        match (self, next) {
            (_, Failed(_)) => !self.is_final(),
            (Idle, Fetching) => true,
            (Fetching, Extracting) => true,
            // 渲染模式回退
            (Extracting, Fetching) => true,
            (Extracting, Mapping) => true,
            (Mapping, Done) => true,
            _ => false,
        }
    }
}

/// 一次调用的阶段追踪
///
/// 记录是否已经回退过渲染模式, 保证回退最多一次
#[derive(Debug, Clone)]
pub struct ScrapeRun {
    operation: &'static str,
    stage: ScrapeStage,
    fell_back: bool,
}

impl ScrapeRun {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            stage: ScrapeStage::Idle,
            fell_back: false,
        }
    }

    pub fn stage(&self) -> &ScrapeStage {
        &self.stage
    }

    pub fn has_fallen_back(&self) -> bool {
        self.fell_back
    }

    /// 状态转换 (带验证)
    pub fn transition_to(&mut self, next: ScrapeStage) -> Result<(), String> {
        if !self.stage.can_transition_to(&next) {
            return Err(format!(
                "无效的阶段转换: {} -> {}",
                self.stage.as_str(),
                next.as_str()
            ));
        }
        if self.stage == ScrapeStage::Extracting && next == ScrapeStage::Fetching {
            if self.fell_back {
                return Err("渲染回退只允许一次".to_string());
            }
            self.fell_back = true;
        }

        tracing::debug!(
            operation = self.operation,
            from = self.stage.as_str(),
            to = next.as_str(),
            "抓取阶段转换"
        );
        self.stage = next;
        Ok(())
    }

    /// 标记失败
    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::debug!(
            operation = self.operation,
            from = self.stage.as_str(),
            reason = %reason,
            "抓取失败"
        );
        self.stage = ScrapeStage::Failed(reason);
    }
}
