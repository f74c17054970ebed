//! 内嵌状态提取
//!
//! 页面把完整数据模型以JSON形式注入到HTML中, 包装方式随平台改版变化过多次。
//! 每种包装方式是一个 `StateFormat` 变体, 按顺序尝试 (最新格式在前)。
//! 新格式通过追加变体接入, 不修改已有格式。

use regex::Regex;
use serde_json::Value;

use crate::models::{PageState, ScrapeError};

/// `MalformedState` 中保留的原始片段最大长度
const SPAN_PREVIEW_LIMIT: usize = 2048;

/// 状态包装格式
#[derive(Debug, Clone)]
pub enum StateFormat {
    /// 专用script标签直接承载JSON文本
    ///
    /// `<script id="SIGI_STATE" type="application/json">{...}</script>`
    ScriptTag { id: String, pattern: Regex },

    /// 全局变量赋值, JSON位于两个赋值标记之间
    ///
    /// `window['SIGI_STATE']={...};window['SIGI_RETRY']=...`
    GlobalAssignment { start: String, end: String },

    /// 响应本身就是状态JSON文档
    JsonDocument,
}

impl StateFormat {
    /// 按script标签id匹配
    pub fn script_tag(id: &str) -> Self {
        let pattern = format!(
            r#"(?s)<script\b[^>]*\sid\s*=\s*["']{}["'][^>]*>(.*?)</script>"#,
            regex::escape(id)
        );
        let pattern = Regex::new(&pattern).expect("转义后的标签模式总是合法");
        StateFormat::ScriptTag {
            id: id.to_string(),
            pattern,
        }
    }

    pub fn global_assignment(start: &str, end: &str) -> Self {
        StateFormat::GlobalAssignment {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            StateFormat::ScriptTag { id, .. } => format!("script#{}", id),
            StateFormat::GlobalAssignment { start, .. } => format!("assignment {}", start),
            StateFormat::JsonDocument => "json-document".to_string(),
        }
    }

    /// 定位JSON片段, 未匹配返回 None
    pub fn locate<'a>(&self, content: &'a str) -> Option<&'a str> {
        match self {
            StateFormat::ScriptTag { pattern, .. } => pattern
                .captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim()),
            StateFormat::GlobalAssignment { start, end } => {
                let begin = content.find(start.as_str())? + start.len();
                let rest = &content[begin..];
                let stop = rest.find(end.as_str())?;
                Some(rest[..stop].trim())
            }
            StateFormat::JsonDocument => {
                let trimmed = content.trim();
                trimmed.starts_with('{').then_some(trimmed)
            }
        }
    }
}

/// 状态提取器
#[derive(Debug, Clone)]
pub struct StateExtractor {
    formats: Vec<StateFormat>,
}

impl Default for StateExtractor {
    /// 已知格式, 最新的在前
    fn default() -> Self {
        Self {
            formats: vec![
                StateFormat::script_tag("SIGI_STATE"),
                StateFormat::global_assignment("window['SIGI_STATE']=", ";window['SIGI_RETRY']="),
                StateFormat::JsonDocument,
            ],
        }
    }
}

impl StateExtractor {
    /// 不含任何格式的提取器
    pub fn empty() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// 追加一种格式 (构建器模式)
    pub fn with_format(mut self, format: StateFormat) -> Self {
        self.formats.push(format);
        self
    }

    pub fn formats(&self) -> &[StateFormat] {
        &self.formats
    }

    /// 从原始页面内容提取状态
    ///
    /// 第一个能定位到片段的格式决定结果, 全有或全无。
    ///
    /// # 错误
    /// - `ScrapeError::StateNotFound`: 没有任何格式匹配
    /// - `ScrapeError::MalformedState`: 定位到的片段不是合法JSON对象
    pub fn extract(&self, content: &str) -> Result<PageState, ScrapeError> {
        for format in &self.formats {
            let Some(span) = format.locate(content) else {
                continue;
            };

            tracing::debug!(
                format = %format.name(),
                span_bytes = span.len() as u64,
                "定位到内嵌状态"
            );

            return match serde_json::from_str::<Value>(span) {
                Ok(value @ Value::Object(_)) => Ok(PageState::new(value)),
                Ok(_) => Err(ScrapeError::MalformedState {
                    span: preview(span),
                    reason: "内嵌状态不是JSON对象".to_string(),
                }),
                Err(e) => Err(ScrapeError::MalformedState {
                    span: preview(span),
                    reason: e.to_string(),
                }),
            };
        }

        Err(ScrapeError::StateNotFound)
    }
}

fn preview(span: &str) -> String {
    if span.len() <= SPAN_PREVIEW_LIMIT {
        return span.to_string();
    }
    let mut cut = SPAN_PREVIEW_LIMIT;
    while !span.is_char_boundary(cut) {
        cut -= 1;
    }
    span[..cut].to_string()
}
