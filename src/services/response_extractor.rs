//! 响应解析服务 - 业务能力层
//!
//! 把 OCR 服务的原始响应归一化为纯文本，并给出本次尝试的分类。
//!
//! 服务成功时通常返回 `{"text": "..."}`，偶尔返回一段 HTML。
//! 解析顺序：
//! 1. 非 2xx → `HttpError`
//! 2. 能解析为 JSON 对象 → 取 `text` 字段
//! 3. 不是 JSON 对象 → 当作 HTML，依次查找 `#result`、`textarea`、整个文档，提取可见文本
//! 4. 归一化：去掉 `\r`，把字面量 `<br />` 换成换行，去掉首尾空白
//! 5. 为空或以 "recognition failed" 开头（不区分大小写）→ `EmptyText`

use crate::clients::RawResponse;
use crate::models::Classification;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value as JsonValue;

/// 服务在识别失败时放在正文里的提示语前缀
const FAILURE_SENTINEL: &str = "recognition failed";

/// 提取可见文本时忽略的元素
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// 结构化解析的结果
#[derive(Debug, PartialEq, Eq)]
enum Structured {
    /// 是 JSON 对象，带 `text` 字段（可能为空）
    Text(String),
    /// 是 JSON 对象，但没有字符串类型的 `text`
    Missing,
    /// 不是 JSON 对象
    NotJson,
}

/// 响应解析服务
///
/// 无状态，只处理单个响应
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseExtractor;

impl ResponseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 解析一次响应，返回 `(文本, 分类)`；非成功分类时文本为空串
    pub fn extract(&self, response: &RawResponse) -> (String, Classification) {
        if !(200..300).contains(&response.status) {
            return (String::new(), Classification::HttpError);
        }

        let raw = match parse_structured(&response.body) {
            Structured::Text(text) if !text.trim().is_empty() => text,
            Structured::Text(_) | Structured::Missing => String::new(),
            Structured::NotJson => extract_markup_text(&response.body),
        };

        classify(&normalize(&raw))
    }
}

/// 归一化文本：去 `\r`、`<br />` 转换行、去首尾空白。对已归一化的文本是幂等的
pub fn normalize(text: &str) -> String {
    text.replace('\r', "").replace("<br />", "\n").trim().to_string()
}

/// 判断已归一化的文本是否可用
pub fn classify(normalized: &str) -> (String, Classification) {
    if normalized.is_empty() || is_failure_sentinel(normalized) {
        (String::new(), Classification::EmptyText)
    } else {
        (normalized.to_string(), Classification::Success)
    }
}

fn is_failure_sentinel(text: &str) -> bool {
    text.to_lowercase().starts_with(FAILURE_SENTINEL)
}

fn parse_structured(body: &str) -> Structured {
    match serde_json::from_str::<JsonValue>(body) {
        // 只有 JSON 对象才算结构化响应，裸数字、字符串、数组按普通文本处理
        Ok(JsonValue::Object(map)) => match map.get("text").and_then(|v| v.as_str()) {
            Some(text) => Structured::Text(text.to_string()),
            None => Structured::Missing,
        },
        Ok(_) | Err(_) => Structured::NotJson,
    }
}

/// 从 HTML 中提取识别结果的可见文本，各文本节点去空白后以换行连接
pub fn extract_markup_text(body: &str) -> String {
    let document = Html::parse_document(body);

    let container = ["#result", "textarea"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    visible_text(container)
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|e| INVISIBLE_TAGS.contains(&e.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }
        let content = text.trim();
        if !content.is_empty() {
            lines.push(content);
        }
    }

    lines.join("\n")
}
