//! 页面内嵌状态
//!
//! 平台在页面中注入的JSON状态对象是无类型的深层嵌套结构。
//! 这里提供一层带路径的类型化访问器: 每次取值要么返回目标类型,
//! 要么返回以完整字段路径命名的 `FieldMissing`。
//! 平台改版导致的字段漂移只需要在这个模块和映射层修改。

use serde_json::Value;

use crate::models::errors::ScrapeError;

/// 页面中的条目列表索引 (`ItemList.<kind>.list`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemListKind {
    /// 单视频页面, 首个条目即页面主体
    Video,
    /// 用户主页的作品列表
    UserPost,
    /// 话题页的视频列表
    Challenge,
}

impl ItemListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemListKind::Video => "video",
            ItemListKind::UserPost => "user-post",
            ItemListKind::Challenge => "challenge",
        }
    }
}

/// 一次抽取调用内有效的页面状态
///
/// 只在单次调用内存在,不持久化
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    root: Value,
}

impl PageState {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// 根节点访问器
    pub fn root(&self) -> Node<'_> {
        Node {
            value: &self.root,
            path: String::new(),
        }
    }

    /// 读取条目列表中的全部ID (保持页面顺序)
    pub fn item_ids(&self, kind: ItemListKind) -> Result<Vec<String>, ScrapeError> {
        let list = self
            .root()
            .key("ItemList")?
            .key(kind.as_str())?
            .key("list")?;

        let array = list
            .value
            .as_array()
            .ok_or_else(|| ScrapeError::FieldMissing(list.path.clone()))?;

        array
            .iter()
            .enumerate()
            .map(|(i, v)| {
                coerce_string(v).ok_or_else(|| {
                    ScrapeError::FieldMissing(format!("{}.{}", list.path, i))
                })
            })
            .collect()
    }

    /// 页面主体条目: 条目列表中的第一个ID
    pub fn primary_item_id(&self, kind: ItemListKind) -> Result<String, ScrapeError> {
        self.item_ids(kind)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ScrapeError::FieldMissing(format!("ItemList.{}.list.0", kind.as_str()))
            })
    }

    /// `ItemModule[item_id]`
    pub fn item(&self, item_id: &str) -> Result<Node<'_>, ScrapeError> {
        self.root().key("ItemModule")?.key(item_id)
    }

    /// `UserModule.users[username]`
    pub fn user(&self, username: &str) -> Result<Node<'_>, ScrapeError> {
        self.root().key("UserModule")?.key("users")?.key(username)
    }

    /// `UserModule.stats[username]`
    pub fn user_stats(&self, username: &str) -> Result<Node<'_>, ScrapeError> {
        self.root().key("UserModule")?.key("stats")?.key(username)
    }
}

impl From<Value> for PageState {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// 状态树中的一个节点,携带从根开始的路径
#[derive(Debug, Clone)]
pub struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// 单个键 (不按 `.` 拆分, 条目ID/用户名直接作为键)
    pub fn key(&self, key: &str) -> Result<Node<'a>, ScrapeError> {
        let path = self.join(key);
        match self.value.get(key) {
            Some(v) if !v.is_null() => Ok(Node { value: v, path }),
            _ => Err(ScrapeError::FieldMissing(path)),
        }
    }

    /// 相对路径查找, 以 `.` 分隔, 数字段可索引数组
    ///
    /// 例: `video.play_addr.url_list.0`
    pub fn lookup(&self, rel_path: &str) -> Result<Node<'a>, ScrapeError> {
        let mut current = self.value;
        for segment in rel_path.split('.') {
            let next = match current {
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => current.get(segment),
            };
            match next {
                Some(v) if !v.is_null() => current = v,
                _ => return Err(ScrapeError::FieldMissing(self.join(rel_path))),
            }
        }
        Ok(Node {
            value: current,
            path: self.join(rel_path),
        })
    }

    /// 必需字符串, 数字ID会转为字符串
    pub fn str(&self, rel_path: &str) -> Result<String, ScrapeError> {
        let node = self.lookup(rel_path)?;
        coerce_string(node.value).ok_or(ScrapeError::FieldMissing(node.path))
    }

    /// 必需字符串, 去除首尾空白
    pub fn trimmed(&self, rel_path: &str) -> Result<String, ScrapeError> {
        self.str(rel_path).map(|s| s.trim().to_string())
    }

    /// 可选字符串: 缺失或去除空白后为空时返回 None
    pub fn opt_str(&self, rel_path: &str) -> Option<String> {
        self.lookup(rel_path)
            .ok()
            .and_then(|node| coerce_string(node.value))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// 必需非负整数, 接受数字或数字字符串
    pub fn u64(&self, rel_path: &str) -> Result<u64, ScrapeError> {
        let node = self.lookup(rel_path)?;
        coerce_u64(node.value).ok_or(ScrapeError::FieldMissing(node.path))
    }

    /// 必需布尔值
    pub fn bool(&self, rel_path: &str) -> Result<bool, ScrapeError> {
        let node = self.lookup(rel_path)?;
        coerce_bool(node.value).ok_or(ScrapeError::FieldMissing(node.path))
    }

    pub fn opt_bool(&self, rel_path: &str) -> Option<bool> {
        self.lookup(rel_path)
            .ok()
            .and_then(|node| coerce_bool(node.value))
    }

    fn join(&self, rel_path: &str) -> String {
        if self.path.is_empty() {
            rel_path.to_string()
        } else {
            format!("{}.{}", self.path, rel_path)
        }
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u64)
            })
        }
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_u64().map(|v| v != 0),
        _ => None,
    }
}
