//! 用户模型

use serde::{Deserialize, Serialize};

/// 用户主页资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// 用户ID
    pub id: String,

    /// 唯一用户名 (主页URL中 `@` 之后的部分)
    pub unique_id: String,

    pub nickname: String,

    /// 头像 (大图)
    pub avatar: String,

    /// 个人简介 (已去除首尾空白)
    pub signature: String,

    /// 注册日期 (本地时区日历日期)
    pub created_at: String,

    pub verified: bool,

    /// 加密UID, 调用二级API时使用
    pub secret_uid: String,

    /// 简介中的链接
    pub bio_link: Option<String>,

    pub private_account: bool,

    pub under_age_18: bool,

    pub followers: u64,
    pub following: u64,

    /// 累计获赞
    pub hearts: u64,

    /// 作品数
    pub videos: u64,
}
