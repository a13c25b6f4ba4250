//! 用户与认证相关模型

use serde::{Deserialize, Serialize};

/// 会话缓存的固定存储键（与收藏分开，独立的简单 JSON 块）
pub const MOCK_USER_KEY: &str = "@famous_connect_mock_user";

/// 登录用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "profilePic", default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// 内置演示账号
pub(crate) struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub id: &'static str,
}

/// 无需远端服务即可登录的演示账号
pub(crate) const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        email: "demo@famousconnect.com",
        password: "demo123",
        name: "Demo User",
        id: "demo-1",
    },
    DemoAccount {
        email: "test@example.com",
        password: "test123",
        name: "Test User",
        id: "demo-2",
    },
    DemoAccount {
        email: "john@example.com",
        password: "john123",
        name: "John Doe",
        id: "demo-3",
    },
];
