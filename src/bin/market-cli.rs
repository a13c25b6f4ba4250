//! Famous Connect CLI 客户端（演示版）
//!
//! 非交互式 CLI，用于测试和展示数据访问层功能：
//! 登录、分类、分页列表、收藏、防抖搜索与模拟聊天

use anyhow::Result;
use clap::Parser;
use famous_connect_sdk_rust::market::catalog::{CatalogSource, FeedListener};
use famous_connect_sdk_rust::market::chat::ChatListener;
use famous_connect_sdk_rust::market::client::{ClientConfig, MarketClient};
use famous_connect_sdk_rust::market::favorites::FavoritesListener;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

/// Famous Connect CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "market-cli")]
#[command(about = "Famous Connect CLI 客户端 - 用于测试和展示市场功能", long_about = None)]
struct Args {
    /// 演示账号邮箱
    #[arg(short, long, default_value = "demo@famousconnect.com")]
    email: String,

    /// 演示账号密码
    #[arg(short, long, default_value = "demo123")]
    password: String,

    /// 搜索词（为空则跳过搜索演示）
    #[arg(short, long, default_value = "")]
    query: String,

    /// 初始分类
    #[arg(short, long, default_value = "All")]
    category: String,

    /// 本地数据库地址
    #[arg(long, default_value = "sqlite://famous_connect.db?mode=rwc")]
    db: String,

    /// 日志级别（默认: info,famous_connect_sdk_rust=debug）
    #[arg(long, default_value = "info,famous_connect_sdk_rust=debug")]
    log_level: String,
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 环境变量 RUST_LOG 优先于命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // 日志文件按追加模式打开
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("无法创建日志文件 debug.log");

    // 控制台输出保留 ANSI 颜色
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 文件输出关闭 ANSI 颜色
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
}

/// 设置监听器（输出所有变更回调）
fn setup_listeners(client: &mut MarketClient) {
    // 列表监听器
    struct CliFeedListener;
    #[async_trait::async_trait]
    impl FeedListener for CliFeedListener {
        async fn on_feed_changed(&self, services_json: String) {
            info!("[CLI/Feed] 🔄 列表变更，{} 字节", services_json.len());
        }
    }
    client.set_feed_listener(Arc::new(CliFeedListener));

    // 收藏监听器
    struct CliFavoritesListener;
    #[async_trait::async_trait]
    impl FavoritesListener for CliFavoritesListener {
        async fn on_favorites_changed(&self, favorites_json: String) {
            info!("[CLI/Favorites] ⭐ 收藏变更: {}", favorites_json);
        }
    }
    client.set_favorites_listener(Arc::new(CliFavoritesListener));
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    init_logger(&args.log_level);

    info!("[CLI] 🚀 Famous Connect CLI 客户端（演示模式）");
    info!("[CLI] 📧 账号: {}", args.email);

    // 创建客户端（演示账号认证）
    let mut client = MarketClient::new(ClientConfig::demo(args.db.clone())).await?;
    setup_listeners(&mut client);

    // 登录
    info!("[CLI] 🔐 正在登录...");
    let user = client.session().login(&args.email, &args.password).await?;
    info!("[CLI] ✅ 登录成功！用户: {} ({})", user.name, user.id);

    // 分类列表
    let categories = client.catalog().get_categories().await?;
    info!("[CLI] 🗂️ 分类（共 {} 个）:", categories.len());
    for category in categories.iter().take(8) {
        info!("[CLI]   - {}", category);
    }

    // 服务列表：按分类取第一页，再加载一页
    if args.category == "All" {
        client.feed().refresh().await;
    } else {
        client.feed().set_category(&args.category).await;
    }
    let state = client.feed().snapshot().await;
    info!(
        "[CLI] 📋 服务列表（分类: {}，{}/{} 条）:",
        state.selected_category,
        state.services.len(),
        state.total
    );
    for service in state.services.iter().take(5) {
        info!(
            "[CLI]   - #{} {} | ¥{} | ⭐{}",
            service.id,
            service.title,
            service.discounted_price(),
            service.rating
        );
    }

    client.feed().load_more().await;
    let state = client.feed().snapshot().await;
    info!(
        "[CLI] 📋 加载更多后累积 {} / {} 条",
        state.services.len(),
        state.total
    );

    // 收藏演示：收藏第一条再取消
    if let Some(first) = state.services.first() {
        client.favorites().add_favorite(first).await;
        info!(
            "[CLI] ⭐ 已收藏: {} | 当前收藏 {} 条",
            first.title,
            client.favorites().get_favorites().await.len()
        );
        client.favorites().remove_favorite(first.id).await;
        info!(
            "[CLI] ⭐ 已取消收藏 | 当前收藏 {} 条",
            client.favorites().get_favorites().await.len()
        );
    }

    // 搜索演示（防抖：键入后等待静默期）
    if !args.query.trim().is_empty() {
        info!("[CLI] 🔍 搜索: {}", args.query);
        let search = client.new_search();
        search.set_query(&args.query).await;
        sleep(Duration::from_millis(1200)).await;
        let results = search.results().await;
        info!("[CLI] 🔍 搜索结果 {} 条:", results.len());
        for service in results.iter().take(5) {
            info!("[CLI]   - #{} {}", service.id, service.title);
        }
    }

    // 模拟聊天演示
    if let Some(first) = state.services.first() {
        struct CliChatListener;
        #[async_trait::async_trait]
        impl ChatListener for CliChatListener {
            async fn on_new_message(&self, message_json: String) {
                info!("[CLI/Chat] 📨 新消息: {}", message_json);
            }
        }

        let chat = client
            .open_chat_with_listener(first.id, &first.brand, Arc::new(CliChatListener))
            .await;
        info!("[CLI] 💬 打开与 {} 的会话", chat.provider_name());
        chat.send_text("Hi, is this service available tomorrow?").await;
        // 等待模拟服务方回复
        sleep(Duration::from_millis(2000)).await;
        for message in chat.messages().await.iter().rev() {
            info!("[CLI]   [{}] {}", message.sender_id, message.text);
        }
    }

    client.teardown().await;
    info!("[CLI] 👋 程序退出");
    Ok(())
}
