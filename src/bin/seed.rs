//! 清空数据库并写入测试数据
//!
//! 用法: `cargo run --bin seed`，连接配置与服务端相同。

use std::process::ExitCode;

use review_hub_lib::config::Config;
use review_hub_lib::connect_and_migrate;
use review_hub_lib::database::connection::close_connection;
use review_hub_lib::database::seed::{self, SeedOptions, TEST_USER_NAME, TEST_USER_PASSWORD};
use review_hub_lib::utils::logs::init_logger_from_env;

#[tokio::main]
async fn main() -> ExitCode {
    init_logger_from_env();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("配置加载失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let conn = match connect_and_migrate(&config).await {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("数据库初始化失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = SeedOptions {
        bcrypt_cost: config.bcrypt_cost,
        ..Default::default()
    };
    let result = seed::run(&conn, &options).await;

    if let Err(e) = close_connection(conn).await {
        log::error!("关闭数据库连接时出错: {}", e);
    }

    match result {
        Ok(report) => {
            log::info!(
                "完成: {} 个用户, {} 个游戏, {} 条评论（跳过重复 {} 条）",
                report.users,
                report.games,
                report.reviews,
                report.skipped_reviews
            );
            log::info!("测试账号: {} / {}", TEST_USER_NAME, TEST_USER_PASSWORD);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("种子数据写入失败: {}", e);
            ExitCode::FAILURE
        }
    }
}
