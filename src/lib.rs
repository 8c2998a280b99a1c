pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod utils;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use config::Config;
use database::connection::{close_connection, establish_connection};
use error::AppError;
use state::AppState;

pub use routes::create_app;

/// 建立连接并执行全部待执行的迁移
pub async fn connect_and_migrate(config: &Config) -> Result<DatabaseConnection, AppError> {
    let conn = establish_connection(config).await?;
    log::info!("数据库连接建立成功");

    log::info!("开始执行数据库迁移...");
    migration::Migrator::up(&conn, None).await?;
    log::info!("数据库迁移完成");

    Ok(conn)
}

/// 启动 HTTP 服务，直到收到退出信号
pub async fn run(config: Config) -> Result<(), AppError> {
    let conn = connect_and_migrate(&config).await?;

    let address = config.bind_address();
    let state = AppState::new(conn.clone(), config);
    let app = create_app(state);

    let listener = TcpListener::bind(&address).await?;
    log::info!("服务已启动: http://{}", address);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // 无论服务是否正常结束都关闭连接
    match close_connection(conn).await {
        Ok(_) => log::info!("数据库连接已成功关闭"),
        Err(e) => log::error!("关闭数据库连接时出错: {}", e),
    }

    served?;
    log::info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => log::info!("收到 Ctrl+C，准备退出"),
            Err(e) => {
                log::error!("无法监听 Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("收到 SIGTERM，准备退出");
            }
            Err(e) => {
                log::error!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
