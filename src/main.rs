use std::process::ExitCode;

use review_hub_lib::config::Config;
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

    match review_hub_lib::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("服务异常退出: {}", e);
            ExitCode::FAILURE
        }
    }
}
