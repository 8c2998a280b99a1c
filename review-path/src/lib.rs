use std::path::{Path, PathBuf};

/// 数据库相关路径常量
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "reviews.db";
const APP_DIR_NAME: &str = "review-hub";

/// 判断是否处于便携模式
///
/// 检测逻辑：检查可执行文件同级目录下是否存在 data/reviews.db
pub fn is_portable_mode() -> bool {
    exe_dir().is_some_and(|dir| portable_db_path(&dir).exists())
}

/// 获取基础数据目录
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    if is_portable_mode() {
        // 便携模式：使用可执行文件所在目录
        exe_dir().ok_or_else(|| "无法获取可执行文件父目录".to_string())
    } else {
        // 标准模式：使用系统应用数据目录
        get_system_data_dir()
    }
}

/// 获取系统数据目录（跨平台）
fn get_system_data_dir() -> Result<PathBuf, String> {
    use directories::BaseDirs;

    let base_dirs = BaseDirs::new().ok_or_else(|| "无法获取系统目录信息".to_string())?;
    Ok(base_dirs.data_dir().join(APP_DIR_NAME))
}

/// 获取数据库文件路径
pub fn get_db_path() -> Result<PathBuf, String> {
    Ok(get_base_data_dir()?.join(DB_DATA_DIR).join(DB_FILE_NAME))
}

fn exe_dir() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    exe_path.parent().map(Path::to_path_buf)
}

fn portable_db_path(base: &Path) -> PathBuf {
    base.join(DB_DATA_DIR).join(DB_FILE_NAME)
}
