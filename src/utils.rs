pub mod logs;
pub mod password;
