//! 会话 Cookie
//!
//! Cookie 只保存用户 ID，由服务端密钥签名，客户端无法伪造。

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};

pub const SESSION_COOKIE: &str = "session";

/// 由配置的密钥派生签名 Key，未配置时随机生成
pub fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => Key::generate(),
    }
}

/// 读取会话中的用户 ID（签名无效或格式错误都视为未登录）
pub fn session_user(jar: &SignedCookieJar) -> Option<i32> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// 写入会话
pub fn start_session(jar: SignedCookieJar, user_id: i32, secure: bool) -> SignedCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    jar.add(cookie)
}

/// 清除会话
pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
}
