//! JWT Token 处理
//!
//! 校验身份提供方签发的访问令牌（HS256，audience 为 authenticated），
//! 并提供签发功能供本地调试和测试使用

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kala_core::Role;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 签名密钥
    pub secret: String,
    /// 期望的 audience
    pub audience: String,
}

/// 令牌中的用户元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub role: Option<String>,
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// 已认证用户
///
/// 由认证中间件注入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            role: Role::from_claim(claims.user_metadata.role.as_deref()),
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 签发 Token
    pub fn generate_token(
        &self,
        user_id: &str,
        email: Option<&str>,
        role: Role,
        expires_in: Duration,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(String::from),
            user_metadata: UserMetadata {
                role: Some(role.as_str().to_string()),
            },
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Unauthorized(format!("JWT 生成失败: {}", e)))
    }

    /// 验证并解析 Token
    pub fn verify_token(&self, token: &str) -> Result<AuthUser, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("Token 已过期".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                    ApiError::Unauthorized("Token audience 不匹配".to_string())
                }
                _ => ApiError::Unauthorized("无效的 Token".to_string()),
            },
        )?;

        Ok(token_data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            audience: "authenticated".to_string(),
        })
    }

    #[test]
    fn test_generate_and_verify_token() {
        let manager = manager();
        let token = manager
            .generate_token("user-1", Some("u@example.com"), Role::Artist, Duration::hours(1))
            .unwrap();

        let user = tokio_test::assert_ok!(manager.verify_token(&token));
        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.email.as_deref(), Some("u@example.com"));
        assert_eq!(user.role, Role::Artist);
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let manager = manager();
        let claims = serde_json::json!({
            "sub": "user-2",
            "aud": "authenticated",
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let user = manager.verify_token(&token).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.email.is_none());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let other = JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            audience: "service_role".to_string(),
        });
        let token = other
            .generate_token("user-1", None, Role::User, Duration::hours(1))
            .unwrap();

        assert!(manager().verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_and_invalid_token() {
        let manager = manager();
        let token = manager
            .generate_token("user-1", None, Role::User, Duration::hours(-2))
            .unwrap();
        assert!(matches!(
            manager.verify_token(&token),
            Err(ApiError::Unauthorized(msg)) if msg.contains("过期")
        ));

        assert!(manager.verify_token("invalid.token.here").is_err());
    }
}
