use crate::{
    config::AuthConfig,
    database::UserStore,
    models::{User, UserProfile},
    utils::{hash_password, verify_password, AppError},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user id
    pub nickname: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, Default, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// `email` tem prioridade sobre `id`, como no formulário antigo
    pub fn login(&self) -> Option<&str> {
        present(&self.email).or_else(|| present(&self.id))
    }
}

#[derive(Debug, Deserialize, Default, utoipa::ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub ok: bool,
    pub token: String,
    pub user: UserProfile,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_string)
}

// Generate JWT token
pub fn generate_token(config: &AuthConfig, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        nickname: user.nickname.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(config.token_ttl_hours)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: config.jwt_audience.clone(),
        iss: config.jwt_issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token (signature, expiry, audience, issuer)
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.jwt_audience.as_str()]);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

// User signup
pub async fn signup(
    store: &dyn UserStore,
    config: &AuthConfig,
    request: &SignupRequest,
) -> Result<UserProfile, AppError> {
    let (nickname, id, password) = match (
        non_blank(&request.nickname),
        non_blank(&request.id),
        non_blank(&request.password),
    ) {
        (Some(n), Some(i), Some(p)) => (n, i, p),
        _ => {
            return Err(AppError::InvalidRequest(
                "Nickname, ID, and password are required.".to_string(),
            ))
        }
    };

    if store.exists(&id).await? {
        return Err(AppError::Conflict("이미 사용 중인 아이디입니다.".to_string()));
    }

    let user = User {
        id,
        email: non_blank(&request.email),
        nickname,
        password_hash: hash_password(&password, config.bcrypt_cost)?,
        created_at: Some(BsonDateTime::now()),
    };

    // Índice único cobre a corrida entre exists() e insert()
    store.insert(&user).await?;

    Ok(UserProfile::from(&user))
}

// User login
pub async fn login(
    store: &dyn UserStore,
    config: &AuthConfig,
    request: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    let login = request.login();
    let password = request.password.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let (login, password) = match (login, password) {
        (Some(l), Some(p)) => (l, p),
        _ => return Err(AppError::InvalidRequest("MISSING_CREDENTIALS".to_string())),
    };

    let user = store
        .find_by_login(login)
        .await?
        .ok_or_else(|| AppError::Unauthorized("INVALID_CREDENTIALS".to_string()))?;

    if !verify_password(password, &user.password_hash) {
        return Err(AppError::Unauthorized("INVALID_CREDENTIALS".to_string()));
    }

    let token = generate_token(config, &user)?;

    Ok(LoginResponse {
        ok: true,
        token,
        user: UserProfile::from(&user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;

    fn signup_request(id: &str, password: &str) -> SignupRequest {
        SignupRequest {
            nickname: Some("moonlight".to_string()),
            id: Some(id.to_string()),
            password: Some(password.to_string()),
            email: None,
        }
    }

    fn login_request(id: &str, password: &str) -> LoginRequest {
        LoginRequest {
            id: Some(id.to_string()),
            email: None,
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();

        let profile = signup(&store, &config, &signup_request("luna", "s3cret")).await.unwrap();
        assert_eq!(profile.id, "luna");
        assert_eq!(profile.email, "luna");

        let response = login(&store, &config, &login_request("luna", "s3cret")).await.unwrap();
        assert!(response.ok);
        assert_eq!(response.user.nickname, "moonlight");

        let claims = verify_token(&config, &response.token).unwrap();
        assert_eq!(claims.sub, "luna");
    }

    #[tokio::test]
    async fn test_password_is_never_stored_in_plaintext() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();

        signup(&store, &config, &signup_request("luna", "s3cret")).await.unwrap();

        let stored = store.stored_user("luna").await.unwrap();
        assert_ne!(stored.password_hash, "s3cret");
        assert!(stored.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();
        signup(&store, &config, &signup_request("luna", "s3cret")).await.unwrap();

        let wrong = login(&store, &config, &login_request("luna", "guess")).await;
        assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

        let unknown = login(&store, &config, &login_request("sol", "s3cret")).await;
        assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();

        signup(&store, &config, &signup_request("luna", "a")).await.unwrap();
        let second = signup(&store, &config, &signup_request("luna", "b")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();

        let mut request = signup_request("luna", "pw");
        request.nickname = Some("   ".to_string());
        assert!(matches!(
            signup(&store, &config, &request).await,
            Err(AppError::InvalidRequest(_))
        ));

        assert!(matches!(
            login(&store, &config, &LoginRequest::default()).await,
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();

        let mut request = signup_request("luna", "s3cret");
        request.email = Some("luna@example.com".to_string());
        signup(&store, &config, &request).await.unwrap();

        let response = login(
            &store,
            &config,
            &LoginRequest {
                id: None,
                email: Some("luna@example.com".to_string()),
                password: Some("s3cret".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(response.user.id, "luna");
        assert_eq!(response.user.email, "luna@example.com");
    }

    #[tokio::test]
    async fn test_blank_email_falls_back_to_id() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();
        signup(&store, &config, &signup_request("luna", "s3cret")).await.unwrap();

        let request = LoginRequest {
            id: Some("luna".to_string()),
            email: Some("  ".to_string()),
            password: Some("s3cret".to_string()),
        };
        assert_eq!(request.login(), Some("luna"));

        let response = login(&store, &config, &request).await.unwrap();
        assert_eq!(response.user.id, "luna");
    }

    #[tokio::test]
    async fn test_account_without_hash() {
        let store = InMemoryStore::new();
        let config = AuthConfig::for_tests();
        store
            .insert(&User {
                id: "luna".to_string(),
                email: None,
                nickname: "moon".to_string(),
                password_hash: String::new(),
                created_at: None,
            })
            .await
            .unwrap();

        let attempt = login(&store, &config, &login_request("luna", "pw")).await;
        assert!(matches!(attempt, Err(AppError::Unauthorized(_))));

        let taken = signup(&store, &config, &signup_request("luna", "pw")).await;
        assert!(matches!(taken, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_token_with_foreign_secret_rejected() {
        let config = AuthConfig::for_tests();
        let user = User {
            id: "luna".to_string(),
            email: None,
            nickname: "moonlight".to_string(),
            password_hash: String::new(),
            created_at: None,
        };

        let mut other = AuthConfig::for_tests();
        other.jwt_secret = "another-secret".to_string();
        let forged = generate_token(&other, &user).unwrap();
        assert!(verify_token(&config, &forged).is_err());

        let mut expired_config = AuthConfig::for_tests();
        expired_config.token_ttl_hours = -2;
        let expired = generate_token(&expired_config, &user).unwrap();
        assert!(verify_token(&config, &expired).is_err());

        let valid = generate_token(&config, &user).unwrap();
        assert_eq!(verify_token(&config, &valid).unwrap().nickname, "moonlight");
    }
}
