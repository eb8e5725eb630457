use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Claims of a token issued by the external identity provider. This
/// service only verifies; it never issues tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub fn verify_jwt(token: &str, secret: &str) -> Result<AuthUser, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(AuthUser {
        id: data.claims.sub,
        role: data.claims.role.unwrap_or_else(|| "user".to_string()),
    })
}

pub fn extract_user(req: &HttpRequest) -> Result<AuthUser, HttpResponse> {
    match req.extensions().get::<AuthUser>() {
        Some(user) => Ok(user.clone()),
        None => Err(HttpResponse::Unauthorized().json(json!({
            "status": "error",
            "message": "Authentication required"
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(sub: i64, role: Option<&str>, secret: &str) -> String {
        let claims = Claims {
            sub,
            role: role.map(str::to_string),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn verifies_subject_and_role() {
        let user = verify_jwt(&token(42, Some("admin"), "s3cret"), "s3cret").unwrap();
        assert_eq!(user.id, 42);
        assert!(user.is_admin());
    }

    #[test]
    fn missing_role_defaults_to_user() {
        let user = verify_jwt(&token(7, None, "s3cret"), "s3cret").unwrap();
        assert_eq!(user.role, "user");
        assert!(!user.is_admin());
    }

    #[test]
    fn rejects_wrong_secret() {
        assert!(verify_jwt(&token(7, None, "s3cret"), "other").is_err());
    }
}
