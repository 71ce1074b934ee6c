use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::user::Role;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// Identity of the caller, decoded once per request and passed explicitly
/// into every service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::Forbidden(format!(
                "role '{}' may not perform this action",
                self.role
            )))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<Claims> for AuthContext {
    type Error = Error;

    fn try_from(claims: Claims) -> Result<Self> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| Error::Unauthorized("invalid_subject".to_string()))?;
        let role = claims
            .role
            .as_deref()
            .ok_or_else(|| Error::Unauthorized("missing_role".to_string()))?
            .parse::<Role>()
            .map_err(|_| Error::Unauthorized("unknown_role".to_string()))?;
        Ok(AuthContext { user_id, role })
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<AuthContext> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;
    data.claims.try_into()
}

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(Error::Unauthorized("missing_authorization".to_string()));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(Error::Unauthorized("bad_authorization".to_string()));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(Error::Unauthorized("unsupported_scheme".to_string()));
    };

    let auth = decode_token(token, &state.jwt_secret)?;
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(sub: &str, role: Option<&str>, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            role: role.map(str::to_string),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn decodes_valid_token() {
        let auth = decode_token(&token("42", Some("company"), "s3cret"), "s3cret").unwrap();
        assert_eq!(auth, AuthContext::new(42, Role::Company));
    }

    #[test]
    fn rejects_wrong_secret_and_bad_claims() {
        let wrong = decode_token(&token("42", Some("company"), "a"), "b");
        assert!(matches!(wrong, Err(Error::Unauthorized(_))));

        let no_role = decode_token(&token("42", None, "k"), "k");
        assert!(matches!(no_role, Err(Error::Unauthorized(_))));

        let bad_sub = decode_token(&token("abc", Some("admin"), "k"), "k");
        assert!(matches!(bad_sub, Err(Error::Unauthorized(_))));
    }

    #[test]
    fn role_gate() {
        let auth = AuthContext::new(1, Role::Candidate);
        assert!(auth.require_role(&[Role::Candidate]).is_ok());
        assert!(matches!(
            auth.require_role(&[Role::Company, Role::Admin]),
            Err(Error::Forbidden(_))
        ));
    }
}
