use crate::models::{Claims, ServiceError, User};
use actix_web::{HttpMessage, HttpRequest};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::error;

pub mod document_store;
pub use document_store::{Document, DocumentStore};

// JWT utility functions
pub mod jwt {
    use super::*;

    const TOKEN_TTL_DAYS: i64 = 7;

    // Generate a new JWT token for a user
    pub fn generate_token(user: &User, secret: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let expiration = (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
            .map_err(|e| {
                error!("❌ Failed to encode token: {:?}", e);
                ServiceError::InternalServerError
            })
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ServiceError::Unauthorized),
        }
    }
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        hash(password, DEFAULT_COST)
            .map_err(|_| ServiceError::InternalServerError)
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash)
            .map_err(|_| ServiceError::InternalServerError)
    }
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::*;
    use crate::AppState;
    use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
    use actix_web::http::header;
    use actix_web::{web, Error};
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;

    // Routes reachable without a token
    const PUBLIC_ROUTES: [&str; 3] = ["/", "/auth/register", "/auth/login"];

    pub struct Authentication;

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware { service })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            if PUBLIC_ROUTES.contains(&req.path()) {
                let fut = self.service.call(req);
                return Box::pin(async move { fut.await });
            }

            let claims = req
                .app_data::<web::Data<AppState>>()
                .and_then(|state| {
                    let auth_header = req.headers().get(header::AUTHORIZATION)?;
                    let auth_str = auth_header.to_str().ok()?;
                    let token = jwt::extract_token_from_header(auth_str).ok()?;
                    jwt::decode_token(&token, &state.jwt_secret).ok()
                });

            match claims {
                Some(claims) => {
                    // Add the claims to the request extensions
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(async move { fut.await })
                }
                None => Box::pin(async move { Err(ServiceError::Unauthorized.into()) }),
            }
        }
    }
}

// Claims placed on the request by the authentication middleware
pub fn get_claims_from_request(req: &HttpRequest) -> Result<Claims, ServiceError> {
    req.extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(ServiceError::Unauthorized)
}

// Load the calling user's record
pub fn get_user_from_request(req: &HttpRequest, store: &DocumentStore) -> Result<User, ServiceError> {
    let claims = get_claims_from_request(req)?;
    store.find::<User>(&claims.sub)?.ok_or_else(|| {
        error!("❌ Token refers to unknown user: {}", claims.sub);
        ServiceError::Unauthorized
    })
}
