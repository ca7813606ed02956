use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, projects, uploads};

pub fn build_app(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();

    Router::new()
        .merge(auth::router())
        .merge(projects::router())
        .merge(uploads::router())
        .route("/health", get(health))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: std::net::SocketAddr = format!("{host}:{port}").parse()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(request(Method::GET, "/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn profile_without_token_is_unauthorized() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(request(Method::GET, "/profile")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn project_mutations_without_token_are_unauthorized() {
        let id = Uuid::new_v4();
        for (method, uri) in [
            (Method::POST, "/projects".to_string()),
            (Method::PUT, format!("/projects/{id}")),
            (Method::DELETE, format!("/projects/{id}")),
        ] {
            let app = build_app(AppState::fake());
            let res = app.oneshot(request(method.clone(), &uri)).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn upload_without_token_is_unauthorized() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(request(Method::POST, "/upload"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/profile")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        use crate::auth::jwt::JwtKeys;

        let state = AppState::fake();
        let keys = JwtKeys::new(&state.config.jwt.secret, state.config.jwt.ttl_days);
        let mut token = keys.issue(Uuid::new_v4()).expect("issue");
        let last = token.pop().expect("non-empty");
        token.push(if last == 'A' { 'B' } else { 'A' });

        let app = build_app(state);
        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/profile")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        use crate::auth::jwt::Claims;
        use jsonwebtoken::{encode, EncodingKey, Header};
        use time::{Duration, OffsetDateTime};

        let state = AppState::fake();
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - Duration::days(8)).unix_timestamp() as usize,
            exp: (now - Duration::days(1)).unix_timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        )
        .expect("encode");

        let app = build_app(state);
        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/profile")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_uuid_project_id_is_bad_request() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(request(Method::GET, "/projects/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
