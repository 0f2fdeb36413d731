use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::{Value, json};

use hackathon_server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use hackathon_server::database::{ensure_indexes, sync_schema};
use hackathon_server::entity::user;
use hackathon_server::state::AppState;
use hackathon_server::utils::jwt::TokenService;

const TEST_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const EVENTS: &str = "/api/v1/events";
    pub const ORGANIZED_EVENTS: &str = "/api/v1/events/organized";
    pub const TEAMS: &str = "/api/v1/teams";
    pub const MY_TEAMS: &str = "/api/v1/teams/my";

    pub fn event(id: i32) -> String {
        format!("/api/v1/events/{id}")
    }

    pub fn event_status(id: i32) -> String {
        format!("/api/v1/events/{id}/status")
    }

    pub fn team_join(id: i32) -> String {
        format!("/api/v1/teams/{id}/join")
    }

    pub fn team_submission(id: i32) -> String {
        format!("/api/v1/teams/{id}/submission")
    }
}

/// A running test server backed by its own in-memory SQLite database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    /// Signs tokens with the server's secret, for crafting expired ones.
    pub tokens: Arc<TokenService>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // A single pooled connection keeps the in-memory database alive and shared.
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts)
            .await
            .expect("Failed to open in-memory database");
        sync_schema(&db).await.expect("Failed to create schema");
        ensure_indexes(&db).await.expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                token_ttl_hours: 24,
            },
        };

        let state = AppState::new(db.clone(), app_config);
        let tokens = state.tokens.clone();
        let app = hackathon_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    /// Register an identity and return the response.
    pub async fn register(&self, email: &str, password: &str, role: &str) -> TestResponse {
        self.post_without_token(
            routes::REGISTER,
            &json!({
                "email": email,
                "display_name": email.split('@').next().unwrap_or(email),
                "password": password,
                "role": role,
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_without_token(
            routes::LOGIN,
            &json!({"email": email, "password": password}),
        )
        .await
    }

    /// Register an identity with the given role and log in, returning the token.
    pub async fn create_user_with_role(&self, email: &str, password: &str, role: &str) -> String {
        let reg = self.register(email, password, role).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self.login(email, password).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["access_token"]
            .as_str()
            .expect("Login response should contain an access token")
            .to_string()
    }

    pub async fn organizer(&self, email: &str) -> String {
        self.create_user_with_role(email, "password", "organizer").await
    }

    pub async fn participant(&self, email: &str) -> String {
        self.create_user_with_role(email, "password", "participant").await
    }

    pub async fn judge(&self, email: &str) -> String {
        self.create_user_with_role(email, "password", "judge").await
    }

    /// Load a registered identity straight from the store.
    pub async fn find_user(&self, email: &str) -> user::Model {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .expect("DB query failed")
            .expect("User not found")
    }

    /// Sign a token for a registered identity as if issued at `issued_at`.
    pub async fn token_issued_at(&self, email: &str, issued_at: DateTime<Utc>) -> String {
        let model = self.find_user(email).await;
        self.tokens
            .issue_at(&model, issued_at)
            .expect("Failed to sign token")
            .token
    }

    /// Create a draft event via the API and return its `id`.
    pub async fn create_event(&self, token: &str, title: &str, max_team_size: i32) -> i32 {
        let start = Utc::now() + Duration::days(1);
        let res = self
            .post_with_token(
                routes::EVENTS,
                &json!({
                    "title": title,
                    "description": "Build something.",
                    "start_date": start,
                    "end_date": start + Duration::days(2),
                    "submission_deadline": start + Duration::days(1),
                    "max_team_size": max_team_size,
                    "tracks": ["AI", "Climate"],
                    "prizes": ["1st: 1000 USD"],
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_event failed: {}", res.text);
        res.id()
    }

    pub async fn set_event_status(&self, event_id: i32, status: &str, token: &str) -> TestResponse {
        self.put_with_token(
            &routes::event_status(event_id),
            &json!({"status": status}),
            token,
        )
        .await
    }

    /// Create an event and walk it forward to `status`.
    pub async fn create_event_in(&self, token: &str, status: &str, max_team_size: i32) -> i32 {
        let id = self.create_event(token, "Test Hack", max_team_size).await;
        if status != "draft" {
            let res = self.set_event_status(id, status, token).await;
            assert_eq!(res.status, 200, "set_event_status failed: {}", res.text);
        }
        id
    }

    pub async fn try_create_team(&self, event_id: i32, name: &str, token: &str) -> TestResponse {
        self.post_with_token(
            routes::TEAMS,
            &json!({"name": name, "event_id": event_id}),
            token,
        )
        .await
    }

    /// Create a team via the API and return its `id`.
    pub async fn create_team(&self, event_id: i32, name: &str, token: &str) -> i32 {
        let res = self.try_create_team(event_id, name, token).await;
        assert_eq!(res.status, 201, "create_team failed: {}", res.text);
        res.id()
    }

    pub async fn submit(&self, team_id: i32, title: &str, token: &str) -> TestResponse {
        self.post_with_token(
            &routes::team_submission(team_id),
            &json!({
                "title": title,
                "description": "What we built.",
                "repository_url": "https://github.com/example/project",
            }),
            token,
        )
        .await
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
