use portfolio_service::config::{AppConfig, CommonConfig, CorsConfig, MongoConfig, SmtpConfig};
use portfolio_service::services::{InMemoryStore, MockMailer};
use portfolio_service::startup::{AppState, Application};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub mailer: Arc<MockMailer>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_mailer(MockMailer::new()).await
    }

    /// Spawn the app with a specific mailer, e.g. `MockMailer::failing()` to
    /// simulate an unreachable relay.
    pub async fn spawn_with_mailer(mailer: MockMailer) -> Self {
        let mailer = Arc::new(mailer);
        let state = AppState {
            config: test_config(),
            store: Arc::new(InMemoryStore::new()),
            mailer: mailer.clone(),
        };

        let app = Application::with_state(state)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint.
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            mailer,
        }
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        common: CommonConfig { port: 0 },
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "portfolio_test".to_string(),
        },
        // Left incomplete on purpose: the real SMTP path is never exercised
        // in tests, the injected MockMailer is.
        smtp: SmtpConfig {
            host: String::new(),
            port: 587,
            user: String::new(),
            password: String::new(),
            from_email: String::new(),
            from_name: "Portfolio Contact".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}
