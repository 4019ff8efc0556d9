//! Application state wiring all services together.
//!
//! Services are generic over the store/generator/log traits, but AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;
use std::time::Duration;

use askgate_core::chat::log::InMemorySessionLog;
use askgate_core::chat::service::ChatService;
use askgate_core::user::policy::QuotaPolicy;
use askgate_core::user::service::UserRecordService;
use askgate_infra::config::{load_config, resolve_api_key, resolve_data_dir};
use askgate_infra::llm::openai::OpenAiAnswerGenerator;
use askgate_infra::sqlite::pool::{DatabasePool, database_url};
use askgate_infra::sqlite::user::SqliteUserStore;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteUserService = UserRecordService<SqliteUserStore>;

pub type ConcreteChatService =
    ChatService<SqliteUserStore, OpenAiAnswerGenerator, InMemorySessionLog>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<ConcreteUserService>,
    pub chat: Arc<ConcreteChatService>,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let api_key = resolve_api_key().ok_or_else(|| {
            anyhow::anyhow!("OPENAI_API_KEY is not set; the answer generator cannot start")
        })?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let policy = QuotaPolicy::new(
            config.quota.daily_limit,
            config.quota.admin_email.as_deref(),
        );
        let users = Arc::new(UserRecordService::new(
            SqliteUserStore::new(db_pool.clone()),
            policy,
        ));

        let generator = OpenAiAnswerGenerator::new(&api_key, &config.llm);
        let log = InMemorySessionLog::new(config.session.max_turns_per_user);
        let chat = ChatService::new(
            Arc::clone(&users),
            generator,
            log,
            Duration::from_secs(config.llm.request_timeout_secs),
        );

        Ok(Self {
            users,
            chat: Arc::new(chat),
        })
    }
}
