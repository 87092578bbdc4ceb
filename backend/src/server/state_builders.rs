//! Builders wiring outbound adapters into the task service.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use tasks_backend::config::{AppSettings, ConfigError, DayCacheSettings};
use tasks_backend::domain::ports::{DayCache, DayCacheError, FixtureDayCache, TaskBoard};
use tasks_backend::domain::{
    AnswerOracle, DayAggregator, IdentityVerifier, TaskService, TaskServicePorts,
};
use tasks_backend::outbound::auth::JwtTokenVerifier;
use tasks_backend::outbound::balance::HttpBalanceForwarder;
use tasks_backend::outbound::cache::{CacheKeyTemplate, CacheKeyTemplateError, RedisDayCache};
use tasks_backend::outbound::persistence::{DbPool, DieselUserRegistry, PoolConfig, PoolError};
use tasks_backend::outbound::sheet::XlsxTaskSheet;
use tasks_backend::outbound::telegram::TelegramNotifier;

/// Failures while wiring adapters at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    CacheKey(#[from] CacheKeyTemplateError),
    #[error(transparent)]
    Cache(#[from] DayCacheError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl From<StartupError> for std::io::Error {
    fn from(value: StartupError) -> Self {
        std::io::Error::other(value.to_string())
    }
}

async fn build_day_cache(settings: DayCacheSettings) -> Result<Arc<dyn DayCache>, StartupError> {
    let Some(url) = settings.redis_url else {
        warn!("no cache store configured; every listing reads the task sheet");
        return Ok(Arc::new(FixtureDayCache));
    };
    let keys = CacheKeyTemplate::new(&settings.key_template)?;
    let pool = RedisDayCache::connect(&url).await?;
    info!(key_template = %keys, ttl_seconds = settings.ttl.as_secs(), "day cache configured");
    Ok(Arc::new(RedisDayCache::new(pool, keys, settings.ttl)))
}

/// Build the task board from settings, failing on the first missing value.
pub async fn build_task_board(settings: &AppSettings) -> Result<Arc<dyn TaskBoard>, StartupError> {
    let pool = DbPool::new(PoolConfig::new(settings.database_url()?)).await?;
    let registry = Arc::new(DieselUserRegistry::new(pool));
    let tokens = Arc::new(JwtTokenVerifier::new(&settings.jwt()?));
    let sheet = Arc::new(XlsxTaskSheet::new(settings.sheet()));
    let notifier = Arc::new(TelegramNotifier::new(settings.telegram()?)?);
    let balance = Arc::new(HttpBalanceForwarder::new(&settings.balance())?);
    let answer_links = Arc::new(settings.load_answer_links()?);
    info!(answer_links = answer_links.len(), "answer links loaded");

    let service = TaskService::new(TaskServicePorts {
        identity: IdentityVerifier::new(tokens, registry.clone()),
        days: DayAggregator::new(build_day_cache(settings.day_cache()).await?),
        oracle: AnswerOracle::new(sheet, settings.layout()),
        ledger: registry,
        notifier,
        balance,
        answer_links,
    });
    Ok(Arc::new(service))
}
