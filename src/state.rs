use std::sync::Arc;

use sqlx::SqlitePool;
use tera::Tera;

use crate::config::AppConfig;
use crate::feedback::mailer::{Mailer, SmtpMailer};
use crate::storage::{LocalStorage, StorageClient};
use crate::views;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = crate::db::connect(&config.database_url).await?;

        let storage = Arc::new(LocalStorage::new(&config.upload_dir, "/uploads").await?)
            as Arc<dyn StorageClient>;

        let mailer = match &config.smtp {
            Some(smtp) => Some(Arc::new(SmtpMailer::new(smtp)?) as Arc<dyn Mailer>),
            None => {
                tracing::warn!("SMTP_HOST not set; feedback form will report failures");
                None
            }
        };

        Ok(Self {
            db,
            config,
            storage,
            mailer,
            templates: Arc::new(views::load()?),
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            config,
            storage,
            mailer,
            templates: Arc::new(views::load()?),
        })
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory database, temp upload dir, recording mailer.
    pub(crate) async fn fake() -> (Self, tempfile::TempDir) {
        use crate::feedback::mailer::RecordingMailer;

        let dir = tempfile::tempdir().expect("tempdir");
        let config = Arc::new(AppConfig::for_tests(dir.path().to_path_buf()));
        let db = crate::db::test_pool().await;
        let storage = Arc::new(
            LocalStorage::new(dir.path(), "/uploads")
                .await
                .expect("local storage"),
        ) as Arc<dyn StorageClient>;
        let mailer = Arc::new(RecordingMailer::default()) as Arc<dyn Mailer>;

        let state = Self::from_parts(db, config, storage, Some(mailer)).expect("state");
        (state, dir)
    }
}
