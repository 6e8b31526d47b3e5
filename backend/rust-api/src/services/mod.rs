use std::sync::Arc;

use anyhow::Context;

use crate::config::{Config, StorageBackend};
use crate::models::PoolQuestion;

use self::{
    daily_recommender::DailyRecommender,
    llm_client::{LlmClient, OpenAiClient},
    plot_executor::{PlotExecutor, SandboxPlotExecutor},
    record_store::{InMemoryRecordStore, MongoRecordStore, RecordStore},
    statistics::StatisticsService,
    tutor_service::TutorService,
};

pub struct AppState {
    pub config: Config,
    pub records: Arc<dyn RecordStore>,
    pub llm: Arc<dyn LlmClient>,
    pub plotter: Arc<dyn PlotExecutor>,
    pub question_pool: Arc<[PoolQuestion]>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let records: Arc<dyn RecordStore> = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory record store");
                Arc::new(InMemoryRecordStore::new())
            }
            StorageBackend::Mongo => {
                let uri = config
                    .storage
                    .mongo_uri
                    .as_deref()
                    .context("storage.mongo_uri is required for the mongo backend")?;
                let client = mongodb::Client::with_uri_str(uri)
                    .await
                    .context("Failed to connect to MongoDB")?;
                let store = MongoRecordStore::new(client.database(&config.storage.mongo_database));
                store
                    .initialize()
                    .await
                    .context("Failed to initialize MongoDB record store")?;
                tracing::info!(database = %config.storage.mongo_database, "MongoDB connected");
                Arc::new(store)
            }
        };

        if config.storage.seed_sample_data {
            seed::seed_if_empty(records.as_ref()).await?;
        }

        let llm = OpenAiClient::new(&config.llm).context("Failed to build LLM client")?;
        let plotter =
            SandboxPlotExecutor::new(&config.sandbox).context("Failed to build sandbox client")?;

        Ok(Self::from_parts(
            config,
            records,
            Arc::new(llm),
            Arc::new(plotter),
        ))
    }

    /// State over caller-provided collaborators, with the built-in question
    /// pool.
    pub fn from_parts(
        config: Config,
        records: Arc<dyn RecordStore>,
        llm: Arc<dyn LlmClient>,
        plotter: Arc<dyn PlotExecutor>,
    ) -> Self {
        Self {
            config,
            records,
            llm,
            plotter,
            question_pool: question_pool::default_pool().into(),
        }
    }

    pub fn recommender(&self) -> DailyRecommender {
        DailyRecommender::new(self.records.clone(), self.question_pool.clone())
    }

    pub fn statistics(&self) -> StatisticsService {
        StatisticsService::new(self.records.clone())
    }

    pub fn tutor(&self) -> TutorService {
        TutorService::new(self.llm.clone(), self.records.clone())
    }
}

pub mod daily_recommender;
pub mod llm_client;
pub mod mastery;
pub mod plot_executor;
pub mod prompts;
pub mod question_pool;
pub mod record_store;
pub mod seed;
pub mod statistics;
pub mod tutor_service;
