use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::{Quote, QuoteFilter, QuoteStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use tracing::{debug, error, info, warn};

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Inserts a new record; an identifier collision fails with `AlreadyExists`.
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote>;
    async fn get_by_quote_number(&self, quote_number: &str) -> RepositoryResult<Quote>;
    /// Newest first.
    async fn find(&self, filter: &QuoteFilter, limit: i64, skip: u64) -> RepositoryResult<Vec<Quote>>;
    async fn count(&self, filter: &QuoteFilter) -> RepositoryResult<u64>;
    async fn update_status(&self, id: ObjectId, status: QuoteStatus, updated_at: String) -> RepositoryResult<Quote>;
    /// Whether the backing store currently answers.
    async fn ping(&self) -> bool;
}

pub struct MongoQuoteRepository {
    database: mongodb::Database,
    collection: mongodb::Collection<Quote>,
}

impl MongoQuoteRepository {
    /// Create a new MongoQuoteRepository using MongoConfig.
    ///
    /// The driver connects lazily, so this succeeds while the database is down.
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        use mongodb::{options::{ClientOptions, Credential}, Client};

        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.app_name = Some("NefesDepoBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        let database = client.database(&config.database);
        let collection = database.collection::<Quote>(&config.quote_collection);
        info!(database = %config.database, collection = %config.quote_collection, "MongoDB quote repository ready");
        Ok(MongoQuoteRepository { database, collection })
    }

    /// Creates the unique index on `quoteNumber`. Without it a colliding
    /// identifier would be stored twice.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let unique_number = IndexModel::builder()
            .keys(doc! { "quoteNumber": 1 })
            .options(IndexOptions::builder().unique(true).name("quoteNumber_unique".to_string()).build())
            .build();
        let by_created = IndexModel::builder().keys(doc! { "createdAt": -1 }).build();

        self.collection
            .create_indexes(vec![unique_number, by_created], None)
            .await
            .map_err(|e| {
                error!("Failed to create quote indexes: {}", e);
                RepositoryError::from(e)
            })?;
        info!("Quote indexes ensured");
        Ok(())
    }
}

/// Translates a listing filter into a MongoDB query document.
pub fn quote_filter_document(filter: &QuoteFilter) -> Document {
    let mut query = Document::new();
    if let Some(status) = &filter.status {
        query.insert("status", status.as_str());
    }
    if let Some(since) = &filter.created_since {
        query.insert("createdAt", doc! { "$gte": since.as_str() });
    }
    if let Some(search) = &filter.search {
        let pattern = regex::escape(search);
        query.insert(
            "$or",
            vec![
                doc! { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "phone": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "quoteNumber": { "$regex": pattern.as_str(), "$options": "i" } },
            ],
        );
    }
    query
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(quote_number = %quote.quote_number))]
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        info!("Creating new quote");
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());

        match self.collection.insert_one(&new_quote, None).await {
            Ok(_) => {
                info!("Quote created successfully");
                Ok(new_quote)
            }
            Err(e) => {
                error!("Failed to create quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        debug!("Fetching quote by id");
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => Err(RepositoryError::not_found(format!("Quote not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_quote_number(&self, quote_number: &str) -> RepositoryResult<Quote> {
        debug!("Fetching quote by quote number");
        match self.collection.find_one(doc! { "quoteNumber": quote_number }, None).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => Err(RepositoryError::not_found(format!("Quote not found: {}", quote_number))),
            Err(e) => {
                error!("Failed to fetch quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(limit = limit, skip = skip))]
    async fn find(&self, filter: &QuoteFilter, limit: i64, skip: u64) -> RepositoryResult<Vec<Quote>> {
        let query = quote_filter_document(filter);
        debug!(query = %query, "Listing quotes");
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .limit(limit)
            .skip(skip)
            .build();

        let cursor = self.collection.find(query, options).await.map_err(|e| {
            error!("Failed to list quotes: {}", e);
            RepositoryError::from(e)
        })?;
        let quotes: Vec<Quote> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to read quote cursor: {}", e);
            RepositoryError::from(e)
        })?;
        info!("Fetched {} quotes", quotes.len());
        Ok(quotes)
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, filter: &QuoteFilter) -> RepositoryResult<u64> {
        let query = quote_filter_document(filter);
        self.collection.count_documents(query, None).await.map_err(|e| {
            error!("Failed to count quotes: {}", e);
            RepositoryError::from(e)
        })
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(&self, id: ObjectId, status: QuoteStatus, updated_at: String) -> RepositoryResult<Quote> {
        info!("Updating quote status");
        let update = doc! { "$set": { "status": status.as_str(), "updatedAt": updated_at } };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        match self.collection.find_one_and_update(doc! { "_id": id }, update, options).await {
            Ok(Some(quote)) => {
                info!("Quote status updated successfully");
                Ok(quote)
            }
            Ok(None) => {
                warn!("No quote found to update status");
                Err(RepositoryError::not_found(format!("No quote found to update status for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update quote status: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn ping(&self) -> bool {
        match self.database.run_command(doc! { "ping": 1 }, None).await {
            Ok(_) => true,
            Err(e) => {
                debug!("MongoDB ping failed: {}", e);
                false
            }
        }
    }
}
