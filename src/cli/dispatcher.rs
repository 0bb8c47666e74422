use crate::api::client::ApiClient;
use crate::cli::command_handlers::{ConfigHandler, ResourceHandler, StorageHandler};
use crate::cli::main_types::Commands;
use crate::core::services::config_service::ConfigService;
use crate::display::OutputFormat;
use crate::error::AppError;
use crate::storage::backend::FileBackend;
use crate::storage::config::Config;
use crate::storage::credentials::get_access_token;
use crate::storage::local_store::LocalStore;
use crate::utils::logging::print_verbose;
use crate::utils::retry::{RetryExecutor, RetryPolicy};
use crate::utils::validation::validate_url;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags that apply to every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub url: Option<String>,
    pub access_token: Option<String>,
    pub store: Option<PathBuf>,
    pub retry: bool,
    pub format: OutputFormat,
}

/// Composition root: builds the client and store once per invocation and
/// hands them to the command handlers.
pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    options: GlobalOptions,
}

impl Dispatcher {
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.options.verbose, msg);
    }

    pub fn new(config: Config, config_path: Option<PathBuf>, options: GlobalOptions) -> Self {
        Self {
            config,
            config_path,
            options,
        }
    }

    // CLI argument > ROLLCALL_ACCESS_TOKEN
    fn effective_access_token(&self) -> Option<String> {
        self.options
            .access_token
            .clone()
            .filter(|token| !token.is_empty())
            .or_else(get_access_token)
    }

    fn create_client(&self) -> Result<Arc<ApiClient>, AppError> {
        let config_service = ConfigService::new(self.config.clone());
        let url = match &self.options.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => config_service.require_url()?,
        };
        validate_url(&url)?;

        let mut client = ApiClient::with_timeout(url, self.config.timeout_secs())?;
        if let Some(token) = self.effective_access_token() {
            self.log_verbose("Creating client with access token");
            client = client.with_access_token(token);
        } else {
            self.log_verbose("Creating client without access token");
        }

        Ok(Arc::new(client))
    }

    fn create_store(&self) -> Result<LocalStore, AppError> {
        let backend = match self
            .options
            .store
            .clone()
            .or_else(|| self.config.storage_path.clone())
        {
            Some(path) => FileBackend::new(path),
            None => FileBackend::at_default_location()?,
        };
        self.log_verbose(&format!("Using local store at {}", backend.path().display()));

        Ok(LocalStore::new(Arc::new(backend)))
    }

    // Only `user` commands read or write the local store
    fn store_for(&self, command: &Commands) -> Result<Option<LocalStore>, AppError> {
        match command {
            Commands::User { .. } => self.create_store().map(Some),
            _ => Ok(None),
        }
    }

    fn create_retry(&self) -> Option<RetryExecutor> {
        self.options
            .retry
            .then(|| RetryExecutor::new(RetryPolicy::default()))
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Config { command } => {
                let mut config_service = ConfigService::new(self.config.clone());
                ConfigHandler::new()
                    .handle(
                        command,
                        &mut config_service,
                        self.config_path.clone(),
                        self.effective_access_token().is_some(),
                    )
                    .await
            }
            Commands::Storage { command } => {
                let store = self.create_store()?;
                StorageHandler::new(store).handle(command).await
            }
            other => {
                let handler = ResourceHandler::new(
                    self.create_client()?,
                    self.store_for(&other)?,
                    self.create_retry(),
                    self.options.format,
                    self.effective_access_token(),
                );
                handler.handle(other).await
            }
        }
    }
}
