use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::{AttendanceRecord, ClassSessionQuery, NewRegistration, SignedUploadRequest};
use crate::cli::main_types::{
    BranchCommands, Commands, ConfigCommands, FeatureCommands, RegistrationCommands,
    ScoreCommands, SessionCommands, StorageCommands, UploadCommands, UserCommands,
};
use crate::core::services::{
    AttendanceService, BranchService, ClassSessionService, ConfigService, FeatureService,
    RegistrationService, ScoreService, SessionService, UploadService, UserService,
};
use crate::display::table::to_json;
use crate::display::{OutputFormat, TableDisplay, TableRow};
use crate::error::{ApiError, AppError, CliError};
use crate::storage::local_store::LocalStore;
use crate::utils::retry::RetryExecutor;
use crate::utils::validation::validate_storage_key;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: ConfigCommands,
        config_service: &mut ConfigService,
        config_path: Option<PathBuf>,
        has_access_token: bool,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let config = config_service.config();

                println!("Current Configuration:");
                println!("=====================");
                println!(
                    "URL: {}",
                    config_service
                        .get_url()
                        .unwrap_or_else(|| "(not set)".to_string())
                );
                println!("Timeout: {}s", config.timeout_secs());
                match &config.storage_path {
                    Some(path) => println!("Store: {}", path.display()),
                    None => println!("Store: (platform data directory)"),
                }
                if has_access_token {
                    println!("Access token: set");
                } else {
                    println!("Access token: not set");
                }

                Ok(())
            }
            ConfigCommands::Set {
                url,
                timeout,
                storage_path,
            } => {
                let mut updated_fields = Vec::new();

                if let Some(url) = url {
                    config_service.set_url(url.clone())?;
                    updated_fields.push(format!("URL to: {}", url));
                }

                if let Some(seconds) = timeout {
                    config_service.set_timeout(seconds)?;
                    updated_fields.push(format!("timeout to: {}s", seconds));
                }

                if let Some(path) = storage_path {
                    updated_fields.push(format!("store to: {}", path.display()));
                    config_service.set_storage_path(path);
                }

                if updated_fields.is_empty() {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "No configuration values provided. Use --url, --timeout and/or --storage-path"
                            .to_string(),
                    )));
                }

                config_service.save_config(config_path)?;
                println!("Set {}", updated_fields.join(", "));
                Ok(())
            }
        }
    }
}

pub struct StorageHandler {
    store: LocalStore,
}

impl StorageHandler {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: StorageCommands) -> Result<(), AppError> {
        match command {
            StorageCommands::Get { key } => {
                validate_storage_key(&key)?;
                let value: Option<Value> = self.store.get(&key).await;
                println!("{}", to_json(&value)?);
                Ok(())
            }
            StorageCommands::Set { key, value, json } => {
                validate_storage_key(&key)?;
                if json {
                    let parsed: Value = serde_json::from_str(&value).map_err(|e| {
                        AppError::Cli(CliError::InvalidArguments(format!(
                            "VALUE is not valid JSON: {}",
                            e
                        )))
                    })?;
                    self.store.try_set(&key, &parsed).await?;
                } else {
                    self.store.try_set(&key, value.as_str()).await?;
                }
                println!("Stored '{}'", key);
                Ok(())
            }
            StorageCommands::Remove { key } => {
                validate_storage_key(&key)?;
                if self.store.try_remove(&key).await? {
                    println!("Removed '{}'", key);
                } else {
                    println!("'{}' was not set", key);
                }
                Ok(())
            }
        }
    }
}

/// Handles every command that talks to the backend
pub struct ResourceHandler {
    client: Arc<ApiClient>,
    store: Option<LocalStore>,
    retry: Option<RetryExecutor>,
    format: OutputFormat,
    access_token: Option<String>,
    display: TableDisplay,
}

impl ResourceHandler {
    pub fn new(
        client: Arc<ApiClient>,
        store: Option<LocalStore>,
        retry: Option<RetryExecutor>,
        format: OutputFormat,
        access_token: Option<String>,
    ) -> Self {
        Self {
            client,
            store,
            retry,
            format,
            access_token,
            display: TableDisplay::new(),
        }
    }

    pub async fn handle(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::User { command } => self.handle_user(command).await,
            Commands::Branch { command } => self.handle_branch(command).await,
            Commands::Session { command } => self.handle_session(command).await,
            Commands::Registration { command } => self.handle_registration(command).await,
            Commands::Score { command } => self.handle_score(command).await,
            Commands::Feature { command } => self.handle_feature(command).await,
            Commands::Upload { command } => self.handle_upload(command).await,
            Commands::Config { .. } | Commands::Storage { .. } => Err(AppError::Cli(
                CliError::InvalidArguments("not a backend command".to_string()),
            )),
        }
    }

    // Retries only when --retry was given; non-idempotent operations run once regardless
    async fn run<F, Fut, T>(&self, operation: Operation, call: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match &self.retry {
            Some(executor) => executor.execute_for(operation, call).await,
            None => call().await,
        }
    }

    fn print_list<T>(&self, items: &[T]) -> Result<(), AppError>
    where
        T: TableRow + Serialize,
    {
        println!("{}", self.display.format(items, self.format)?);
        Ok(())
    }

    fn print_one<T>(&self, item: &T) -> Result<(), AppError>
    where
        T: TableRow + Serialize,
    {
        match self.format {
            OutputFormat::Json => println!("{}", to_json(item)?),
            OutputFormat::Table => println!("{}", self.display.render(std::slice::from_ref(item))),
        }
        Ok(())
    }

    async fn handle_user(&self, command: UserCommands) -> Result<(), AppError> {
        let users = UserService::new(self.client.clone());
        let store = self.store.clone().ok_or_else(|| {
            AppError::Cli(CliError::InvalidArguments(
                "user commands need a local store".to_string(),
            ))
        })?;
        let session = SessionService::new(store);

        match command {
            UserCommands::Me { cached: true } => {
                let user = session
                    .require_cached_user(self.access_token.as_deref())
                    .await?;
                self.print_one(&user)
            }
            UserCommands::Me { cached: false } => {
                let user = self
                    .run(Operation::CurrentUser, || users.current_user())
                    .await?;
                session.remember_user(&user).await;
                self.print_one(&user)
            }
            UserCommands::Get { id } => {
                let user = self.run(Operation::UserById, || users.get_user(id)).await?;
                self.print_one(&user)
            }
        }
    }

    async fn handle_branch(&self, command: BranchCommands) -> Result<(), AppError> {
        let branches = BranchService::new(self.client.clone());

        match command {
            BranchCommands::List => {
                let items = self
                    .run(Operation::ListBranches, || branches.list_branches())
                    .await?;
                self.print_list(&items)
            }
            BranchCommands::Get { id } => {
                let branch = self
                    .run(Operation::BranchById, || branches.get_branch(id))
                    .await?;
                self.print_one(&branch)
            }
        }
    }

    async fn handle_session(&self, command: SessionCommands) -> Result<(), AppError> {
        let sessions = ClassSessionService::new(self.client.clone());
        let attendance = AttendanceService::new(self.client.clone());

        match command {
            SessionCommands::List {
                year,
                quarter,
                account,
            } => {
                let query = ClassSessionQuery {
                    year,
                    quarter,
                    id_account: account,
                };
                let items = self
                    .run(Operation::ListClassSessions, || {
                        sessions.list_class_sessions(&query)
                    })
                    .await?;
                self.print_list(&items)
            }
            SessionCommands::Get { id } => {
                let session = self
                    .run(Operation::ClassSessionById, || sessions.get_class_session(id))
                    .await?;
                self.print_one(&session)
            }
            SessionCommands::Attendance { id } => {
                let items = self
                    .run(Operation::ListAttendance, || attendance.list_attendance(id))
                    .await?;
                self.print_list(&items)
            }
            SessionCommands::CheckIn {
                session,
                student,
                status,
                note,
            } => {
                let record = AttendanceRecord {
                    class_session_id: session,
                    student_id: student,
                    status: status.into(),
                    note,
                };
                let recorded = self
                    .run(Operation::RecordAttendance, || {
                        attendance.record_attendance(&record)
                    })
                    .await?;
                self.print_one(&recorded)
            }
        }
    }

    async fn handle_registration(&self, command: RegistrationCommands) -> Result<(), AppError> {
        let registrations = RegistrationService::new(self.client.clone());

        match command {
            RegistrationCommands::List { account } => {
                let items = self
                    .run(Operation::ListRegistrations, || {
                        registrations.list_registrations(account)
                    })
                    .await?;
                self.print_list(&items)
            }
            RegistrationCommands::Create { student, session } => {
                let registration = NewRegistration {
                    student_id: student,
                    class_session_id: session,
                };
                let created = self
                    .run(Operation::CreateRegistration, || {
                        registrations.create_registration(&registration)
                    })
                    .await?;
                self.print_one(&created)
            }
        }
    }

    async fn handle_score(&self, command: ScoreCommands) -> Result<(), AppError> {
        let scores = ScoreService::new(self.client.clone());

        match command {
            ScoreCommands::List {
                year,
                quarter,
                account,
            } => {
                let query = ClassSessionQuery {
                    year,
                    quarter,
                    id_account: account,
                };
                let items = self
                    .run(Operation::ListScores, || scores.list_scores(&query))
                    .await?;
                self.print_list(&items)
            }
        }
    }

    async fn handle_feature(&self, command: FeatureCommands) -> Result<(), AppError> {
        let features = FeatureService::new(self.client.clone());

        match command {
            FeatureCommands::List => {
                let items = self
                    .run(Operation::ListFeatures, || features.list_features())
                    .await?;
                self.print_list(&items)
            }
        }
    }

    async fn handle_upload(&self, command: UploadCommands) -> Result<(), AppError> {
        let uploads = UploadService::new(self.client.clone());

        match command {
            UploadCommands::Sign {
                file_name,
                content_type,
            } => {
                let request = SignedUploadRequest {
                    file_name,
                    content_type,
                };
                let signed = self
                    .run(Operation::CreateSignedUploadUrl, || {
                        uploads.create_signed_url(&request)
                    })
                    .await?;
                self.print_one(&signed)
            }
        }
    }
}
