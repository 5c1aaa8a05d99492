use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{catalog, entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{export, storage};

use entities::user::{LoginUser, User};
use repositories::{
    assessment::KvAssessmentRepo,
    kv_store::SharedStore,
    ledger::KvLedgerRepo,
    session::KvSessionRepo,
};
use settings::AppConfig;
use use_cases::{assessment::AssessmentManager, ledger::LedgerReader, session::SessionHandler};

pub type AppSessionHandler = SessionHandler<KvSessionRepo>;
pub type AppLedgerReader = LedgerReader<KvLedgerRepo>;
pub type AppAssessmentManager = AssessmentManager<KvAssessmentRepo, KvLedgerRepo>;

pub struct AppState {
    pub config: AppConfig,
    pub store: SharedStore,
    pub session: AppSessionHandler,
    pub ledger: AppLedgerReader,
    /// The signed-in user's open assessment. Mutations are serialized here.
    workspace: Mutex<Option<AppAssessmentManager>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        let session = SessionHandler::new(KvSessionRepo::new(store.clone()), config.login_delay());
        let ledger = LedgerReader::new(KvLedgerRepo::new(store.clone()));

        AppState {
            config,
            store,
            session,
            ledger,
            workspace: Mutex::new(None),
        }
    }

    /// Picks up the identity saved by a previous run and reopens its workspace.
    pub async fn restore_session(&self) -> Option<User> {
        let user = self.session.restore().await?;
        let manager = self.load_workspace(user.clone()).await;
        *self.workspace.lock().await = Some(manager);
        Some(user)
    }

    pub async fn sign_in(&self, request: LoginUser) -> Option<User> {
        let user = self.session.login(request).await?;
        let manager = self.load_workspace(user.clone()).await;
        *self.workspace.lock().await = Some(manager);
        Some(user)
    }

    pub async fn sign_out(&self) {
        self.session.logout().await;
        self.workspace.lock().await.take();
    }

    /// Exclusive access to `user`'s workspace, loading it if another user's
    /// (or none) is open.
    pub async fn workspace_for(&self, user: &User) -> MappedMutexGuard<'_, AppAssessmentManager> {
        let mut guard = self.workspace.lock().await;
        let manager = match guard.take() {
            Some(manager) if manager.user().id == user.id => manager,
            _ => self.load_workspace(user.clone()).await,
        };
        MutexGuard::map(guard, |slot| slot.insert(manager))
    }

    /// Team report over every ledger entry. The category rollup follows the
    /// requesting manager's own workspace, custom skills included.
    pub async fn team_report_sheets(&self, manager: &User) -> Vec<export::Sheet> {
        let categories = self.workspace_for(manager).await.categories().to_vec();
        let assessments = self.ledger.all_assessments().await;
        let category_summaries = self.ledger.category_summaries(&categories).await;

        export::team_report_sheets(&assessments, &catalog::team_roster(), &category_summaries)
    }

    async fn load_workspace(&self, user: User) -> AppAssessmentManager {
        AssessmentManager::load(
            user,
            KvAssessmentRepo::new(self.store.clone()),
            KvLedgerRepo::new(self.store.clone()),
        )
        .await
    }
}
