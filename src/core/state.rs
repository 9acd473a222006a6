//! Application State - Stato globale dell'applicazione
//!
//! Contiene le risorse REST (con i loro repository), la gerarchia dei ruoli e la
//! configurazione JWT condivise da route e middleware.

use super::config::Config;
use crate::dtos::user::{USER_CREATE_FORM, USER_UPDATE_FORM};
use crate::dtos::user_group::USER_GROUP_FORM;
use crate::dtos::{RoleDto, UserDto, UserGroupDto};
use crate::entities::{Role, User, UserGroup};
use crate::repositories::{InMemoryRepository, MySqlRepository, Repository};
use crate::rest::controller::{METHOD_CREATE, METHOD_PATCH, METHOD_UPDATE};
use crate::rest::{Resource, ResponseHandler, RestController};
use crate::security::{PasswordListener, Roles};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    pub roles: Arc<Resource<Role>>,

    pub user_groups: Arc<Resource<UserGroup>>,

    pub users: Arc<Resource<User>>,

    /// Gerarchia dei ruoli (ROLE_ROOT -> ROLE_ADMIN -> ROLE_USER -> ROLE_LOGGED)
    pub role_hierarchy: Arc<Roles>,

    /// Secret key per JWT token
    pub jwt_secret: String,

    /// Durata dei token in secondi
    pub jwt_ttl_secs: i64,
}

impl AppState {
    /// Crea una nuova istanza di AppState a partire dai repository delle tre entità.
    ///
    /// # Arguments
    /// * `bcrypt_cost` - Costo usato dal listener che cifra le password
    pub fn new(
        roles: Arc<dyn Repository<Role>>,
        user_groups: Arc<dyn Repository<UserGroup>>,
        users: Arc<dyn Repository<User>>,
        jwt_secret: String,
        jwt_ttl_secs: i64,
        bcrypt_cost: u32,
    ) -> Self {
        let roles = Resource::new(roles).with_dto_class::<RoleDto>();

        let user_groups = Resource::new(user_groups)
            .with_dto_class::<UserGroupDto>()
            .with_form_type(USER_GROUP_FORM);

        let users = Resource::new(users)
            .with_dto_class::<UserDto>()
            .with_form_type(USER_UPDATE_FORM)
            .with_listener(Arc::new(PasswordListener::new(bcrypt_cost)));

        Self {
            roles: Arc::new(roles),
            user_groups: Arc::new(user_groups),
            users: Arc::new(users),
            role_hierarchy: Arc::new(Roles::default()),
            jwt_secret,
            jwt_ttl_secs,
        }
    }

    /// Repository MySQL sul pool di connessioni fornito
    pub fn mysql(pool: MySqlPool, config: &Config) -> Self {
        Self::new(
            Arc::new(MySqlRepository::<Role>::new(pool.clone())),
            Arc::new(MySqlRepository::<UserGroup>::new(pool.clone())),
            Arc::new(MySqlRepository::<User>::new(pool)),
            config.jwt_secret.clone(),
            config.jwt_ttl_secs,
            config.bcrypt_cost,
        )
    }

    /// Stato a partire dalla configurazione: `memory://` usa i repository in memoria,
    /// altrimenti apre il pool MySQL e applica le migrazioni.
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        if config.uses_memory_database() {
            info!("Using in-memory repositories");
            return Ok(Self::in_memory(Vec::new(), Vec::new(), Vec::new(), config));
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!().run(&pool).await?;
        info!("Database migrations applied");

        Ok(Self::mysql(pool, config))
    }

    /// Repository in memoria, pre-popolati con le entità fornite
    pub fn in_memory(
        roles: Vec<Role>,
        user_groups: Vec<UserGroup>,
        users: Vec<User>,
        config: &Config,
    ) -> Self {
        Self::new(
            Arc::new(InMemoryRepository::with_entities(roles)),
            Arc::new(InMemoryRepository::with_entities(user_groups)),
            Arc::new(InMemoryRepository::with_entities(users)),
            config.jwt_secret.clone(),
            config.jwt_ttl_secs,
            config.bcrypt_cost,
        )
    }

    pub fn role_controller(&self) -> Arc<RestController<RoleDto>> {
        Arc::new(RestController::new(self.roles.clone(), ResponseHandler::new()))
    }

    pub fn user_group_controller(&self) -> Arc<RestController<UserGroupDto>> {
        Arc::new(
            RestController::new(self.user_groups.clone(), ResponseHandler::new())
                .with_reference("role", self.roles.clone()),
        )
    }

    pub fn user_controller(&self) -> Arc<RestController<UserDto>> {
        Arc::new(
            RestController::new(self.users.clone(), ResponseHandler::new())
                .with_form_type(METHOD_CREATE, USER_CREATE_FORM)
                .with_form_type(METHOD_UPDATE, USER_UPDATE_FORM)
                .with_form_type(METHOD_PATCH, USER_UPDATE_FORM)
                .with_reference("userGroups", self.user_groups.clone()),
        )
    }
}
