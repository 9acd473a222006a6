#![allow(dead_code)]

use axum_test::TestServer;
use flex_backend::core::{AppState, Config, encode_jwt};
use flex_backend::entities::{Role, User, UserGroup};
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";
pub const PASSWORD: &str = "password123";

pub const ADMIN_GROUP_ID: &str = "group-admin";
pub const USER_GROUP_ID: &str = "group-user";
pub const ADMIN_ID: &str = "user-admin";
pub const JOHN_ID: &str = "user-john";

fn user(id: &str, username: &str, group_id: &str) -> User {
    let mut user = User {
        id: id.to_string(),
        username: username.to_string(),
        firstname: "Test".to_string(),
        surname: "User".to_string(),
        email: format!("{username}@example.com"),
        password: User::hash_password(PASSWORD, 4).expect("Failed to hash password"),
        ..User::default()
    };
    user.add_user_group(group_id);
    user
}

/// Crea un AppState in memoria per i test
///
/// Contiene i quattro ruoli, i gruppi "Admins" (ROLE_ADMIN) e "Users" (ROLE_USER),
/// l'utente `admin` nel primo e `john` nel secondo, entrambi con password [`PASSWORD`].
pub fn create_test_state() -> Arc<AppState> {
    let config = Config {
        jwt_secret: JWT_SECRET.to_string(),
        bcrypt_cost: 4,
        ..Config::default()
    };

    let roles = vec![
        Role::new("ROLE_LOGGED", "Logged in users"),
        Role::new("ROLE_USER", "Normal users"),
        Role::new("ROLE_ADMIN", "Admin users"),
        Role::new("ROLE_ROOT", "Root users"),
    ];

    let groups = vec![
        UserGroup {
            id: ADMIN_GROUP_ID.to_string(),
            ..UserGroup::new("Admins", "ROLE_ADMIN")
        },
        UserGroup {
            id: USER_GROUP_ID.to_string(),
            ..UserGroup::new("Users", "ROLE_USER")
        },
    ];

    let users = vec![
        user(ADMIN_ID, "admin", ADMIN_GROUP_ID),
        user(JOHN_ID, "john", USER_GROUP_ID),
    ];

    Arc::new(AppState::in_memory(roles, groups, users, &config))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = flex_backend::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token valido per un'ora
pub fn create_test_jwt(user_id: &str, username: &str) -> String {
    encode_jwt(
        username.to_string(),
        user_id.to_string(),
        Vec::new(),
        JWT_SECRET,
        3600,
    )
    .expect("Failed to create JWT token")
}

pub fn admin_token() -> String {
    create_test_jwt(ADMIN_ID, "admin")
}

pub fn john_token() -> String {
    create_test_jwt(JOHN_ID, "john")
}
