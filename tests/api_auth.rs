//! Integration tests per gli endpoints di autenticazione
//!
//! Test per:
//! - POST /auth/getToken
//! - GET /auth/profile
//! - accesso alle risorse con e senza ROLE_ADMIN

mod common;

#[cfg(test)]
mod auth_tests {
    use super::common::*;
    use flex_backend::core::{decode_jwt, encode_jwt};
    use serde_json::{Value, json};

    // ============================================================
    // Test per POST /auth/getToken
    // ============================================================

    #[tokio::test]
    async fn test_get_token_success() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/getToken")
            .json(&json!({"username": "admin", "password": PASSWORD}))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        let token = body["token"].as_str().expect("token should be a string");
        let claims = decode_jwt(token, JWT_SECRET).unwrap().claims;
        assert_eq!(claims.id, ADMIN_ID);
        assert!(claims.roles.contains(&"ROLE_ADMIN".to_string()));
        assert!(claims.roles.contains(&"ROLE_LOGGED".to_string()));
    }

    #[tokio::test]
    async fn test_get_token_with_email() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/getToken")
            .json(&json!({"username": "john@example.com", "password": PASSWORD}))
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_get_token_wrong_password() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/getToken")
            .json(&json!({"username": "admin", "password": "wrongpassword"}))
            .await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["error"], "Bad credentials");
    }

    #[tokio::test]
    async fn test_get_token_nonexistent_user() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/getToken")
            .json(&json!({"username": "nonexistent", "password": PASSWORD}))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_get_token_without_json() {
        let server = create_test_server(create_test_state());

        let response = server.post("/auth/getToken").text("username=admin").await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"],
            "You need to send JSON body to obtain token eg. {\"username\":\"username\",\"password\":\"password\"}"
        );
    }

    // ============================================================
    // Test per GET /auth/profile
    // ============================================================

    #[tokio::test]
    async fn test_profile() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/auth/profile")
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["username"], "admin");
        assert!(body.get("password").is_none());
        assert_eq!(
            body["userGroups"],
            json!([{
                "id": ADMIN_GROUP_ID,
                "name": "Admins",
                "role": {"id": "ROLE_ADMIN", "description": "Admin users"}
            }])
        );
        assert_eq!(
            body["roles"],
            json!(["ROLE_ADMIN", "ROLE_USER", "ROLE_LOGGED"])
        );
    }

    #[tokio::test]
    async fn test_profile_without_token() {
        let server = create_test_server(create_test_state());

        let response = server.get("/auth/profile").await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["error"], "JWT Token not found");
    }

    #[tokio::test]
    async fn test_profile_with_invalid_token() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/auth/profile")
            .authorization_bearer("not.a.token")
            .await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["error"], "Invalid JWT Token");
    }

    #[tokio::test]
    async fn test_profile_with_expired_token() {
        let server = create_test_server(create_test_state());
        let token = encode_jwt(
            "admin".to_string(),
            ADMIN_ID.to_string(),
            Vec::new(),
            JWT_SECRET,
            -3600,
        )
        .unwrap();

        let response = server.get("/auth/profile").authorization_bearer(token).await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["error"], "Expired JWT Token");
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_invalid() {
        let server = create_test_server(create_test_state());
        let token = create_test_jwt("user-gone", "gone");

        let response = server.get("/auth/profile").authorization_bearer(token).await;

        response.assert_status_unauthorized();
    }

    // ============================================================
    // Accesso alle risorse
    // ============================================================

    #[tokio::test]
    async fn test_resources_require_admin() {
        let server = create_test_server(create_test_state());

        for path in ["/role", "/user_group", "/user"] {
            let response = server.get(path).authorization_bearer(john_token()).await;

            response.assert_status_forbidden();
            assert_eq!(response.json::<Value>()["error"], "Access denied.");
        }
    }

    #[tokio::test]
    async fn test_resources_require_token() {
        let server = create_test_server(create_test_state());

        for path in ["/role", "/user_group", "/user"] {
            server.get(path).await.assert_status_unauthorized();
        }
    }

    #[tokio::test]
    async fn test_root() {
        let server = create_test_server(create_test_state());

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text("Server is running!");
    }
}
