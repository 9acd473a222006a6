//! Integration tests per gli endpoints degli utenti
//!
//! Test per:
//! - GET /user, /user/count, /user/ids, /user/{id}
//! - POST /user, PUT /user/{id}, PATCH /user/{id}, DELETE /user/{id}
//! - GET /user/{id}/roles, /user/{id}/groups

mod common;

#[cfg(test)]
mod user_tests {
    use super::common::*;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use serde_json::{Value, json};

    fn new_user() -> Value {
        json!({
            "username": "jane",
            "firstname": "Jane",
            "surname": "Doe",
            "email": "jane@example.com",
            "password": "secretpassword",
            "userGroups": [USER_GROUP_ID]
        })
    }

    fn usernames(body: &Value) -> Vec<&str> {
        body.as_array()
            .expect("array body")
            .iter()
            .filter_map(|user| user["username"].as_str())
            .collect()
    }

    // ============================================================
    // Lettura
    // ============================================================

    #[tokio::test]
    async fn test_find_all() {
        let server = create_test_server(create_test_state());

        let response = server.get("/user").authorization_bearer(admin_token()).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(usernames(&body), vec!["admin", "john"]);
        assert!(body[0].get("password").is_none());
    }

    #[tokio::test]
    async fn test_find_with_where_order_and_pagination() {
        let server = create_test_server(create_test_state());

        let filtered = server
            .get("/user")
            .add_query_param("where", r#"{"username":"john"}"#)
            .authorization_bearer(admin_token())
            .await;
        assert_eq!(usernames(&filtered.json::<Value>()), vec!["john"]);

        let ordered = server
            .get("/user")
            .add_query_param("order", "-username")
            .authorization_bearer(admin_token())
            .await;
        assert_eq!(usernames(&ordered.json::<Value>()), vec!["john", "admin"]);

        let paginated = server
            .get("/user")
            .add_query_param("order", "username")
            .add_query_param("limit", "1")
            .add_query_param("offset", "1")
            .authorization_bearer(admin_token())
            .await;
        assert_eq!(usernames(&paginated.json::<Value>()), vec!["john"]);
    }

    #[tokio::test]
    async fn test_find_with_search() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/user")
            .add_query_param("search", "joh")
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();
        assert_eq!(usernames(&response.json::<Value>()), vec!["john"]);
    }

    #[tokio::test]
    async fn test_find_with_unknown_property() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/user")
            .add_query_param("where", r#"{"shoeSize":42}"#)
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_find_with_invalid_where() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/user")
            .add_query_param("where", "{not json")
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_count_and_ids() {
        let server = create_test_server(create_test_state());

        let count = server
            .get("/user/count")
            .authorization_bearer(admin_token())
            .await;
        count.assert_status_ok();
        count.assert_json(&json!({"count": 2}));

        let ids = server.get("/user/ids").authorization_bearer(admin_token()).await;
        ids.assert_status_ok();
        ids.assert_json(&json!([ADMIN_ID, JOHN_ID]));
    }

    #[tokio::test]
    async fn test_find_one() {
        let server = create_test_server(create_test_state());

        let response = server
            .get(&format!("/user/{JOHN_ID}"))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["username"], "john");
        assert_eq!(body["userGroups"], json!([USER_GROUP_ID]));
    }

    #[tokio::test]
    async fn test_find_one_not_found() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/user/missing")
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"], "Not found");
    }

    #[tokio::test]
    async fn test_not_acceptable_format() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/user")
            .add_header(
                HeaderName::from_static("accept"),
                HeaderValue::from_static("text/html"),
            )
            .authorization_bearer(admin_token())
            .await;

        response.assert_status(StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_not_acceptable_write_changes_nothing() {
        let server = create_test_server(create_test_state());

        let response = server
            .delete(&format!("/user/{JOHN_ID}"))
            .add_header(
                HeaderName::from_static("accept"),
                HeaderValue::from_static("application/xml"),
            )
            .authorization_bearer(admin_token())
            .await;
        response.assert_status(StatusCode::NOT_ACCEPTABLE);

        let response = server
            .post("/user")
            .json(&new_user())
            .add_header(
                HeaderName::from_static("accept"),
                HeaderValue::from_static("text/html"),
            )
            .authorization_bearer(admin_token())
            .await;
        response.assert_status(StatusCode::NOT_ACCEPTABLE);

        server
            .get("/user/ids")
            .authorization_bearer(admin_token())
            .await
            .assert_json(&json!([ADMIN_ID, JOHN_ID]));
    }

    // ============================================================
    // Scrittura
    // ============================================================

    #[tokio::test]
    async fn test_create_user() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/user")
            .json(&new_user())
            .authorization_bearer(admin_token())
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["username"], "jane");
        assert_eq!(body["userGroups"], json!([USER_GROUP_ID]));
        assert!(body.get("password").is_none());

        // La password è stata cifrata e funziona per il login
        server
            .post("/auth/getToken")
            .json(&json!({"username": "jane", "password": "secretpassword"}))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_create_user_with_extra_fields() {
        let server = create_test_server(create_test_state());
        let mut body = new_user();
        body["isAdmin"] = json!(true);

        let response = server
            .post("/user")
            .json(&body)
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"],
            "This form should not contain extra fields."
        );
    }

    #[tokio::test]
    async fn test_create_user_with_unknown_group() {
        let server = create_test_server(create_test_state());
        let mut body = new_user();
        body["userGroups"] = json!(["nope"]);

        let response = server
            .post("/user")
            .json(&body)
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"],
            "UserGroup with id \"nope\" does not exist!"
        );
    }

    #[tokio::test]
    async fn test_create_user_with_duplicate_username() {
        let server = create_test_server(create_test_state());
        let mut body = new_user();
        body["username"] = json!("john");

        let response = server
            .post("/user")
            .json(&body)
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_user_with_short_password() {
        let server = create_test_server(create_test_state());
        let mut body = new_user();
        body["password"] = json!("short");

        let response = server
            .post("/user")
            .json(&body)
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();

        let count = server
            .get("/user/count")
            .authorization_bearer(admin_token())
            .await;
        count.assert_json(&json!({"count": 2}));
    }

    #[tokio::test]
    async fn test_create_user_with_non_object_body() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/user")
            .json(&json!(["jane"]))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_patch_keeps_missing_fields() {
        let server = create_test_server(create_test_state());

        let response = server
            .patch(&format!("/user/{JOHN_ID}"))
            .json(&json!({"firstname": "Johnny"}))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["firstname"], "Johnny");
        assert_eq!(body["surname"], "User");
        assert_eq!(body["userGroups"], json!([USER_GROUP_ID]));

        // La password non è stata toccata
        server
            .post("/auth/getToken")
            .json(&json!({"username": "john", "password": PASSWORD}))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_patch_password() {
        let server = create_test_server(create_test_state());

        server
            .patch(&format!("/user/{JOHN_ID}"))
            .json(&json!({"password": "anotherpassword"}))
            .authorization_bearer(admin_token())
            .await
            .assert_status_ok();

        server
            .post("/auth/getToken")
            .json(&json!({"username": "john", "password": "anotherpassword"}))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_update_form_does_not_accept_groups() {
        let server = create_test_server(create_test_state());

        let response = server
            .patch(&format!("/user/{JOHN_ID}"))
            .json(&json!({"userGroups": [ADMIN_GROUP_ID]}))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_put_clears_missing_fields() {
        let server = create_test_server(create_test_state());

        // firstname e surname vengono svuotati e non passano la validazione
        let response = server
            .put(&format!("/user/{JOHN_ID}"))
            .json(&json!({"username": "john", "email": "john@example.com"}))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_put_replaces_fields() {
        let server = create_test_server(create_test_state());

        let response = server
            .put(&format!("/user/{JOHN_ID}"))
            .json(&json!({
                "username": "johnny",
                "firstname": "Johnny",
                "surname": "Walker",
                "email": "johnny@example.com"
            }))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["username"], "johnny");
        assert_eq!(body["email"], "johnny@example.com");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let server = create_test_server(create_test_state());

        let response = server
            .patch("/user/missing")
            .json(&json!({"firstname": "Johnny"}))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_delete_user() {
        let server = create_test_server(create_test_state());

        let response = server
            .delete(&format!("/user/{JOHN_ID}"))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["id"], JOHN_ID);

        server
            .get(&format!("/user/{JOHN_ID}"))
            .authorization_bearer(admin_token())
            .await
            .assert_status_not_found();
    }

    // ============================================================
    // Route aggiuntive
    // ============================================================

    #[tokio::test]
    async fn test_user_roles() {
        let server = create_test_server(create_test_state());

        let response = server
            .get(&format!("/user/{JOHN_ID}/roles"))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();
        response.assert_json(&json!(["ROLE_USER", "ROLE_LOGGED"]));
    }

    #[tokio::test]
    async fn test_user_groups() {
        let server = create_test_server(create_test_state());

        let response = server
            .get(&format!("/user/{ADMIN_ID}/groups"))
            .authorization_bearer(admin_token())
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([{
            "id": ADMIN_GROUP_ID,
            "name": "Admins",
            "role": {"id": "ROLE_ADMIN", "description": "Admin users"}
        }]));
    }

    #[tokio::test]
    async fn test_user_roles_not_found() {
        let server = create_test_server(create_test_state());

        server
            .get("/user/missing/roles")
            .authorization_bearer(admin_token())
            .await
            .assert_status_not_found();
    }
}
