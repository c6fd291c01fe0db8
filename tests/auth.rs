use std::str::FromStr;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use taskvault::config::{AuthConfig, Config};
use taskvault::routes;
use taskvault::routes::health;

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl: chrono::Duration::hours(1),
        },
    }
}

// A single-connection pool so every statement sees the same in-memory database.
async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite connection string")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");
    taskvault::store::init(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let pool = test_pool().await;
    let config = test_config();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::configure(config.auth.clone())))
            .default_service(web::route().to(routes::not_found)),
    )
    .await;

    // Register a new user
    let register_payload = json!({
        "name": "Integration User",
        "email": "integration@example.com",
        "password": "Password123!"
    });
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(status, 201, "Registration failed. Body: {}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["email"], "integration@example.com");
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());

    // Registering the same email again is a conflict
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(status, 409, "Duplicate registration. Body: {}", body);
    assert_eq!(body["message"], "Email already registered");

    // Login with the registered user
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({
            "email": "integration@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(status, 200, "Login failed. Body: {}", body);
    assert_eq!(body["message"], "Login successful");
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // The token opens the protected surface
    let req = test::TestRequest::get()
        .uri("/api/profile")
        .append_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Profile retrieved successfully");
    assert_eq!(body["data"]["name"], "Integration User");
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let pool = test_pool().await;
    let config = test_config();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::configure(config.auth.clone()))),
    )
    .await;

    let test_cases = vec![
        (
            json!({ "email": "a@example.com", "password": "Password123!" }),
            "Name must be at least 2 characters",
            "missing name",
        ),
        (
            json!({ "name": "X", "email": "a@example.com", "password": "Password123!" }),
            "Name must be at least 2 characters",
            "one-character name",
        ),
        (
            json!({ "name": "Valid Name", "email": "not-an-email", "password": "Password123!" }),
            "Valid email is required",
            "invalid email format",
        ),
        (
            json!({ "name": "Valid Name", "password": "Password123!" }),
            "Valid email is required",
            "missing email",
        ),
        (
            json!({ "name": "Valid Name", "email": "a@example.com", "password": "12345" }),
            "Password must be at least 6 characters",
            "password too short",
        ),
        (
            json!({ "name": "Valid Name", "email": "a@example.com" }),
            "Password must be at least 6 characters",
            "missing password",
        ),
    ];

    for (payload, expected_message, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;

        assert_eq!(status, 400, "case: {}. Body: {}", description, body);
        assert_eq!(body["success"], false, "case: {}", description);
        assert_eq!(body["message"], expected_message, "case: {}", description);
    }
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let pool = test_pool().await;
    let config = test_config();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::configure(config.auth.clone()))),
    )
    .await;

    // Seed a known account
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "name": "Login User",
            "email": "login@example.com",
            "password": "Password123!"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let test_cases = vec![
        (
            json!({ "password": "Password123!" }),
            400,
            "Email and password are required",
            "missing email",
        ),
        (
            json!({ "email": "login@example.com" }),
            400,
            "Email and password are required",
            "missing password",
        ),
        (
            json!({ "email": "", "password": "" }),
            400,
            "Email and password are required",
            "blank credentials",
        ),
        (
            json!({ "email": "login@example.com", "password": "WrongPassword!" }),
            401,
            "Invalid email or password",
            "incorrect password",
        ),
        (
            json!({ "email": "nobody@example.com", "password": "Password123!" }),
            401,
            "Invalid email or password",
            "non-existent user",
        ),
    ];

    for (payload, expected_status, expected_message, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;

        assert_eq!(
            status, expected_status,
            "case: {}. Body: {}",
            description, body
        );
        assert_eq!(body["message"], expected_message, "case: {}", description);
    }
}

#[actix_rt::test]
async fn test_unknown_routes_answer_enveloped_404() {
    let pool = test_pool().await;
    let config = test_config();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::configure(config.auth.clone())))
            .default_service(web::route().to(routes::not_found)),
    )
    .await;

    for uri in ["/api/unknown", "/nowhere"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;

        assert_eq!(status, 404, "uri: {}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Route not found");
    }
}
