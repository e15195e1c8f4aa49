//! Cross-module tests for the kata crate

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use auth::test_support::{InMemoryUserRepository, caller_for};
    use auth::{AuthConfig, AuthenticatedUser, UserRole};
    use bytes::Bytes;
    use kernel::id::{KataId, UserId};
    use kernel::query::{PageRequest, Sort, SortDirection};
    use platform::storage::ObjectStorage;
    use platform::upload::UploadError;

    use crate::application::*;
    use crate::domain::repository::{KataFilter, KataSortField};
    use crate::domain::value_object::kata_level::KataLevel;
    use crate::error::KataError;
    use crate::test_support::InMemoryKataRepository;

    const PASSWORD: &str = "Kata-Dojo-2024";

    struct Fixture {
        katas: Arc<InMemoryKataRepository>,
        users: Arc<InMemoryUserRepository>,
        storage: ObjectStorage,
        config: Arc<KataConfig>,
        auth: AuthConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                katas: Arc::new(InMemoryKataRepository::new()),
                users: Arc::new(InMemoryUserRepository::new()),
                storage: ObjectStorage::in_memory(),
                config: Arc::new(KataConfig::development()),
                auth: AuthConfig::development(),
            }
        }

        fn caller(&self, name: &str, role: UserRole) -> AuthenticatedUser {
            let email = format!("{}@example.com", name.to_lowercase());
            let user = self.users.seed(name, &email, PASSWORD, role);
            caller_for(&self.auth, &user)
        }
    }

    fn create_input(name: &str) -> CreateKataInput {
        CreateKataInput {
            name: name.into(),
            description: None,
            level: None,
            intents: None,
            solution: None,
            participants: vec![],
        }
    }

    fn update_input(kata_id: KataId, name: &str) -> UpdateKataInput {
        UpdateKataInput {
            kata_id,
            name: name.into(),
            description: "Print numbers".into(),
            level: "high".into(),
            intents: 3,
            solution: "for i in 1..=100".into(),
        }
    }

    fn pdf(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.into(),
            content_type: "application/pdf".into(),
            data: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let grace = UserId::new();

        let mut input = create_input("  FizzBuzz ");
        input.participants = vec![grace, grace];
        let kata = CreateKataUseCase::new(fx.katas.clone())
            .execute(&ada, input)
            .await
            .unwrap();

        assert_eq!(kata.name.as_str(), "FizzBuzz");
        assert_eq!(kata.description, "Default description");
        assert_eq!(kata.level, KataLevel::Basic);
        assert_eq!(kata.intents, 1);
        assert_eq!(kata.solution, "Default Solution");
        assert_eq!(kata.creator, ada.user_id);
        assert_eq!(kata.participants, vec![grace]);
        assert_eq!(fx.katas.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let use_case = CreateKataUseCase::new(fx.katas.clone());

        let err = use_case.execute(&ada, create_input("   ")).await.unwrap_err();
        assert!(matches!(err, KataError::App(_)));

        let mut input = create_input("FizzBuzz");
        input.intents = Some(-1);
        let err = use_case.execute(&ada, input).await.unwrap_err();
        assert!(matches!(err, KataError::Validation(_)));

        assert!(fx.katas.is_empty());
    }

    #[tokio::test]
    async fn test_create_parses_level_leniently() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let use_case = CreateKataUseCase::new(fx.katas.clone());

        for (raw, expected) in [
            ("medium", KataLevel::Medium),
            ("very HIGH", KataLevel::High),
            ("impossible", KataLevel::Basic),
        ] {
            let mut input = create_input("FizzBuzz");
            input.level = Some(raw.into());
            let kata = use_case.execute(&ada, input).await.unwrap();
            assert_eq!(kata.level, expected, "level {raw}");
        }
    }

    #[tokio::test]
    async fn test_update_requires_creator_or_admin() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let grace = fx.caller("Grace", UserRole::User);
        let admin = fx.caller("Root", UserRole::Admin);

        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![ada.user_id]);
        let use_case = UpdateKataUseCase::new(fx.katas.clone());

        let err = use_case
            .execute(&grace, update_input(kata.kata_id, "Stolen"))
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::NotOwner));
        assert_eq!(fx.katas.get(&kata.kata_id).unwrap().name.as_str(), "FizzBuzz");

        let updated = use_case
            .execute(&admin, update_input(kata.kata_id, "FizzBuzz 2"))
            .await
            .unwrap();
        assert_eq!(updated.name.as_str(), "FizzBuzz 2");
        assert_eq!(updated.level, KataLevel::High);
        assert_eq!(updated.intents, 3);
        assert_eq!(updated.creator, ada.user_id);
        assert_eq!(updated.participants, vec![ada.user_id]);

        let err = use_case
            .execute(&ada, update_input(KataId::new(), "Missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::KataNotFound));
    }

    #[tokio::test]
    async fn test_delete_removes_stored_files() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![]);

        let stored = UploadFilesUseCase::new(fx.katas.clone(), fx.storage.clone(), fx.config.clone())
            .execute(&ada, &kata.kata_id, vec![pdf("notes.pdf")])
            .await
            .unwrap();
        assert!(fx.storage.exists(&stored[0]).await.unwrap());

        let grace = fx.caller("Grace", UserRole::User);
        let use_case = DeleteKataUseCase::new(fx.katas.clone(), fx.storage.clone());
        let err = use_case.execute(&grace, &kata.kata_id).await.unwrap_err();
        assert!(matches!(err, KataError::NotOwner));

        use_case.execute(&ada, &kata.kata_id).await.unwrap();
        assert!(fx.katas.is_empty());
        assert!(!fx.storage.exists(&stored[0]).await.unwrap());

        let err = use_case.execute(&ada, &kata.kata_id).await.unwrap_err();
        assert!(matches!(err, KataError::KataNotFound));
    }

    #[tokio::test]
    async fn test_rate_only_participants() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let grace = fx.caller("Grace", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![ada.user_id]);
        let use_case = RateKataUseCase::new(fx.katas.clone());

        let err = use_case.execute(&grace, &kata.kata_id, 4.0).await.unwrap_err();
        assert!(matches!(err, KataError::NotParticipant));
        assert!(fx.katas.get(&kata.kata_id).unwrap().stars.users.is_empty());

        JoinKataUseCase::new(fx.katas.clone())
            .execute(&grace, &kata.kata_id)
            .await
            .unwrap();

        assert_eq!(use_case.execute(&ada, &kata.kata_id, 2.0).await.unwrap(), 2.0);
        assert_eq!(use_case.execute(&grace, &kata.kata_id, 5.0).await.unwrap(), 3.5);
        // Replaces Ada's earlier rating
        assert_eq!(use_case.execute(&ada, &kata.kata_id, 4.0).await.unwrap(), 4.5);

        let stored = fx.katas.get(&kata.kata_id).unwrap();
        assert_eq!(stored.stars.users.len(), 2);
        assert_eq!(stored.stars.rating_of(&ada.user_id), Some(4));
    }

    #[tokio::test]
    async fn test_rate_clamps_and_rounds() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![ada.user_id]);
        let use_case = RateKataUseCase::new(fx.katas.clone());

        assert_eq!(use_case.execute(&ada, &kata.kata_id, 9.7).await.unwrap(), 5.0);
        assert_eq!(use_case.execute(&ada, &kata.kata_id, -3.0).await.unwrap(), 0.0);
        assert_eq!(use_case.execute(&ada, &kata.kata_id, 2.6).await.unwrap(), 3.0);

        let err = use_case.execute(&ada, &KataId::new(), 3.0).await.unwrap_err();
        assert!(matches!(err, KataError::KataNotFound));
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let grace = fx.caller("Grace", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![ada.user_id]);
        let use_case = JoinKataUseCase::new(fx.katas.clone());

        let first = use_case.execute(&grace, &kata.kata_id).await.unwrap();
        let second = use_case.execute(&grace, &kata.kata_id).await.unwrap();
        assert_eq!(first, vec![ada.user_id, grace.user_id]);
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_list_filters_pages_and_sorts() {
        let fx = Fixture::new();
        let ada = UserId::new();
        for name in ["Alpha", "Bravo", "Charlie"] {
            fx.katas.seed(name, KataLevel::Medium, ada, vec![]);
        }
        fx.katas.seed("Delta", KataLevel::High, ada, vec![]);

        let use_case = ListKatasUseCase::new(fx.katas.clone());
        let filter = KataFilter {
            level: Some(KataLevel::Medium),
            creator: None,
        };
        let sorts = [Sort::new(KataSortField::Name, SortDirection::Desc)];

        let page = use_case
            .execute(filter, PageRequest::new(Some(1), Some(2), 100), &sorts)
            .await
            .unwrap();
        let names: Vec<&str> = page.items.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Bravo"]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 1);

        let all = use_case
            .execute(KataFilter::default(), PageRequest::new(None, None, 100), &[])
            .await
            .unwrap();
        assert_eq!(all.items.len(), 4);
        assert_eq!(all.total_pages, 1);
    }

    #[tokio::test]
    async fn test_user_katas() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let grace = fx.caller("Grace", UserRole::User);
        fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![]);
        fx.katas.seed("Roman", KataLevel::High, ada.user_id, vec![]);
        fx.katas.seed("Bowling", KataLevel::Basic, grace.user_id, vec![]);

        let use_case = UserKatasUseCase::new(fx.katas.clone(), fx.users.clone());
        let result = use_case
            .execute(&ada.user_id, KataFilter::default(), PageRequest::default(), &[])
            .await
            .unwrap();
        assert_eq!(result.email, "ada@example.com");
        assert_eq!(result.katas.items.len(), 2);
        assert!(result.katas.items.iter().all(|k| k.creator == ada.user_id));

        let err = use_case
            .execute(&UserId::new(), KataFilter::default(), PageRequest::default(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::UserNotFound));
    }

    #[tokio::test]
    async fn test_upload_and_download() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![]);

        let stored = UploadFilesUseCase::new(fx.katas.clone(), fx.storage.clone(), fx.config.clone())
            .execute(&ada, &kata.kata_id, vec![pdf("notes.pdf"), pdf("../../slides.pdf")])
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].ends_with("-notes.pdf"));
        assert!(stored[1].ends_with("-slides.pdf"));
        assert_eq!(fx.katas.get(&kata.kata_id).unwrap().files, stored);

        let download = DownloadFileUseCase::new(fx.katas.clone(), fx.storage.clone());
        let data = download.execute(&kata.kata_id, &stored[0]).await.unwrap();
        assert_eq!(data, Bytes::from_static(b"%PDF-1.4"));

        let err = download.execute(&kata.kata_id, "other.pdf").await.unwrap_err();
        assert!(matches!(err, KataError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_download_missing_object() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![]);

        let stored = UploadFilesUseCase::new(fx.katas.clone(), fx.storage.clone(), fx.config.clone())
            .execute(&ada, &kata.kata_id, vec![pdf("notes.pdf")])
            .await
            .unwrap();
        fx.storage.delete_many(&stored).await.unwrap();

        let err = DownloadFileUseCase::new(fx.katas.clone(), fx.storage.clone())
            .execute(&kata.kata_id, &stored[0])
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_upload_rejections_store_nothing() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let grace = fx.caller("Grace", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![]);
        let use_case = UploadFilesUseCase::new(fx.katas.clone(), fx.storage.clone(), fx.config.clone());

        let mut html = pdf("index.html");
        html.content_type = "text/html".into();
        let err = use_case
            .execute(&ada, &kata.kata_id, vec![pdf("notes.pdf"), html])
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::Upload(UploadError::UnsupportedMime { .. })));

        let err = use_case
            .execute(&ada, &kata.kata_id, vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf"), pdf("d.pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::Upload(UploadError::TooManyFiles { max: 3 })));

        let err = use_case.execute(&ada, &kata.kata_id, vec![]).await.unwrap_err();
        assert!(matches!(err, KataError::Upload(UploadError::EmptyField(_))));

        let err = use_case
            .execute(&grace, &kata.kata_id, vec![pdf("notes.pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::NotOwner));

        assert!(fx.katas.get(&kata.kata_id).unwrap().files.is_empty());
    }

    #[tokio::test]
    async fn test_upload_size_limit() {
        let fx = Fixture::new();
        let ada = fx.caller("Ada", UserRole::User);
        let kata = fx.katas.seed("FizzBuzz", KataLevel::Basic, ada.user_id, vec![]);

        let mut config = KataConfig::development();
        config.upload.max_file_size = 4;
        let err = UploadFilesUseCase::new(fx.katas.clone(), fx.storage.clone(), Arc::new(config))
            .execute(&ada, &kata.kata_id, vec![pdf("notes.pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, KataError::Upload(UploadError::TooLarge { max: 4 })));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use auth::router::{auth_router_generic, users_router_generic};
    use auth::test_support::{InMemoryTokenDenylist, InMemoryUserRepository, issue_token};
    use auth::{AuthConfig, AuthMiddlewareState, UserRole};
    use kernel::id::KataId;
    use platform::storage::ObjectStorage;

    use crate::application::config::KataConfig;
    use crate::domain::value_object::kata_level::KataLevel;
    use crate::presentation::router::{katas_router_generic, user_katas_router_generic};
    use crate::test_support::InMemoryKataRepository;

    const PASSWORD: &str = "Kata-Dojo-2024";
    const BOUNDARY: &str = "kata-dojo-boundary";

    struct TestApp {
        router: Router,
        users: InMemoryUserRepository,
        katas: InMemoryKataRepository,
        storage: ObjectStorage,
        config: AuthConfig,
    }

    impl TestApp {
        fn new() -> Self {
            let users = InMemoryUserRepository::new();
            let denylist = InMemoryTokenDenylist::new();
            let katas = InMemoryKataRepository::new();
            let storage = ObjectStorage::in_memory();
            let config = AuthConfig::development();
            let guard =
                AuthMiddlewareState::new(Arc::new(denylist.clone()), Arc::new(config.clone()));

            let router = Router::new()
                .nest(
                    "/api/auth",
                    auth_router_generic(users.clone(), denylist.clone(), config.clone()),
                )
                .nest(
                    "/api/users",
                    users_router_generic(users.clone(), denylist.clone(), config.clone()).merge(
                        user_katas_router_generic(
                            katas.clone(),
                            users.clone(),
                            storage.clone(),
                            KataConfig::development(),
                            guard.clone(),
                        ),
                    ),
                )
                .nest(
                    "/api/katas",
                    katas_router_generic(
                        katas.clone(),
                        users.clone(),
                        storage.clone(),
                        KataConfig::development(),
                        guard,
                    ),
                );

            Self {
                router,
                users,
                katas,
                storage,
                config,
            }
        }

        fn seed(&self, name: &str, role: UserRole) -> (auth::models::user::User, String) {
            let email = format!("{}@example.com", name.to_lowercase());
            let user = self.users.seed(name, &email, PASSWORD, role);
            let token = issue_token(&self.config, &user);
            (user, token)
        }

        async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(req).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, body)
        }
    }

    fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-access-token", token)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-access-token", token)
            .body(Body::empty())
            .unwrap()
    }

    /// `(field, filename, content type, body)`; an empty content type makes a text part
    fn multipart_request(uri: &str, token: &str, parts: &[(&str, &str, &str, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        for (field, filename, content_type, data) in parts {
            let headers = if content_type.is_empty() {
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n")
            } else {
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                     filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
            };
            body.extend_from_slice(headers.as_bytes());
            body.extend_from_slice(data.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-access-token", token)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn create_kata(app: &TestApp, token: &str, body: Value) -> KataId {
        let (status, body) = app
            .send(json_request("POST", "/api/katas", token, body))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_routes_require_token() {
        let app = TestApp::new();

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/api/katas").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .send(empty_request("GET", "/api/users/katas", "garbage"))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_and_get_kata() {
        let app = TestApp::new();
        let (ada, token) = app.seed("Ada", UserRole::User);

        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/katas",
                &token,
                json!({"name": "FizzBuzz", "level": "medium"}),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Kata created successfully: FizzBuzz");
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(empty_request("GET", &format!("/api/katas?id={id}"), &token))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "FizzBuzz");
        assert_eq!(body["level"], "Medium");
        assert_eq!(body["description"], "Default description");
        assert_eq!(body["intents"], 1);
        assert_eq!(body["creator"], ada.user_id.to_string());
        assert_eq!(body["stars"]["average"], 0.0);
        assert_eq!(body["files"], json!([]));
    }

    #[tokio::test]
    async fn test_create_without_name() {
        let app = TestApp::new();
        let (_, token) = app.seed("Ada", UserRole::User);

        let (status, body) = app
            .send(json_request("POST", "/api/katas", &token, json!({"level": "High"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Please, provide a Kata Entity to create one");
        assert!(app.katas.is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_id() {
        let app = TestApp::new();
        let (_, token) = app.seed("Ada", UserRole::User);

        let (status, _) = app
            .send(empty_request("GET", &format!("/api/katas?id={}", KataId::new()), &token))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .send(empty_request("GET", "/api/katas?id=not-a-uuid", &token))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid id format");
    }

    #[tokio::test]
    async fn test_list_filters_by_level() {
        let app = TestApp::new();
        let (ada, token) = app.seed("Ada", UserRole::User);
        app.katas.seed("Alpha", KataLevel::High, ada.user_id, vec![]);
        app.katas.seed("Bravo", KataLevel::Basic, ada.user_id, vec![]);
        app.katas.seed("Charlie", KataLevel::High, ada.user_id, vec![]);

        let (status, body) = app
            .send(empty_request(
                "GET",
                "/api/katas?level=high&limit=1&order=%7B%22name%22%3A1%7D",
                &token,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["katas"].as_array().unwrap().len(), 1);
        assert_eq!(body["katas"][0]["name"], "Alpha");
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["currentPage"], 1);

        let (status, _) = app
            .send(empty_request("GET", "/api/katas?level=legendary", &token))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(empty_request("GET", "/api/katas?order=%7B%22solution%22%3A1%7D", &token))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_kata() {
        let app = TestApp::new();
        let (_, ada) = app.seed("Ada", UserRole::User);
        let (_, grace) = app.seed("Grace", UserRole::User);
        let id = create_kata(&app, &ada, json!({"name": "FizzBuzz"})).await;
        let uri = format!("/api/katas?id={id}");
        let full = json!({
            "name": "FizzBuzz 2",
            "description": "Multiples of three and five",
            "level": "High",
            "intents": 2,
            "solution": "match"
        });

        let (status, body) = app
            .send(json_request("PUT", &uri, &ada, json!({"name": "Only name"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "You need to send all attributes of Kata to update it");

        let (status, _) = app.send(json_request("PUT", &uri, &grace, full.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.send(json_request("PUT", &uri, &ada, full)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Kata with id {id} updated successfully"));
        assert_eq!(app.katas.get(&id).unwrap().level, KataLevel::High);

        let (status, body) = app
            .send(json_request("PUT", "/api/katas", &ada, json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Please, provide an ID to update an existing kata");
    }

    #[tokio::test]
    async fn test_join_then_rate() {
        let app = TestApp::new();
        let (_, ada) = app.seed("Ada", UserRole::User);
        let (grace_user, grace) = app.seed("Grace", UserRole::User);
        let id = create_kata(&app, &ada, json!({"name": "FizzBuzz"})).await;

        let (status, body) = app
            .send(json_request("PUT", &format!("/api/katas/stars?id={id}"), &grace, json!({"stars": 4})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "Only participants can rate this kata");

        let (status, body) = app
            .send(empty_request("PUT", &format!("/api/katas/participants?id={id}"), &grace))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["participants"], json!([grace_user.user_id.to_string()]));

        let (status, body) = app
            .send(json_request("PUT", &format!("/api/katas/stars?id={id}"), &grace, json!({"stars": 4.4})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["average"], 4.0);

        let (status, body) = app
            .send(json_request("PUT", &format!("/api/katas/stars?id={id}"), &grace, json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Please, provide a number of stars");
    }

    #[tokio::test]
    async fn test_upload_and_download_files() {
        let app = TestApp::new();
        let (_, ada) = app.seed("Ada", UserRole::User);
        let id = create_kata(&app, &ada, json!({"name": "FizzBuzz"})).await;

        let (status, body) = app
            .send(multipart_request(
                &format!("/api/katas/files?id={id}"),
                &ada,
                &[("files", "notes.pdf", "application/pdf", "%PDF-1.4")],
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let filename = body["files"][0].as_str().unwrap().to_string();
        assert!(filename.ends_with("-notes.pdf"));
        assert_eq!(app.katas.get(&id).unwrap().files, vec![filename.clone()]);

        let response = app
            .router
            .clone()
            .oneshot(empty_request(
                "GET",
                &format!("/api/katas/files?id={id}&filename={filename}"),
                &ada,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"{filename}\"").as_str()
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4");

        let (status, _) = app
            .send(empty_request(
                "GET",
                &format!("/api/katas/files?id={id}&filename=other.pdf"),
                &ada,
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let app = TestApp::new();
        let (_, ada) = app.seed("Ada", UserRole::User);
        let (_, grace) = app.seed("Grace", UserRole::User);
        let id = create_kata(&app, &ada, json!({"name": "FizzBuzz"})).await;
        let uri = format!("/api/katas/files?id={id}");

        let (status, body) = app
            .send(multipart_request(&uri, &ada, &[("file", "notes.pdf", "application/pdf", "x")]))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "Unexpected field file. The field name must be called files"
        );

        let (status, _) = app
            .send(multipart_request(&uri, &ada, &[("files", "index.html", "text/html", "<p>")]))
            .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let pdf = ("files", "a.pdf", "application/pdf", "x");
        let (status, _) = app
            .send(multipart_request(&uri, &ada, &[pdf, pdf, pdf, pdf]))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.send(multipart_request(&uri, &grace, &[pdf])).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        assert!(app.katas.get(&id).unwrap().files.is_empty());
    }

    #[tokio::test]
    async fn test_upload_ignores_text_fields() {
        let app = TestApp::new();
        let (_, ada) = app.seed("Ada", UserRole::User);
        let id = create_kata(&app, &ada, json!({"name": "FizzBuzz"})).await;
        let uri = format!("/api/katas/files?id={id}");

        let (status, body) = app
            .send(multipart_request(
                &uri,
                &ada,
                &[
                    ("note", "", "", "hello"),
                    ("files", "notes.pdf", "application/pdf", "%PDF-1.4"),
                ],
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["files"].as_array().unwrap().len(), 1);
        assert_eq!(app.katas.get(&id).unwrap().files.len(), 1);

        // A form with only text parts still lacks the files field
        let (status, body) = app
            .send(multipart_request(&uri, &ada, &[("note", "", "", "hello")]))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "There is no files field");
    }

    #[tokio::test]
    async fn test_delete_kata() {
        let app = TestApp::new();
        let (_, ada) = app.seed("Ada", UserRole::User);
        let (_, grace) = app.seed("Grace", UserRole::User);
        let (_, admin) = app.seed("Root", UserRole::Admin);
        let id = create_kata(&app, &ada, json!({"name": "FizzBuzz"})).await;

        let (status, body) = app
            .send(multipart_request(
                &format!("/api/katas/files?id={id}"),
                &ada,
                &[("files", "notes.zip", "application/zip", "PK")],
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let filename = body["files"][0].as_str().unwrap().to_string();

        let uri = format!("/api/katas?id={id}");
        let (status, _) = app.send(empty_request("DELETE", &uri, &grace)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.send(empty_request("DELETE", &uri, &admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Kata with id {id} deleted successfully"));
        assert!(app.katas.is_empty());
        assert!(!app.storage.exists(&filename).await.unwrap());

        let (status, _) = app.send(empty_request("DELETE", &uri, &ada)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.send(empty_request("DELETE", "/api/katas", &ada)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Please, provide an ID to remove from database");
    }

    #[tokio::test]
    async fn test_user_katas() {
        let app = TestApp::new();
        let (ada_user, ada) = app.seed("Ada", UserRole::User);
        let (grace_user, _) = app.seed("Grace", UserRole::User);
        app.katas.seed("FizzBuzz", KataLevel::Basic, ada_user.user_id, vec![]);
        app.katas.seed("Bowling", KataLevel::Basic, grace_user.user_id, vec![]);

        let (status, body) = app
            .send(empty_request(
                "GET",
                &format!("/api/users/katas?id={}", ada_user.user_id),
                &ada,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"], "ada@example.com");
        assert_eq!(body["katas"].as_array().unwrap().len(), 1);
        assert_eq!(body["katas"][0]["name"], "FizzBuzz");
        assert_eq!(body["totalPages"], 1);

        let (status, body) = app.send(empty_request("GET", "/api/users/katas", &ada)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "ID from user is needed");

        let (status, _) = app
            .send(empty_request(
                "GET",
                &format!("/api/users/katas?id={}", KataId::new()),
                &ada,
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // The user routes next to it still answer
        let (status, _) = app.send(empty_request("GET", "/api/users", &ada)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
