use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower_cookies::Cookie;
use uuid::Uuid;

use stride::auth::{self, UserClaims};
use stride::engine::ProgressAggregate;
use stride::model::MemoryProgressStore;
use stride::web::middlewares::AUTH_TOKEN;
use stride::{Config, build_server_with_store};

pub async fn setup_server() -> TestServer {
    let store = Arc::new(MemoryProgressStore::new());
    let (_state, app) = build_server_with_store(store).await.unwrap();
    TestServer::new(app).unwrap()
}

/// Server with a session cookie for `user_id` already set. The session layer
/// is an external collaborator; tests mint its token directly.
pub async fn signed_in_server(user_id: Uuid) -> TestServer {
    let mut server = setup_server().await;
    let config = Config::get_or_init(true).await;
    let token =
        auth::generate_token(UserClaims::for_user(user_id, 1), config.app().jwt()).unwrap();
    server.add_cookie(Cookie::new(AUTH_TOKEN, token));
    server
}

pub fn aggregate(body: &str) -> ProgressAggregate {
    serde_json::from_str(body).expect("Invalid aggregate body format")
}

#[derive(Debug)]
pub struct FlowContext {
    pub store: HashMap<&'static str, Value>, // a way to pass data between steps
}

impl FlowContext {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn store(&mut self, key: &'static str, val: Value) {
        self.store.insert(key, val);
    }

    pub fn get(&self, key: &str) -> &Value {
        self.store.get(key).expect("missing store key")
    }

    #[allow(unused)]
    pub fn get_json<'de, T>(&self, key: &str) -> T
    where
        T: DeserializeOwned,
    {
        let obj = self.get(key);
        let de: T = serde_json::from_value(obj.clone()).expect("Invalid json format");
        de
    }
}

pub struct Action {
    #[allow(unused)]
    pub name: &'static str,
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub expect: StatusCode,
    pub body_asserts: Vec<Box<dyn Fn(&str) + Send + Sync>>,
    pub save_as: Option<&'static str>,
}

impl Action {
    pub fn new(name: &'static str, method: &'static str, path: String) -> Self {
        Self {
            name,
            method,
            path,
            body: None,
            expect: StatusCode::OK,
            body_asserts: vec![],
            save_as: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_expect(mut self, expect: StatusCode) -> Self {
        self.expect = expect;
        self
    }

    #[allow(unused)]
    pub fn with_save_as(mut self, key: &'static str) -> Self {
        self.save_as = Some(key);
        self
    }

    pub fn assert_body<F>(mut self, check: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.body_asserts.push(Box::new(check));
        self
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub async fn run(self, server: &mut TestServer) {
        let mut ctx = FlowContext::new(); // create new context for this flow
        for action in self.actions {
            println!("==> Running test action `{}`", action.name);

            let mut req = match action.method {
                "GET" => server.get(&action.path),
                "POST" => server.post(&action.path),
                "PUT" => server.put(&action.path),
                "DELETE" => server.delete(&action.path),
                _ => panic!("unsupported method {}", action.method),
            };

            if let Some(body) = action.body {
                req = req.json(&body);
            }

            let resp = req.await;
            resp.assert_status(action.expect);

            if !action.body_asserts.is_empty() {
                let body = resp.json::<Value>();
                let body = serde_json::to_string(&body)
                    .unwrap_or_else(|_| panic!("Unable to serialize body to string"));
                for check in action.body_asserts {
                    check(&body);
                }
            }

            if let Some(save_key) = action.save_as {
                let body = resp.json::<Value>();
                ctx.store(save_key, body);
            }
        }
    }
}

// Common actions builders

pub fn start_lesson_action(name: &'static str, lesson_id: Uuid) -> Action {
    Action::new(name, "POST", format!("/api/v1/lessons/{lesson_id}/start"))
}

pub fn complete_lesson_action(
    name: &'static str,
    lesson_id: Uuid,
    score: i64,
    time_spent: i64,
) -> Action {
    Action::new(name, "POST", format!("/api/v1/lessons/{lesson_id}/complete")).with_body(json!({
        "score": score,
        "time_spent": time_spent,
        "completion_type": "score_based",
    }))
}

pub fn enroll_course_action(name: &'static str, course_id: Uuid, total_lessons: u32) -> Action {
    Action::new(name, "POST", format!("/api/v1/courses/{course_id}/enroll")).with_body(json!({
        "total_lessons": total_lessons,
    }))
}

pub fn recompute_course_action(
    name: &'static str,
    course_id: Uuid,
    lesson_ids: &[Uuid],
) -> Action {
    Action::new(name, "POST", format!("/api/v1/courses/{course_id}/recompute")).with_body(json!({
        "lesson_ids": lesson_ids,
    }))
}

pub fn submit_quiz_action(
    name: &'static str,
    quiz_id: Uuid,
    score: i64,
    time_spent: i64,
) -> Action {
    Action::new(name, "POST", format!("/api/v1/quizzes/{quiz_id}/submit")).with_body(json!({
        "score": score,
        "time_spent": time_spent,
    }))
}
