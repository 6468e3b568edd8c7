use axum::{
    Router,
    routing::{get, post},
    middleware::from_fn_with_state,
};

pub mod config;
pub mod error;
pub mod state;
pub mod db;

pub mod models {
    pub mod todo;
}

pub mod repositories {
    pub mod todo;
    pub mod memory;
}

pub mod services {
    pub mod auth;
    pub mod todos;
}

pub mod handlers {
    pub mod auth;
    pub mod health;
    pub mod todos;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod todo;
}

use state::AppState;

/// Builds the API router.
///
/// Todo routes are guarded only when `config.require_auth` is set;
/// `/api/auth/me` is always guarded.
pub fn app(state: AppState) -> Router {
    let mut todo_routes = Router::new()
        .route(
            "/api/todos",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        .route(
            "/api/todos/",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        .route(
            "/api/todos/{todo_id}",
            get(handlers::todos::get_todo)
                .put(handlers::todos::update_todo)
                .delete(handlers::todos::delete_todo),
        );

    if state.config.require_auth {
        todo_routes = todo_routes.route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ));
    }

    let login_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ));

    Router::new()
        .route("/", get(handlers::health::health))
        .merge(todo_routes)
        .merge(login_routes)
        .merge(protected_routes)
        .with_state(state)
}
