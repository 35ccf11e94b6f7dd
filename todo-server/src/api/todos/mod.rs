//! Todo API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/todos | GET | active todos, `?state=` filters one partition |
//! | /api/todos | POST | create, appended to its partition |
//! | /api/todos/batch-order | POST | atomic batch of order (and state) writes |
//! | /api/todos/{id} | GET / PUT / DELETE | fetch, partial update, soft delete |
//! | /api/todos/{id}/order | PATCH | set one order value |
//! | /api/todos/{id}/toggle | PATCH | flip pending/completed |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/todos", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/batch-order", post(handler::batch_order))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/order", patch(handler::set_order))
        .route("/{id}/toggle", patch(handler::toggle))
}
