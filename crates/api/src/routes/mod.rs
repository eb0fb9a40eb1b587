pub mod address;
pub mod auth;
pub mod client;
pub mod health;
pub mod lead;
pub mod message;
pub mod package;
pub mod payment;
pub mod pickup_location;
pub mod product;
pub mod product_review;
pub mod promo;
pub mod purchase_order;
pub mod qa;
pub mod shipment;
pub mod todo;
pub mod user;
pub mod user_group;
pub mod user_log;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login, /auth/confirm-email,
/// /auth/reset-password                             public
///
/// /clients/current                                 get, update
/// /users                                           CRUD + /email/{email}
/// /user-groups                                     CRUD
/// /addresses                                       CRUD + /user/{user_id}
/// /leads                                           CRUD + /bulk, /email/{email}
/// /messages                                        CRUD + /{id}/read, /user/{user_id}
/// /promos                                          create, bulk, page, get, toggle,
///                                                  /code/{code}, /{id}/discount
/// /packages                                        CRUD + /bulk, /all
/// /pickup-locations                                CRUD + /bulk
/// /products                                        CRUD + /{id}/return
/// /product-reviews                                 create, toggle, /{id}/score,
///                                                  /product/{product_id}/page
/// /purchase-orders                                 CRUD + /{id}/approve, /{id}/reject
/// /payments                                        /cash, /cash/follow-up, get,
///                                                  /purchase-order/{order_id}[/paid]
/// /shipments                                       create, page, get, /{id}/cancel
/// /todos                                           caller's own todos
/// /user-logs/page                                  audit log
///
/// /qa/executions[/{id}]                            start and poll a test run
/// /qa/test-runs, /qa/test-results                  record runs, read latest results
/// /qa/dashboard, /qa/coverage, /qa/services        coverage reporting
/// ```
///
/// CRUD means `POST /`, `POST /page`, `GET /{id}`, `PUT /{id}` and
/// `PATCH /{id}/toggle`. Every route outside `/auth` needs a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/clients", client::router())
        .nest("/users", user::router())
        .nest("/user-groups", user_group::router())
        .nest("/addresses", address::router())
        .nest("/leads", lead::router())
        .nest("/messages", message::router())
        .nest("/promos", promo::router())
        .nest("/packages", package::router())
        .nest("/pickup-locations", pickup_location::router())
        .nest("/products", product::router())
        .nest("/product-reviews", product_review::router())
        .nest("/purchase-orders", purchase_order::router())
        .nest("/payments", payment::router())
        .nest("/shipments", shipment::router())
        .nest("/todos", todo::router())
        .nest("/user-logs", user_log::router())
        .nest("/qa", qa::router())
}
