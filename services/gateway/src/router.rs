use crate::handlers::{self, account, admin, business, trading};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/login", post(account::login))
        .route("/register", post(account::register))
        .route("/user/{id}", get(account::get_user))
        .route("/businesses", get(business::list_businesses))
        .route("/businesses/owner/{user_id}", get(business::businesses_by_owner))
        .route("/business", post(business::create_business))
        .route(
            "/business/{id}",
            get(business::get_business)
                .put(business::update_business)
                .delete(business::delete_business),
        )
        .route("/business/{id}/product", post(business::add_product))
        .route(
            "/business/{id}/product/{product_id}",
            put(business::update_product).delete(business::delete_product),
        )
        .route("/purchase", post(trading::purchase))
        .route("/market", get(trading::get_market))
        .route("/market/update", post(trading::update_market))
        .route("/trade", post(trading::trade))
        .route("/transactions", get(trading::list_transactions))
        .route("/transactions/user/{id}", get(trading::user_transactions))
        .route("/portfolio/{user_id}", get(trading::portfolio))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/reset", post(admin::reset));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
