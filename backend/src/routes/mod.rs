//! Route definitions for Rekod Pejabat

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (session endpoints public, profile protected)
        .nest("/auth", auth_routes(state.clone()))
        // Public shared reports (the signed token is the credential)
        .route("/public/laporan/:token", get(handlers::get_shared_report))
        // Protected routes
        .merge(protected_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
}

/// Everything behind the JWT middleware
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/roles", role_routes())
        .nest("/users", user_routes())
        .nest("/surat", surat_routes())
        .nest("/bayaran", bayaran_routes())
        .nest("/fail", fail_routes())
        .route("/laporan/share", post(handlers::create_share_link))
        .route("/dashboard", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Role management routes
fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_roles).post(handlers::create_role))
        .route("/permissions", get(handlers::list_permissions))
        .route(
            "/:role_id",
            get(handlers::get_role)
                .put(handlers::update_role)
                .delete(handlers::delete_role),
        )
        .route("/:role_id/permissions", put(handlers::update_role_permissions))
}

/// User administration routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route("/:user_id/role", put(handlers::assign_user_role))
}

/// Correspondence routes
fn surat_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_surat).post(handlers::create_surat))
        .route("/export", get(handlers::export_surat))
        .route(
            "/:id",
            get(handlers::get_surat)
                .put(handlers::update_surat)
                .delete(handlers::delete_surat),
        )
}

/// Payment routes
fn bayaran_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_bayaran).post(handlers::create_bayaran))
        .route("/export", get(handlers::export_bayaran))
        .route(
            "/:id",
            get(handlers::get_bayaran)
                .put(handlers::update_bayaran)
                .delete(handlers::delete_bayaran),
        )
}

/// File index routes
fn fail_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_fail).post(handlers::create_fail))
        .route(
            "/:id",
            get(handlers::get_fail)
                .put(handlers::update_fail)
                .delete(handlers::delete_fail),
        )
}
