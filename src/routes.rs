// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::handlers;
use crate::middleware::{auth::auth_guard, cron::cron_guard, rbac::master_guard};

// Folga sobre o limite de 5 MB da foto para o envelope multipart
const PHOTO_BODY_LIMIT: usize = 6 * 1024 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let public_routes = Router::new()
        .route(
            "/health",
            get(handlers::health::health).post(handlers::health::health),
        )
        .nest("/auth", auth_routes);

    // Rotas autenticadas; o papel exigido é checado por handler (RequireRole)
    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let customer_routes = Router::new()
        .route("/", get(handlers::customers::list_customers))
        .route("/me", get(handlers::customers::get_my_profile))
        .route("/{id}", delete(handlers::customers::delete_customer))
        .route("/{id}/block", patch(handlers::customers::set_blocked));

    let pet_routes = Router::new()
        .route(
            "/",
            get(handlers::customers::list_pets).post(handlers::customers::create_pet),
        )
        .route("/{id}", delete(handlers::customers::delete_pet))
        .route(
            "/{id}/photo",
            post(handlers::customers::upload_pet_photo)
                .layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        );

    let catalog_routes = Router::new()
        .route(
            "/services",
            get(handlers::catalog::list_services).post(handlers::catalog::create_service),
        )
        .route(
            "/products",
            get(handlers::catalog::list_products).post(handlers::catalog::create_product),
        );

    let package_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::list_packages).post(handlers::catalog::create_package),
        )
        .route("/{id}", delete(handlers::catalog::delete_package));

    let quote_routes = Router::new()
        .route(
            "/",
            post(handlers::quotes::create_quote).get(handlers::quotes::list_quotes),
        )
        .route(
            "/{id}",
            get(handlers::quotes::get_quote).delete(handlers::quotes::delete_quote),
        )
        .route("/{id}/status", patch(handlers::quotes::update_quote_status))
        .route("/{id}/schedule", post(handlers::quotes::schedule_quote));

    let appointment_routes = Router::new()
        .route("/", get(handlers::appointments::list_appointments))
        .route(
            "/{id}/status",
            patch(handlers::appointments::update_appointment_status),
        );

    let invoice_routes = Router::new()
        .route("/", get(handlers::appointments::list_invoices))
        .route("/{id}/pdf", get(handlers::appointments::invoice_pdf))
        .route("/{id}/payments", post(handlers::appointments::record_payment));

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::inbox))
        .route("/subscribe", post(handlers::notifications::subscribe))
        .route("/unsubscribe", post(handlers::notifications::unsubscribe))
        .route("/subscriptions", get(handlers::notifications::list_subscriptions))
        .route("/read-all", put(handlers::notifications::mark_all_read))
        .route("/{id}/read", put(handlers::notifications::mark_read))
        .route("/test", post(handlers::notifications::send_test));

    let support_routes = Router::new()
        .route(
            "/",
            post(handlers::support::open_ticket).get(handlers::support::list_tickets),
        )
        .route("/{id}/status", patch(handlers::support::update_ticket_status));

    let hr_routes = Router::new()
        .route(
            "/staff",
            get(handlers::hr::list_staff).post(handlers::hr::hire_staff),
        )
        .route(
            "/pay-periods",
            post(handlers::hr::create_pay_period).get(handlers::hr::list_pay_periods),
        )
        .route("/pay-periods/{id}/adjustments", post(handlers::hr::add_adjustment))
        .route("/pay-periods/{id}/close", post(handlers::hr::close_pay_period))
        .route("/pay-periods/{id}/statements", get(handlers::hr::period_statements))
        .route("/statements/me", get(handlers::hr::my_statements));

    let time_tracking_routes = Router::new()
        .route("/clock-in", post(handlers::time_tracking::clock_in))
        .route("/clock-out", post(handlers::time_tracking::clock_out))
        .route("/entries", get(handlers::time_tracking::my_entries))
        .route("/entries/all", get(handlers::time_tracking::all_entries));

    let ai_routes = Router::new().route("/completions", post(handlers::ai::complete));

    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/customers", customer_routes)
        .nest("/pets", pet_routes)
        .nest("/catalog", catalog_routes)
        .nest("/packages", package_routes)
        .nest("/quotes", quote_routes)
        .nest("/appointments", appointment_routes)
        .nest("/invoices", invoice_routes)
        .nest("/notifications", notification_routes)
        .nest("/support", support_routes)
        .nest("/hr", hr_routes)
        .nest("/time-tracking", time_tracking_routes)
        .nest("/ai", ai_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Grupo exclusivo do MASTER. A última camada roda primeiro:
    // auth_guard coloca a identidade, master_guard confere o papel.
    let notification_settings_routes = Router::new()
        .route("/settings", get(handlers::notification_settings::list_settings))
        .route(
            "/settings/{type}",
            put(handlers::notification_settings::update_setting),
        )
        .route("/users", get(handlers::notification_settings::list_users))
        .route(
            "/users/{user_id}/preferences",
            get(handlers::notification_settings::user_preferences),
        )
        .route(
            "/users/{user_id}/preferences/{type}",
            put(handlers::notification_settings::update_user_preference),
        )
        .route(
            "/preferences/bulk",
            put(handlers::notification_settings::bulk_update_preferences),
        )
        .route("/stats", get(handlers::notification_settings::stats));

    let master_routes = Router::new()
        .nest("/notification-settings", notification_settings_routes)
        .route(
            "/admin/quotes/normalize-status",
            post(handlers::admin::normalize_quote_statuses),
        )
        .layer(axum_middleware::from_fn(master_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Agendador externo, autenticado pelo CRON_SECRET
    let cron_routes = Router::new()
        .route("/cron/notifications", post(handlers::cron::dispatch_notifications))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            cron_guard,
        ));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(master_routes)
        .merge(cron_routes);

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .with_state(app_state)
}
