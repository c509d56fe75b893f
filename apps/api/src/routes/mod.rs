pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{
    accounts, careers, catalog, credits, cv, jobs, notifications, scraping, settings, survey, ws,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ws/notifications", get(ws::ws_handler))
        .nest("/api/v1", api_routes())
        .nest("/api/v1/admin", admin_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/auth/register", post(accounts::handlers::handle_register))
        .route("/auth/login", post(accounts::handlers::handle_login))
        .route(
            "/me",
            get(accounts::handlers::handle_get_me).patch(accounts::handlers::handle_update_me),
        )
        // CVs
        .route(
            "/cvs",
            get(cv::handlers::handle_list_cvs).post(cv::handlers::handle_create_cv),
        )
        .route(
            "/cvs/:id",
            get(cv::handlers::handle_get_cv).delete(cv::handlers::handle_delete_cv),
        )
        .route("/cvs/:id/data", put(cv::handlers::handle_save_cv_data))
        .route(
            "/templates",
            get(cv::handlers::handle_list_abstract_templates),
        )
        // Jobs
        .route("/jobs", get(jobs::handlers::handle_list_jobs))
        .route("/jobs/:id", get(jobs::handlers::handle_get_job))
        .route(
            "/jobs/:id/favorite",
            put(jobs::handlers::handle_add_favorite).delete(jobs::handlers::handle_remove_favorite),
        )
        .route("/jobs/:id/click", post(jobs::handlers::handle_record_click))
        .route("/jobs/:id/apply", post(jobs::handlers::handle_mark_applied))
        .route("/favorites", get(jobs::handlers::handle_list_favorites))
        .route(
            "/search-terms",
            get(jobs::handlers::handle_recent_search_terms),
        )
        .route(
            "/search-terms/:id",
            delete(jobs::handlers::handle_dismiss_search_term),
        )
        // Careers
        .route("/careers", get(careers::handlers::handle_list_careers))
        .route(
            "/careers/recommended",
            get(careers::handlers::handle_recommended_careers),
        )
        // Survey
        .route("/languages", get(survey::handlers::handle_list_languages))
        .route("/answer-sets", get(survey::handlers::handle_list_answer_sets))
        .route("/questions", get(survey::handlers::handle_list_questions))
        .route("/questions/:id", get(survey::handlers::handle_get_question))
        .route(
            "/questions/:id/responses",
            post(survey::handlers::handle_submit_response),
        )
        .route("/responses", get(survey::handlers::handle_list_responses))
        // Catalog
        .route("/packs", get(catalog::handlers::handle_list_packs))
        .route("/ads", get(catalog::handlers::handle_list_ads))
        // Credits
        .route(
            "/credit-actions",
            get(credits::handlers::handle_list_credit_actions),
        )
        .route("/credits/spend", post(credits::handlers::handle_spend_credits))
        .route(
            "/credits/orders",
            get(credits::handlers::handle_list_orders).post(credits::handlers::handle_create_order),
        )
        .route(
            "/credits/purchases",
            get(credits::handlers::handle_list_purchases),
        )
        .route("/settings", get(settings::handlers::handle_public_settings))
        // Notifications
        .route(
            "/notifications",
            get(notifications::handlers::handle_list_notifications),
        )
        .route(
            "/notifications/:id/viewed",
            post(notifications::handlers::handle_mark_viewed),
        )
}

/// Staff-only routes. Every handler takes a `StaffUser`.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/templates",
            post(cv::handlers::handle_create_abstract_template),
        )
        .route("/jobs/import", post(jobs::handlers::handle_import_jobs))
        .route("/jobs/export", get(jobs::handlers::handle_export_jobs))
        .route(
            "/keywords",
            get(scraping::handle_list_keywords).post(scraping::handle_create_keyword),
        )
        .route(
            "/locations",
            get(scraping::handle_list_locations).post(scraping::handle_create_location),
        )
        .route("/combinations", get(scraping::handle_list_combinations))
        .route("/careers", post(careers::handlers::handle_create_career))
        .route(
            "/careers/:id/translations",
            post(careers::handlers::handle_create_translation),
        )
        .route(
            "/candidates/:id/careers",
            post(careers::handlers::handle_recommend_career),
        )
        .route("/questions", post(survey::handlers::handle_create_question))
        .route("/questions/:id", put(survey::handlers::handle_update_question))
        .route(
            "/questions/:id/options",
            get(survey::handlers::handle_question_options),
        )
        .route(
            "/group-identifiers",
            get(survey::handlers::handle_list_group_identifiers),
        )
        .route(
            "/answer-sets",
            post(survey::handlers::handle_create_answer_set),
        )
        .route(
            "/answer-sets/:id/options",
            post(survey::handlers::handle_create_answer_option),
        )
        .route("/packs", post(catalog::handlers::handle_create_pack))
        .route(
            "/packs/:id/prices",
            post(catalog::handlers::handle_create_price),
        )
        .route("/ads", post(catalog::handlers::handle_create_ad))
        .route("/ads/:id", put(catalog::handlers::handle_update_ad))
        .route(
            "/credit-actions",
            post(credits::handlers::handle_save_credit_action),
        )
        .route(
            "/credits/orders/:order_id/complete",
            post(credits::handlers::handle_complete_order),
        )
        .route(
            "/credits/purchases",
            get(credits::handlers::handle_list_all_purchases),
        )
        .route(
            "/settings/general",
            get(settings::handlers::handle_get_general_settings)
                .put(settings::handlers::handle_update_general_settings),
        )
        .route(
            "/settings/scraping",
            get(settings::handlers::handle_get_scraping_setting)
                .post(settings::handlers::handle_create_scraping_setting),
        )
        .route(
            "/settings/scraping/:id",
            put(settings::handlers::handle_update_scraping_setting),
        )
        .route(
            "/notifications",
            post(notifications::handlers::handle_create_notification),
        )
}
