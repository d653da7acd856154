use crate::auth::auth::AuthUser;
use crate::model::check_in_window::{CheckInWindow, CreateCheckInWindow, UpdateCheckInWindow};
use crate::service::check_in_window::CheckInWindowService;
use crate::service::evaluator::CheckInDecision;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct WindowListQuery {
    #[schema(example = true)]
    /// Only active windows (default true)
    pub active_only: Option<bool>,
}

/// List check-in windows of the caller's company
#[utoipa::path(
    get,
    path = "/api/check-in-windows",
    params(WindowListQuery),
    responses(
        (status = 200, description = "Windows ordered by start time", body = [CheckInWindow]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "CheckInWindow"
)]
pub async fn list_windows(
    auth: AuthUser,
    service: web::Data<CheckInWindowService>,
    query: web::Query<WindowListQuery>,
) -> actix_web::Result<impl Responder> {
    let windows = service
        .list(auth.company_id, query.active_only.unwrap_or(true))
        .await?;

    Ok(HttpResponse::Ok().json(windows))
}

/// Create a check-in window (CEO/HR)
#[utoipa::path(
    post,
    path = "/api/check-in-windows",
    request_body = CreateCheckInWindow,
    responses(
        (status = 201, description = "Window created", body = CheckInWindow),
        (status = 400, description = "Invalid time format or end not after start", body = Object, example = json!({
            "message": "end_time (09:00) must be later than start_time (17:00)"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "CheckInWindow"
)]
#[instrument(
    skip_all,
    fields(user_id = auth.user_id, user = %auth.username, company_id = auth.company_id)
)]
pub async fn create_window(
    auth: AuthUser,
    service: web::Data<CheckInWindowService>,
    payload: web::Json<CreateCheckInWindow>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let window = service
        .create(auth.company_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(window))
}

/// Partially update a check-in window (CEO/HR)
#[utoipa::path(
    put,
    path = "/api/check-in-windows/{window_id}",
    params(
        ("window_id" = u64, Path, description = "Check-in window ID")
    ),
    request_body = UpdateCheckInWindow,
    responses(
        (status = 200, description = "Window updated", body = CheckInWindow),
        (status = 400, description = "Invalid time format or end not after start"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Window not found", body = Object, example = json!({
            "message": "Check-in window 42 not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "CheckInWindow"
)]
#[instrument(
    skip_all,
    fields(user_id = auth.user_id, user = %auth.username, company_id = auth.company_id)
)]
pub async fn update_window(
    auth: AuthUser,
    service: web::Data<CheckInWindowService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateCheckInWindow>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let window = service
        .update(auth.company_id, path.into_inner(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(window))
}

/// Delete a check-in window (CEO/HR)
#[utoipa::path(
    delete,
    path = "/api/check-in-windows/{window_id}",
    params(
        ("window_id" = u64, Path, description = "Check-in window ID")
    ),
    responses(
        (status = 204, description = "Window deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Window not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "CheckInWindow"
)]
#[instrument(
    skip_all,
    fields(user_id = auth.user_id, user = %auth.username, company_id = auth.company_id)
)]
pub async fn delete_window(
    auth: AuthUser,
    service: web::Data<CheckInWindowService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    service.remove(auth.company_id, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Whether check-in is allowed right now, and if not, when it opens next
#[utoipa::path(
    get,
    path = "/api/check-in-windows/status",
    responses(
        (status = 200, description = "Check-in decision", body = CheckInDecision),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "CheckInWindow"
)]
pub async fn check_in_status(
    auth: AuthUser,
    service: web::Data<CheckInWindowService>,
) -> actix_web::Result<impl Responder> {
    let decision = service
        .evaluate(auth.company_id, Local::now().naive_local())
        .await?;

    Ok(HttpResponse::Ok().json(decision))
}

#[cfg(test)]
mod tests {
    use crate::auth::jwt::{TokenType, testing};
    use crate::config::Config;
    use crate::routes;
    use crate::service::check_in_window::CheckInWindowService;
    use crate::store::memory::MemoryWindowStore;
    use actix_web::{App, http::StatusCode, test, web::Data};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn config() -> Config {
        Config::for_tests(testing::SECRET)
    }

    macro_rules! app {
        () => {{
            let service = CheckInWindowService::new(Arc::new(MemoryWindowStore::default()));
            test::init_service(
                App::new()
                    .app_data(Data::new(config()))
                    .app_data(Data::new(service))
                    .configure(|cfg| routes::configure(cfg, "/api")),
            )
            .await
        }};
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    fn morning() -> Value {
        json!({
            "name": "Morning",
            "start_time": "08:00",
            "end_time": "10:00",
            "days_of_week": [1, 2, 3]
        })
    }

    #[actix_web::test]
    async fn rejects_missing_and_refresh_tokens() {
        let app = app!();

        let req = test::TestRequest::get().uri("/api/check-in-windows").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let refresh = testing::token(1, "HR", None, TokenType::Refresh);
        let req = test::TestRequest::get()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&refresh))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn employees_cannot_create() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&testing::access_token(1, "EMPLOYEE")))
            .set_json(morning())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn admin_creates_and_members_list() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&testing::access_token(1, "CEO")))
            .set_json(morning())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["company_id"], 1);
        assert_eq!(created["days_of_week"], json!([1, 2, 3]));
        assert_eq!(created["is_active"], true);

        let req = test::TestRequest::get()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&testing::access_token(1, "EMPLOYEE")))
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["start_time"], "08:00");

        let req = test::TestRequest::get()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&testing::access_token(2, "EMPLOYEE")))
            .to_request();
        let other: Value = test::call_and_read_body_json(&app, req).await;
        assert!(other.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn validation_errors_carry_a_message() {
        let app = app!();

        let mut body = morning();
        body["end_time"] = json!("07:00");
        let req = test::TestRequest::post()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&testing::access_token(1, "HR")))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: Value = test::read_body_json(resp).await;
        let message = error["message"].as_str().unwrap();
        assert!(message.contains("must be later than"), "{message}");
    }

    #[actix_web::test]
    async fn update_delete_and_not_found() {
        let app = app!();
        let hr = testing::access_token(1, "HR");

        let req = test::TestRequest::post()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&hr))
            .set_json(morning())
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_u64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/check-in-windows/{id}"))
            .insert_header(bearer(&hr))
            .set_json(json!({ "is_active": false }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["is_active"], false);
        assert_eq!(updated["name"], "Morning");

        let req = test::TestRequest::get()
            .uri("/api/check-in-windows")
            .insert_header(bearer(&hr))
            .to_request();
        let active: Value = test::call_and_read_body_json(&app, req).await;
        assert!(active.as_array().unwrap().is_empty());

        let req = test::TestRequest::get()
            .uri("/api/check-in-windows?active_only=false")
            .insert_header(bearer(&hr))
            .to_request();
        let all: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.as_array().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/check-in-windows/{id}"))
            .insert_header(bearer(&hr))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/check-in-windows/{id}"))
            .insert_header(bearer(&hr))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn status_reports_a_decision() {
        let app = app!();

        let req = test::TestRequest::get()
            .uri("/api/check-in-windows/status")
            .insert_header(bearer(&testing::access_token(1, "EMPLOYEE")))
            .to_request();
        let decision: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(decision["allowed"], false);
        assert_eq!(decision["reason"], "No active check-in windows are configured");
    }
}
