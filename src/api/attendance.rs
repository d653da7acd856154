use crate::auth::auth::AuthUser;
use crate::service::check_in_window::CheckInWindowService;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use sqlx::MySqlPool;
use tracing::{info, instrument};

/// Check-in endpoint, allowed only inside an active check-in window
#[utoipa::path(
    post,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "check_in_window_id": 1
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Outside every check-in window, or no employee profile", body = Object, example = json!({
            "message": "Check-in is not allowed at this time",
            "reason": "Check-in is closed. Next window: Morning (08:00-10:00) on Tuesday",
            "next_window": {
                "window": { "id": 1, "name": "Morning", "start_time": "08:00", "end_time": "10:00" },
                "day": 2,
                "days_ahead": 1
            }
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(
    skip_all,
    fields(user_id = auth.user_id, user = %auth.username, company_id = auth.company_id)
)]
pub async fn check_in(
    auth: AuthUser,
    service: web::Data<CheckInWindowService>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let now = Local::now().naive_local();

    let decision = service.evaluate(auth.company_id, now).await?;

    let Some(window) = decision.active_window.as_ref() else {
        info!(
            employee_id,
            company_id = auth.company_id,
            reason = decision.reason.as_deref().unwrap_or_default(),
            "Check-in refused outside window"
        );
        return Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "message": "Check-in is not allowed at this time",
            "reason": decision.reason,
            "next_window": decision.next_window,
        })));
    };

    let (date, time) = stamp(now);
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (company_id, employee_id, check_in_window_id, date, check_in)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.company_id)
    .bind(employee_id)
    .bind(window.id)
    .bind(date)
    .bind(time)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Checked in successfully",
            "check_in_window_id": window.id
        }))),

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(
    skip_all,
    fields(user_id = auth.user_id, user = %auth.username, company_id = auth.company_id)
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let (date, time) = stamp(Local::now().naive_local());

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = ?
        WHERE employee_id = ?
        AND company_id = ?
        AND date = ?
        AND check_out IS NULL
        "#,
    )
    .bind(time)
    .bind(employee_id)
    .bind(auth.company_id)
    .bind(date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

/// Server-local date and second-precision time recorded for an attendance event.
fn stamp(now: NaiveDateTime) -> (NaiveDate, NaiveTime) {
    let time = now.time();
    (now.date(), time.with_nanosecond(0).unwrap_or(time))
}
