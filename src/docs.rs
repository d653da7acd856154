use crate::api::check_in_window::WindowListQuery;
use crate::model::check_in_window::{CheckInWindow, CreateCheckInWindow, UpdateCheckInWindow};
use crate::service::evaluator::{CheckInDecision, NextWindow};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presence API",
        version = "1.0.0",
        description = r#"
## Presence: attendance check-in windows

Each company defines recurring **check-in windows**: a daily time range
(`HH:mm`, server-local time) and the weekdays it applies to
(0 = Sunday .. 6 = Saturday).

### 🔹 Key Features
- **Check-in windows**
  - Create, list, update and delete a company's windows (CEO/HR)
  - Ask whether check-in is allowed right now, and when the next window opens
- **Attendance**
  - Check-in is accepted only inside an active window
  - Daily check-out

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token. The company is taken
from the token, never from the request.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::check_in_window::list_windows,
        crate::api::check_in_window::create_window,
        crate::api::check_in_window::update_window,
        crate::api::check_in_window::delete_window,
        crate::api::check_in_window::check_in_status,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out
    ),
    components(
        schemas(
            CheckInWindow,
            CreateCheckInWindow,
            UpdateCheckInWindow,
            WindowListQuery,
            CheckInDecision,
            NextWindow
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "CheckInWindow", description = "Check-in window configuration and evaluation"),
        (name = "Attendance", description = "Attendance check-in and check-out"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
