//! HTML pages: landing page with the inquiry form, and the admin page.
//!
//! Both are static shells. The form posts JSON to `/api/inquiry`; the admin
//! page checks `/api/admin/auth` and drives the inbox API from the browser.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::state::AppState;

/// Service card on the landing page.
#[derive(Debug, Clone)]
pub struct ServiceCard {
    pub title: &'static str,
    pub description: &'static str,
}

/// Services offered, in display order.
pub const SERVICES: &[ServiceCard] = &[
    ServiceCard {
        title: "대리운전 콜위탁",
        description: "대리운전 콜을 안정적으로 위탁 운영합니다.",
    },
    ServiceCard {
        title: "탁송 콜위탁",
        description: "탁송 콜 접수부터 배차까지 전문 상담사가 처리합니다.",
    },
    ServiceCard {
        title: "기사 모집",
        description: "검증된 기사님을 모집하고 연결해 드립니다.",
    },
    ServiceCard {
        title: "법인대리",
        description: "법인 고객 전용 대리운전 서비스를 제공합니다.",
    },
    ServiceCard {
        title: "일일기사",
        description: "필요한 날 필요한 만큼 기사를 배정합니다.",
    },
];

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub site_name: String,
    pub services: &'static [ServiceCard],
}

/// Admin page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub site_name: String,
}

/// Display the landing page.
///
/// GET /
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    IndexTemplate {
        site_name: state.config().site_name.clone(),
        services: SERVICES,
    }
}

/// Display the admin page.
///
/// GET /admin
#[instrument(skip(state))]
pub async fn admin(State(state): State<AppState>) -> impl IntoResponse {
    AdminTemplate {
        site_name: state.config().site_name.clone(),
    }
}
