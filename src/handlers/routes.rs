use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::routes::{self, ScreenRoute};

// GET /api/routes
pub async fn list_routes() -> Json<&'static [ScreenRoute]> {
    Json(routes::ROUTES)
}

// GET /api/routes/title?path=
#[derive(Deserialize)]
pub struct TitleQuery {
    pub path: String,
}

#[derive(Serialize)]
pub struct TitleResponse {
    path: String,
    screen: Option<&'static str>,
    title: &'static str,
}

pub async fn route_title(Query(query): Query<TitleQuery>) -> Json<TitleResponse> {
    let screen = routes::find(&query.path).map(|r| r.screen);
    Json(TitleResponse {
        title: routes::title_for(&query.path),
        screen,
        path: query.path,
    })
}
