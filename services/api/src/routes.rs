use crate::infra::AppState;
use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use decision_helper::error::AppError;
use decision_helper::questionnaire::{
    parse_query, AnswerSet, Assessment, CatalogDocument, QuestionCatalog, QuestionnaireSession,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AssessmentRequest {
    #[serde(default)]
    pub(crate) answers: AnswerSet,
}

/// Questionnaire endpoints sharing one immutable catalog.
pub(crate) fn questionnaire_router(catalog: Arc<QuestionCatalog>) -> Router {
    Router::new()
        .route("/api/v1/questions", get(questions_endpoint))
        .route(
            "/api/v1/assessment",
            get(query_assessment_endpoint).post(assessment_endpoint),
        )
        .route("/api/v1/assessment/submit", post(submit_endpoint))
        .with_state(catalog)
}

pub(crate) fn with_service_routes(catalog: Arc<QuestionCatalog>) -> Router {
    questionnaire_router(catalog)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn questions_endpoint(
    State(catalog): State<Arc<QuestionCatalog>>,
) -> Json<CatalogDocument> {
    Json(catalog.to_document())
}

/// Scores the answers carried in a shared link's query string.
pub(crate) async fn query_assessment_endpoint(
    State(catalog): State<Arc<QuestionCatalog>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Assessment>, AppError> {
    let params = parse_query(query.as_deref().unwrap_or_default())?;
    let session = QuestionnaireSession::from_parameters(catalog, params.as_slice());
    Ok(Json(session.assessment()))
}

pub(crate) async fn assessment_endpoint(
    State(catalog): State<Arc<QuestionCatalog>>,
    Json(request): Json<AssessmentRequest>,
) -> Json<Assessment> {
    Json(Assessment::evaluate(&catalog, &request.answers))
}

/// Like [`assessment_endpoint`], but only once every question is answered.
pub(crate) async fn submit_endpoint(
    State(catalog): State<Arc<QuestionCatalog>>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<Assessment>, AppError> {
    let mut session = QuestionnaireSession::from_parameters(catalog, &request.answers);
    session.submit()?;
    Ok(Json(session.assessment()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn catalog() -> Arc<QuestionCatalog> {
        Arc::new(QuestionCatalog::standard())
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn query_assessment_scores_shared_link() {
        let Json(body) = query_assessment_endpoint(
            State(catalog()),
            RawQuery(Some("os_features=no&team_native=yes&utm_source=mail".to_string())),
        )
        .await
        .expect("assessment builds");

        assert!(body.recommendation.is_tie());
        assert_eq!(body.percentage("rn"), Some(50));
        assert_eq!(body.unanswered, 4);
        assert_eq!(body.share_query, "os_features=no&team_native=yes");
    }

    #[tokio::test]
    async fn query_assessment_without_query_is_an_even_split() {
        let Json(body) = query_assessment_endpoint(State(catalog()), RawQuery(None))
            .await
            .expect("assessment builds");
        assert_eq!(body.answered, 0);
        assert_eq!(body.percentage("native"), Some(50));
    }

    #[tokio::test]
    async fn posted_answers_are_scored() {
        let request = AssessmentRequest {
            answers: [("os_features", "yes"), ("sdk_availability", "yes")]
                .into_iter()
                .collect(),
        };
        let Json(body) = assessment_endpoint(State(catalog()), Json(request)).await;
        assert_eq!(body.recommendation.label(), "Native");
        assert_eq!(body.percentage("native"), Some(100));
    }

    #[tokio::test]
    async fn submit_rejects_incomplete_answers() {
        let app = questionnaire_router(catalog());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/assessment/submit")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"answers":{"budget":"yes"}}"#))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json_body(response).await;
        assert_eq!(body["unanswered"], 5);
    }

    #[tokio::test]
    async fn submit_accepts_complete_answers() {
        let app = questionnaire_router(catalog());
        let payload = json!({
            "answers": {
                "os_features": "no",
                "graphics_perf": "no",
                "team_web_ts": "yes",
                "team_native": "no",
                "budget": "yes",
                "sdk_availability": "no"
            }
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/assessment/submit")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["recommendation"]["outcome"], "favors");
        assert_eq!(body["recommendation"]["key"], "rn");
        assert_eq!(body["headline"], "React Native looks like a better fit.");
    }

    #[tokio::test]
    async fn questions_route_serves_catalog_document() {
        let app = questionnaire_router(catalog());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/questions")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["questions"].as_array().map(Vec::len), Some(6));
        assert_eq!(body["dimensions"][0]["abbreviation"], "RN");
        assert_eq!(body["questions"][0]["options"][1]["weights"]["native"], 1.5);
    }

    #[tokio::test]
    async fn assessment_route_decodes_query_string() {
        let app = questionnaire_router(catalog());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/assessment?budget=some&graphics_perf=bogus")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["answered"], 2);
        assert_eq!(body["breakdown"][1]["status"], "stale");
        // rn 1, native 0.5 -> 66.7%
        assert_eq!(body["dimensions"][0]["percentage"], 67);
    }

    #[tokio::test]
    async fn cancelling_weights_still_produce_a_full_split() {
        let catalog = QuestionCatalog::from_json_str(
            r#"{
                "dimensions": [
                    { "key": "rn", "label": "React Native" },
                    { "key": "native", "label": "Native" }
                ],
                "questions": [{
                    "id": "a",
                    "text": "Lopsided?",
                    "options": [{
                        "label": "Yes",
                        "value": "y",
                        "weights": { "rn": -1e10, "native": 10000000001 }
                    }]
                }]
            }"#,
        )
        .expect("catalog parses");
        let app = questionnaire_router(Arc::new(catalog));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/assessment?a=y")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        let rn = body["dimensions"][0]["percentage"].as_i64().expect("rn share");
        let native = body["dimensions"][1]["percentage"].as_i64().expect("native share");
        assert!(rn < 0);
        assert_eq!(rn + native, 100);
        assert_eq!(body["recommendation"]["key"], "native");
    }
}
