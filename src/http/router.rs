use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Request, State},
    http::{Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use image::ImageFormat;
use serde::Serialize;
use tower::ServiceExt;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span};
use uuid::Uuid;

use crate::{
    analysis::{AnalysisPipeline, AnalysisReport, AnalysisRequest},
    color::Hsl,
    config::Configuration,
    error::AppError,
    http::{
        form::UploadForm,
        response::{analysis_failure, error_response, not_found},
    },
    season::Season,
    storage::UploadStore,
};

const PREVIOUS_IMAGE_FIELD: &str = "previousImageId";
const FACE_FIELD: &str = "faceCoords";
const HAIR_FIELD: &str = "hairCoords";
const EYE_FIELD: &str = "eyeCoords";

const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    message: &'static str,
    image_id: String,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisResponse {
    message: &'static str,
    image_id: String,
    dominant_color: String,
    color_palette: Vec<String>,
    detected_season: Season,
    outfit_suggestions: &'static [&'static str],
    face_color: String,
    hair_color: String,
    eye_color: String,
    face_hsl: Hsl,
    hair_hsl: Hsl,
    eye_hsl: Hsl,
}

impl AnalysisResponse {
    fn new(image_id: String, report: AnalysisReport) -> Self {
        let classification = report.classification;
        Self {
            message: "Image uploaded",
            image_id,
            dominant_color: report.dominant_color,
            color_palette: report.color_palette,
            detected_season: classification.detected_season,
            outfit_suggestions: classification.outfit_suggestions,
            face_color: report.face_rgb.to_string(),
            hair_color: report.hair_rgb.to_string(),
            eye_color: report.eye_rgb.to_string(),
            face_hsl: classification.face_hsl,
            hair_hsl: classification.hair_hsl,
            eye_hsl: classification.eye_hsl,
        }
    }
}

/// Shared by every handler: the upload directory and the analysis pipeline.
#[derive(Clone)]
pub struct AppState {
    store: UploadStore,
    analysis: AnalysisPipeline,
}

impl AppState {
    pub fn new(store: UploadStore, analysis: AnalysisPipeline) -> Self {
        Self { store, analysis }
    }
}

/// Routes plus the body limit, request timeout, CORS and request tracing.
///
/// Unmatched paths and methods answer `404 {"error": "Not found"}`.
/// `OPTIONS` on any path is answered by the CORS layer.
pub fn create_router(state: AppState, configuration: &Configuration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(CORS_METHODS);
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .route("/", get(hello).fallback(unmatched))
        .route("/upload", post(upload).fallback(unmatched))
        .route("/analyse", post(analyse).fallback(unmatched))
        .route("/uploads/:image_id", get(serve_upload).fallback(unmatched))
        .route("/delete/:image_id", delete(delete_upload).fallback(unmatched))
        .fallback(unmatched)
        .layer(DefaultBodyLimit::max(configuration.max_body_bytes))
        .layer(TimeoutLayer::new(configuration.request_timeout()))
        .layer(cors)
        .layer(trace)
        .with_state(state)
}

async fn hello() -> Html<&'static str> {
    Html("Hello World!")
}

async fn unmatched() -> Response {
    not_found()
}

fn no_file() -> Response {
    error_response(StatusCode::BAD_REQUEST, "No file uploaded")
}

async fn upload(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> Result<Response, AppError> {
    info!("Processing upload");
    let Some(image) = form.take_image() else {
        return Ok(no_file());
    };

    if let Some(previous) = form.text(PREVIOUS_IMAGE_FIELD).filter(|id| !id.is_empty()) {
        if let Err(e) = state.store.remove(previous).await {
            error!("Error deleting image: {}", e);
        }
    }

    let image_id = state.store.save(&image.file_name, &image.data).await?;
    Ok(Json(UploadResponse {
        success: true,
        message: "Image uploaded",
        image_id,
    })
    .into_response())
}

async fn analyse(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> Result<Response, AppError> {
    info!("Processing image");
    let Some(image) = form.take_image() else {
        return Ok(no_file());
    };
    let face = form.coordinates(FACE_FIELD)?;
    let hair = form.coordinates(HAIR_FIELD)?;
    let eye = form.coordinates(EYE_FIELD)?;

    let image_id = state.store.save(&image.file_name, &image.data).await?;
    let result = state
        .analysis
        .clone()
        .oneshot(AnalysisRequest {
            image: image.data,
            face,
            hair,
            eye,
        })
        .await;

    if let Err(e) = state.store.remove(&image_id).await {
        error!("Error deleting image: {}", e);
    }

    match result {
        Ok(report) => {
            info!(
                "Image {} classified as {}",
                image_id, report.classification.detected_season
            );
            Ok(Json(AnalysisResponse::new(image_id, report)).into_response())
        }
        Err(e) => Ok(analysis_failure(e)),
    }
}

async fn serve_upload(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Response, AppError> {
    let data = state.store.read(&image_id).await?;
    let content_type = ImageFormat::from_path(&image_id)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}

async fn delete_upload(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Response {
    match state.store.remove(&image_id).await {
        Ok(()) => Json(DeleteResponse {
            success: true,
            message: "Image deleted",
        })
        .into_response(),
        Err(e) => {
            error!("Error deleting image: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting image")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{create_analysis_pipeline, service::tests::portrait_png},
        http::form::tests::{Part, content_type, encode},
        storage::upload_store::tests::temp_dir,
    };
    use axum::body::{Body, Bytes, to_bytes};
    use axum::http::Request as HttpRequest;
    use serde_json::Value;
    use std::{
        path::{Path, PathBuf},
        time::Duration,
    };

    async fn router_with(configuration: &Configuration) -> (Router, PathBuf) {
        let dir = temp_dir();
        let store = UploadStore::open(&dir).await.unwrap();
        let state = AppState::new(store, create_analysis_pipeline(configuration));
        (create_router(state, configuration), dir)
    }

    async fn router() -> (Router, PathBuf) {
        router_with(&Configuration::default()).await
    }

    fn empty(method: Method, uri: &str) -> Request {
        HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request {
        HttpRequest::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type())
            .body(Body::from(encode(parts)))
            .unwrap()
    }

    async fn send(router: &Router, request: Request) -> Response {
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn uploads_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn analyse_parts<'a>(png: &'a [u8], face: &'a str) -> [Part<'a>; 4] {
        [
            Part::File("image", "portrait.png", png),
            Part::Text("faceCoords", face),
            Part::Text("hairCoords", r#"{"x":1,"y":1}"#),
            Part::Text("eyeCoords", r#"{"x":2,"y":2}"#),
        ]
    }

    #[tokio::test]
    async fn test_root_says_hello() {
        let (router, dir) = router().await;
        let response = send(&router, empty(Method::GET, "/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(body_bytes(response).await, "Hello World!");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_unknown_route_and_method_are_404() {
        let (router, dir) = router().await;
        let response = send(&router, empty(Method::GET, "/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Not found");

        let response = send(&router, empty(Method::PUT, "/upload")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_options_is_preflight() {
        let (router, dir) = router().await;
        let request = HttpRequest::builder()
            .method(Method::OPTIONS)
            .uri("/analyse")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = send(&router, request).await;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("POST"));
        assert!(methods.contains("DELETE"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_analyse_classifies_and_cleans_up() {
        let (router, dir) = router().await;
        let png = portrait_png();
        let request = multipart_request("/analyse", &analyse_parts(&png, r#"{"x":0,"y":0}"#));

        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Image uploaded");
        assert_eq!(body["detectedSeason"], "True Spring");
        assert_eq!(
            body["outfitSuggestions"],
            serde_json::json!(["Bright coral", "Leaf green", "Golden yellow"])
        );
        assert_eq!(body["faceColor"], "rgb(204,122,61)");
        assert_eq!(body["hairColor"], "rgb(176,110,44)");
        assert_eq!(body["eyeColor"], "rgb(191,125,64)");
        assert_eq!(body["dominantColor"], "#f0dcc8");
        assert_eq!(body["colorPalette"][0], "#f0dcc8");
        assert!(body["faceHsl"]["h"].is_f64());
        assert!(
            body["imageId"]
                .as_str()
                .unwrap()
                .ends_with("-portrait.png")
        );
        assert_eq!(uploads_in(&dir), 0);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_analyse_without_file() {
        let (router, dir) = router().await;
        let request = multipart_request("/analyse", &[Part::Text("faceCoords", "{}")]);
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "No file uploaded");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_analyse_with_bad_coordinates() {
        let (router, dir) = router().await;
        let png = portrait_png();
        let request = multipart_request("/analyse", &analyse_parts(&png, "not json"));
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(uploads_in(&dir), 0);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_analyse_out_of_bounds_is_processing_error() {
        let (router, dir) = router().await;
        let png = portrait_png();
        let request = multipart_request("/analyse", &analyse_parts(&png, r#"{"x":40,"y":0}"#));
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "Error processing image");
        assert_eq!(uploads_in(&dir), 0);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_upload_serve_and_delete() {
        let (router, dir) = router().await;
        let png = portrait_png();

        let response = send(
            &router,
            multipart_request("/upload", &[Part::File("image", "first.png", &png)]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        let first_id = body["imageId"].as_str().unwrap().to_string();

        let response = send(&router, empty(Method::GET, &format!("/uploads/{first_id}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(body_bytes(response).await, png);

        let response = send(&router, empty(Method::HEAD, &format!("/uploads/{first_id}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert!(body_bytes(response).await.is_empty());

        // a second upload replaces the first
        let response = send(
            &router,
            multipart_request(
                "/upload",
                &[
                    Part::File("image", "second.png", &png),
                    Part::Text("previousImageId", &first_id),
                ],
            ),
        )
        .await;
        let second_id = json_body(response).await["imageId"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(uploads_in(&dir), 1);

        let response = send(&router, empty(Method::GET, &format!("/uploads/{first_id}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&router, empty(Method::DELETE, &format!("/delete/{second_id}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Image deleted");
        assert_eq!(uploads_in(&dir), 0);

        let response = send(&router, empty(Method::DELETE, &format!("/delete/{second_id}"))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "Error deleting image");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_upload_requires_multipart() {
        let (router, dir) = router().await;
        let request = HttpRequest::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_traversal_ids_are_rejected() {
        let (router, dir) = router().await;
        let response = send(&router, empty(Method::GET, "/uploads/..%2FCargo.toml")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let configuration = Configuration {
            max_body_bytes: 64,
            ..Configuration::default()
        };
        let (router, dir) = router_with(&configuration).await;
        let big = vec![7u8; 4096];
        let request = multipart_request("/upload", &[Part::File("image", "big.png", &big)]);
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(uploads_in(&dir), 0);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        let configuration = Configuration {
            request_timeout_secs: 1,
            ..Configuration::default()
        };
        let (router, dir) = router_with(&configuration).await;
        let never = futures::stream::pending::<Result<Bytes, std::io::Error>>();
        let request = HttpRequest::builder()
            .method(Method::POST)
            .uri("/analyse")
            .header(header::CONTENT_TYPE, content_type())
            .header(header::CONTENT_LENGTH, "20000000")
            .body(Body::from_stream(never))
            .unwrap();

        let response = tokio::time::timeout(Duration::from_secs(3), send(&router, request))
            .await
            .expect("stalled request was not cut off");
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(uploads_in(&dir), 0);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
