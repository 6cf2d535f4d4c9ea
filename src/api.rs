//! HTTP surface: the `/fetch` and `/download` routes plus their JSON
//! request/response shapes.
//!
//! Error reporting is deliberately coarse. The client sees exactly two
//! failure shapes per route: a 400 for input rejected before any extractor
//! call, and a 500 with a fixed message for anything that goes wrong
//! downstream. The underlying causes land in the log instead.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::download::{resolve_output_path, select_format};
use crate::duration::display_to_seconds;
use crate::youtube::{Extractor, is_video_url};

const INVALID_URL_MESSAGE: &str = "Invalid or missing URL";
const FETCH_FAILED_MESSAGE: &str = "Error fetching video details";
const DOWNLOAD_FAILED_MESSAGE: &str = "Error downloading video/audio";

/// State shared by every request. Requests never share anything mutable;
/// concurrent downloads racing on the same resolved path are resolved by the
/// filesystem, last write wins.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub download_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            extractor: Arc::new(Extractor::new(&config.ytdlp_program)),
            download_dir: config.download_dir.clone(),
        }
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn invalid_url() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: INVALID_URL_MESSAGE,
        }
    }

    fn fetch_failed() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: FETCH_FAILED_MESSAGE,
        }
    }

    fn download_failed() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: DOWNLOAD_FAILED_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, headers, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Body of `POST /fetch`. The URL is optional at the schema level so a
/// missing field produces the service's own 400 rather than a framework
/// rejection.
#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub title: String,
    pub duration: String,
    pub duration_sec: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub video_id: String,
}

/// Body of `POST /download`. The three media-kind flags are accepted because
/// existing clients send them; nothing here interprets them.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: Option<String>,
    pub format_id: Option<String>,
    pub title: Option<String>,
    pub songaudio: Option<bool>,
    pub songvideo: Option<bool>,
    pub video: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub file_path: String,
}

/// Builds the two-route router around the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fetch", post(fetch_video))
        .route("/download", post(download_media))
        .with_state(state)
}

/// Rejects requests whose URL is absent, empty, or not recognizably YouTube.
/// Runs before any extractor call.
fn validated_url(url: Option<&str>) -> ApiResult<&str> {
    match url {
        Some(url) if !url.is_empty() && is_video_url(url) => Ok(url),
        _ => Err(ApiError::invalid_url()),
    }
}

/// `POST /fetch`: look up title, duration, and thumbnail for a video URL.
async fn fetch_video(
    State(state): State<AppState>,
    Json(request): Json<FetchRequest>,
) -> ApiResult<Json<FetchResponse>> {
    let url = validated_url(request.url.as_deref())?;

    let hit = state.extractor.search_first(url).await.map_err(|err| {
        warn!("search failed for {url}: {err:#}");
        ApiError::fetch_failed()
    })?;

    let duration = hit.duration_string.clone().unwrap_or_default();
    let response = FetchResponse {
        title: hit.display_title().to_owned(),
        duration_sec: display_to_seconds(&duration),
        duration,
        thumbnail: hit.primary_thumbnail().map(str::to_owned),
        video_id: hit.id.clone(),
    };

    Ok(Json(response))
}

/// `POST /download`: start a format download and answer with the destination
/// path without waiting for the transfer to finish.
async fn download_media(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> ApiResult<Json<DownloadResponse>> {
    let url = validated_url(request.url.as_deref())?.to_owned();

    let info = state.extractor.fetch_video_info(&url).await.map_err(|err| {
        warn!("info lookup failed for {url}: {err:#}");
        ApiError::download_failed()
    })?;

    let format = select_format(&info, request.format_id.as_deref()).ok_or_else(|| {
        warn!("no downloadable formats reported for {url}");
        ApiError::download_failed()
    })?;

    let output_path = resolve_output_path(
        &state.download_dir,
        request.title.as_deref(),
        &info,
        format.ext,
    );

    tokio::fs::create_dir_all(&state.download_dir)
        .await
        .map_err(|err| {
            warn!("creating {}: {err}", state.download_dir.display());
            ApiError::download_failed()
        })?;

    let mut child = state
        .extractor
        .spawn_format_download(&url, format.format_id, &output_path)
        .map_err(|err| {
            warn!("spawning download for {url}: {err:#}");
            ApiError::download_failed()
        })?;

    let file_path = output_path.to_string_lossy().into_owned();

    // The transfer keeps running after the response goes out; only the log
    // sees how it ends.
    let finished_path = file_path.clone();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => {
                info!("download finished: {finished_path}");
            }
            Ok(status) => {
                warn!("download of {finished_path} exited with status {status}");
            }
            Err(err) => {
                warn!("download of {finished_path} could not be awaited: {err}");
            }
        }
    });

    Ok(Json(DownloadResponse { file_path }))
}
