//! Catalog API handlers for channels, seasons and shows.

use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{ChannelIndex, Season, Show};
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::media::scanner::list_media_files;

const DEFAULT_SEASON_NAME: &str = "Season 1";

/// Request body cap for `POST /api/shows`, poster included.
pub const MAX_SHOW_UPLOAD: usize = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct NewChannel {
    pub folder_path: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewSeason {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FolderRequest {
    pub folder_path: Option<String>,
}

/// An uploaded poster: client file name (last component only) and content.
#[derive(Debug)]
struct PosterUpload {
    filename: String,
    data: axum::body::Bytes,
}

/// The `name` and optional `poster` fields of the show form.
async fn read_show_form(mut form: Multipart) -> Result<(String, Option<PosterUpload>), ApiError> {
    let mut name = None;
    let mut poster = None;
    while let Some(field) = form.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("name") => name = Some(field.text().await?),
            Some("poster") => {
                let filename = field
                    .file_name()
                    .and_then(|f| FsPath::new(f).file_name())
                    .map(|f| f.to_string_lossy().into_owned());
                let data = field.bytes().await?;
                // Browsers send an empty, unnamed part when no file was picked.
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    poster = Some(PosterUpload { filename, data });
                }
            }
            _ => {}
        }
    }
    let name = name.ok_or(ApiError::BadRequest("Missing show name"))?;
    Ok((name, poster))
}

fn deleted() -> Response {
    (StatusCode::OK, Json(json!({ "status": "deleted" }))).into_response()
}

/// The folder from a request body, if it names an existing directory.
fn existing_folder(folder_path: Option<String>) -> Result<String, ApiError> {
    match folder_path {
        Some(p) if FsPath::new(&p).is_dir() => Ok(p),
        _ => Err(ApiError::BadRequest("Folder does not exist")),
    }
}

/// GET /api/channels: object keyed by channel id.
pub async fn list_channels(State(state): State<AppState>) -> Result<Response, ApiError> {
    let catalog = state.catalog.read().await?;
    Ok(Json(ChannelIndex(&catalog.channels)).into_response())
}

/// POST /api/channels
pub async fn add_channel(
    State(state): State<AppState>,
    Json(req): Json<NewChannel>,
) -> Result<Response, ApiError> {
    let folder_path = existing_folder(req.folder_path)?;
    let name = req.name.unwrap_or_else(|| {
        FsPath::new(&folder_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| folder_path.clone())
    });

    let channel = state
        .catalog
        .update(move |c| Ok::<_, ApiError>(c.add_channel(name, folder_path)))
        .await??;
    tracing::info!("Added channel {} ({})", channel.id, channel.folder_path);
    Ok((StatusCode::CREATED, Json(channel)).into_response())
}

/// DELETE /api/channels/{id}
pub async fn delete_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state
        .catalog
        .update(move |c| {
            if c.remove_channel(&id) {
                Ok(())
            } else {
                Err(ApiError::NotFound("Channel not found"))
            }
        })
        .await??;
    Ok(deleted())
}

/// GET /api/channels/{id}/episodes: folder is re-scanned on every call.
pub async fn channel_episodes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let catalog = state.catalog.read().await?;
    let channel = catalog
        .channel(&id)
        .cloned()
        .ok_or(ApiError::NotFound("Channel not found"))?;
    let episodes = tokio::task::spawn_blocking(move || channel.episodes())
        .await
        .map_err(|e| ApiError::Catalog(e.into()))?;
    Ok(Json(episodes).into_response())
}

/// GET /api/seasons
pub async fn list_seasons(State(state): State<AppState>) -> Result<Response, ApiError> {
    let catalog = state.catalog.read().await?;
    Ok(Json(catalog.seasons).into_response())
}

/// POST /api/seasons
pub async fn add_season(
    State(state): State<AppState>,
    Json(req): Json<NewSeason>,
) -> Result<Response, ApiError> {
    let name = req.name.unwrap_or_else(|| DEFAULT_SEASON_NAME.to_string());
    let season = state
        .catalog
        .update(move |c| Ok::<_, ApiError>(c.add_season(name)))
        .await??;
    Ok((StatusCode::CREATED, Json(season)).into_response())
}

/// DELETE /api/seasons/{id}: succeeds whether or not the season existed.
pub async fn delete_season(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state
        .catalog
        .update(move |c| {
            c.remove_season(&id);
            Ok::<_, ApiError>(())
        })
        .await??;
    Ok(deleted())
}

/// POST /api/seasons/{id}/episodes: append the folder's playable files.
pub async fn add_season_episodes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FolderRequest>,
) -> Result<Response, ApiError> {
    let folder_path = existing_folder(req.folder_path)?;
    let season: Season = state
        .catalog
        .update(move |c| -> Result<Season, ApiError> {
            let season = c
                .season_mut(&id)
                .ok_or(ApiError::NotFound("Season not found"))?;
            let folder = FsPath::new(&folder_path);
            season.append_episodes(folder, list_media_files(folder));
            Ok(season.clone())
        })
        .await??;
    tracing::info!("Season {} now has {} episodes", season.id, season.episodes.len());
    Ok(Json(season).into_response())
}

/// GET /api/shows
pub async fn list_shows(State(state): State<AppState>) -> Result<Response, ApiError> {
    let catalog = state.catalog.read().await?;
    Ok(Json(catalog.shows).into_response())
}

/// POST /api/shows: multipart form with `name` and an optional `poster` file.
///
/// The poster is stored as `{id}_{filename}` in the posters directory and
/// that file name is recorded on the show. If writing it fails the show is
/// not added.
pub async fn add_show(
    State(state): State<AppState>,
    form: Multipart,
) -> Result<Response, ApiError> {
    let (name, poster) = read_show_form(form).await?;
    let posters_dir = state.posters_dir.clone();
    if poster.is_some() {
        tokio::fs::create_dir_all(&posters_dir)
            .await
            .map_err(|e| ApiError::poster(&posters_dir, e))?;
    }

    let show = state
        .catalog
        .update(move |c| -> Result<Show, ApiError> {
            let Some(poster) = poster else {
                return Ok(c.add_show(name, String::new()));
            };
            let stored = format!("{}_{}", c.next_show_id(), poster.filename);
            let target = posters_dir.join(&stored);
            std::fs::write(&target, &poster.data).map_err(|e| ApiError::poster(&target, e))?;
            Ok(c.add_show(name, stored))
        })
        .await??;
    if !show.poster.is_empty() {
        tracing::info!("Stored poster {} for show {}", show.poster, show.id);
    }
    Ok((StatusCode::CREATED, Json(show)).into_response())
}
