//! Image-to-Braille conversion handler.

use axum::extract::{Multipart, Query, State};
use serde::Deserialize;
use std::{path::Path, sync::Arc, time::Instant};

use crate::{
    braille::{self, PixelGrid, ScanMode},
    decode,
    error::BrailleError,
};

use super::super::{
    state::AppState,
    upload::{self, TempUpload, UploadError},
};

/// Query parameters for the conversion endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    #[serde(default)]
    pub scan: ScanMode,
}

/// A finished rendering with the source dimensions, for logging.
struct Rendering {
    width: u32,
    height: u32,
    text: String,
}

/// POST /asci - Upload an image and get its Braille rendering as plain text.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConvertQuery>,
    mut multipart: Multipart,
) -> Result<String, UploadError> {
    let field = upload::read_image_field(&mut multipart, &state.config).await?;
    tracing::debug!(
        file_name = %field.file_name,
        mime = %field.mime,
        size = field.bytes.len(),
        "received upload"
    );

    let stored = TempUpload::persist(&state.config.upload_dir, &field.bytes).await?;
    drop(field);

    // Decoding and rasterizing are CPU-bound; keep them off the async workers.
    let path = stored.path().to_path_buf();
    let scan = query.scan;
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || render_file(&path, scan))
        .await
        .map_err(|e| BrailleError::Task(e.to_string()));

    drop(stored);
    let rendering = result??;

    tracing::info!(
        width = rendering.width,
        height = rendering.height,
        scan = ?scan,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "converted image"
    );

    Ok(rendering.text)
}

/// Decode the stored upload and rasterize it (runs on blocking thread pool).
fn render_file(path: &Path, scan: ScanMode) -> Result<Rendering, BrailleError> {
    let img = decode::load(path)?;
    let text = braille::rasterize_with(&PixelGrid::from_image(&img), scan);
    Ok(Rendering {
        width: img.width(),
        height: img.height(),
        text,
    })
}
