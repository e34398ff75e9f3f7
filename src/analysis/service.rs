use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use serde::Serialize;
use tower::{Service, ServiceBuilder, limit::ConcurrencyLimit, timeout::Timeout};
use tracing::debug;

use crate::{
    color::{PaletteExtractor, PixelBuffer, PixelCoordinate, Rgb, dominant_color},
    config::Configuration,
    error::AnalysisError,
    season::{Classification, classify},
};

/// Encoded image plus the three points picked by the user.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: Vec<u8>,
    pub face: PixelCoordinate,
    pub hair: PixelCoordinate,
    pub eye: PixelCoordinate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub dominant_color: String,
    pub color_palette: Vec<String>,
    pub face_rgb: Rgb,
    pub hair_rgb: Rgb,
    pub eye_rgb: Rgb,
    pub classification: Classification,
}

fn sample(buffer: &PixelBuffer, coordinate: PixelCoordinate) -> Result<Rgb, AnalysisError> {
    buffer
        .pixel_at(coordinate)
        .ok_or(AnalysisError::CoordinateOutOfBounds {
            x: coordinate.x,
            y: coordinate.y,
            width: buffer.width(),
            height: buffer.height(),
        })
}

/// Decodes, samples and classifies. CPU bound; run it off the async workers.
pub fn analyse(
    request: &AnalysisRequest,
    palette: &PaletteExtractor,
) -> Result<AnalysisReport, AnalysisError> {
    let image = image::load_from_memory(&request.image)?;
    let buffer = PixelBuffer::from(image);
    debug!(
        "Decoded image {}x{} for analysis",
        buffer.width(),
        buffer.height()
    );

    let face_rgb = sample(&buffer, request.face)?;
    let hair_rgb = sample(&buffer, request.hair)?;
    let eye_rgb = sample(&buffer, request.eye)?;

    let color_palette = palette.hex_palette(&buffer);
    let dominant_color = dominant_color(&color_palette);

    Ok(AnalysisReport {
        dominant_color,
        color_palette,
        face_rgb,
        hair_rgb,
        eye_rgb,
        classification: classify(face_rgb, hair_rgb, eye_rgb),
    })
}

#[derive(Debug, Clone)]
pub struct AnalysisService {
    palette: PaletteExtractor,
}

impl AnalysisService {
    pub fn new(palette: PaletteExtractor) -> Self {
        Self { palette }
    }
}

impl Service<AnalysisRequest> for AnalysisService {
    type Response = AnalysisReport;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), AnalysisError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: AnalysisRequest) -> Self::Future {
        let palette = self.palette.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || analyse(&request, &palette))
                .await
                .map_err(|e| AnalysisError::JoinError(e.to_string()))?
        })
    }
}

pub type AnalysisPipeline = ConcurrencyLimit<Timeout<AnalysisService>>;

/// Analysis service bounded by the configured concurrency and timeout.
///
/// Errors come back boxed: either an [`AnalysisError`] or
/// [`tower::timeout::error::Elapsed`].
pub fn create_analysis_pipeline(configuration: &Configuration) -> AnalysisPipeline {
    let service = AnalysisService::new(PaletteExtractor::new(configuration.palette_size));

    ServiceBuilder::new()
        .concurrency_limit(configuration.max_concurrent_analyses)
        .timeout(configuration.analysis_timeout())
        .service(service)
}
