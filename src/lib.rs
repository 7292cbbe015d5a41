//! mockup-worker composites a logo onto a product template photograph and stores the result.
//!
//! # Pipeline overview
//!
//! 1. **Fetch**: logo and template bytes are fetched concurrently through an [`ImageSource`]
//! 2. **Resolve**: customizations + template size -> logo pixel size and placement
//!    ([`resolve_layer`])
//! 3. **Composite**: the logo is resized, rotated, tinted, desaturated and faded, then blended
//!    onto the template ([`composite_logo`]); an optional text overlay is drawn on top
//! 4. **Package**: render and thumbnail are encoded and uploaded concurrently through an
//!    [`ArtifactStore`] ([`OutputPackager`])
//!
//! [`JobRunner`] wraps the pipeline with status reporting
//! (`PENDING -> PROCESSING -> COMPLETED | FAILED`), an overall time budget and cancellation.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic rendering**: identical inputs produce identical pixels.
//! - **No IO in renderers**: network and filesystem access stays in the worker layer.
//! - **Premultiplied RGBA8** between stages ([`Raster`]).
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets {
    pub(crate) mod decode;
    pub(crate) mod encode;
    pub(crate) mod fonts;
}
mod config;
mod foundation {
    pub(crate) mod core;
    pub(crate) mod error;
    pub(crate) mod math;
}
mod geometry {
    pub(crate) mod resolve;
}
mod io {
    pub(crate) mod memory;
    pub(crate) mod source;
    pub(crate) mod store;
}
mod model {
    pub(crate) mod blend;
    pub(crate) mod customizations;
    pub(crate) mod job;
}
mod render {
    pub(crate) mod composite;
    pub(crate) mod layer;
    pub(crate) mod pipeline;
    pub(crate) mod text;
}
mod worker {
    pub(crate) mod generate;
    pub(crate) mod job;
    pub(crate) mod package;
}

pub use assets::decode::{Raster, decode_raster, new_raster, raster_from_rgba, raster_to_rgba};
pub use assets::encode::{OutputFormat, encode_raster};
pub use assets::fonts::{build_font_db, font_resolver};
pub use config::WorkerConfig;
pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgb8, Size};
pub use foundation::error::{MockupError, MockupResult, Stage};
pub use geometry::resolve::{ResolvedLayer, fit_logo_size, resolve_layer, top_left};
pub use io::memory::{MemorySource, MemoryStore, StoredArtifact};
pub use io::source::{
    FsImageSource, HttpImageSource, ImageSource, RoutingImageSource, SourceLocation,
};
pub use io::store::{ArtifactStore, DirStore};
pub use model::blend::BlendMode;
pub use model::customizations::{
    Customizations, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_SCALE, DEFAULT_TEXT_COLOR,
    MAX_FONT_SIZE, MAX_SCALE, MIN_SCALE, Position, TextAlign, TextClipping, TextLayout, TextOptions, TextStroke,
};
pub use model::job::{MockupJob, MockupStatus, MockupUrls, RetryPolicy, StatusUpdate};
pub use render::composite::{composite_layer, composite_logo, prepare_logo};
pub use render::layer::{
    apply_opacity, grayscale_layer, resize_layer, rotate_layer, rotated_bounds, tint_layer,
};
pub use render::pipeline::{
    CompositeResult, DEFAULT_THUMBNAIL_MAX, MockupRequest, RenderSettings, Renderer,
    make_thumbnail, thumbnail_size,
};
pub use render::text::{
    CLIP_PATH_ID, TextRenderer, build_text_svg, parse_clip_path, text_layer_size, xml_escape,
};
pub use worker::generate::MockupGenerator;
pub use worker::job::{JobOutcome, JobRunner, MemoryReporter, StatusReporter, TracingReporter};
pub use worker::package::{ArtifactKeys, OutputPackager};

/// Re-exported so callers can build cancellation tokens for [`JobRunner::run_job`].
pub use tokio_util::sync::CancellationToken;
