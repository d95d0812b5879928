//! Render surface abstraction: the element that hosts the camera preview,
//! the decode canvas and the shading overlays.

pub mod headless;

pub use headless::HeadlessSurface;

use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

use crate::geometry::ShadeRect;
use crate::media::MediaStream;

/// Id of the hidden canvas holding the pixels handed to the decoder.
pub const DECODE_CANVAS_ID: &str = "qr-canvas";
/// Id of the canvas showing a scanned still image.
pub const VISIBLE_CANVAS_ID: &str = "qr-canvas-visible";

/// Handle to an element appended to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

pub enum SurfaceElement {
    /// Muted, inline camera preview bound to a live stream.
    Video {
        width: u32,
        height: u32,
        stream: Arc<dyn MediaStream>,
    },
    Canvas {
        id: &'static str,
        width: u32,
        height: u32,
        visible: bool,
        content: Option<RgbaImage>,
    },
    Shade(ShadeRect),
}

impl SurfaceElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            SurfaceElement::Video { .. } => ElementKind::Video,
            SurfaceElement::Canvas { .. } => ElementKind::Canvas,
            SurfaceElement::Shade(_) => ElementKind::Shade,
        }
    }
}

impl fmt::Debug for SurfaceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceElement::Video {
                width,
                height,
                stream,
            } => f
                .debug_struct("Video")
                .field("width", width)
                .field("height", height)
                .field("stream", &stream.id())
                .finish(),
            SurfaceElement::Canvas {
                id,
                width,
                height,
                visible,
                content,
            } => f
                .debug_struct("Canvas")
                .field("id", id)
                .field("width", width)
                .field("height", height)
                .field("visible", visible)
                .field("has_content", &content.is_some())
                .finish(),
            SurfaceElement::Shade(shade) => f.debug_tuple("Shade").field(shade).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Video,
    Canvas,
    Shade,
}

/// The host element a capture session renders into.
///
/// A surface is owned by at most one session at a time; sessions claim it
/// with [`try_acquire`](RenderSurface::try_acquire) before attaching anything.
pub trait RenderSurface: Send + Sync {
    /// Reported `(clientWidth, clientHeight)`; zero means "not laid out".
    fn client_size(&self) -> (u32, u32);

    fn append(&self, element: SurfaceElement) -> ElementId;

    /// Removes one element. Returns `false` if it was not attached.
    fn remove(&self, id: ElementId) -> bool;

    /// Removes every child element.
    fn clear(&self);

    /// Claims the surface for one session. Returns `false` if already claimed.
    fn try_acquire(&self) -> bool;

    fn release(&self);
}
