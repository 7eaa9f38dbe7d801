//! Error types for the Pinwheel engine
//!
//! Every fallible library operation returns [`PinwheelError`]. The demo
//! binaries wrap it in `anyhow` at the top level.

use std::path::PathBuf;

/// Errors raised while setting up a window, the GPU context or scene assets.
#[derive(Debug, thiserror::Error)]
pub enum PinwheelError {
    /// The window the render surface mounts into could not be created.
    #[error("failed to create the render window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    #[error("event loop failure: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create a render surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open a GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The adapter reports no texture format the surface can present.
    #[error("the render surface is not supported by the selected adapter")]
    UnsupportedSurface,

    #[error("failed to read texture '{path}': {source}")]
    TextureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture '{path}': {source}")]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The loader side of a texture future went away before resolving it.
    #[error("texture load for '{0}' was dropped before completing")]
    TextureLoadCancelled(PathBuf),

    /// The shading pipeline could not be built on the selected device.
    #[error("failed to build render pipelines: {0}")]
    Pipeline(String),

    /// Attaching the node would make it its own ancestor.
    #[error("cannot attach a scene node beneath itself")]
    GraphCycle,

    /// The event loop stopped before the window and GPU context existed.
    #[error("the application exited before initialisation completed")]
    NotInitialised,
}

pub type Result<T> = std::result::Result<T, PinwheelError>;
