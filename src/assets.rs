//! Asset manifest and loading
//!
//! The manifest fixes every texture's key, path and the size its sprite
//! occupies in the world; bodies are sized from it, so the simulation never
//! waits on an image. On the web the files are fetched and decoded before the
//! scene starts, and any failure aborts startup.

use glam::Vec2;

use crate::sim::anim::player_anims;

/// Error type for asset operations
#[derive(Debug)]
pub enum AssetError {
    /// Request could not be made or did not complete
    Fetch { path: String, reason: String },
    /// Server answered with a non-success status
    Missing { path: String, status: u16 },
    /// Bytes are not a decodable image
    Decode { path: String, reason: String },
    /// Sprite sheet does not fit its frame layout
    BadSheet { path: String, reason: String },
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Fetch { path, reason } => write!(f, "failed to fetch {}: {}", path, reason),
            AssetError::Missing { path, status } => {
                write!(f, "asset {} not found (HTTP {})", path, status)
            }
            AssetError::Decode { path, reason } => {
                write!(f, "failed to decode {}: {}", path, reason)
            }
            AssetError::BadSheet { path, reason } => {
                write!(f, "bad sprite sheet {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Texture keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Sky,
    Ground,
    Star,
    Bomb,
    Dude,
}

/// How an asset file is sliced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// One image, drawn whole
    Image,
    /// Grid of equally sized frames, row-major
    SpriteSheet { frame_width: u32, frame_height: u32 },
}

impl AssetKey {
    /// Load order
    pub const ALL: [AssetKey; 5] = [
        AssetKey::Sky,
        AssetKey::Ground,
        AssetKey::Star,
        AssetKey::Bomb,
        AssetKey::Dude,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AssetKey::Sky => "sky",
            AssetKey::Ground => "ground",
            AssetKey::Star => "star",
            AssetKey::Bomb => "bomb",
            AssetKey::Dude => "dude",
        }
    }

    /// Path relative to the page
    pub fn path(&self) -> &'static str {
        match self {
            AssetKey::Sky => "assets/sky.png",
            AssetKey::Ground => "assets/platform.png",
            AssetKey::Star => "assets/star.png",
            AssetKey::Bomb => "assets/bomb.png",
            AssetKey::Dude => "assets/dude.png",
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            AssetKey::Dude => AssetKind::SpriteSheet {
                frame_width: 32,
                frame_height: 48,
            },
            _ => AssetKind::Image,
        }
    }

    /// Size of one drawn frame (whole image for plain images)
    pub fn frame_size(&self) -> Vec2 {
        match self {
            AssetKey::Sky => Vec2::new(800.0, 600.0),
            AssetKey::Ground => Vec2::new(400.0, 32.0),
            AssetKey::Star => Vec2::new(24.0, 22.0),
            AssetKey::Bomb => Vec2::new(14.0, 14.0),
            AssetKey::Dude => Vec2::new(32.0, 48.0),
        }
    }
}

/// Frame grid of a sprite sheet image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    pub width: u32,
    pub height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl SpriteSheet {
    /// Validate that an image of `width x height` holds at least one frame
    pub fn new(
        path: &str,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self, AssetError> {
        if frame_width == 0 || frame_height == 0 {
            return Err(AssetError::BadSheet {
                path: path.to_string(),
                reason: "frame size is zero".to_string(),
            });
        }
        if width < frame_width || height < frame_height {
            return Err(AssetError::BadSheet {
                path: path.to_string(),
                reason: format!(
                    "{}x{} image is smaller than one {}x{} frame",
                    width, height, frame_width, frame_height
                ),
            });
        }
        Ok(Self {
            width,
            height,
            frame_width,
            frame_height,
        })
    }

    pub fn columns(&self) -> u32 {
        self.width / self.frame_width
    }

    pub fn rows(&self) -> u32 {
        self.height / self.frame_height
    }

    /// Whole frames in the sheet (partial edge frames are ignored)
    pub fn frame_count(&self) -> u32 {
        self.columns() * self.rows()
    }

    /// Texture coordinates `[u0, v0, u1, v1]` of a frame.
    ///
    /// Out-of-range frames clamp to the last frame.
    pub fn frame_uv(&self, frame: u32) -> [f32; 4] {
        let frame = frame.min(self.frame_count().saturating_sub(1));
        let col = frame % self.columns();
        let row = frame / self.columns();
        let w = self.width as f32;
        let h = self.height as f32;
        let x0 = (col * self.frame_width) as f32;
        let y0 = (row * self.frame_height) as f32;
        [
            x0 / w,
            y0 / h,
            (x0 + self.frame_width as f32) / w,
            (y0 + self.frame_height as f32) / h,
        ]
    }
}

/// Highest sheet frame any player animation uses, plus one
pub fn required_player_frames() -> u32 {
    player_anims()
        .iter()
        .flat_map(|def| def.frames.iter().copied())
        .max()
        .map_or(0, |max| max + 1)
}

/// A decoded texture ready for upload
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub key: AssetKey,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels
    pub rgba: Vec<u8>,
    /// Frame grid for sprite sheets
    pub sheet: Option<SpriteSheet>,
}

impl LoadedImage {
    /// Texture coordinates for a frame (whole image for plain images)
    pub fn frame_uv(&self, frame: u32) -> [f32; 4] {
        match &self.sheet {
            Some(sheet) => sheet.frame_uv(frame),
            None => [0.0, 0.0, 1.0, 1.0],
        }
    }
}

/// Decode PNG bytes for `key` and check them against the manifest
pub fn decode(key: AssetKey, bytes: &[u8]) -> Result<LoadedImage, AssetError> {
    let path = key.path();
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| AssetError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();

    let sheet = match key.kind() {
        AssetKind::Image => {
            let expected = key.frame_size();
            if width as f32 != expected.x || height as f32 != expected.y {
                log::warn!(
                    "{} is {}x{}, expected {}x{}; it will be stretched",
                    path,
                    width,
                    height,
                    expected.x,
                    expected.y
                );
            }
            None
        }
        AssetKind::SpriteSheet {
            frame_width,
            frame_height,
        } => {
            let sheet = SpriteSheet::new(path, width, height, frame_width, frame_height)?;
            let required = required_player_frames();
            if key == AssetKey::Dude && sheet.frame_count() < required {
                return Err(AssetError::BadSheet {
                    path: path.to_string(),
                    reason: format!(
                        "{} frames, animations need {}",
                        sheet.frame_count(),
                        required
                    ),
                });
            }
            Some(sheet)
        }
    };

    log::info!("Loaded '{}' from {} ({}x{})", key.name(), path, width, height);

    Ok(LoadedImage {
        key,
        width,
        height,
        rgba: image.into_raw(),
        sheet,
    })
}

/// Fetch a file relative to the page
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fetch_error = |reason: String| AssetError::Fetch {
        path: path.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fetch_error("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|e| fetch_error(format!("not a Response: {:?}", e)))?;

    if !response.ok() {
        return Err(AssetError::Missing {
            path: path.to_string(),
            status: response.status(),
        });
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Fetch and decode every asset in the manifest, in load order
#[cfg(target_arch = "wasm32")]
pub async fn load_all() -> Result<Vec<LoadedImage>, AssetError> {
    let mut images = Vec::with_capacity(AssetKey::ALL.len());
    for key in AssetKey::ALL {
        let bytes = fetch_bytes(key.path()).await?;
        images.push(decode(key, &bytes)?);
    }
    Ok(images)
}
