use crate::config::TextureConfig;
use crate::error::TextureError;
use log::{debug, info};
use macroquad::texture::Image;
use std::collections::HashMap;
use std::path::Path;

/// Edge length of generated textures
pub const PROCEDURAL_SIZE: usize = 64;

/// Pack an opaque colour as `0xAARRGGBB`
pub const fn argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Scale the colour channels of `color` by `factor`, keeping alpha
pub fn shade(color: u32, factor: f32) -> u32 {
    let factor = factor.clamp(0.0, 1.0);
    let channel = |shift: u32| (((color >> shift) & 0xFF) as f32 * factor) as u32;
    (color & 0xFF00_0000) | channel(16) << 16 | channel(8) << 8 | channel(0)
}

/// Decoded wall image, row-major ARGB
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(TextureError::Decode(format!(
                "{} pixels do not fill a {}x{} image",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Texture { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Texel at (x, y), clamped to the image
    pub fn texel(&self, x: usize, y: usize) -> u32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[y * self.width + x]
    }

    /// Generated pattern so a level can run without image assets.
    /// Each wall code gets its own palette and pattern.
    pub fn procedural(code: u8) -> Self {
        let size = PROCEDURAL_SIZE;
        let palettes = [
            (argb(150, 40, 30), argb(200, 190, 180)),
            (argb(90, 60, 140), argb(140, 110, 190)),
            (argb(60, 110, 50), argb(100, 150, 90)),
            (argb(110, 110, 110), argb(160, 160, 160)),
            (argb(40, 70, 150), argb(90, 120, 200)),
            (argb(120, 80, 40), argb(170, 130, 80)),
            (argb(170, 150, 60), argb(220, 200, 110)),
        ];
        let (base, accent) = palettes[code as usize % palettes.len()];

        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let accent_here = match code % 4 {
                    // bricks: mortar lines with offset courses
                    1 => {
                        let offset = if (y / 16) % 2 == 0 { 0 } else { 16 };
                        y % 16 == 0 || (x + offset) % 32 == 0
                    }
                    // checker
                    2 => (x / 8 + y / 8) % 2 == 0,
                    // vertical planks
                    3 => x % 16 == 0 || x % 16 == 15,
                    // framed panel
                    _ => x < 4 || y < 4 || x >= size - 4 || y >= size - 4,
                };
                pixels.push(if accent_here { accent } else { base });
            }
        }

        Texture {
            width: size,
            height: size,
            pixels,
        }
    }
}

/// Decode an encoded image (PNG and the other formats macroquad understands)
pub fn decode_texture(bytes: &[u8]) -> Result<Texture, TextureError> {
    let image = Image::from_file_with_format(bytes, None)
        .map_err(|e| TextureError::Decode(format!("{:?}", e)))?;

    let width = image.width as usize;
    let height = image.height as usize;
    let pixels = image
        .bytes
        .chunks_exact(4)
        .map(|rgba| (rgba[3] as u32) << 24 | (rgba[0] as u32) << 16 | (rgba[1] as u32) << 8 | rgba[2] as u32)
        .collect();

    Texture::new(width, height, pixels)
}

/// Read and decode one texture file
pub fn load_texture_file(path: &Path) -> Result<Texture, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_texture(&bytes)
}

/// Wall textures keyed by cell code, read-only once loaded
#[derive(Debug, Default)]
pub struct TextureSet {
    textures: HashMap<u8, Texture>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: u8, texture: Texture) {
        self.textures.insert(code, texture);
    }

    pub fn get(&self, code: u8) -> Option<&Texture> {
        self.textures.get(&code)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Generated textures for every code in `codes`
    pub fn procedural(codes: &[u8]) -> Self {
        let mut set = Self::new();
        for &code in codes {
            set.insert(code, Texture::procedural(code));
        }
        set
    }

    /// Load every texture `required` by the level.
    /// A required code without a configured file, or a file that fails to
    /// load, is an error.
    pub fn load(config: &TextureConfig, required: &[u8]) -> Result<Self, TextureError> {
        if config.procedural {
            info!("Generating {} procedural wall textures", required.len());
            return Ok(Self::procedural(required));
        }

        let mut set = Self::new();
        for &code in required {
            let entry = config
                .files
                .iter()
                .find(|entry| entry.code == code)
                .ok_or(TextureError::Missing(code))?;
            let texture = load_texture_file(Path::new(&entry.path))?;
            debug!(
                "Loaded texture for wall code {} from {} ({}x{})",
                code,
                entry.path,
                texture.width(),
                texture.height()
            );
            set.insert(code, texture);
        }
        info!("Loaded {} wall textures", set.len());
        Ok(set)
    }

    /// Drop every texture buffer
    pub fn release(&mut self) {
        self.textures.clear();
    }
}
