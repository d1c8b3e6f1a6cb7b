use anyhow::Context as _;

use crate::{
    data_structures::texture::Texture,
    pipelines::terrain::TerrainMaterial,
    resources::TextureProvider,
};

/// Names starting with a scheme are fetched over the network, everything else
/// is an asset file.
pub fn is_remote(file_name: &str) -> bool {
    file_name.starts_with("http://") || file_name.starts_with("https://")
}

/// File extension used as a decoding hint, ignoring any query string.
pub fn extension_hint(file_name: &str) -> Option<&str> {
    let path = file_name.split(['?', '#']).next()?;
    let last_segment = path.rsplit('/').next()?;
    let (stem, ext) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window")?;
    let location = window.location();
    let origin = location
        .origin()
        .map_err(|e| anyhow::anyhow!("no origin: {:?}", e))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

async fn fetch(url: &str) -> anyhow::Result<Vec<u8>> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    if is_remote(file_name) {
        return fetch(file_name)
            .await
            .with_context(|| format!("could not fetch {}", file_name));
    }
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        fetch(url.as_str())
            .await
            .with_context(|| format!("could not fetch {}", url))?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(&path).with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(data)
}

/// Loads terrain textures onto the GPU and binds them for the terrain shader.
#[derive(Clone, Debug)]
pub struct GpuTextureLoader {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub layout: wgpu::BindGroupLayout,
}

impl TextureProvider for GpuTextureLoader {
    type Texture = TerrainMaterial;

    async fn load(&self, file_name: &str) -> anyhow::Result<TerrainMaterial> {
        let data = load_binary(file_name).await?;
        let texture = Texture::from_bytes(
            &self.device,
            &self.queue,
            &data,
            file_name,
            extension_hint(file_name),
        )?;
        log::info!("Loaded texture {}", file_name);
        Ok(TerrainMaterial::new(
            &self.device,
            &self.layout,
            file_name,
            texture,
        ))
    }
}
