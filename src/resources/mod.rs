//! Loading of external assets.
//!
//! The terrain needs two textures. They are fetched asynchronously through a
//! [`TextureProvider`]; on the GPU that is [`texture::GpuTextureLoader`]. The
//! load either yields both materials or fails as a whole.

use std::future::Future;

use anyhow::Context as _;

use crate::{config::TerrainConfig, data_structures::terrain::TerrainMaterials};

pub mod texture;

/// Source of terrain textures.
pub trait TextureProvider {
    type Texture;

    /// Load the texture called `name`: a URL or a file below `assets/`.
    fn load(&self, name: &str) -> impl Future<Output = anyhow::Result<Self::Texture>>;
}

/// Load the land and grass textures named in `config`.
///
/// When both names are the same the texture is loaded once and shared.
pub async fn load_terrain_materials<P>(
    provider: &P,
    config: &TerrainConfig,
) -> anyhow::Result<TerrainMaterials<P::Texture>>
where
    P: TextureProvider,
    P::Texture: Clone,
{
    if config.land_texture == config.grass_texture {
        let texture = provider
            .load(&config.land_texture)
            .await
            .with_context(|| format!("terrain texture {}", config.land_texture))?;
        return Ok(TerrainMaterials {
            land: texture.clone(),
            grass: texture,
        });
    }
    let (land, grass) = futures::future::join(
        provider.load(&config.land_texture),
        provider.load(&config.grass_texture),
    )
    .await;
    Ok(TerrainMaterials {
        land: land.with_context(|| format!("land texture {}", config.land_texture))?,
        grass: grass.with_context(|| format!("grass texture {}", config.grass_texture))?,
    })
}
