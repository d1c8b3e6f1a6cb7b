use anyhow::Result;
use fs_extra::{copy_items, dir::CopyOptions};
use std::{env, path::PathBuf};

/// Ship the terrain textures next to the build output so a binary started from
/// the target directory finds `assets/land.png` and `assets/grass.png`.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let textures = manifest_dir.join("assets");
    if !textures.is_dir() {
        println!("cargo:warning=no assets directory, terrain textures must be fetched by URL");
        return Ok(());
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let options = CopyOptions {
        overwrite: true,
        ..CopyOptions::new()
    };
    copy_items(&[textures], out_dir, &options)?;
    Ok(())
}
