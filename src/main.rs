use tiled_isle::SceneConfig;

fn main() -> anyhow::Result<()> {
    tiled_isle::run(SceneConfig::default())
}
