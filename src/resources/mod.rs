use anyhow::Context;

use crate::data_structures::{
    animation::KeyframeAnimation,
    model::Model,
    texture::Texture,
};

/**
 * This module contains all logic for loading models, animations and textures from external files.
 *
 * Natively files are read from `./assets`, on wasm they are fetched from `<origin>/assets`.
 */
pub mod definition;

use definition::{AnimationDefinition, ModelDefinition};

/// Load a model definition and its atlas texture and build the [`Model`].
pub async fn load_model(model_file: &str, texture_file: &str) -> anyhow::Result<Model> {
    let json = load_string(model_file).await?;
    let definition = ModelDefinition::from_json(&json)
        .with_context(|| format!("failed to parse model {}", model_file))?;
    let texture = load_texture(texture_file).await?;
    let model = Model::new(&definition, texture)
        .with_context(|| format!("invalid box tree in {}", model_file))?;
    Ok(model)
}

pub async fn load_animation(file_name: &str) -> anyhow::Result<KeyframeAnimation> {
    let json = load_string(file_name).await?;
    let definition = AnimationDefinition::from_json(&json)
        .with_context(|| format!("failed to parse animation {}", file_name))?;
    Ok(KeyframeAnimation::from_definition(&definition))
}

pub async fn load_texture(file_name: &str) -> anyhow::Result<Texture> {
    let data = load_binary(file_name).await?;
    let format = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str());
    Texture::from_bytes(&data, file_name, format)
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window")?;
    let location = window.location();
    let origin = location
        .origin()
        .map_err(|_| anyhow::anyhow!("window has no origin"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?
    };

    Ok(data)
}
