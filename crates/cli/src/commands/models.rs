//! `loreweave models` — list models offered by the configured provider.

use loreweave_config::AppConfig;
use loreweave_providers::ModelCache;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let Some(provider) = loreweave_providers::from_config(&config)? else {
        eprintln!(
            "No API key configured for provider '{}'. Run `loreweave onboard` and add one.",
            config.provider
        );
        return Ok(());
    };

    let mut cache = ModelCache::new();
    let models = cache
        .get_or_fetch(provider.as_ref(), config.api_key().unwrap_or_default())
        .await?;

    if models.is_empty() {
        println!("Provider '{}' offers no models.", config.provider);
        return Ok(());
    }

    println!("Models offered by '{}':", config.provider);
    for model in models {
        let mut line = format!("  {}", model.id);
        if let Some(context_length) = model.context_length {
            line.push_str(&format!("  [{context_length} ctx]"));
        }
        if let Some(pricing) = &model.pricing {
            line.push_str(&format!("  {pricing}"));
        }
        println!("{line}");
    }

    Ok(())
}
