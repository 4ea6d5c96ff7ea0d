//! `loreweave validate-key` — best-effort credential check for the
//! configured provider.

use loreweave_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let Some(provider) = loreweave_providers::from_config(&config)? else {
        eprintln!(
            "No API key configured for provider '{}'. Run `loreweave onboard` and add one.",
            config.provider
        );
        return Ok(());
    };

    if provider.validate_key().await {
        println!("API key for '{}' is valid.", config.provider);
    } else {
        println!(
            "API key for '{}' was rejected or the provider is unreachable.",
            config.provider
        );
    }

    Ok(())
}
