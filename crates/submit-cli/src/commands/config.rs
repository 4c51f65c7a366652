use anyhow::Result;
use tracing::info;

use submit_core::AppConfig;

pub fn run(config: &AppConfig, default: bool, write: bool) -> Result<()> {
    let config = if default {
        AppConfig::default()
    } else {
        config.clone()
    };

    println!("# {}", AppConfig::config_path().display());
    print!("{}", config.to_toml()?);

    if write {
        config.save()?;
        info!("Configuration written to {}", AppConfig::config_path().display());
    }
    Ok(())
}
