//! Init command implementation

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use crate::store::ScriptureStore;
use tracing::info;

/// Initialize configuration and database
///
/// Writes the default config file, creates the SQLite database, and
/// seeds the canonical book table. Re-running is safe with `force`;
/// without it an existing config is left alone.
pub async fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let config_path = config.paths.base_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}; use --force to overwrite",
            config_path.display()
        )));
    }

    config.save()?;
    info!("Wrote config to {:?}", config_path);

    let store = ScriptureStore::connect(config).await?;
    store.init_schema().await?;
    info!("Initialized scripture database at {:?}", config.paths.db_file);

    println!("Initialized bible-chat in {}", config.paths.base_dir.display());
    println!("Next steps:");
    println!("  bible-chat load <bible.json> --translation web");
    println!("  bible-chat embed");
    println!("  bible-chat chat \"what does the Bible say about hope?\"");
    Ok(())
}
