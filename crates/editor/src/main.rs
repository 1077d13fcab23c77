//! SkillAPI Editor - headless host entry point.

use skilleditor::{host, telemetry, EditorConfig};

fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    telemetry::init();

    let config = EditorConfig::from_env();
    tracing::info!(
        data = %config.data_dir.display(),
        out = %config.output_dir.display(),
        "Starting SkillAPI Editor host"
    );

    let summary = host::run(&config)?;
    if !summary.classes.skipped.is_empty() || !summary.skills.skipped.is_empty() {
        tracing::warn!(
            classes = ?summary.classes.skipped,
            skills = ?summary.skills.skipped,
            "Some entries could not be loaded"
        );
    }
    Ok(())
}
