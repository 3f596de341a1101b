use anyhow::Context;
use folio_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    folio_app::serve(settings).await
}
