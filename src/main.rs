use cryptolens::AppError;
use cryptolens::app::CryptoLensApp;
use cryptolens::config::Settings;
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let settings = Settings::load()?;
    CryptoLensApp::start_gui(&settings)
}
