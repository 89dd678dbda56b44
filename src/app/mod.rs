pub mod controls;
pub mod cryptolens_app;
pub mod views;

pub use cryptolens_app::CryptoLensApp;
