//! Helpers shared by the live smoke tests and the demos.

use korbit_api_client::auth::StaticCredentials;

/// Read `KORBIT_CLIENT_ID`, `KORBIT_CLIENT_SECRET`, `KORBIT_USERNAME` and
/// `KORBIT_PASSWORD`, loading a `.env` file first if present.
///
/// Returns `None` when any of them is missing.
pub fn credentials_from_env() -> Option<StaticCredentials> {
    let _ = dotenv::dotenv();
    Some(StaticCredentials::new(
        std::env::var("KORBIT_CLIENT_ID").ok()?,
        std::env::var("KORBIT_CLIENT_SECRET").ok()?,
        std::env::var("KORBIT_USERNAME").ok()?,
        std::env::var("KORBIT_PASSWORD").ok()?,
    ))
}
