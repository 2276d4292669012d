//! Reads the real process environment, so it lives in its own test binary
//! with a single test.

use accessorize::{AccessorizeError, EditClient};

#[test]
fn api_key_resolution_from_environment() {
    std::env::remove_var("GOOGLE_API_KEY");
    std::env::remove_var("GEMINI_API_KEY");
    let err = EditClient::builder().build().unwrap_err();
    assert!(matches!(err, AccessorizeError::Config(_)));

    std::env::set_var("GEMINI_API_KEY", "gemini-key");
    assert!(EditClient::builder().build().is_ok());

    std::env::set_var("GOOGLE_API_KEY", "");
    assert!(EditClient::builder().build().is_ok());

    std::env::set_var("GEMINI_API_KEY", "  ");
    let err = EditClient::builder().build().unwrap_err();
    assert!(matches!(err, AccessorizeError::Config(_)));

    std::env::set_var("GOOGLE_API_KEY", "google-key");
    assert!(EditClient::builder().build().is_ok());
}
