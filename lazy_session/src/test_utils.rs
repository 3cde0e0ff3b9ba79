//! Test utilities module for shared test initialization
//!
//! Loads `.env_test` (falling back to `.env`) once per test binary so that every test sees the
//! same session configuration.

use std::sync::Once;

/// Centralized test initialization for all tests across the entire crate
///
/// ## Usage
/// ```rust,ignore
/// use crate::test_utils::init_test_environment;
///
/// #[test]
/// fn my_test() {
///     init_test_environment();
///     // ... test code that depends on session configuration
/// }
/// ```
pub(crate) fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}
