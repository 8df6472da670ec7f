use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Seeds the environment variables the configuration requires, exactly once
/// per test binary. Call before anything reads `AppConfig`.
pub fn init_test_env() {
    INIT.call_once(|| unsafe {
        env::set_var("APP_ENV", "development");
        env::set_var("JWT_SECRET", "test-secret-for-service-center");
        env::set_var("JWT_DURATION_MINUTES", "480");
        env::set_var("DATABASE_PATH", "sqlite::memory:");
    });
}
