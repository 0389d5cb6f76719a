use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the test logger once per test binary.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
