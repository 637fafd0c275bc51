mod test_evaluate;
mod test_genre;

/// Install the logger once per test binary; later calls are no-ops.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
