#[cfg(feature = "metrics")]
use std::time::Instant;

#[cfg(feature = "metrics")]
use log::info;

/// Runs `f`, logging how long it took to complete.
#[cfg(feature = "metrics")]
pub fn measure<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let tt = Instant::now();
    let result = f();
    let tt = tt.elapsed();

    info!("{label}: {}", humantime::format_duration(tt));

    result
}

#[cfg(not(feature = "metrics"))]
pub fn measure<T>(_: &str, f: impl FnOnce() -> T) -> T {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_returns_result() {
        assert_eq!(42, measure("answer", || 42));
    }
}
