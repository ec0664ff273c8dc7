use once_cell::sync::Lazy;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

/// Runs one API call to completion from the synchronous command handlers.
pub fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    RUNTIME.block_on(fut)
}

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_explicit_scheme() {
        assert_eq!(normalize_url(" http://localhost:3001 "), "http://localhost:3001");
        assert_eq!(normalize_url("api.example.com"), "https://api.example.com");
    }

    #[test]
    fn block_on_drives_futures() {
        assert_eq!(block_on(async { 40 + 2 }), 42);
    }
}
