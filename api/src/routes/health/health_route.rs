//! GET / — liveness check.

/// Handler: GET /
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_ok() {
        assert_eq!(health().await, "ok");
    }
}
