use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix prepended to every table name (default: "")
    pub table_prefix: String,
    /// `Limit` sent with each query or scan page (default: unset, store decides)
    pub page_size: Option<u32>,
    /// DynamoDB endpoint override, e.g. DynamoDB Local (default: SDK endpoint)
    /// Note: Only used when the `dynamodb` feature is enabled.
    pub endpoint_url: Option<String>,
    /// AWS region (default: SDK region chain)
    /// Note: Only used when the `dynamodb` feature is enabled.
    pub region: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNORM_TABLE_PREFIX` - Table name prefix (default: "")
    /// - `DYNORM_PAGE_SIZE` - Items per query/scan page; `0` or invalid means unset
    /// - `AWS_ENDPOINT_URL` - DynamoDB endpoint override
    /// - `AWS_REGION` - AWS region
    pub fn from_env() -> Self {
        Self {
            table_prefix: env::var("DYNORM_TABLE_PREFIX").unwrap_or_default(),
            page_size: env::var("DYNORM_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok().filter(|v| !v.is_empty()),
            region: env::var("AWS_REGION").ok().filter(|v| !v.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_values() {
        // All environment mutation lives in this one test
        env::remove_var("DYNORM_TABLE_PREFIX");
        env::remove_var("DYNORM_PAGE_SIZE");
        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("AWS_REGION");

        let config = Config::from_env();

        assert_eq!(config.table_prefix, "");
        assert_eq!(config.page_size, None);
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.region, None);

        env::set_var("DYNORM_PAGE_SIZE", "0");
        assert_eq!(Config::from_env().page_size, None);

        env::set_var("DYNORM_TABLE_PREFIX", "test_");
        env::set_var("DYNORM_PAGE_SIZE", "25");
        env::set_var("AWS_ENDPOINT_URL", "http://localhost:8000");

        let config = Config::from_env();

        assert_eq!(config.table_prefix, "test_");
        assert_eq!(config.page_size, Some(25));
        assert_eq!(
            config.endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );

        env::remove_var("DYNORM_TABLE_PREFIX");
        env::remove_var("DYNORM_PAGE_SIZE");
        env::remove_var("AWS_ENDPOINT_URL");
    }
}
