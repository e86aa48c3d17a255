//! Pagination configuration

/// Paginator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Page size used when a request gives no limit (default: 50)
    pub default_limit: usize,

    /// Largest page size a request can ask for (default: 500)
    /// Larger limits are clamped down, never rejected
    pub max_limit: usize,

    /// Bucket count for percentile grouping without num_groups (default: 5)
    pub default_num_groups: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 500,
            default_num_groups: 5,
        }
    }
}

impl PaginationConfig {
    /// Set the default page size
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Set the page size ceiling
    pub fn with_max_limit(mut self, limit: usize) -> Self {
        self.max_limit = limit;
        self
    }

    /// Set the default percentile bucket count
    pub fn with_default_num_groups(mut self, num_groups: usize) -> Self {
        self.default_num_groups = num_groups;
        self
    }

    /// Clamp a requested limit into `1..=max_limit`.
    ///
    /// Missing or non-positive limits fall back to the default.
    pub fn clamp_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) if n > 0 => (n as u64).min(self.max_limit as u64) as usize,
            _ => self.default_limit.min(self.max_limit),
        }
    }

    /// Clamp a requested offset to be non-negative
    pub fn clamp_offset(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) if n > 0 => n as usize,
            _ => 0,
        }
    }
}
