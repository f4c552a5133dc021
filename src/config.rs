use crate::constants;

/// Configures how a [`FormBodyParser`](crate::FormBodyParser) treats every
/// request it processes.
///
/// The configuration is fixed once the parser is built and is shared read-only
/// by all requests.
///
/// # Examples
///
/// ```
/// use urlform::ParsingConfig;
///
/// let config = ParsingConfig::new()
///     .max_body_size(64 * 1024)
///     .override_params(true);
///
/// assert_eq!(config.get_max_body_size(), 64 * 1024);
/// assert!(config.is_map_params());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ParsingConfig {
    pub(crate) max_body_size: u64,
    pub(crate) override_params: bool,
    pub(crate) map_params: bool,
    pub(crate) strict_content_type: bool,
}

impl ParsingConfig {
    /// Creates the default configuration: no size limit, existing params win,
    /// decoded params are mapped onto the request params and the content type
    /// must match exactly.
    pub fn new() -> ParsingConfig {
        ParsingConfig::default()
    }

    /// Sets the maximum accepted body size in bytes, `0` disables the check.
    pub fn max_body_size(mut self, limit: u64) -> ParsingConfig {
        self.max_body_size = limit;
        self
    }

    /// Lets decoded values replace params that are already set on the request.
    pub fn override_params(mut self, yes: bool) -> ParsingConfig {
        self.override_params = yes;
        self
    }

    /// When disabled, the decoded form replaces the request body instead of
    /// being merged into the request params.
    pub fn map_params(mut self, yes: bool) -> ParsingConfig {
        self.map_params = yes;
        self
    }

    /// When disabled, the content type is compared case-insensitively and its
    /// parameters (e.g. `charset`) are ignored.
    pub fn strict_content_type(mut self, yes: bool) -> ParsingConfig {
        self.strict_content_type = yes;
        self
    }

    /// The configured limit in bytes, `0` when unlimited.
    pub fn get_max_body_size(&self) -> u64 {
        self.max_body_size
    }

    /// Whether decoded values may replace existing params.
    pub fn is_override_params(&self) -> bool {
        self.override_params
    }

    /// Whether the decoded form is merged into the request params.
    pub fn is_map_params(&self) -> bool {
        self.map_params
    }

    pub fn is_strict_content_type(&self) -> bool {
        self.strict_content_type
    }

    /// The limit to enforce, `None` when unlimited.
    pub(crate) fn body_size_limit(&self) -> Option<u64> {
        if self.max_body_size == 0 {
            None
        } else {
            Some(self.max_body_size)
        }
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        ParsingConfig {
            max_body_size: constants::DEFAULT_MAX_BODY_SIZE,
            override_params: false,
            map_params: true,
            strict_content_type: true,
        }
    }
}
