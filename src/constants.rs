use http::header::HeaderName;

pub(crate) const DEFAULT_MAX_BODY_SIZE: u64 = 0;
pub(crate) const DEFAULT_PARAMETER_LIMIT: usize = 1000;

pub(crate) const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub(crate) const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");
pub(crate) const CHUNKED: &str = "chunked";

pub(crate) const LIST_SUFFIX: &str = "[]";
