use crate::constants;
use crate::error::BoxError;
use crate::params::{DecodedParams, Params};

/// Turns a complete body text into parameters.
///
/// The pipeline treats the decoder as opaque: any error it returns is reported
/// as [`Error::InvalidContent`](crate::Error::InvalidContent) and nothing is
/// merged. It is implemented for closures, so a custom grammar can be plugged in
/// directly.
///
/// # Examples
///
/// ```
/// use urlform::{BoxError, FormDecoder, Params};
///
/// let decoder = |body: &str| -> Result<Params, BoxError> {
///     Ok(body.split(',').map(|key| (key, "on")).collect())
/// };
///
/// let params = decoder.decode("a,b").unwrap();
/// assert_eq!(params.len(), 2);
/// ```
pub trait FormDecoder {
    fn decode(&self, body: &str) -> Result<DecodedParams, BoxError>;
}

impl<F> FormDecoder for F
where
    F: Fn(&str) -> Result<DecodedParams, BoxError>,
{
    fn decode(&self, body: &str) -> Result<DecodedParams, BoxError> {
        self(body)
    }
}

/// The default `application/x-www-form-urlencoded` decoder.
///
/// Pairs are separated by `&`, keys from values by the first `=`. `+` stands
/// for a space and `%XX` for an escaped byte. A `%` that doesn't start a valid
/// escape is kept as is, and escaped bytes that aren't UTF-8 are replaced with
/// `U+FFFD`, so decoding never fails. Repeated keys, and keys ending with `[]`,
/// produce a [`Value::List`](crate::Value::List).
#[derive(Debug, Clone)]
pub struct UrlEncodedDecoder {
    parameter_limit: usize,
}

impl UrlEncodedDecoder {
    /// Creates a decoder with the default limit of 1000 pairs.
    pub fn new() -> Self {
        UrlEncodedDecoder::default()
    }

    /// Sets how many pairs are decoded at most, the remaining ones are ignored.
    pub fn parameter_limit(mut self, limit: usize) -> Self {
        self.parameter_limit = limit;
        self
    }
}

impl Default for UrlEncodedDecoder {
    fn default() -> Self {
        UrlEncodedDecoder {
            parameter_limit: constants::DEFAULT_PARAMETER_LIMIT,
        }
    }
}

impl FormDecoder for UrlEncodedDecoder {
    fn decode(&self, body: &str) -> Result<DecodedParams, BoxError> {
        let mut params = Params::new();

        let pairs = form_urlencoded::parse(body.as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .take(self.parameter_limit);

        for (key, value) in pairs {
            let list_name = key
                .strip_suffix(constants::LIST_SUFFIX)
                .filter(|name| !name.is_empty())
                .map(str::to_owned);

            match list_name {
                Some(name) => params.append(name, value.into_owned(), true),
                None => params.append(key.into_owned(), value.into_owned(), false),
            }
        }

        Ok(params)
    }
}
