//! Form/query-string encoding for request parameters

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Request parameters: flat string keys to scalar string values
pub type Params = BTreeMap<String, String>;

/// Encode parameters as `key=value` pairs joined with `&`.
///
/// Keys and values are form-encoded individually. Callers must not rely on
/// the order of the pairs.
pub fn encode(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Build a `Params` map from borrowed pairs
pub fn params<'a, I>(pairs: I) -> Params
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
