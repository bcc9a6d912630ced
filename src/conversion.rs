use crate::error::ConversionError;

/// Converts textual tokens to floats, preserving order.
///
/// Fails on the first token that does not parse; no partial sequence is
/// returned.
pub fn strings_to_floats<S>(tokens: &[S]) -> Result<Vec<f64>, ConversionError>
where
    S: AsRef<str>,
{
    tokens
        .iter()
        .enumerate()
        .map(|(position, token)| {
            let token = token.as_ref();
            token.parse::<f64>().map_err(|_| ConversionError {
                token: token.to_owned(),
                position,
            })
        })
        .collect()
}
