use std::fmt::{Display, Formatter};

use thiserror::Error;
use tracing::error;
use urlencoding::{decode, encode};

use crate::params::Parameters;

/// An error found while compiling a path pattern.
///
/// Pattern errors are configuration defects. They are reported when the
/// [`RouteTable`](super::RouteTable) is built and should abort application
/// startup; there is nothing to retry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// An optional parameter was followed by a literal or required parameter.
    ///
    /// A pattern like `/a/:?b/c` is ambiguous: `/a/c` could bind `b = "c"`
    /// with a missing tail, or skip `b` entirely. Optional parameters may only
    /// trail the pattern.
    #[error(
        "pattern `{pattern}`: optional parameter `:?{optional}` may only be followed by other optional parameters, found `{follower}`"
    )]
    OptionalBeforeRequired {
        /// The offending pattern.
        pattern: String,
        /// The name of the optional parameter.
        optional: String,
        /// The literal or required segment that followed it.
        follower: String,
    },
    /// A wildcard segment was combined with other segments.
    ///
    /// The catch-all pattern is the whole path (`"*"`). This also rules out a
    /// second wildcard in the same pattern.
    #[error("pattern `{pattern}`: the wildcard must be the entire pattern")]
    WildcardNotAlone {
        /// The offending pattern.
        pattern: String,
    },
    /// A `:` or `:?` segment without a name.
    #[error("pattern `{pattern}`: parameter segment without a name")]
    EmptyParameterName {
        /// The offending pattern.
        pattern: String,
    },
}

/// A single segment of a compiled [`RoutePattern`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentSpec {
    /// Matches exactly the contained text.
    Literal(String),
    /// Matches any non-empty segment and binds it under the contained name.
    Param(String),
    /// Like [`Param`](SegmentSpec::Param), but also matches an absent trailing
    /// segment, in which case nothing is bound.
    OptionalParam(String),
    /// Matches the remainder of the path unconditionally.
    Wildcard,
}

/// The compiled form of a path pattern.
///
/// Patterns are compiled once, when the [`RouteTable`](super::RouteTable) is
/// built, and are immutable afterwards.
///
/// # Pattern syntax
/// - `/stocks`: literal segments, matched exactly.
/// - `/stock/:type/:day`: `:name` segments match any non-empty value and
///   bind it as a parameter.
/// - `/reset-password/:?passwordResetToken`: `:?name` segments additionally
///   match when the trailing value is absent.
/// - `*`: the catch-all, matching every path. Declare it as the last route
///   of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<SegmentSpec>,
}

impl RoutePattern {
    /// Compile a path pattern.
    ///
    /// # Example
    /// ```rust
    /// # use waypost_router::route_definition::RoutePattern;
    /// RoutePattern::compile("/trade/:stockId/:?againstRate").unwrap();
    ///
    /// // optional parameters may only trail
    /// assert!(RoutePattern::compile("/trade/:?rate/:stockId").is_err());
    /// ```
    pub fn compile(path: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();

        for token in split_path(path) {
            let spec = if token == "*" {
                SegmentSpec::Wildcard
            } else if let Some(name) = token.strip_prefix(":?") {
                if name.is_empty() {
                    return Err(PatternError::EmptyParameterName {
                        pattern: path.to_string(),
                    });
                }
                SegmentSpec::OptionalParam(name.to_string())
            } else if let Some(name) = token.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParameterName {
                        pattern: path.to_string(),
                    });
                }
                SegmentSpec::Param(name.to_string())
            } else {
                SegmentSpec::Literal(token.to_string())
            };

            segments.push(spec);
        }

        if segments.contains(&SegmentSpec::Wildcard) && segments.len() > 1 {
            return Err(PatternError::WildcardNotAlone {
                pattern: path.to_string(),
            });
        }

        let mut trailing_optional = None;
        for spec in &segments {
            match spec {
                SegmentSpec::OptionalParam(name) => trailing_optional = Some(name),
                SegmentSpec::Literal(follower) | SegmentSpec::Param(follower) => {
                    if let Some(optional) = trailing_optional {
                        return Err(PatternError::OptionalBeforeRequired {
                            pattern: path.to_string(),
                            optional: optional.clone(),
                            follower: follower.clone(),
                        });
                    }
                }
                SegmentSpec::Wildcard => {}
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// The pattern as it was written.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.raw
    }

    /// The compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[SegmentSpec] {
        &self.segments
    }

    /// Whether this is the catch-all pattern.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.as_slice(), [SegmentSpec::Wildcard])
    }

    /// The normalized path if the pattern consists of literals only.
    ///
    /// Two routes with the same literal key shadow each other exactly, which
    /// the table builder rejects.
    pub(crate) fn literal_key(&self) -> Option<String> {
        let mut parts = Vec::new();
        for spec in &self.segments {
            match spec {
                SegmentSpec::Literal(literal) => parts.push(literal.as_str()),
                _ => return None,
            }
        }

        Some(format!("/{}", parts.join("/")))
    }

    /// Match the pattern against the segments of a path.
    ///
    /// Returns the extracted parameters on a full match. Parameter values are
    /// URL decoded; a value that fails to decode is logged and omitted from
    /// the result.
    #[must_use]
    pub fn matches(&self, tokens: &[&str]) -> Option<Parameters> {
        if self.is_catch_all() {
            return Some(Parameters::new());
        }

        let mut params = Parameters::new();
        let mut idx = 0;

        for spec in &self.segments {
            match (spec, tokens.get(idx)) {
                (SegmentSpec::Literal(literal), Some(token)) => {
                    if decode_lossy(token) != *literal {
                        return None;
                    }
                    idx += 1;
                }
                (SegmentSpec::Param(name), Some(token)) if !token.is_empty() => {
                    if let Some(value) = decode_checked(token) {
                        params.insert(name.as_str(), value);
                    }
                    idx += 1;
                }
                (SegmentSpec::OptionalParam(name), Some(token)) => {
                    if token.is_empty() {
                        return None;
                    }
                    if let Some(value) = decode_checked(token) {
                        params.insert(name.as_str(), value);
                    }
                    idx += 1;
                }
                // an absent trailing value still matches, binding nothing
                (SegmentSpec::OptionalParam(_), None) => {}
                (SegmentSpec::Wildcard, _) => return Some(params),
                _ => return None,
            }
        }

        if idx == tokens.len() {
            Some(params)
        } else {
            None
        }
    }

    /// Construct a concrete path from the pattern and a set of parameters.
    ///
    /// Parameter values are URL encoded. Trailing optional parameters are
    /// included while present in `params`.
    ///
    /// # Return values
    /// - [`Some`] containing the path.
    /// - [`None`] if a required parameter has no value in `params`, or if the
    ///   pattern is the catch-all.
    ///
    /// # Example
    /// ```rust
    /// # use waypost_router::params::Parameters;
    /// # use waypost_router::route_definition::RoutePattern;
    /// let pattern = RoutePattern::compile("/stock/:type/:day").unwrap();
    /// let params: Parameters = [("type", "MSFT"), ("day", "3400")].into_iter().collect();
    ///
    /// assert_eq!(pattern.format(&params), Some(String::from("/stock/MSFT/3400")));
    /// ```
    #[must_use]
    pub fn format(&self, params: &Parameters) -> Option<String> {
        let mut parts = Vec::new();

        for spec in &self.segments {
            match spec {
                SegmentSpec::Literal(literal) => parts.push(literal.clone()),
                SegmentSpec::Param(name) => match params.get(name) {
                    Some(value) => parts.push(encode(value).into_owned()),
                    None => {
                        error!(pattern = %self.raw, %name, "no value for required parameter");
                        return None;
                    }
                },
                SegmentSpec::OptionalParam(name) => match params.get(name) {
                    Some(value) => parts.push(encode(value).into_owned()),
                    None => break,
                },
                SegmentSpec::Wildcard => {
                    error!("cannot construct a path from the catch-all pattern");
                    return None;
                }
            }
        }

        Some(format!("/{}", parts.join("/")))
    }
}

impl Display for RoutePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a path into its segments.
///
/// The leading slash and a single trailing slash carry no information and are
/// dropped. Interior empty segments are kept, so `/stock//3400` produces an
/// empty token that no parameter will accept.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut tokens: Vec<_> = path.split('/').collect();

    if tokens.last() == Some(&"") {
        tokens.pop();
    }

    tokens
}

fn decode_lossy(token: &str) -> String {
    decode(token)
        .map(|value| value.into_owned())
        .unwrap_or_else(|_| token.to_string())
}

fn decode_checked(token: &str) -> Option<String> {
    match decode(token) {
        Ok(value) => Some(value.into_owned()),
        Err(err) => {
            error!(token, "failed to decode parameter value: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(pattern: &str, path: &str) -> Option<Parameters> {
        RoutePattern::compile(pattern)
            .unwrap()
            .matches(&split_path(path))
    }

    #[test]
    fn literal_matches_exact_text_only() {
        assert!(matched("/home", "/home").is_some());
        assert!(matched("/home", "/homes").is_none());
        assert!(matched("/home", "/home/extra").is_none());
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert!(matched("/home", "/home/").is_some());
    }

    #[test]
    fn root_pattern_matches_root_only() {
        assert!(matched("/", "/").is_some());
        assert!(matched("/", "/home").is_none());
    }

    #[test]
    fn required_parameter_rejects_empty_segment() {
        let params = matched("/stock/:type/:day", "/stock/MSFT/3400").unwrap();
        assert_eq!(params.get("type"), Some("MSFT"));
        assert_eq!(params.get("day"), Some("3400"));

        assert!(matched("/stock/:type/:day", "/stock//3400").is_none());
    }

    #[test]
    fn optional_parameter_matches_with_and_without_value() {
        let with = matched("/reset-password/:?passwordResetToken", "/reset-password/XYZ").unwrap();
        assert_eq!(with.get("passwordResetToken"), Some("XYZ"));

        let without = matched("/reset-password/:?passwordResetToken", "/reset-password").unwrap();
        assert!(without.is_empty());
    }

    #[test]
    fn parameter_values_are_decoded() {
        let params = matched("/stock/:type/:day", "/stock/MSFT%20US/3400").unwrap();
        assert_eq!(params.get("type"), Some("MSFT US"));
    }

    #[test]
    fn wildcard_matches_everything() {
        assert!(matched("*", "/").is_some());
        assert!(matched("*", "/anything/at/all").is_some());
    }

    #[test]
    fn optional_before_required_is_rejected() {
        assert!(matches!(
            RoutePattern::compile("/trade/:?rate/:stockId"),
            Err(PatternError::OptionalBeforeRequired { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/a/:?b/c"),
            Err(PatternError::OptionalBeforeRequired { .. })
        ));
    }

    #[test]
    fn trailing_optionals_may_stack() {
        assert!(RoutePattern::compile("/trade/:stockId/:?rate/:?amount").is_ok());
    }

    #[test]
    fn wildcard_must_be_alone() {
        assert!(matches!(
            RoutePattern::compile("/files/*"),
            Err(PatternError::WildcardNotAlone { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/*/*"),
            Err(PatternError::WildcardNotAlone { .. })
        ));
    }

    #[test]
    fn unnamed_parameter_is_rejected() {
        assert!(matches!(
            RoutePattern::compile("/stock/:"),
            Err(PatternError::EmptyParameterName { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/stock/:?"),
            Err(PatternError::EmptyParameterName { .. })
        ));
    }

    #[test]
    fn format_round_trips_through_matches() {
        let pattern = RoutePattern::compile("/trade/:stockId/:?againstRate").unwrap();
        let params: Parameters = [("stockId", "MSFT"), ("againstRate", "1.25")]
            .into_iter()
            .collect();

        let path = pattern.format(&params).unwrap();
        assert_eq!(path, "/trade/MSFT/1.25");
        assert_eq!(pattern.matches(&split_path(&path)), Some(params));
    }

    #[test]
    fn format_omits_absent_trailing_optional() {
        let pattern = RoutePattern::compile("/trade/:stockId/:?againstRate").unwrap();
        let params: Parameters = [("stockId", "MSFT")].into_iter().collect();

        assert_eq!(pattern.format(&params), Some(String::from("/trade/MSFT")));
    }

    #[test]
    fn format_requires_required_parameters() {
        let pattern = RoutePattern::compile("/stock/:type/:day").unwrap();
        let params: Parameters = [("type", "MSFT")].into_iter().collect();

        assert_eq!(pattern.format(&params), None);
    }

    #[test]
    fn format_encodes_values() {
        let pattern = RoutePattern::compile("/stock/:type").unwrap();
        let params: Parameters = [("type", "MSFT US")].into_iter().collect();

        assert_eq!(pattern.format(&params), Some(String::from("/stock/MSFT%20US")));
    }
}
