use std::fmt::Debug;
use std::sync::Arc;

use crate::params::Parameters;

/// What the host should place into its render slot after a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewOutput {
    /// Instantiate the custom element registered under `tag`, handing it the
    /// extracted parameters as attributes.
    Element {
        /// The tag of the element to mount.
        tag: String,
        /// The parameters extracted from the path.
        params: Parameters,
    },
    /// Markup produced by a route's render function.
    Markup(String),
}

/// A custom render function, called with the parameters extracted from the
/// path.
pub type RenderFn = Arc<dyn Fn(&Parameters) -> ViewOutput>;

/// The content of a route.
///
/// A route either names the element the host should mount, or brings its own
/// render function. The two are mutually exclusive by construction.
#[derive(Clone)]
pub enum RouteContent {
    /// Mount the element registered under the contained tag.
    Element(String),
    /// Render via the contained function.
    Custom(RenderFn),
}

impl RouteContent {
    /// Produce the [`ViewOutput`] for this content.
    #[must_use]
    pub(crate) fn render(&self, params: &Parameters) -> ViewOutput {
        match self {
            RouteContent::Element(tag) => ViewOutput::Element {
                tag: tag.clone(),
                params: params.clone(),
            },
            RouteContent::Custom(render) => render(params),
        }
    }
}

// the function in [`Custom`] doesn't implement [`Debug`]
impl Debug for RouteContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(tag) => f.debug_tuple("Element").field(tag).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish(),
        }
    }
}

impl From<&str> for RouteContent {
    fn from(tag: &str) -> Self {
        Self::Element(tag.to_string())
    }
}

impl From<String> for RouteContent {
    fn from(tag: String) -> Self {
        Self::Element(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_content_carries_params() {
        let content = RouteContent::from("pm-stock-detail");
        let params: Parameters = [("type", "MSFT")].into_iter().collect();

        assert_eq!(
            content.render(&params),
            ViewOutput::Element {
                tag: String::from("pm-stock-detail"),
                params,
            }
        );
    }

    #[test]
    fn custom_content_calls_render_function() {
        let content = RouteContent::Custom(Arc::new(|params: &Parameters| {
            ViewOutput::Markup(format!("<h1>{}</h1>", params.get("type").unwrap_or("none")))
        }));
        let params: Parameters = [("type", "MSFT")].into_iter().collect();

        assert_eq!(
            content.render(&params),
            ViewOutput::Markup(String::from("<h1>MSFT</h1>"))
        );
    }
}
