//! Types relating to navigation.

/// A target for the router to navigate to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Navigate to the specified path within the application.
    Path(String),
    /// Navigate to an external page, leaving the application.
    External(String),
}

impl NavigationTarget {
    /// Returns `true` if the navigation target is [`External`].
    ///
    /// [`External`]: NavigationTarget::External
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(..))
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_conversion_is_a_path() {
        let target: NavigationTarget = "/stocks".into();

        assert_eq!(target, NavigationTarget::Path(String::from("/stocks")));
        assert!(!target.is_external());
    }
}
