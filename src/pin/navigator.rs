use std::{
    fmt,
    io::{self, Stderr, Write},
};
use tracing::warn;
use url::Url;

/// Effects a lockout has on the surrounding application: a blocking alert
/// followed by a one-way navigation.
pub trait Navigator {
    fn alert(&mut self, message: &str);

    /// Leaves the current view for `path`, returning where the user was sent.
    fn navigate(&mut self, path: &str) -> String;
}

/// Terminal signal of a verification loop that ended in a lockout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub message: String,
    pub location: String,
}

impl fmt::Display for Redirect {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} (redirecting to {})", self.message, self.location)
    }
}

/// Navigator for the command-line client: alerts go to the writer and the
/// redirect target is resolved against the service base URL.
pub struct TerminalNavigator<W = Stderr> {
    base_url: Url,
    output: W,
}

impl TerminalNavigator<Stderr> {
    #[must_use]
    pub fn stderr(base_url: Url) -> Self {
        Self::new(base_url, io::stderr())
    }
}

impl<W: Write> TerminalNavigator<W> {
    pub fn new(base_url: Url, output: W) -> Self {
        Self { base_url, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> Navigator for TerminalNavigator<W> {
    fn alert(&mut self, message: &str) {
        if let Err(err) = writeln!(self.output, "{message}") {
            warn!("Failed to show alert: {err}");
        }
    }

    fn navigate(&mut self, path: &str) -> String {
        let location = self
            .base_url
            .join(path)
            .map_or_else(|_| path.to_string(), |url| url.to_string());
        if let Err(err) = writeln!(self.output, "Redirecting to {location}") {
            warn!("Failed to show redirect: {err}");
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_navigator() {
        let base = Url::parse("https://cronpost.example/api/").unwrap();
        let mut navigator = TerminalNavigator::new(base, Vec::new());
        navigator.alert("Locked.");
        let location = navigator.navigate("/dashboard");
        assert_eq!(location, "https://cronpost.example/dashboard");

        let shown = String::from_utf8(navigator.into_output()).unwrap();
        assert_eq!(
            shown,
            "Locked.\nRedirecting to https://cronpost.example/dashboard\n"
        );
    }

    #[test]
    fn test_redirect_display() {
        let redirect = Redirect {
            message: "Locked.".to_string(),
            location: "/dashboard".to_string(),
        };
        assert_eq!(redirect.to_string(), "Locked. (redirecting to /dashboard)");
    }
}
