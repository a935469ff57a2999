use crate::pin::code::{PinCode, PinFormatError};
use secrecy::{ExposeSecret, SecretString};
use std::{
    future::Future,
    io::{self, BufRead, BufReader, IsTerminal, Stderr, Stdin, Write},
};
use tokio::task;
use tracing::{debug, warn};

/// The user dismissed the PIN prompt without submitting a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("PIN verification cancelled")]
pub struct Cancelled;

/// Surface that collects a 4-digit PIN from the user.
///
/// Each call resolves exactly once: with a code that passed the format check,
/// or with [`Cancelled`]. Only one call may be outstanding at a time; the
/// verifier enforces that by owning the prompt and borrowing it mutably.
pub trait PinPrompt {
    fn request_code(
        &mut self,
        prompt_text: &str,
        initial_error: Option<&str>,
    ) -> impl Future<Output = Result<PinCode, Cancelled>>;
}

/// Line-based prompt for terminals.
///
/// A blank line or end of input dismisses the prompt. Anything else that is
/// not four digits keeps the prompt open and shows the format error. With
/// hidden input the entry is read from the terminal with echo turned off.
///
/// Reads run on tokio's blocking pool, so a runtime is required.
pub struct TerminalPrompt<R, W> {
    // `None` only while a read is in flight, or after it panicked.
    io: Option<(R, W)>,
    hide_input: bool,
}

impl TerminalPrompt<BufReader<Stdin>, Stderr> {
    /// Prompt reading from stdin and writing to stderr, so stdout stays
    /// reserved for command results. Input is hidden when stdin is a
    /// terminal.
    #[must_use]
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let hide_input = stdin.is_terminal();
        Self::new(BufReader::new(stdin), io::stderr()).with_hidden_input(hide_input)
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Some((input, output)),
            hide_input: false,
        }
    }

    #[must_use]
    pub fn with_hidden_input(mut self, hide_input: bool) -> Self {
        self.hide_input = hide_input;
        self
    }

    #[must_use]
    pub fn hides_input(&self) -> bool {
        self.hide_input
    }

    /// Returns the reader and writer, `None` if a read panicked.
    pub fn into_parts(self) -> Option<(R, W)> {
        self.io
    }
}

fn read_code<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    hide_input: bool,
    prompt_text: &str,
    initial_error: Option<&str>,
) -> io::Result<Option<PinCode>> {
    writeln!(output, "{prompt_text}")?;
    if let Some(error) = initial_error {
        writeln!(output, "Error: {error}")?;
    }

    loop {
        write!(output, "PIN: ")?;
        output.flush()?;

        let Some(line) = read_entry(input, hide_input)? else {
            return Ok(None);
        };

        // Only the line terminator is dropped; surrounding spaces are a
        // format error.
        let entered = line.trim_end_matches(['\r', '\n']);
        if entered.is_empty() {
            return Ok(None);
        }

        match PinCode::parse(entered) {
            Ok(code) => return Ok(Some(code)),
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

// `None` at end of input.
fn read_entry<R: BufRead>(input: &mut R, hide_input: bool) -> io::Result<Option<String>> {
    if hide_input {
        return match rpassword::read_password() {
            Ok(line) => Ok(Some(line)),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err),
        };
    }

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

impl<R, W> PinPrompt for TerminalPrompt<R, W>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    async fn request_code(
        &mut self,
        prompt_text: &str,
        initial_error: Option<&str>,
    ) -> Result<PinCode, Cancelled> {
        let Some((mut input, mut output)) = self.io.take() else {
            warn!("PIN prompt is no longer usable");
            return Err(Cancelled);
        };

        let prompt_text = prompt_text.to_string();
        let initial_error = initial_error.map(str::to_string);
        let hide_input = self.hide_input;

        let read = task::spawn_blocking(move || {
            let result = read_code(
                &mut input,
                &mut output,
                hide_input,
                &prompt_text,
                initial_error.as_deref(),
            );
            (input, output, result)
        })
        .await;

        let result = match read {
            Ok((input, output, result)) => {
                self.io = Some((input, output));
                result
            }
            Err(err) => {
                warn!("PIN prompt failed: {err}");
                return Err(Cancelled);
            }
        };

        match result {
            Ok(Some(code)) => Ok(code),
            Ok(None) => {
                debug!("PIN prompt dismissed");
                Err(Cancelled)
            }
            Err(err) => {
                warn!("PIN prompt failed: {err}");
                Err(Cancelled)
            }
        }
    }
}

/// Non-interactive prompt that hands out one pre-configured PIN.
///
/// A second request means the server rejected the PIN; it is never resent.
/// The request is cancelled and the rejection kept for reporting.
#[derive(Debug, Default)]
pub struct StaticPin {
    code: Option<PinCode>,
    rejection: Option<String>,
}

impl StaticPin {
    #[must_use]
    pub fn new(code: PinCode) -> Self {
        Self {
            code: Some(code),
            rejection: None,
        }
    }

    /// Builds the prompt from a configured secret.
    ///
    /// # Errors
    /// Returns `PinFormatError` if the secret is not a 4-digit PIN.
    pub fn from_secret(secret: &SecretString) -> Result<Self, PinFormatError> {
        PinCode::parse(secret.expose_secret().trim()).map(Self::new)
    }

    /// Server message that rejected the configured PIN, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }
}

impl PinPrompt for StaticPin {
    async fn request_code(
        &mut self,
        _prompt_text: &str,
        initial_error: Option<&str>,
    ) -> Result<PinCode, Cancelled> {
        if let Some(error) = initial_error {
            self.rejection = Some(error.to_string());
        }
        self.code.take().ok_or(Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::code::PIN_FORMAT_MESSAGE;
    use std::io::Cursor;

    fn prompt(input: &str) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompt: TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompt.into_parts().unwrap().1).unwrap()
    }

    #[tokio::test]
    async fn test_valid_code_resolves() {
        let mut surface = prompt("1234\n");
        let code = surface.request_code("Enter PIN", None).await.unwrap();
        assert_eq!(code.expose(), "1234");

        let shown = output(surface);
        assert!(shown.starts_with("Enter PIN\n"));
        assert!(!shown.contains("Error:"));
    }

    #[tokio::test]
    async fn test_invalid_code_keeps_prompt_open() {
        let mut surface = prompt("12\nabcd\n12345\n0042\n");
        let code = surface.request_code("Enter PIN", None).await.unwrap();
        assert_eq!(code.expose(), "0042");
        assert_eq!(output(surface).matches(PIN_FORMAT_MESSAGE).count(), 3);
    }

    #[tokio::test]
    async fn test_initial_error_is_shown() {
        let mut surface = prompt("1111\n");
        surface
            .request_code("Enter PIN", Some("Invalid PIN"))
            .await
            .unwrap();
        assert!(output(surface).contains("Error: Invalid PIN"));
    }

    #[tokio::test]
    async fn test_blank_line_and_eof_cancel() {
        let mut surface = prompt("\n");
        assert_eq!(surface.request_code("Enter PIN", None).await, Err(Cancelled));

        let mut surface = prompt("");
        assert_eq!(surface.request_code("Enter PIN", None).await, Err(Cancelled));

        let mut surface = prompt("99\n");
        assert_eq!(surface.request_code("Enter PIN", None).await, Err(Cancelled));
    }

    #[tokio::test]
    async fn test_surrounding_spaces_are_rejected() {
        let mut surface = prompt("  1234  \n 1234\n1234\r\n");
        let code = surface.request_code("Enter PIN", None).await.unwrap();
        assert_eq!(code.expose(), "1234");
        assert_eq!(output(surface).matches(PIN_FORMAT_MESSAGE).count(), 2);
    }

    #[tokio::test]
    async fn test_prompt_is_reusable_across_requests() {
        let mut surface = prompt("1111\n2222\n");
        let first = surface.request_code("Enter PIN", None).await.unwrap();
        let second = surface
            .request_code("Enter PIN", Some("Invalid PIN"))
            .await
            .unwrap();
        assert_eq!((first.expose(), second.expose()), ("1111", "2222"));
        assert_eq!(output(surface).matches("Enter PIN\n").count(), 2);
    }

    #[test]
    fn test_hidden_input_follows_terminal() {
        assert!(!prompt("").hides_input());
        assert!(prompt("").with_hidden_input(true).hides_input());
        assert_eq!(
            TerminalPrompt::stdio().hides_input(),
            io::stdin().is_terminal()
        );
    }

    #[tokio::test]
    async fn test_static_pin_is_used_once() {
        let mut surface = StaticPin::new(PinCode::parse("2468").unwrap());
        let code = surface.request_code("Enter PIN", None).await.unwrap();
        assert_eq!(code.expose(), "2468");
        assert!(surface.rejection().is_none());

        assert_eq!(
            surface.request_code("Enter PIN", Some("Invalid PIN")).await,
            Err(Cancelled)
        );
        assert_eq!(surface.rejection(), Some("Invalid PIN"));
    }

    #[test]
    fn test_static_pin_from_secret() {
        assert!(StaticPin::from_secret(&SecretString::from("1357".to_string())).is_ok());
        assert!(StaticPin::from_secret(&SecretString::from("13".to_string())).is_err());
    }
}
