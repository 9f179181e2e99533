#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Url(Option<String>),      // /url <url> | /url
    Keywords(Option<String>), // /kw <keyword> | /kw | /kw -
    Run(Option<String>),      // /run [url]
    Help,                     // /help
    Quit,                     // /quit or /exit
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match verb {
        "/url" => Command::Url(rest.map(str::to_string)),
        "/kw" | "/keywords" => match rest {
            None => Command::Keywords(None),
            Some("-") => Command::Keywords(Some(String::new())),
            Some(text) => Command::Keywords(Some(text.to_string())),
        },
        "/run" | "/analyze" => Command::Run(rest.map(str::to_string)),
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_forms() {
        assert_eq!(
            parse_command("/url example.com"),
            Command::Url(Some("example.com".into()))
        );
        assert_eq!(parse_command("/url   "), Command::Url(None));
    }

    #[test]
    fn parses_keyword_forms() {
        assert_eq!(parse_command("/kw"), Command::Keywords(None));
        assert_eq!(parse_command("/kw -"), Command::Keywords(Some(String::new())));
        assert_eq!(
            parse_command("/keywords rust tools"),
            Command::Keywords(Some("rust tools".into()))
        );
    }

    #[test]
    fn parses_run_with_and_without_target() {
        assert_eq!(parse_command("/run"), Command::Run(None));
        assert_eq!(
            parse_command("/analyze https://example.com"),
            Command::Run(Some("https://example.com".into()))
        );
    }

    #[test]
    fn unknown_and_quit() {
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/bogus x"), Command::Unknown("/bogus x".into()));
    }
}
