use tour::NavigationInput;

/// One line typed at the player prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(NavigationInput),
    /// Replace the query string, as browser back/forward would.
    Url(String),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  start            leave the intro for the first chapter
  next | n         next chapter (stops autoplay)
  back | b         previous chapter (stops autoplay)
  play | p         toggle autoplay
  go <index>       jump to chapter <index> (0-based)
  home             back to the intro
  url <query>      replace the URL query, e.g. url ?chapterId=3
  show             print the overlay
  help             this text
  quit | q         exit";

pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    let cmd = match word.to_ascii_lowercase().as_str() {
        "start" | "s" => Command::Input(NavigationInput::Start),
        "next" | "n" | "forward" => Command::Input(NavigationInput::Forward),
        "back" | "b" | "prev" => Command::Input(NavigationInput::Back),
        "play" | "p" | "pause" => Command::Input(NavigationInput::ToggleAutoplay),
        "home" | "intro" => Command::Input(NavigationInput::Home),
        "go" => {
            let index = rest
                .parse::<usize>()
                .map_err(|_| format!("go requires a chapter index, got {rest:?}"))?;
            Command::Input(NavigationInput::SelectChapter(index))
        }
        "url" => Command::Url(rest.to_string()),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(cmd))
}
