use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    C,
    D,
    M,
    Q,
    R,
    T,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (KeyModifiers::NONE, KeyCode::Char('w' | 'k') | KeyCode::Up) => Some(Command::Up),
            (KeyModifiers::NONE, KeyCode::Char('s' | 'j') | KeyCode::Down) => Some(Command::Down),
            (KeyModifiers::NONE, KeyCode::Char('a' | 'h') | KeyCode::Left) => Some(Command::Left),
            (KeyModifiers::NONE, KeyCode::Char('l') | KeyCode::Right) => Some(Command::Right),
            (_, KeyCode::Enter) => Some(Command::Enter),
            (KeyModifiers::NONE, KeyCode::Char(' ')) => Some(Command::Space),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (KeyModifiers::NONE, KeyCode::Char('c')) => Some(Command::C),
            (KeyModifiers::NONE, KeyCode::Char('d')) => Some(Command::D),
            (KeyModifiers::NONE, KeyCode::Char('m')) => Some(Command::M),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Command::Q),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Command::R),
            (KeyModifiers::NONE, KeyCode::Char('t')) => Some(Command::T),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KeyModifiers::CONTROL, KeyCode::Char('c'), Some(Command::Quit))]
    #[case(KeyModifiers::NONE, KeyCode::Char('c'), Some(Command::C))]
    #[case(KeyModifiers::NONE, KeyCode::Up, Some(Command::Up))]
    #[case(KeyModifiers::NONE, KeyCode::Char('w'), Some(Command::Up))]
    #[case(KeyModifiers::NONE, KeyCode::Char('j'), Some(Command::Down))]
    #[case(KeyModifiers::NONE, KeyCode::Char('a'), Some(Command::Left))]
    #[case(KeyModifiers::NONE, KeyCode::Char('l'), Some(Command::Right))]
    #[case(KeyModifiers::NONE, KeyCode::Right, Some(Command::Right))]
    #[case(KeyModifiers::NONE, KeyCode::Char('d'), Some(Command::D))]
    #[case(KeyModifiers::SHIFT, KeyCode::Enter, Some(Command::Enter))]
    #[case(KeyModifiers::NONE, KeyCode::Esc, Some(Command::Esc))]
    #[case(KeyModifiers::SHIFT, KeyCode::Char('Q'), None)]
    #[case(KeyModifiers::NONE, KeyCode::Char('x'), None)]
    fn test_from_key_event(
        #[case] modifiers: KeyModifiers,
        #[case] code: KeyCode,
        #[case] cmd: Option<Command>,
    ) {
        assert_eq!(Command::from_key_event(KeyEvent::new(code, modifiers)), cmd);
    }
}
