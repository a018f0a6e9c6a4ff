use std::io;

#[derive(Debug, PartialEq, Eq)]
pub enum GUICommand {
    Board,                     // board
    Moves(String),             // moves <square>
    Move(String),              // move <from><to>
    Status,                    // status
    Perft(String),             // perft <depth>
    Playout(String),           // playout <plies>
    SetOption(String, String), // setoption name <name> value <value>
    Quit,                      // quit the program

    Invalid(String), // placeholder for invalid commands so we can pattern match
}

impl GUICommand {
    /// Next command from stdin, `None` once input is exhausted.
    pub fn receive() -> Option<GUICommand> {
        let mut input = String::new();

        match io::stdin().read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(Self::parse(&input)),
            Err(error) => {
                log::error!("failed to read command: {}", error);
                None
            }
        }
    }

    pub fn parse(input: &str) -> GUICommand {
        let parts = input.split_whitespace().collect::<Vec<_>>();

        match parts.as_slice() {
            ["board"] => GUICommand::Board,
            ["moves", square] => GUICommand::Moves(square.to_string()),
            ["move", notation] => GUICommand::Move(notation.to_string()),
            ["status"] => GUICommand::Status,
            ["perft", depth] => GUICommand::Perft(depth.to_string()),
            ["playout", plies] => GUICommand::Playout(plies.to_string()),
            ["setoption", "name", name_and_rest @ ..] if !name_and_rest.is_empty() => {
                Self::parse_setoption(name_and_rest)
            }
            ["quit"] => GUICommand::Quit,
            _ => GUICommand::Invalid(input.trim().to_string()),
        }
    }

    fn parse_setoption(parts: &[&str]) -> GUICommand {
        // Everything before "value" is the name, everything after it the value
        match parts.iter().position(|&part| part == "value") {
            Some(value_pos) => {
                let name = parts[..value_pos].join(" ");
                let value = parts[value_pos + 1..].join(" ");

                if !name.is_empty() && !value.is_empty() {
                    GUICommand::SetOption(name, value)
                } else {
                    GUICommand::Invalid(format!("setoption name {} value {}", name, value))
                }
            }
            None => GUICommand::Invalid(format!("setoption name {}", parts.join(" "))),
        }
    }
}
