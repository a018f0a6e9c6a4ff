use chessbot::controller::{GameController, MoveResultType};
use chessbot::game::Square;
use chessbot::utils::GUICommand;
use clap::{Arg, ArgAction, Command, value_parser};

fn print_perft(controller: &GameController, depth: usize) {
    let moves = controller.perft(depth);

    for (id, to, count) in &moves {
        println!("{} {}: {}", id, to, count);
    }

    let nodes: usize = moves.iter().map(|(_, _, count)| count).sum();
    println!("\nNodes: {}", nodes);
}

fn run_playout(controller: &mut GameController, plies: usize) {
    match controller.playout(plies) {
        Ok(report) => {
            println!("{}", controller.render());
            println!("{}", report);
        }
        Err(error) => eprintln!("{}", error),
    }
}

fn main() {
    env_logger::init();

    let matches = Command::new("chessbot")
        .version(concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))
        .about("Two-player chess rules engine with a line-based console")
        .arg(
            Arg::new("strict-castling")
                .long("strict-castling")
                .action(ArgAction::SetTrue)
                .help("Refuse castling through an attacked square"),
        )
        .arg(
            Arg::new("perft")
                .long("perft")
                .value_name("DEPTH")
                .value_parser(value_parser!(usize))
                .help("Count leaf positions from the initial position and exit"),
        )
        .arg(
            Arg::new("playout")
                .long("playout")
                .value_name("PLIES")
                .value_parser(value_parser!(usize))
                .help("Play random legal moves and exit"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Seed for random playouts"),
        )
        .get_matches();

    let mut controller = GameController::new();

    if matches.get_flag("strict-castling") {
        controller.set_option("StrictCastling", "true");
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        controller.seed = seed;
    }

    if let Some(&depth) = matches.get_one::<usize>("perft") {
        print_perft(&controller, depth);
        return;
    }
    if let Some(&plies) = matches.get_one::<usize>("playout") {
        run_playout(&mut controller, plies);
        return;
    }

    while let Some(command) = GUICommand::receive() {
        match command {
            GUICommand::Quit => break,
            GUICommand::Board => println!("{}", controller.render()),
            GUICommand::Moves(square_string) => match Square::parse(&square_string) {
                Some(square) => {
                    let moves = controller.select(square);

                    println!("{}", controller.render());
                    println!(
                        "{}",
                        moves.iter().map(Square::to_string).collect::<Vec<_>>().join(" ")
                    );
                }
                None => log::info!("invalid square: {}", square_string),
            },
            GUICommand::Move(notation) => match controller.try_move_piece(&notation) {
                MoveResultType::Success => println!("{}", controller.render()),
                result => log::info!("{:?}", result),
            },
            GUICommand::Status => println!("{}", controller.status_line()),
            GUICommand::Perft(depth_string) => match depth_string.parse::<usize>() {
                Ok(depth) => print_perft(&controller, depth),
                Err(error) => log::info!("invalid depth {}: {}", depth_string, error),
            },
            GUICommand::Playout(plies_string) => match plies_string.parse::<usize>() {
                Ok(plies) => run_playout(&mut controller, plies),
                Err(error) => log::info!("invalid ply count {}: {}", plies_string, error),
            },
            GUICommand::SetOption(name, value) => controller.set_option(&name, &value),
            GUICommand::Invalid(line) => log::info!("unknown command: {}", line),
        }
    }
}
