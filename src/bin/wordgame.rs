
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use structopt::StructOpt;

use wordgame::dictionary::{load_word_set, word_set_name, DictionaryError, EmptyWordSet};
use wordgame::game::{game_state_visible_to_player, handle_action, start_game};
use wordgame::registry::{NewGameOptions, RegistryError, RulesRegistry};
use wordgame::{Action, GameState, Move, Player, RuleSettings, WordSet};

#[derive(Debug, serde::Deserialize)]
struct Settings {
    /// The words that are allowed to be played.
    ///
    /// Either a `.txt` file with one word per line, or a prebuilt `.fst` file
    dictionary: Option<PathBuf>,

    /// The name of the rules new games are played with
    #[serde(default = "original")]
    rules: String,

    #[serde(default)]
    accept_invalid_words: bool,

    /// Seed of the first shuffle of new games, random if not present
    seed: Option<u64>,
}

fn original() -> String {
    wordgame::registry::CLASSIC_RULES_NAME.to_owned()
}

#[derive(Debug, StructOpt)]
#[structopt(name = "wordgame", about = "Play a word game stored in a JSON file")]
struct Opt {
    /// The config file, if not present only the environment (`WORDGAME_*`) is used
    #[structopt(short = "c", long = "config")]
    config: Option<String>,

    /// The dictionary of words that are allowed to be played
    #[structopt(short = "d", long = "dictionary")]
    dict: Option<String>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Create and start a game
    New {
        /// The names of the players, in playing order
        #[structopt(short = "p", long = "player", required = true)]
        players: Vec<String>,

        /// Where to write the game
        #[structopt(short = "o", long = "output", parse(from_os_str))]
        output: PathBuf,

        #[structopt(long = "seed")]
        seed: Option<u64>,

        #[structopt(long = "accept-invalid-words")]
        accept_invalid_words: bool,
    },
    /// Apply an action to a game, the game file is updated if the action is legal
    Play {
        #[structopt(short = "g", long = "game", parse(from_os_str))]
        game: PathBuf,

        /// The action as JSON, for example `{"actionType": "Pass", "player": 0}`
        #[structopt(short = "a", long = "action", parse(from_os_str))]
        action: PathBuf,
    },
    /// Show a game the way a player sees it
    View {
        #[structopt(short = "g", long = "game", parse(from_os_str))]
        game: PathBuf,

        #[structopt(short = "p", long = "player")]
        player: usize,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("the game has no player {0}")]
    NoSuchPlayer(usize),
}

fn load_config(config_file: Option<String>, dict: Option<String>) -> Result<Settings, config::ConfigError> {
    let mut s = config::Config::new();

    if let Some(f) = config_file {
        s.merge(config::File::with_name(&f))?;
    }

    s.merge(config::Environment::with_prefix("WORDGAME"))?;

    if let Some(d) = dict {
        s.set("dictionary", d)?;
    }

    s.try_into()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    simple_logger::SimpleLogger::from_env().init()?;

    let Opt { config, dict, cmd } = Opt::from_args();
    let conf = load_config(config, dict)?;

    match cmd {
        Command::New { players, output, seed, accept_invalid_words } => {
            new_game(&conf, players, &output, seed, accept_invalid_words)
        },
        Command::Play { game, action } => play(&conf, &game, &action),
        Command::View { game, player } => view(&game, player),
    }
}

/// The configured dictionary and its name
fn words(conf: &Settings) -> Result<(Arc<dyn WordSet>, String), DictionaryError> {
    match &conf.dictionary {
        Some(path) => {
            let words: Arc<dyn WordSet> = Arc::new(load_word_set(path)?);
            Ok((words, word_set_name(path)))
        },
        None => {
            log::warn!("no dictionary configured, every word is invalid");
            let words: Arc<dyn WordSet> = Arc::new(EmptyWordSet);
            Ok((words, String::new()))
        },
    }
}

fn read_game(path: &Path) -> Result<GameState<RuleSettings>, CliError> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

fn write_game(path: &Path, state: &GameState) -> Result<(), CliError> {
    serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &state.to_persisted())?;
    Ok(())
}

fn new_game(
    conf: &Settings,
    names: Vec<String>,
    output: &Path,
    seed: Option<u64>,
    accept_invalid_words: bool,
) -> Result<(), CliError> {
    let registry = RulesRegistry::with_defaults();
    let provider = registry.get(&conf.rules)?;
    let (words, word_set_name) = words(conf)?;

    let players = names.into_iter()
        .enumerate()
        .map(|(i, name)| Player::new(format!("player-{}", i), name))
        .collect();
    let state = start_game(provider.new_game(NewGameOptions {
        players,
        words,
        word_set_name,
        accept_invalid_words: accept_invalid_words || conf.accept_invalid_words,
        shuffle_seed: seed.or(conf.seed).unwrap_or_else(rand::random),
    }));

    write_game(output, &state)?;
    let first = state.players.first().map_or("nobody", |p| p.name.as_str());
    println!("game written to {:?}, {} to move", output, first);
    Ok(())
}

fn play(conf: &Settings, game: &Path, action: &Path) -> Result<(), CliError> {
    let persisted = read_game(game)?;
    let (words, name) = words(conf)?;
    if name != persisted.rules.word_set_name {
        log::warn!(
            "the game is played with the word list {:?}, but {:?} is configured",
            persisted.rules.word_set_name,
            name,
        );
    }
    let state = RulesRegistry::with_defaults().restore_game(persisted, words)?;
    let action: Action = serde_json::from_reader(BufReader::new(File::open(action)?))?;

    let result = handle_action(&state, &action);
    if !result.is_legal() {
        for reason in &result.illegal_reasons {
            println!("{}", reason);
        }
        return Ok(())
    }

    let new_state = result.new_state;
    write_game(game, &new_state)?;

    if let Some(last) = new_state.moves.last().filter(|_| !matches!(action, Action::ReorderTrayTiles { .. })) {
        if let Move::PlayWord { .. } = last.mov {
            for word in &last.words {
                println!("{:>3}: {}{}", word.score, word.word.to_uppercase(), if word.valid { "" } else { " (not a word)" });
            }
        }
        println!("total: {}", last.total_score);
    }
    for (player, score) in new_state.players.iter().zip(&new_state.scores) {
        println!("{:<12} {:>4}", player.name, score);
    }
    if new_state.player_to_move.has_ended() {
        println!("game over");
    }
    Ok(())
}

fn view(game: &Path, player: usize) -> Result<(), CliError> {
    let persisted = read_game(game)?;
    if player >= persisted.players.len() {
        return Err(CliError::NoSuchPlayer(player));
    }
    let view = game_state_visible_to_player(&persisted, player);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
