//! RPG Characters - Entry Point
//!
//! Scripted mode generates from command-line flags and exits with status 2
//! when the requested race/class is not allowed for the rolled scores.
//! Interactive mode asks for race, class and name on stderr, rerolling
//! whenever the scores leave nothing to choose from. `--race`/`--class` pin
//! that choice in interactive mode too. Only the character goes to stdout.

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rpg_characters::character::{
    AbilityScores, Character, CharacterFactory, GenerationRequest, RandomSelector, RestartReason,
    Selector,
};
use rpg_characters::core::{CharGenError, GeneratorConfig, Result};
use rpg_characters::dice::{DiceRoller, RandomDice};
use rpg_characters::rules::{load_rules, standard_rules};

/// Level 1 Basic Fantasy character generator
#[derive(Parser, Debug)]
#[command(name = "rpg-characters")]
#[command(about = "Roll a level 1 character and validate it against race and class rules")]
struct Args {
    /// Race to generate (random among eligible races if omitted)
    #[arg(long)]
    race: Option<String>,

    /// Class to generate (random among eligible classes if omitted)
    #[arg(long = "class")]
    class_name: Option<String>,

    /// Character display name
    #[arg(long)]
    name: Option<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write the character as JSON to this file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Rule tables to use instead of the built-in Basic Fantasy set
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Prompt for race, class and name
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Output format printed to stdout
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Maximum ability rerolls before giving up
    #[arg(long, default_value_t = GeneratorConfig::default().max_rerolls)]
    max_rerolls: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rpg_characters=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CharGenError::Validation(violations)) => {
            eprintln!("Character rejected:");
            for violation in &violations {
                eprintln!("  - {}", violation);
            }
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = GeneratorConfig {
        max_rerolls: args.max_rerolls,
        rules_path: args.rules.clone(),
    };
    config.validate().map_err(CharGenError::Config)?;

    let rules = match &config.rules_path {
        Some(path) => load_rules(path)?,
        None => standard_rules()?,
    };
    let factory = CharacterFactory::new(&rules);

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Using seed {}", seed);
    let mut dice = RandomDice::seeded(seed);

    // A pinned name that isn't in the tables would only ever reroll
    let mut unknown = Vec::new();
    if let Some(race) = args.race.as_deref().filter(|r| rules.race(r).is_none()) {
        unknown.push(format!("Unknown race '{}'", race));
    }
    if let Some(class) = args.class_name.as_deref().filter(|c| rules.class(c).is_none()) {
        unknown.push(format!("Unknown class '{}'", class));
    }
    if !unknown.is_empty() {
        return Err(CharGenError::Validation(unknown));
    }

    let character = if args.interactive {
        let stdin = io::stdin();
        let selector = PromptSelector::new(stdin.lock(), io::stderr())
            .with_race(args.race.clone())
            .with_class(args.class_name.clone());
        generate_interactive(
            &factory,
            selector,
            args.name.clone(),
            &mut dice,
            config.max_rerolls,
        )?
    } else if let (Some(race), Some(class_name)) = (&args.race, &args.class_name) {
        let request = GenerationRequest {
            race: race.clone(),
            class_name: class_name.clone(),
            name: args.name.clone(),
        };
        factory.generate(&request, &mut dice)?
    } else {
        // Separate stream so choices don't shift the dice sequence
        let mut selector = RandomSelector::new(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)))
            .with_race(args.race.clone())
            .with_class(args.class_name.clone());
        factory.generate_with(&mut selector, args.name.clone(), &mut dice, config.max_rerolls)?
    };

    print_character(&character, args.format)?;

    if let Some(path) = &args.output {
        character.save_json(path)?;
    }

    Ok(())
}

fn print_character(character: &Character, format: Format) -> Result<()> {
    match format {
        Format::Text => println!("{}", character),
        Format::Json => println!("{}", character.to_json()?),
    }
    Ok(())
}

/// Prompt for the name, then let the selector drive generation
///
/// Closed input ends the run with `Aborted`, whichever attempt it happened on.
fn generate_interactive<R: BufRead, W: Write>(
    factory: &CharacterFactory<'_>,
    mut selector: PromptSelector<R, W>,
    name: Option<String>,
    dice: &mut impl DiceRoller,
    max_attempts: u32,
) -> Result<Character> {
    let name = match name {
        Some(name) => Some(name),
        None => selector.ask_name()?,
    };

    match factory.generate_with(&mut selector, name, dice, max_attempts) {
        Err(CharGenError::RerollsExhausted { attempts }) if selector.closed => {
            Err(CharGenError::Aborted { attempts })
        }
        other => other,
    }
}

/// Asks on `input`, prompting on `output`; only ever returns eligible options
///
/// A pinned race or class is used without asking whenever the roll allows it.
struct PromptSelector<R: BufRead, W: Write> {
    input: R,
    output: W,
    closed: bool,
    race: Option<String>,
    class: Option<String>,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            closed: false,
            race: None,
            class: None,
        }
    }

    fn with_race(mut self, race: Option<String>) -> Self {
        self.race = race;
        self
    }

    fn with_class(mut self, class: Option<String>) -> Self {
        self.class = class;
        self
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.closed = true;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_name(&mut self) -> io::Result<Option<String>> {
        Ok(self
            .read_line("Character name (optional): ")?
            .filter(|name| !name.is_empty()))
    }

    fn choose(&mut self, label: &str, options: &BTreeSet<String>) -> Option<String> {
        match self.ask_choice(label, options) {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!("Failed to read choice: {}", e);
                self.closed = true;
                None
            }
        }
    }

    fn ask_choice(
        &mut self,
        label: &str,
        options: &BTreeSet<String>,
    ) -> io::Result<Option<String>> {
        let listed: Vec<&String> = options.iter().collect();
        loop {
            writeln!(self.output, "Eligible {}:", label)?;
            for (i, option) in listed.iter().enumerate() {
                writeln!(self.output, "  {}. {}", i + 1, option)?;
            }

            let answer = match self.read_line(&format!("Choose {}: ", label))? {
                Some(answer) => answer.to_lowercase(),
                None => return Ok(None),
            };

            if let Ok(index) = answer.parse::<usize>() {
                if let Some(option) = index.checked_sub(1).and_then(|i| listed.get(i)) {
                    return Ok(Some((*option).clone()));
                }
            }
            if options.contains(&answer) {
                return Ok(Some(answer));
            }
            writeln!(self.output, "'{}' is not one of the eligible options.", answer)?;
        }
    }

    /// The pinned choice if this roll allows it, `None` to restart
    fn pinned(&mut self, pin: &str, options: &BTreeSet<String>) -> Option<String> {
        if options.contains(pin) {
            return Some(pin.to_string());
        }
        if let Err(e) = writeln!(self.output, "{} is not eligible with these scores.", pin) {
            tracing::warn!("Failed to write prompt: {}", e);
        }
        None
    }

    fn print_abilities(&mut self, abilities: &AbilityScores) {
        let line: Vec<String> = abilities
            .iter()
            .map(|(ability, score)| format!("{} {}", ability.abbreviation(), score))
            .collect();
        if let Err(e) = writeln!(self.output, "\nRolled: {}", line.join("  ")) {
            tracing::warn!("Failed to write prompt: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> Selector for PromptSelector<R, W> {
    fn select_race(
        &mut self,
        abilities: &AbilityScores,
        options: &BTreeSet<String>,
    ) -> Option<String> {
        self.print_abilities(abilities);
        match self.race.clone() {
            Some(race) => self.pinned(&race, options),
            None => self.choose("race", options),
        }
    }

    fn select_class(
        &mut self,
        _abilities: &AbilityScores,
        race: &str,
        options: &BTreeSet<String>,
    ) -> Option<String> {
        match self.class.clone() {
            Some(class) => self.pinned(&class, options),
            None => self.choose(&format!("class for {}", race), options),
        }
    }

    fn allow_reroll(&mut self, reason: &RestartReason, _attempt: u32) -> bool {
        if self.closed {
            return false;
        }
        if let Err(e) = writeln!(self.output, "Rerolling: {}.", reason) {
            tracing::warn!("Failed to write prompt: {}", e);
        }
        true
    }
}
