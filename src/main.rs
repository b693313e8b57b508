//! Runs a short demo battle between two AI-controlled teams and prints the
//! battle log. Pass `--json` to dump the final snapshot instead, and
//! `--config <path>` to load effect and move tables from a RON file.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use monster_battle::battle::ai::ScoringAi;
use monster_battle::{
    Actor, ActorId, BaseStats, Battle, BattleBuilder, BattleResult, DrainOutcome, EngineConfig, HeldItemId, Move,
    PokemonType, ResumeInput, Side, SuspendReason, TurnRng, Weather,
};
use tracing::{error, info};

const MAX_TURNS: u32 = 50;

/// Runs a demo battle between two AI-controlled teams
#[derive(Parser, Debug)]
#[command(name = "monster-battle")]
#[command(about = "Demo battle for the monster battle engine", long_about = None)]
#[command(version)]
struct Args {
    /// Print the final battle snapshot as JSON instead of the battle log
    #[arg(long)]
    json: bool,

    /// RON file with the effect and move tables (defaults to the built-in tables)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn stats(hp: u16, attack: u16, defense: u16, special_attack: u16, special_defense: u16, speed: u16) -> BaseStats {
    BaseStats {
        hp,
        attack,
        defense,
        special_attack,
        special_defense,
        speed,
    }
}

fn demo_battle(config: &EngineConfig) -> BattleResult<Battle> {
    let roster = vec![
        Actor::new(
            ActorId(1),
            "Sunflora",
            Side::Player,
            30,
            vec![PokemonType::Grass],
            stats(120, 60, 55, 95, 80, 45),
            vec![Move::SolarBeam, Move::VineWhip],
        ),
        Actor::new(
            ActorId(2),
            "Golem",
            Side::Player,
            30,
            vec![PokemonType::Rock, PokemonType::Ground],
            stats(130, 95, 110, 50, 60, 40),
            vec![Move::RockSlide, Move::Tackle],
        ),
        Actor::new(
            ActorId(3),
            "Magmar",
            Side::Enemy,
            30,
            vec![PokemonType::Fire],
            stats(115, 85, 60, 90, 75, 85),
            vec![Move::Flamethrower, Move::Scratch],
        ),
        Actor::new(
            ActorId(4),
            "Starmie",
            Side::Enemy,
            30,
            vec![PokemonType::Water],
            stats(110, 65, 80, 90, 80, 100),
            vec![Move::WaterGun, Move::Swift],
        ),
    ];

    let mut builder = BattleBuilder::from_config(config)?
        .battle_id("demo")
        .weather(Weather::Sun)
        .rng(TurnRng::new_random())
        .hold(ActorId(1), HeldItemId::Leftovers, 1)
        .hold(ActorId(2), HeldItemId::SitrusBerry, 1)
        .hold(ActorId(3), HeldItemId::SilkScarf, 2)
        .hold(ActorId(4), HeldItemId::WideLens, 1);
    for actor in roster {
        builder = builder.actor(actor);
    }
    Ok(builder.build()?)
}

fn run(battle: &mut Battle) -> BattleResult<()> {
    let mut ai = ScoringAi::new();
    while !battle.is_over() && battle.state().turn_number <= MAX_TURNS {
        battle.collect_actions(Side::Player, &mut ai)?;
        battle.collect_actions(Side::Enemy, &mut ai)?;

        let mut outcome = battle.resolve_turn()?;
        while let DrainOutcome::Suspended(ref reason) = outcome {
            let input = match reason {
                SuspendReason::Animation(_) => ResumeInput::AnimationComplete,
                SuspendReason::ReplacementChoice { options, .. } => match options.first() {
                    Some(choice) => ResumeInput::Replacement(*choice),
                    None => break,
                },
            };
            outcome = battle.resume(input)?;
        }
        if outcome == DrainOutcome::Halted {
            error!(turn = battle.state().turn_number, "turn halted by the phase limit");
            break;
        }
    }
    info!(state = ?battle.state().game_state, turns = battle.state().turn_number, "demo finished");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::builtin(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "could not load engine config");
            return ExitCode::FAILURE;
        }
    };

    let mut battle = match demo_battle(&config) {
        Ok(battle) => battle,
        Err(e) => {
            error!(error = %e, "could not set up the demo battle");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(&mut battle) {
        error!(error = %e, "battle stopped");
        return ExitCode::FAILURE;
    }

    if args.json {
        match serde_json::to_string_pretty(&battle.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!(error = %e, "could not serialize the snapshot");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for line in battle.event_bus().formatted(battle.state()) {
            println!("{line}");
        }
    }
    ExitCode::SUCCESS
}
