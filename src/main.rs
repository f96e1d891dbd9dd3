use clap::Parser;
use log::{LevelFilter, Metadata, Record};
use nars_evolve::{
    Config, Direction, EvidentialValue, GenePool, Genome, Nars, NarsConfig, SelectionTable,
    SharedSelectionTable, TermArena, TileKind, Verb,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_POPULATION: usize = 20;
const DEMO_LIFETIME: usize = 40;

/// Interactive reasoner with evolvable innate beliefs
#[derive(Parser, Debug)]
#[command(name = "nars-evolve", version, about = "Interactive NARS reasoner and evolution demo")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger {
    level: LevelFilter,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let logger: &'static StderrLogger = Box::leak(Box::new(StderrLogger { level }));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn main() -> nars_evolve::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let arena = Arc::new(TermArena::new());
    let pool = GenePool::new(Arc::clone(&arena), config.evolution.clone());
    let genome = Genome::new(Arc::clone(&pool), None, None, None, &mut rng);
    let mut nars = Nars::new(Arc::clone(&arena), config.nars.clone(), &genome);

    println!("=====================================");
    println!("        NARS Evolve v0.1             ");
    println!("  Temporal Induction + Evolution     ");
    println!("=====================================\n");

    loop {
        println!("\nChoose mode:");
        println!("  [1]  Enter Narsese");
        println!("  [2]  Run cycles");
        println!("  [3]  Show motor activations");
        println!("  [4]  Evolve a demo population");
        println!("  [q]  Quit");

        let Some(choice) = prompt("\n→ ")? else {
            break;
        };

        match choice.to_lowercase().as_str() {
            "1" | "n" | "narsese" => {
                let Some(text) = prompt("narsese> ")? else {
                    break;
                };
                match nars.input_narsese(&text) {
                    Ok(()) => println!("accepted, run a cycle to process it"),
                    Err(err) => println!("rejected: {err}"),
                }
            }

            "2" | "r" | "run" => {
                let Some(count) = prompt("cycles> ")? else {
                    break;
                };
                let count = count.parse::<usize>().unwrap_or(1);
                for _ in 0..count {
                    nars.run_cycle();
                }
                println!(
                    "cycle {} | {} implications | {} goals",
                    nars.current_cycle(),
                    nars.implications().count(),
                    nars.goals().len()
                );
            }

            "3" | "a" | "activations" => show_activations(&nars, &pool),

            "4" | "e" | "evolve" => {
                let Some(generations) = prompt("generations> ")? else {
                    break;
                };
                let generations = generations.parse::<usize>().unwrap_or(5);
                evolve_demo(&pool, &config, generations, &mut rng);
            }

            "q" | "quit" | "exit" => {
                println!("Goodbye!");
                break;
            }

            _ => println!("Invalid choice. Please enter 1, 2, 3, 4 or q."),
        }
    }
    Ok(())
}

fn show_activations(nars: &Nars, pool: &GenePool) {
    let mut active: Vec<_> = pool
        .vocabulary
        .motor_pool()
        .iter()
        .map(|op| (op, nars.goal_activation(op)))
        .filter(|(_, activation)| *activation > 0.0)
        .collect();
    if active.is_empty() {
        println!("no operation is desired yet");
        return;
    }
    active.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (op, activation) in &active {
        println!("  {activation:.3}  {op}");
    }
    match nars.best_operation(pool.vocabulary.motor_pool()) {
        Some((op, _)) => println!("would execute {op} (T = {:.2})", nars.decision_threshold()),
        None => println!("nothing clears T = {:.2}", nars.decision_threshold()),
    }
}

/// One lifetime in a toy world: grass appears in a random neighbouring
/// cell each step and eating in that direction yields energy. Returns the
/// number of meals.
fn live(pool: &Arc<GenePool>, config: &NarsConfig, genome: &Genome, rng: &mut StdRng) -> f64 {
    let vocab = &pool.vocabulary;
    let eat_ops = vocab.operations_of(Verb::Eat);
    let sensed = EvidentialValue::new(1.0, config.sensation_confidence);
    let mut nars = Nars::new(Arc::clone(&pool.arena), config.clone(), genome);
    let mut meals = 0.0;

    for _ in 0..DEMO_LIFETIME {
        let grass_at = Direction::random(rng);
        nars.sense(vocab.seen(TileKind::Grass, grass_at).clone(), sensed);
        let water_at = Direction::random(rng);
        if water_at != grass_at {
            nars.sense(vocab.seen(TileKind::Water, water_at).clone(), sensed);
        }
        nars.run_cycle();

        let ops: Vec<_> = eat_ops.iter().map(|(_, op)| op.clone()).collect();
        let chosen = match nars.best_operation(&ops) {
            Some((op, _)) => op,
            None => eat_ops[rng.gen_range(0..eat_ops.len())].1.clone(),
        };
        nars.report_operation(&chosen);
        if &chosen == vocab.eat_op(grass_at) {
            nars.sense(vocab.energy_increasing().clone(), sensed);
            meals += 1.0;
        }
        nars.run_cycle();
    }
    meals
}

fn evolve_demo(pool: &Arc<GenePool>, config: &Config, generations: usize, rng: &mut StdRng) {
    let table = SharedSelectionTable::new(SelectionTable::new(
        config.selection.capacity,
        config.selection.sampling,
    ));

    for generation in 0..generations {
        let mut cohort = Vec::with_capacity(DEMO_POPULATION + 1);
        while cohort.len() < DEMO_POPULATION {
            if table.count() < 2 {
                cohort.push(Genome::new(Arc::clone(pool), None, None, None, rng));
            } else {
                let sexual = rng.gen_bool(0.5);
                cohort.extend(table.breed(sexual, rng));
            }
        }
        cohort.truncate(DEMO_POPULATION);

        for genome in cohort {
            let fitness = live(pool, &config.nars, &genome, rng);
            table.try_add(fitness, genome);
        }
        println!(
            "generation {generation:>3} | best {:>5.1} | mean {:>5.2} | median {:>5.2}",
            table.best().map_or(0.0, |(score, _)| score),
            table.mean().unwrap_or(0.0),
            table.median().unwrap_or(0.0),
        );
    }

    if let Some((score, best)) = table.best() {
        println!("\nbest genome scored {score:.1}:");
        for belief in best.beliefs() {
            println!("  {} {}", belief.statement, belief.evidence);
        }
    }
}
