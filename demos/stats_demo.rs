use clap::Parser;
use clap::ValueEnum;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use slot_index::HashTable;
use slot_index::InsertError;
use slot_index::probe::DoubleHashProbe;
use slot_index::probe::LinearProbe;
use slot_index::probe::Probe;
use slot_index::probe::QuadraticProbe;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Linear,
    Quadratic,
    Double,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 1000)]
    capacity: usize,

    /// Fraction of the capacity to fill.
    #[arg(short = 'l', long = "load", default_value_t = 0.9)]
    load: f64,

    /// Fraction of inserted keys to delete afterwards.
    #[arg(short = 'd', long = "delete", default_value_t = 0.0)]
    delete: f64,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Linear)]
    strategy: Strategy,

    #[arg(long = "seed", default_value_t = 0)]
    seed: u64,
}

fn run<P: Probe>(args: &Args, probe: P) {
    let mut table = match HashTable::with_capacity_and_probe(args.capacity, probe) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("cannot create table: {err}");
            std::process::exit(1);
        }
    };

    println!("Creating table with capacity: {}", table.capacity());
    println!("Probe strategy: {:?}", table.probe());

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let target = ((args.capacity as f64 * args.load.clamp(0.0, 1.0)) as usize).min(args.capacity);

    let mut inserted = Vec::with_capacity(target);
    let mut duplicates = 0;
    let mut exhausted = 0;
    while inserted.len() < target {
        let key = rng.random::<u32>() as u64;
        match table.insert(key, inserted.len()) {
            Ok(_) => inserted.push(key),
            Err(InsertError::DuplicateKey) => duplicates += 1,
            Err(InsertError::ProbeExhausted) => {
                exhausted += 1;
                if exhausted > args.capacity {
                    break;
                }
            }
            Err(err) => {
                eprintln!("insert failed: {err}");
                break;
            }
        }
    }

    let to_delete = (inserted.len() as f64 * args.delete.clamp(0.0, 1.0)) as usize;
    for key in inserted.iter().take(to_delete) {
        if let Err(err) = table.delete(*key) {
            eprintln!("delete of {key} failed: {err}");
        }
    }

    println!(
        "Inserted {} keys, deleted {} ({} duplicate draws, {} exhausted probes)",
        inserted.len(),
        to_delete,
        duplicates,
        exhausted
    );
    println!("Final load factor: {:.2}%", table.load_factor() * 100.0);

    table.probe_histogram().print();
    table.debug_stats().print();
}

fn main() {
    let args = Args::parse();

    match args.strategy {
        Strategy::Linear => run(&args, LinearProbe),
        Strategy::Quadratic => run(&args, QuadraticProbe),
        Strategy::Double => run(&args, DoubleHashProbe::with_seed(args.seed)),
    }
}
