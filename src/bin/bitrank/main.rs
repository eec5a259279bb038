//! Bitrank CLI: run access/rank/select command files against a bitvector.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use bitrank::{BitVec, RankSelect};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Parser)]
#[command(name = "bitrank")]
#[command(about = "Succinct bitvector query tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a command file against the bitvector it describes
    Run(RunArgs),
    /// Generate a deterministic command file for benchmarking and testing
    Generate(GenerateArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Input file: command count, bit string, then one command per line
    /// (`access <pos>` | `rank <0|1> <pos>` | `select <0|1> <k>`)
    input: PathBuf,

    /// Write replies here instead of stdout (parent directories are created)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    /// Number of bits in the generated bitvector
    bits: u64,

    /// Number of queries to generate
    #[arg(short, long, default_value = "1000")]
    queries: u64,

    /// Probability of a 1-bit
    #[arg(short, long, default_value = "0.5")]
    density: f64,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// A parsed query line.
#[derive(Debug, Clone, Copy)]
enum Query {
    Access(u64),
    Rank(bool, u64),
    Select(bool, u64),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Generate(args) => generate(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mut lines = text.lines();

    let count_line = lines.next().context("missing command count line")?;
    let query_count: usize = count_line
        .trim()
        .parse()
        .with_context(|| format!("invalid command count {:?}", count_line))?;
    let bits_line = lines.next().context("missing bit string line")?;

    let mut queries = Vec::with_capacity(query_count);
    for lineno in 0..query_count {
        let line = lines
            .next()
            .with_context(|| format!("missing command line {}", lineno + 3))?;
        queries.push(parse_query(line).with_context(|| format!("line {}", lineno + 3))?);
    }

    // Build and query inside the timed section; reply I/O stays outside.
    let build_start = Instant::now();
    let bv = BitVec::from_bits_text(bits_line);
    if bv.is_empty() {
        bail!("bit string line contains no 0/1 characters");
    }

    let query_start = Instant::now();
    let replies: Vec<u64> = queries.iter().map(|&q| answer(&bv, q)).collect();
    let done = Instant::now();

    let mut out = String::with_capacity(replies.len() * 8);
    for reply in &replies {
        out.push_str(&reply.to_string());
        out.push('\n');
    }
    match &args.output {
        Some(path) => {
            if let Some(dir) = path.parent()
                && !dir.as_os_str().is_empty()
            {
                fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            }
            fs::write(path, &out).with_context(|| format!("writing {}", path.display()))?;
        }
        None => print!("{}", out),
    }

    println!(
        "RESULT name=bitrank time={} space={}",
        done.duration_since(build_start).as_millis(),
        bv.size_in_bits()
    );
    println!(
        "EVAL query-only-time={}",
        done.duration_since(query_start).as_nanos()
    );
    Ok(())
}

fn parse_query(line: &str) -> Result<Query> {
    let mut parts = line.split_whitespace();
    let op = parts.next().context("empty command line")?;
    let query = match op {
        "access" => Query::Access(parse_number(parts.next())?),
        "rank" => Query::Rank(parse_bit(parts.next())?, parse_number(parts.next())?),
        "select" => Query::Select(parse_bit(parts.next())?, parse_number(parts.next())?),
        other => bail!("unknown command {:?}", other),
    };
    Ok(query)
}

fn parse_bit(arg: Option<&str>) -> Result<bool> {
    match arg {
        Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(other) => bail!("bit value must be 0 or 1, got {:?}", other),
        None => bail!("missing bit value"),
    }
}

fn parse_number(arg: Option<&str>) -> Result<u64> {
    let arg = arg.context("missing numeric argument")?;
    arg.parse()
        .with_context(|| format!("invalid number {:?}", arg))
}

fn answer(bv: &BitVec, query: Query) -> u64 {
    match query {
        Query::Access(pos) => bv.access(pos),
        Query::Rank(bit, pos) => bv.rank(pos, bit),
        Query::Select(bit, k) => bv.select(k, bit),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    if args.bits == 0 {
        bail!("bitvector must contain at least one bit");
    }
    if !(0.0..=1.0).contains(&args.density) {
        bail!("density must be within 0.0..=1.0");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut bits = String::with_capacity(args.bits as usize);
    let mut one_count = 0u64;
    for _ in 0..args.bits {
        if rng.gen_bool(args.density) {
            bits.push('1');
            one_count += 1;
        } else {
            bits.push('0');
        }
    }
    let zero_count = args.bits - one_count;

    let mut out = String::with_capacity(bits.len() + args.queries as usize * 16);
    out.push_str(&args.queries.to_string());
    out.push('\n');
    out.push_str(&bits);
    out.push('\n');

    for _ in 0..args.queries {
        let line = match rng.gen_range(0..3) {
            0 => format!("access {}", rng.gen_range(0..args.bits)),
            1 => format!(
                "rank {} {}",
                rng.gen_range(0..2u32),
                rng.gen_range(0..=args.bits)
            ),
            _ => {
                // Keep select in range for the value that actually occurs
                if one_count > 0 && (zero_count == 0 || rng.gen_bool(0.5)) {
                    format!("select 1 {}", rng.gen_range(1..=one_count))
                } else {
                    format!("select 0 {}", rng.gen_range(1..=zero_count))
                }
            }
        };
        out.push_str(&line);
        out.push('\n');
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &out).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("wrote {} bits and {} queries", args.bits, args.queries);
        }
        None => print!("{}", out),
    }
    Ok(())
}
