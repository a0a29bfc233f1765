use clap::Parser;
use rand::prelude::*;
use rust_decimal::Decimal;
use tallyman::cli::TransactionRow;

/// Random statement generator. Every row is valid, so the output can be fed
/// straight into `tallyman` to test how it handles volume.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of rows to generate.
    #[clap(short, long, default_value_t = 1_000)]
    rows: u64,
}

/// Generates a row dated within the first 28 days of a month, so that the date
/// exists in every year.
fn generate_random_transaction(rng: &mut impl Rng, id: u64) -> TransactionRow {
    let month: u32 = rng.gen_range(1..=12);
    let day: u32 = rng.gen_range(1..=28);
    let amount = Decimal::new(rng.gen_range(1..1_000_000), 2);

    let sign = ["+", "-", ""]
        .choose(rng)
        .expect("cannot fail because slice is not empty");

    TransactionRow {
        id: id.to_string(),
        date: format!("{month}/{day}"),
        amount: format!("{sign}{amount}"),
    }
}

fn main() {
    let args = Args::parse();

    let rng = &mut rand::thread_rng();
    let mut writer = csv::Writer::from_writer(std::io::stdout());

    for id in 0..args.rows {
        let row = generate_random_transaction(rng, id);
        writer.serialize(&row).expect("unable to serialize record")
    }

    writer.flush().expect("unable to flush output");
}
