use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 400;
const CSV_PATH: &str = "tokopedia_kaos_pria.csv";
const PARQUET_PATH: &str = "tokopedia_kaos_pria.parquet";

/// One synthetic listing, serialised with the scraped file's column names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Listing {
    name: String,
    price: i64,
    rating: f64,
    count_review: i64,
    discount_percentage: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<Listing> {
    let kinds = ["Kaos", "Kaos Polos", "Kaos Oversize", "Kaos Distro", "Kaos Polo", "Kaos Raglan"];
    let colours = ["Hitam", "Putih", "Navy", "Abu", "Maroon", "Army", "Mustard"];
    let extras = ["Pria", "Cotton Combed 30s", "Lengan Pendek", "Premium", "Unisex", "Distro Bandung"];
    let ratings = [3.0, 4.0, 4.5, 4.7, 4.8, 4.9, 5.0];
    let discounts = [0.0, 0.0, 0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 50.0];

    (0..ROWS)
        .map(|_| {
            let name = format!(
                "{} {} {}",
                rng.pick(&kinds),
                rng.pick(&colours),
                rng.pick(&extras)
            );
            // Prices cluster at the low end, rounded to IDR 500.
            let price = (25_000.0 + 225_000.0 * rng.next_f64().powi(3)) as i64 / 500 * 500;
            // A few listings collect most of the reviews.
            let count_review = (2_000.0 * rng.next_f64().powi(6)) as i64;
            Listing {
                name,
                price,
                rating: *rng.pick(&ratings),
                count_review,
                discount_percentage: *rng.pick(&discounts),
            }
        })
        .collect()
}

fn write_csv(listings: &[Listing]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    for listing in listings {
        writer.serialize(listing).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(listings: &[Listing]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("price", DataType::Int64, false),
        Field::new("rating", DataType::Float64, false),
        Field::new("countReview", DataType::Int64, false),
        Field::new("discountPercentage", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(listings.iter().map(|l| l.name.as_str()))),
            Arc::new(Int64Array::from_iter_values(listings.iter().map(|l| l.price))),
            Arc::new(Float64Array::from_iter_values(listings.iter().map(|l| l.rating))),
            Arc::new(Int64Array::from_iter_values(listings.iter().map(|l| l.count_review))),
            Arc::new(Float64Array::from_iter_values(
                listings.iter().map(|l| l.discount_percentage),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let listings = generate(&mut rng);

    write_csv(&listings)?;
    write_parquet(&listings)?;

    println!(
        "Wrote {} synthetic listings to {CSV_PATH} and {PARQUET_PATH}",
        listings.len()
    );
    Ok(())
}
