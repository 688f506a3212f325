use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, UInt32Array,
    UInt64Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{Product, ProductTable, Rating};

pub const NAME: &str = "name";
pub const PRICE: &str = "price";
pub const RATING: &str = "rating";
pub const COUNT_REVIEW: &str = "countReview";
pub const DISCOUNT: &str = "discountPercentage";

// ---------------------------------------------------------------------------
// Process-wide cache
// ---------------------------------------------------------------------------

/// Acquire-once guard around a loaded table.
///
/// The first successful [`TableCache::get_or_load`] reads storage; every later
/// call, from any thread, gets a clone of the same `Arc`.  Concurrent first
/// callers serialise on the mutex, so at most one read succeeds.  Failures
/// are returned to the caller and leave the slot empty.
#[derive(Debug, Default)]
pub struct TableCache {
    slot: Mutex<Option<Arc<ProductTable>>>,
    reads: AtomicUsize,
}

impl TableCache {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Arc<ProductTable>, DataError> {
        // The slot only ever holds a fully built table, so a poisoned lock
        // still guards consistent data.
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }

        self.reads.fetch_add(1, Ordering::SeqCst);
        let table = Arc::new(load_file(path)?);
        log::info!(
            "Cached {} products from {} ({} distinct ratings)",
            table.len(),
            path.display(),
            table.ratings().len()
        );
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Number of times storage was actually read.
    #[cfg(test)]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

static TABLE_CACHE: TableCache = TableCache::new();

/// Load the base table, reading `path` only on the first successful call of
/// the process.  Later calls ignore `path` and return the cached table.
pub fn load(path: &Path) -> Result<Arc<ProductTable>, DataError> {
    TABLE_CACHE.get_or_load(path)
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a product table from a file without caching.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the five required columns
/// * `.json`    – `[{ "name": ..., "price": ..., ... }, ...]`
/// * `.parquet` – one column per attribute
pub fn load_file(path: &Path) -> Result<ProductTable, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Cell conversion shared by all loaders
// ---------------------------------------------------------------------------

fn invalid(row: usize, column: &str, value: impl ToString) -> DataError {
    DataError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Non-negative integer; integral floats (`150000.0`) are accepted.
fn count_from_f64(v: f64, row: usize, column: &str) -> Result<u64, DataError> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        Ok(v as u64)
    } else {
        Err(invalid(row, column, v))
    }
}

fn finite(v: f64, row: usize, column: &str) -> Result<f64, DataError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(row, column, v))
    }
}

fn parse_count(s: &str, row: usize, column: &str) -> Result<u64, DataError> {
    let s = s.trim();
    if let Ok(v) = s.parse::<u64>() {
        return Ok(v);
    }
    match s.parse::<f64>() {
        Ok(v) => count_from_f64(v, row, column).map_err(|_| invalid(row, column, s)),
        Err(_) => Err(invalid(row, column, s)),
    }
}

fn parse_score(s: &str, row: usize, column: &str) -> Result<f64, DataError> {
    let s = s.trim();
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(row, column, s))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ProductTable, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse CSV from any reader.  Columns are located by header name.
pub fn read_csv<R: std::io::Read>(input: R) -> Result<ProductTable, DataError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let position = |column: &str| {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| DataError::MissingColumn(column.to_string()))
    };
    let name_idx = position(NAME)?;
    let price_idx = position(PRICE)?;
    let rating_idx = position(RATING)?;
    let count_idx = position(COUNT_REVIEW)?;
    let discount_idx = position(DISCOUNT)?;

    let mut products = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        products.push(Product {
            name: cell(name_idx).to_string(),
            price: parse_count(cell(price_idx), row_no, PRICE)?,
            rating: Rating(parse_score(cell(rating_idx), row_no, RATING)?),
            count_review: parse_count(cell(count_idx), row_no, COUNT_REVIEW)?,
            discount_percentage: parse_score(cell(discount_idx), row_no, DISCOUNT)?,
        });
    }

    Ok(ProductTable::from_products(products))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "Kaos Polos", "price": 45000, "rating": 4.8,
///     "countReview": 120, "discountPercentage": 10.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ProductTable, DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<ProductTable, DataError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(DataError::NotRecords)?;

    let mut products = Vec::with_capacity(records.len());

    for (row, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or(DataError::NotRecords)?;
        let field = |column: &str| {
            obj.get(column)
                .ok_or_else(|| DataError::MissingColumn(column.to_string()))
        };

        let name = match field(NAME)? {
            JsonValue::String(s) => s.clone(),
            other => return Err(invalid(row, NAME, other)),
        };

        products.push(Product {
            name,
            price: json_count(field(PRICE)?, row, PRICE)?,
            rating: Rating(json_score(field(RATING)?, row, RATING)?),
            count_review: json_count(field(COUNT_REVIEW)?, row, COUNT_REVIEW)?,
            discount_percentage: json_score(field(DISCOUNT)?, row, DISCOUNT)?,
        });
    }

    Ok(ProductTable::from_products(products))
}

fn json_count(val: &JsonValue, row: usize, column: &str) -> Result<u64, DataError> {
    if let Some(v) = val.as_u64() {
        return Ok(v);
    }
    match val.as_f64() {
        Some(v) => count_from_f64(v, row, column),
        None => Err(invalid(row, column, val)),
    }
}

fn json_score(val: &JsonValue, row: usize, column: &str) -> Result<f64, DataError> {
    match val.as_f64() {
        Some(v) => finite(v, row, column),
        None => Err(invalid(row, column, val)),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per attribute.
///
/// `name` must be a string column; the numeric columns may be any signed,
/// unsigned or floating-point Arrow type.  Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<ProductTable, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut products = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let names = column_by_name(&batch, NAME)?;
        let prices = column_by_name(&batch, PRICE)?;
        let ratings = column_by_name(&batch, RATING)?;
        let counts = column_by_name(&batch, COUNT_REVIEW)?;
        let discounts = column_by_name(&batch, DISCOUNT)?;

        // Row numbers continue across batches.
        let offset = products.len();
        for i in 0..batch.num_rows() {
            let row = offset + i;
            products.push(Product {
                name: extract_string(names, i, row)?,
                price: count_from_f64(extract_f64(prices, i, row, PRICE)?, row, PRICE)?,
                rating: Rating(extract_f64(ratings, i, row, RATING)?),
                count_review: count_from_f64(
                    extract_f64(counts, i, row, COUNT_REVIEW)?,
                    row,
                    COUNT_REVIEW,
                )?,
                discount_percentage: extract_f64(discounts, i, row, DISCOUNT)?,
            });
        }
    }

    Ok(ProductTable::from_products(products))
}

// -- Parquet / Arrow helpers --

fn column_by_name<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, DataError> {
    batch
        .schema()
        .index_of(name)
        .map(|idx| batch.column(idx))
        .map_err(|_| DataError::MissingColumn(name.to_string()))
}

fn extract_string(col: &ArrayRef, i: usize, row: usize) -> Result<String, DataError> {
    if col.is_null(i) {
        return Err(invalid(row, NAME, "null"));
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(i).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(i).to_string()),
        other => Err(invalid(row, NAME, format!("{other:?}"))),
    }
}

/// Read a numeric cell of any supported Arrow type as `f64`.
fn extract_f64(col: &ArrayRef, i: usize, row: usize, column: &str) -> Result<f64, DataError> {
    if col.is_null(i) {
        return Err(invalid(row, column, "null"));
    }
    let any = col.as_any();
    let value = if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(i)
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        arr.value(i) as f64
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(i) as f64
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(i) as f64
    } else if let Some(arr) = any.downcast_ref::<UInt64Array>() {
        arr.value(i) as f64
    } else if let Some(arr) = any.downcast_ref::<UInt32Array>() {
        arr.value(i) as f64
    } else {
        return Err(invalid(row, column, format!("{:?}", col.data_type())));
    };
    finite(value, row, column)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const FIXTURE: &str = "\
name,price,rating,countReview,discountPercentage
Kaos Polos Hitam,45000,5,120,10
Kaos Oversize,89000.0,4.5,33,0
Kemeja Flanel,150000,4,7,25.5
";

    fn write_fixture(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write fixture");
        file
    }

    #[test]
    fn parses_csv_rows_in_order() {
        let table = read_csv(FIXTURE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        let first = &table.products()[0];
        assert_eq!(first.name, "Kaos Polos Hitam");
        assert_eq!(first.price, 45000);
        assert_eq!(first.rating, Rating(5.0));
        assert_eq!(first.count_review, 120);
        assert_eq!(first.discount_percentage, 10.0);
        assert_eq!(table.products()[1].price, 89000);
        assert_eq!(table.products()[2].discount_percentage, 25.5);
    }

    #[test]
    fn csv_columns_are_looked_up_by_name() {
        let csv = "discountPercentage,countReview,url,rating,price,name\n5,9,http://x,3.5,1000,Kaos\n";
        let table = read_csv(csv.as_bytes()).unwrap();
        let p = &table.products()[0];
        assert_eq!(p.name, "Kaos");
        assert_eq!(p.price, 1000);
        assert_eq!(p.rating, Rating(3.5));
        assert_eq!(p.count_review, 9);
        assert_eq!(p.discount_percentage, 5.0);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let csv = "name,price,rating,discountPercentage\nKaos,1000,5,0\n";
        match read_csv(csv.as_bytes()) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, COUNT_REVIEW),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_malformed_value_names_row_and_column() {
        let csv = "name,price,rating,countReview,discountPercentage\nA,100,5,1,0\nB,-5,5,1,0\n";
        match read_csv(csv.as_bytes()) {
            Err(DataError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, PRICE);
                assert_eq!(value, "-5");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn csv_fractional_count_is_rejected() {
        let csv = "name,price,rating,countReview,discountPercentage\nA,100,5,1.5,0\n";
        assert!(matches!(
            read_csv(csv.as_bytes()),
            Err(DataError::InvalidValue { .. })
        ));
    }

    #[test]
    fn parses_json_records() {
        let json = r#"[
            {"name": "A", "price": 100, "rating": 5, "countReview": 10, "discountPercentage": 0},
            {"name": "B", "price": 200.0, "rating": 4.5, "countReview": 50, "discountPercentage": 10.5}
        ]"#;
        let table = parse_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.products()[1].price, 200);
        assert_eq!(table.products()[1].rating, Rating(4.5));
    }

    #[test]
    fn json_must_be_record_array() {
        assert!(matches!(
            parse_json(r#"{"name": "A"}"#),
            Err(DataError::NotRecords)
        ));
        assert!(matches!(
            parse_json(r#"[{"name": "A", "price": 1}]"#),
            Err(DataError::MissingColumn(_))
        ));
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let file = write_fixture(".csv", FIXTURE);
        assert_eq!(load_file(file.path()).unwrap().len(), 3);

        let other = write_fixture(".xlsx", FIXTURE);
        assert!(matches!(
            load_file(other.path()),
            Err(DataError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    /// Write one record batch to a fresh `.parquet` temp file.
    fn write_parquet(columns: Vec<(&str, ArrayRef)>) -> tempfile::NamedTempFile {
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(
            schema.clone(),
            columns.into_iter().map(|(_, array)| array).collect(),
        )
        .expect("build record batch");

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .expect("create temp file");
        let out = std::fs::File::create(file.path()).expect("open parquet output");
        let mut writer = ArrowWriter::try_new(out, schema, None).expect("create writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");
        file
    }

    fn names() -> ArrayRef {
        Arc::new(arrow::array::StringArray::from(vec!["Kaos Polos", "Kemeja Flanel"]))
    }

    #[test]
    fn parquet_columns_are_looked_up_by_name_and_type() {
        let file = write_parquet(vec![
            ("discountPercentage", Arc::new(Float64Array::from(vec![10.0, 25.5])) as ArrayRef),
            ("countReview", Arc::new(Float64Array::from(vec![120.0, 7.0])) as ArrayRef),
            ("rating", Arc::new(Float32Array::from(vec![5.0, 4.5])) as ArrayRef),
            ("price", Arc::new(Int64Array::from(vec![45_000, 150_000])) as ArrayRef),
            ("name", names()),
        ]);

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.products()[0];
        assert_eq!(first.name, "Kaos Polos");
        assert_eq!(first.price, 45_000);
        assert_eq!(first.rating, Rating(5.0));
        assert_eq!(first.count_review, 120);
        assert_eq!(first.discount_percentage, 10.0);
        let second = &table.products()[1];
        assert_eq!(second.rating, Rating(4.5));
        assert_eq!(second.count_review, 7);
        assert_eq!(second.discount_percentage, 25.5);
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        let file = write_parquet(vec![
            ("name", names()),
            ("price", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
            ("rating", Arc::new(Float64Array::from(vec![5.0, 4.0])) as ArrayRef),
            ("countReview", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
        ]);
        match load_file(file.path()) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, DISCOUNT),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parquet_null_cell_is_invalid() {
        let file = write_parquet(vec![
            ("name", names()),
            ("price", Arc::new(Int64Array::from(vec![Some(1), None])) as ArrayRef),
            ("rating", Arc::new(Float64Array::from(vec![5.0, 4.0])) as ArrayRef),
            ("countReview", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
            ("discountPercentage", Arc::new(Float64Array::from(vec![0.0, 0.0])) as ArrayRef),
        ]);
        match load_file(file.path()) {
            Err(DataError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, PRICE);
                assert_eq!(value, "null");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn parquet_fractional_count_and_wrong_type_are_invalid() {
        let fractional = write_parquet(vec![
            ("name", names()),
            ("price", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
            ("rating", Arc::new(Float64Array::from(vec![5.0, 4.0])) as ArrayRef),
            ("countReview", Arc::new(Float64Array::from(vec![3.0, 2.5])) as ArrayRef),
            ("discountPercentage", Arc::new(Float64Array::from(vec![0.0, 0.0])) as ArrayRef),
        ]);
        assert!(matches!(
            load_file(fractional.path()),
            Err(DataError::InvalidValue { row: 1, ref column, .. }) if column == COUNT_REVIEW
        ));

        let text_price = write_parquet(vec![
            ("name", names()),
            ("price", Arc::new(arrow::array::StringArray::from(vec!["1", "2"])) as ArrayRef),
            ("rating", Arc::new(Float64Array::from(vec![5.0, 4.0])) as ArrayRef),
            ("countReview", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
            ("discountPercentage", Arc::new(Float64Array::from(vec![0.0, 0.0])) as ArrayRef),
        ]);
        assert!(matches!(
            load_file(text_price.path()),
            Err(DataError::InvalidValue { row: 0, ref column, .. }) if column == PRICE
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokopedia_kaos_pria.csv");
        assert!(matches!(load_file(&path), Err(DataError::Io { .. })));
    }

    #[test]
    fn cache_reads_storage_once_under_concurrent_access() {
        let file = write_fixture(".csv", FIXTURE);
        let cache = TableCache::new();

        let tables: Vec<Arc<ProductTable>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get_or_load(file.path()).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.reads(), 1);
        for table in &tables {
            assert!(Arc::ptr_eq(table, &tables[0]));
        }

        // Later calls never touch storage again, even if the file is gone.
        let path = file.path().to_path_buf();
        drop(file);
        let again = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&again, &tables[0]));
        assert_eq!(cache.reads(), 1);
    }

    #[test]
    fn cache_does_not_keep_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.csv");
        let cache = TableCache::new();

        assert!(cache.get_or_load(&path).is_err());

        std::fs::write(&path, FIXTURE).unwrap();
        let table = cache.get_or_load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(cache.reads(), 2);
    }
}
