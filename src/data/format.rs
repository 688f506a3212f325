use super::aggregate::Summary;
use super::model::Product;

/// Shown in place of a metric whose mean is undefined.
pub const NO_DATA: &str = "No data";

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Display template for a scalar metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormat {
    /// `IDR 1,234,567`
    Currency,
    /// `4.57⭐`
    Stars,
    /// `42`
    Whole,
    /// `12.5%`
    Percent,
}

impl MetricFormat {
    pub fn render(self, value: Option<f64>) -> String {
        let Some(v) = value else {
            return NO_DATA.to_string();
        };
        match self {
            MetricFormat::Currency => format!("IDR {}", group_thousands(&format!("{v:.0}"))),
            MetricFormat::Stars => format!("{v:.2}⭐"),
            MetricFormat::Whole => format!("{v:.0}"),
            MetricFormat::Percent => format!("{v:.1}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: Option<f64>,
    pub format: MetricFormat,
}

impl Metric {
    pub fn display(&self) -> String {
        self.format.render(self.value)
    }
}

/// The four headline metrics, in display order.
pub fn summary_metrics(summary: &Summary) -> [Metric; 4] {
    [
        Metric {
            label: "Average Price",
            value: summary.mean_price,
            format: MetricFormat::Currency,
        },
        Metric {
            label: "Average Rating",
            value: summary.mean_rating,
            format: MetricFormat::Stars,
        },
        Metric {
            label: "Average Reviews",
            value: summary.mean_count_review,
            format: MetricFormat::Whole,
        },
        Metric {
            label: "Average Discount",
            value: summary.mean_discount,
            format: MetricFormat::Percent,
        },
    ]
}

/// Insert `,` every three digits of the integer part of a formatted number.
fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match digits.find('.') {
        Some(dot) => digits.split_at(dot),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}

// ---------------------------------------------------------------------------
// Product table columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Price,
    Rating,
    CountReview,
    Discount,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Price,
        Column::Rating,
        Column::CountReview,
        Column::Discount,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Price => "Price",
            Column::Rating => "Rating",
            Column::CountReview => "Reviews",
            Column::Discount => "Discount",
        }
    }

    /// Whether the column holds numbers (right-aligned in the table).
    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Name)
    }

    pub fn cell(self, product: &Product) -> String {
        match self {
            Column::Name => product.name.clone(),
            Column::Price => format!("IDR {}", product.price),
            Column::Rating => format!("{:.1} ⭐", product.rating.value()),
            Column::CountReview => product.count_review.to_string(),
            Column::Discount => format!("{:.1}%", product.discount_percentage),
        }
    }
}
