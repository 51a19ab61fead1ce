use serde::{Deserialize, Deserializer};

/// Falls back to `T::default()` when a field fails to deserialize.
pub fn ok_or_default<'a, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'a> + Default,
    D: Deserializer<'a>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

pub fn format_litres(litres: f64, precision: usize) -> String {
    format!("{litres:.precision$} L")
}

pub fn format_rupees(amount: f64, precision: usize) -> String {
    if amount < 0.0 {
        format!("-₹{:.precision$}", amount.abs())
    } else {
        format!("₹{amount:.precision$}")
    }
}

/// Rupees with thousands separators, for summary figures.
pub fn format_rupees_grouped(amount: f64) -> String {
    let rounded = amount.abs().round() as u64;
    let sign = if amount < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{sign}₹{}", format_with_commas(rounded))
}

pub fn format_with_commas(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
