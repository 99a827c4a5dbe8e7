/// Magnitude suffixes accepted on view and subscriber counts.
const SUFFIXES: &[(char, f64)] = &[('K', 1_000.0), ('k', 1_000.0), ('M', 1_000_000.0), ('m', 1_000_000.0)];

/// Expand a compact count ("1.2K", "3M", "350") into a comma-grouped integer.
///
/// Anything that does not parse is returned unchanged, so "N/A" or "No" stay
/// readable in the export instead of failing the record.
pub fn normalize(raw: &str) -> String {
    let Some(last) = raw.chars().last() else {
        return raw.to_string();
    };

    let (digits, multiplier) = match SUFFIXES.iter().find(|(s, _)| *s == last) {
        Some((_, m)) => (&raw[..raw.len() - last.len_utf8()], *m),
        None => (raw, 1.0),
    };

    match digits.parse::<f64>() {
        Ok(n) if n.is_finite() => group_thousands((n * multiplier).trunc() as i128),
        _ => raw.to_string(),
    }
}

/// Render an integer with `,` between each group of three digits.
pub fn group_thousands(n: i128) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
