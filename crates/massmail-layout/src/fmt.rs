//! Number formatting for SVG attributes and path data.

use std::fmt::Write as _;

/// At most three fractional digits, rounded half-up, trailing zeros trimmed, never `-0`.
pub fn fmt_path_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }

    let k = (v * 1000.0 + 0.5).floor() as i64;
    if k == 0 {
        out.push('0');
        return;
    }

    let neg = k.is_negative();
    let abs = k.unsigned_abs();
    let int_part = abs / 1000;
    let frac = abs % 1000;

    if neg {
        out.push('-');
    }
    let _ = write!(out, "{int_part}");
    if frac == 0 {
        return;
    }

    let mut frac_str = [b'0'; 3];
    frac_str[0] = b'0' + ((frac / 100) as u8);
    frac_str[1] = b'0' + (((frac / 10) % 10) as u8);
    frac_str[2] = b'0' + ((frac % 10) as u8);

    let mut end = 3usize;
    while end > 0 && frac_str[end - 1] == b'0' {
        end -= 1;
    }
    out.push('.');
    for &b in &frac_str[..end] {
        out.push(b as char);
    }
}
