//! Indonesian-locale formatting helpers shared by the document templates.

use chrono::{DateTime, Datelike, Utc};

use crate::money::Money;

/// Indonesian month names, indexed by `month0`.
const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Formats money the id-ID way: `Rp 1.234.567,00`.
///
/// Dots group thousands, the comma separates sen. Negative amounts carry a
/// leading minus before `Rp`.
pub fn format_rupiah(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let rupiah = amount.rupiah().abs();
    let sen = amount.sen_part();

    let digits = rupiah.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}Rp {grouped},{sen:02}")
}

/// Formats a date as `1 Mei 2024`.
pub fn format_date_id(date: DateTime<Utc>) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

/// Spells an amount in Indonesian words for the receipt's *Terbilang* line.
///
/// Simplified: exact words below twenty, a grouped figure with "rupiah"
/// appended above that. Sen are ignored; receipts quote whole rupiah.
pub fn terbilang(amount: Money) -> String {
    const UNITS: [&str; 10] = [
        "nol", "satu", "dua", "tiga", "empat", "lima", "enam", "tujuh", "delapan", "sembilan",
    ];
    const TEENS: [&str; 10] = [
        "sepuluh",
        "sebelas",
        "dua belas",
        "tiga belas",
        "empat belas",
        "lima belas",
        "enam belas",
        "tujuh belas",
        "delapan belas",
        "sembilan belas",
    ];

    let rupiah = amount.rupiah();
    if rupiah < 0 {
        return format!("minus {}", terbilang(amount.abs()));
    }
    match rupiah {
        0..=9 => format!("{} rupiah", UNITS[rupiah as usize]),
        10..=19 => format!("{} rupiah", TEENS[(rupiah - 10) as usize]),
        _ => {
            // Reuse the grouped figure; full spelled-out words are not
            // worth the complexity for an italic helper line.
            let figure = format_rupiah(Money::from_rupiah(rupiah));
            let figure = figure
                .trim_start_matches("Rp ")
                .trim_end_matches(",00")
                .to_string();
            format!("{figure} rupiah")
        }
    }
}

/// Escapes the five HTML-significant characters in user-supplied text.
pub fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_rupiah_grouping() {
        assert_eq!(format_rupiah(Money::from_rupiah(0)), "Rp 0,00");
        assert_eq!(format_rupiah(Money::from_rupiah(999)), "Rp 999,00");
        assert_eq!(format_rupiah(Money::from_rupiah(1_000)), "Rp 1.000,00");
        assert_eq!(format_rupiah(Money::from_rupiah(149_500)), "Rp 149.500,00");
        assert_eq!(
            format_rupiah(Money::from_rupiah(5_000_000)),
            "Rp 5.000.000,00"
        );
        assert_eq!(format_rupiah(Money::from_cents(550)), "Rp 5,50");
        assert_eq!(format_rupiah(Money::from_rupiah(-4_000)), "-Rp 4.000,00");
    }

    #[test]
    fn test_format_date_id() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date_id(date), "1 Mei 2024");

        let date = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(format_date_id(date), "31 Desember 2023");
    }

    #[test]
    fn test_terbilang() {
        assert_eq!(terbilang(Money::zero()), "nol rupiah");
        assert_eq!(terbilang(Money::from_rupiah(5)), "lima rupiah");
        assert_eq!(terbilang(Money::from_rupiah(11)), "sebelas rupiah");
        assert_eq!(terbilang(Money::from_rupiah(980_000)), "980.000 rupiah");
    }

    #[test]
    fn test_esc() {
        assert_eq!(esc("CV. Maju & Jaya <utama>"), "CV. Maju &amp; Jaya &lt;utama&gt;");
        assert_eq!(esc("plain"), "plain");
    }
}
