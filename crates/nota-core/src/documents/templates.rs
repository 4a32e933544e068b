//! The seven document templates.
//!
//! Each function builds a standalone HTML page from persisted transaction
//! state. Shared structure (base style, store letterhead, item table,
//! totals block) is factored into helpers; the per-document functions keep
//! only what makes that document distinct: the receipt carries the amount
//! in words and a signature block, the handover report carries two signers,
//! the invoice carries the stamp-duty notice, the tax invoice breaks PPN
//! out per line, the proforma carries its watermark.

use chrono::{DateTime, Utc};

use super::format::{esc, format_date_id, format_rupiah, terbilang};
use super::RenderOptions;
use crate::money::Money;
use crate::types::{StoreProfile, Transaction, TransactionItem};

const DEFAULT_CITY: &str = "Jakarta";

// =============================================================================
// Shared Blocks
// =============================================================================

fn base_style() -> &'static str {
    r#"<style>
  body { font-family: Arial, sans-serif; margin: 20px; }
  .header { text-align: center; margin-bottom: 30px; }
  .company-info { margin-bottom: 20px; }
  .transaction-info { margin-bottom: 20px; }
  table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
  th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
  th { background-color: #f2f2f2; }
  .total { font-weight: bold; }
  .text-right { text-align: right; }
  .signature { margin-top: 60px; text-align: right; }
  .signature-section { margin-top: 60px; display: flex; justify-content: space-between; }
  .watermark { position: fixed; top: 40%; left: 25%; font-size: 80px; color: rgba(200, 200, 200, 0.4); transform: rotate(-30deg); }
</style>"#
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        esc(title),
        base_style(),
        body
    )
}

/// The store letterhead, or nothing when no profile exists yet.
fn store_block(store: Option<&StoreProfile>) -> String {
    match store {
        Some(s) => format!(
            "<div class=\"company-info\">\n<h3>{}</h3>\n<p>{}</p>\n<p>Telp: {} | Email: {}</p>\n<p>NPWP: {}</p>\n</div>\n",
            esc(&s.name),
            esc(&s.address),
            esc(&s.phone),
            esc(&s.email),
            esc(&s.npwp),
        ),
        None => String::new(),
    }
}

/// The counterparty and delivery details.
fn counterparty_block(tx: &Transaction, date: DateTime<Utc>) -> String {
    format!(
        "<div class=\"transaction-info\">\n<p><strong>Tanggal:</strong> {}</p>\n<p><strong>Kepada:</strong> {}</p>\n<p><strong>Alamat:</strong> {}</p>\n<p><strong>Bendahara:</strong> {}</p>\n<p><strong>Kurir:</strong> {}</p>\n</div>\n",
        format_date_id(date),
        esc(&tx.school_name),
        esc(&tx.school_address),
        esc(&tx.treasurer_name),
        esc(&tx.courier_name),
    )
}

/// The item table. `with_discount` controls the discount column; the
/// purchase order and handover report omit it.
fn items_table(items: &[TransactionItem], with_discount: bool) -> String {
    let mut html = String::from("<table>\n<thead>\n<tr><th>Kode</th><th>Nama Barang</th><th>Qty</th><th>Harga Satuan</th>");
    if with_discount {
        html.push_str("<th>Diskon</th>");
    }
    html.push_str("<th>Subtotal</th></tr>\n</thead>\n<tbody>\n");
    for item in items {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"text-right\">{}</td>",
            esc(&item.item_code),
            esc(&item.item_name),
            item.quantity,
            format_rupiah(item.unit_price()),
        ));
        if with_discount {
            html.push_str(&format!(
                "<td class=\"text-right\">{}</td>",
                format_rupiah(item.discount())
            ));
        }
        html.push_str(&format!(
            "<td class=\"text-right\">{}</td></tr>\n",
            format_rupiah(item.subtotal())
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Subtotal, the enabled tax lines, the service line, and the grand total.
fn totals_block(tx: &Transaction) -> String {
    let mut html = String::from("<div class=\"total\">\n");
    html.push_str(&format!(
        "<p class=\"text-right\">Subtotal: {}</p>\n",
        format_rupiah(tx.subtotal())
    ));
    if tx.ppn_enabled {
        html.push_str(&format!(
            "<p class=\"text-right\">PPN (11%): {}</p>\n",
            format_rupiah(tx.ppn_amount())
        ));
    }
    if tx.pph22_enabled {
        html.push_str(&format!(
            "<p class=\"text-right\">PPh 22: {}</p>\n",
            format_rupiah(tx.pph22_amount())
        ));
    }
    if tx.pph23_enabled {
        html.push_str(&format!(
            "<p class=\"text-right\">PPh 23: {}</p>\n",
            format_rupiah(tx.pph23_amount())
        ));
    }
    if let Some(service) = tx.service_value() {
        let label = tx.service_type.as_deref().unwrap_or("Jasa");
        html.push_str(&format!(
            "<p class=\"text-right\">{}: {}</p>\n",
            esc(label),
            format_rupiah(service)
        ));
    }
    html.push_str(&format!(
        "<p class=\"text-right total\">Total: {}</p>\n</div>\n",
        format_rupiah(tx.total_amount())
    ));
    html
}

fn notes_block(tx: &Transaction) -> String {
    match tx.additional_notes.as_deref() {
        Some(notes) if !notes.is_empty() => {
            format!("<p><strong>Catatan:</strong> {}</p>\n", esc(notes))
        }
        _ => String::new(),
    }
}

fn effective_date(tx: &Transaction, options: &RenderOptions) -> DateTime<Utc> {
    options.override_date.unwrap_or(tx.date)
}

fn city_date_line(city: &str, date: DateTime<Utc>) -> String {
    format!("<p>{}, {}</p>\n", esc(city), format_date_id(date))
}

// =============================================================================
// Templates
// =============================================================================

/// Nota penjualan: the plain sales note.
pub fn sales_note(
    tx: &Transaction,
    items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    let date = effective_date(tx, options);
    let body = format!(
        "<div class=\"header\">\n<h1>NOTA PENJUALAN</h1>\n<p>No: {}</p>\n</div>\n{}{}{}{}{}",
        esc(&tx.transaction_id),
        store_block(store),
        counterparty_block(tx, date),
        items_table(items, true),
        totals_block(tx),
        notes_block(tx),
    );
    page(&format!("Nota Penjualan - {}", tx.transaction_id), &body)
}

/// Kwitansi: the receipt, with the amount in words and a signature block.
pub fn receipt(
    tx: &Transaction,
    _items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    let date = effective_date(tx, options);
    let city = options.document_city.as_deref().unwrap_or(DEFAULT_CITY);
    let signer = options
        .receiver_signer_name
        .as_deref()
        .or(store.map(|s| s.name.as_str()))
        .unwrap_or("Penerima");

    let body = format!(
        "<div class=\"header\">\n<h1>KWITANSI</h1>\n<p>No: {}</p>\n</div>\n{}\
<p><strong>Telah terima dari:</strong> {}</p>\n\
<p><strong>Uang sejumlah:</strong> {}</p>\n\
<div class=\"amount-words\"><p><em>Terbilang: {}</em></p></div>\n\
<p><strong>Untuk pembayaran:</strong> Transaksi {}</p>\n\
<div class=\"signature\">\n{}<br><br><br>\n<p><strong>{}</strong></p>\n</div>\n",
        esc(&tx.transaction_id),
        store_block(store),
        esc(&tx.school_name),
        format_rupiah(tx.total_amount()),
        terbilang(tx.total_amount()),
        esc(&tx.transaction_id),
        city_date_line(city, date),
        esc(signer),
    );
    page(&format!("Kwitansi - {}", tx.transaction_id), &body)
}

/// Invoice, with the stamp-duty notice when the total crosses the threshold.
pub fn invoice(
    tx: &Transaction,
    items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    let date = effective_date(tx, options);
    let materai_notice = if tx.materai_required {
        "<p><em>* Dokumen ini memerlukan materai</em></p>\n"
    } else {
        ""
    };
    let body = format!(
        "<div class=\"header\">\n<h1>INVOICE</h1>\n<p>No: {}</p>\n</div>\n{}{}{}{}{}{}",
        esc(&tx.transaction_id),
        store_block(store),
        counterparty_block(tx, date),
        items_table(items, true),
        totals_block(tx),
        materai_notice,
        notes_block(tx),
    );
    page(&format!("Invoice - {}", tx.transaction_id), &body)
}

/// BAST (berita acara serah terima): the handover report with courier and
/// receiver signature columns.
pub fn handover_report(
    tx: &Transaction,
    items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    let date = effective_date(tx, options);
    let city = options.document_city.as_deref().unwrap_or(DEFAULT_CITY);
    let courier_signer = options
        .courier_signer_name
        .as_deref()
        .unwrap_or(&tx.courier_name);
    let receiver_signer = options
        .receiver_signer_name
        .as_deref()
        .unwrap_or(&tx.treasurer_name);

    let body = format!(
        "<div class=\"header\">\n<h1>BERITA ACARA SERAH TERIMA</h1>\n<p>No: {}</p>\n</div>\n{}\
<div class=\"content\">\n<p>Pada hari ini, {}, telah diserahterimakan barang-barang berikut kepada {} ({}):</p>\n</div>\n{}\
{}\
<div class=\"signature-section\">\n\
<div>\n<p>Yang Menyerahkan,</p><br><br><br>\n<p><strong>{}</strong></p>\n</div>\n\
<div>\n<p>Yang Menerima,</p><br><br><br>\n<p><strong>{}</strong></p>\n</div>\n\
</div>\n",
        esc(&tx.transaction_id),
        store_block(store),
        format_date_id(date),
        esc(&tx.school_name),
        esc(&tx.school_address),
        items_table(items, false),
        city_date_line(city, date),
        esc(courier_signer),
        esc(receiver_signer),
    );
    page(
        &format!("Berita Acara Serah Terima - {}", tx.transaction_id),
        &body,
    )
}

/// Surat pesanan: the purchase order, on the store letterhead.
pub fn purchase_order(
    tx: &Transaction,
    items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    let date = effective_date(tx, options);
    let body = format!(
        "{}<div class=\"header\">\n<h1>SURAT PESANAN</h1>\n<p>No: {}</p>\n</div>\n{}{}\
<p class=\"text-right\"><strong>Total Pesanan: {}</strong></p>\n{}",
        store_block(store),
        esc(&tx.transaction_id),
        counterparty_block(tx, date),
        items_table(items, false),
        format_rupiah(tx.total_amount()),
        notes_block(tx),
    );
    page(&format!("Surat Pesanan - {}", tx.transaction_id), &body)
}

/// Faktur pajak: the tax invoice. Both parties' NPWP and per-line PPN.
pub fn tax_invoice(
    tx: &Transaction,
    items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    let date = effective_date(tx, options);

    let mut table = String::from(
        "<table>\n<thead>\n<tr><th>Nama Barang</th><th>Harga Jual</th><th>Diskon</th><th>DPP</th><th>PPN</th></tr>\n</thead>\n<tbody>\n",
    );
    for item in items {
        // Per-line PPN is informational; the binding amount is the
        // transaction-level rounded figure.
        let line_ppn = if tx.ppn_enabled {
            item.subtotal().calculate_tax(crate::types::TaxRate::PPN)
        } else {
            Money::zero()
        };
        table.push_str(&format!(
            "<tr><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td></tr>\n",
            esc(&item.item_name),
            format_rupiah(item.unit_price().multiply_quantity(item.quantity)),
            format_rupiah(item.discount()),
            format_rupiah(item.subtotal()),
            format_rupiah(line_ppn),
        ));
    }
    table.push_str("</tbody>\n</table>\n");

    let school_npwp = tx.school_npwp.as_deref().unwrap_or("-");
    let body = format!(
        "<div class=\"header\">\n<h2>FAKTUR PAJAK</h2>\n<p>No: {}</p>\n<p>Tanggal: {}</p>\n</div>\n\
<div class=\"company-section\">\n<h4>Pengusaha Kena Pajak</h4>\n{}</div>\n\
<div class=\"tax-info\">\n<h4>Pembeli</h4>\n<p>{}</p>\n<p>{}</p>\n<p>NPWP: {}</p>\n</div>\n\
{}{}",
        esc(&tx.transaction_id),
        format_date_id(date),
        store_block(store),
        esc(&tx.school_name),
        esc(&tx.school_address),
        esc(school_npwp),
        table,
        totals_block(tx),
    );
    page(&format!("Faktur Pajak - {}", tx.transaction_id), &body)
}

/// Proforma invoice: the invoice layout behind a PROFORMA watermark, with
/// the not-a-tax-document notice.
pub fn proforma_invoice(
    tx: &Transaction,
    items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    let date = effective_date(tx, options);
    let body = format!(
        "<div class=\"watermark\">PROFORMA</div>\n\
<div class=\"proforma-notice\"><p><em>Dokumen ini bukan bukti pembayaran yang sah.</em></p></div>\n\
<div class=\"header\">\n<h1>PROFORMA INVOICE</h1>\n<p>No: {}</p>\n</div>\n{}{}{}{}{}",
        esc(&tx.transaction_id),
        store_block(store),
        counterparty_block(tx, date),
        items_table(items, true),
        totals_block(tx),
        notes_block(tx),
    );
    page(&format!("Proforma Invoice - {}", tx.transaction_id), &body)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture() -> (Transaction, Vec<TransactionItem>, StoreProfile) {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let tx = Transaction {
            id: "11111111-1111-1111-1111-111111111111".into(),
            transaction_id: "TRX-2024-001".into(),
            date: now,
            school_name: "SDN 1 Menteng".into(),
            school_address: "Jl. Besuki No. 4, Jakarta".into(),
            treasurer_name: "Ibu Sari".into(),
            courier_name: "Pak Budi".into(),
            additional_notes: Some("Pengiriman tahap pertama".into()),
            subtotal_cents: Money::from_rupiah(149_500).cents(),
            ppn_enabled: true,
            ppn_amount_cents: Money::from_rupiah(16_445).cents(),
            pph22_enabled: true,
            pph22_amount_cents: Money::from_rupiah(2_243).cents(),
            pph23_enabled: false,
            pph23_amount_cents: 0,
            service_value_cents: None,
            service_type: None,
            school_npwp: Some("01.234.567.8-901.000".into()),
            materai_required: false,
            total_amount_cents: Money::from_rupiah(163_702).cents(),
            created_at: now,
            updated_at: now,
        };
        let items = vec![TransactionItem {
            id: "22222222-2222-2222-2222-222222222222".into(),
            transaction_id: tx.id.clone(),
            item_code: "BK-01".into(),
            item_name: "Buku Tulis 58 Lembar".into(),
            quantity: 10,
            unit_price_cents: Money::from_rupiah(15_000).cents(),
            discount_cents: Money::from_rupiah(500).cents(),
            subtotal_cents: Money::from_rupiah(149_500).cents(),
            created_at: now,
        }];
        let store = StoreProfile {
            id: "33333333-3333-3333-3333-333333333333".into(),
            name: "Toko Sumber Ilmu".into(),
            address: "Jl. Kramat Raya No. 10, Jakarta".into(),
            phone: "021-555-0101".into(),
            email: "toko@sumberilmu.co.id".into(),
            npwp: "02.345.678.9-012.000".into(),
            created_at: now,
            updated_at: now,
        };
        (tx, items, store)
    }

    #[test]
    fn test_sales_note_carries_items_and_totals() {
        let (tx, items, store) = fixture();
        let html = sales_note(&tx, &items, Some(&store), &RenderOptions::default());

        assert!(html.contains("NOTA PENJUALAN"));
        assert!(html.contains("TRX-2024-001"));
        assert!(html.contains("Buku Tulis 58 Lembar"));
        assert!(html.contains("Rp 149.500,00"));
        assert!(html.contains("PPN (11%): Rp 16.445,00"));
        assert!(html.contains("PPh 22: Rp 2.243,00"));
        assert!(html.contains("Total: Rp 163.702,00"));
        assert!(html.contains("Toko Sumber Ilmu"));
        assert!(html.contains("Catatan: Pengiriman tahap pertama"));
        // PPh23 disabled: no line
        assert!(!html.contains("PPh 23"));
    }

    #[test]
    fn test_receipt_terbilang_and_signer() {
        let (tx, items, store) = fixture();
        let html = receipt(&tx, &items, Some(&store), &RenderOptions::default());

        assert!(html.contains("KWITANSI"));
        assert!(html.contains("Terbilang: 163.702 rupiah"));
        // Receiver signer defaults to the store
        assert!(html.contains("<strong>Toko Sumber Ilmu</strong>"));
        assert!(html.contains("Jakarta, 1 Mei 2024"));
    }

    #[test]
    fn test_receipt_overrides() {
        let (tx, items, store) = fixture();
        let options = RenderOptions {
            override_date: Some(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()),
            document_city: Some("Bandung".into()),
            receiver_signer_name: Some("Dra. Ratna".into()),
            ..Default::default()
        };
        let html = receipt(&tx, &items, Some(&store), &options);
        assert!(html.contains("Bandung, 15 Juni 2024"));
        assert!(html.contains("<strong>Dra. Ratna</strong>"));
    }

    #[test]
    fn test_invoice_materai_notice() {
        let (mut tx, items, store) = fixture();
        let html = invoice(&tx, &items, Some(&store), &RenderOptions::default());
        assert!(!html.contains("memerlukan materai"));

        tx.materai_required = true;
        let html = invoice(&tx, &items, Some(&store), &RenderOptions::default());
        assert!(html.contains("memerlukan materai"));
    }

    #[test]
    fn test_handover_report_signers_default_to_courier_and_treasurer() {
        let (tx, items, store) = fixture();
        let html = handover_report(&tx, &items, Some(&store), &RenderOptions::default());
        assert!(html.contains("BERITA ACARA SERAH TERIMA"));
        assert!(html.contains("<strong>Pak Budi</strong>"));
        assert!(html.contains("<strong>Ibu Sari</strong>"));
        // No discount column on the handover table
        assert!(!html.contains("<th>Diskon</th>"));
    }

    #[test]
    fn test_tax_invoice_npwp_and_per_line_ppn() {
        let (tx, items, store) = fixture();
        let html = tax_invoice(&tx, &items, Some(&store), &RenderOptions::default());
        assert!(html.contains("FAKTUR PAJAK"));
        assert!(html.contains("01.234.567.8-901.000"));
        assert!(html.contains("02.345.678.9-012.000"));
        // Per-line PPN on the single line equals the transaction PPN
        assert!(html.contains("Rp 16.445,00"));
    }

    #[test]
    fn test_proforma_watermark() {
        let (tx, items, store) = fixture();
        let html = proforma_invoice(&tx, &items, Some(&store), &RenderOptions::default());
        assert!(html.contains("PROFORMA"));
        assert!(html.contains("bukan bukti pembayaran"));
    }

    #[test]
    fn test_missing_store_profile_renders_without_letterhead() {
        let (tx, items, _) = fixture();
        let html = sales_note(&tx, &items, None, &RenderOptions::default());
        assert!(!html.contains("company-info"));
        assert!(html.contains("NOTA PENJUALAN"));
    }

    #[test]
    fn test_service_value_line() {
        let (mut tx, items, store) = fixture();
        tx.service_value_cents = Some(Money::from_rupiah(50_000).cents());
        tx.service_type = Some("Jasa Instalasi".into());
        let html = sales_note(&tx, &items, Some(&store), &RenderOptions::default());
        assert!(html.contains("Jasa Instalasi: Rp 50.000,00"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let (mut tx, items, store) = fixture();
        tx.school_name = "SD <script>alert(1)</script>".into();
        let html = sales_note(&tx, &items, Some(&store), &RenderOptions::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
