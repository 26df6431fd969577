use std::io::Write;

use csv::Writer;

use crate::account::AccountRecord;
use crate::bank::Report;
use crate::client::ClientRecord;
use crate::transaction::TransactionRecord;

fn write_csv<W, R>(output: &mut W, records: impl IntoIterator<Item = R>) -> anyhow::Result<()>
where
    W: Write,
    R: serde::Serialize,
{
    let mut writer = Writer::from_writer(output);
    for record in records {
        if let Err(err) = writer.serialize(record) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}

pub fn write_client_records<W: Write>(
    output: &mut W,
    records: impl IntoIterator<Item = ClientRecord>,
) -> anyhow::Result<()> {
    write_csv(output, records)
}

pub fn write_account_records<W: Write>(
    output: &mut W,
    records: impl IntoIterator<Item = AccountRecord>,
) -> anyhow::Result<()> {
    write_csv(output, records)
}

pub fn write_transaction_records<W: Write>(
    output: &mut W,
    records: impl IntoIterator<Item = TransactionRecord>,
) -> anyhow::Result<()> {
    write_csv(output, records)
}

/// Plain-text rendering of a report, one fact per line.
pub fn render_report(report: &Report) -> String {
    match report {
        Report::Summary(summary) => format!(
            "clients: {}\naccounts: {}\ntotal balance: {}\n",
            summary.clients, summary.accounts, summary.total_balance
        ),
        Report::Financial(financial) => format!(
            "total balance: {}\ndeposits: {}\nwithdrawals: {}\ntransfers: {}\nfailed: {}\n",
            financial.total_balance,
            financial.deposits,
            financial.withdrawals,
            financial.transfers,
            financial.failed
        ),
        Report::Clients(records) => {
            let mut out = String::new();
            for record in records {
                out.push_str(&format!(
                    "{} | {} | {}\n",
                    record.client_id, record.full_name, record.address
                ));
            }
            out
        }
    }
}
